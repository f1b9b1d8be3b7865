//! # Analogic Core
//!
//! The deterministic heart of the ACT-R Analogic tutor: which learning
//! resource a student gets, and how their self-report scores.
//!
//! ## Why Analogies?
//!
//! A principle sticks when it is mapped onto something the student already
//! knows. The tutor picks a resource that fits the student's context, asks a
//! language model for an analogy, then asks the student how it went:
//!
//! - **Context shapes the resource** - principle, environment, interest and
//!   preferred modality select a row of a curated table
//! - **Self-report drives the score** - recall, analogy use, co-regulation,
//!   perceived gain and perceived cost become ACT-R quantities
//!
//! ## Core Concepts
//!
//! ### Resolution
//!
//! Labels are normalized (case, accents, whitespace) on both sides, then the
//! first table row with an identical key wins:
//!
//! ```text
//! ("Least Astonishment", "Urban", "Música", "Visual") → ("Infographic", "http://…")
//! ```
//!
//! ### Scoring
//!
//! 1. **Boosted recall** - `RC⁺ = RC + λRA + λCSD`
//! 2. **Utility** - `Uᵢ = Gᵢ - Cᵢ`
//! 3. **Production selection** - `P(i) = e^(Uᵢ/θ) / Σⱼ e^(Uⱼ/θ)`, θ = 0.2
//!
//! Unknown answers are *unscored*, never zero.
//!
//! ## Example
//!
//! ```rust
//! use analogic_core::{
//!     resolver::{resolve, ResourceQuery},
//!     scoring::{score, ScoreConfig},
//!     survey::SurveyAnswers,
//!     table::{ReferenceRow, ReferenceTable},
//! };
//!
//! let table = ReferenceTable::from_rows(vec![ReferenceRow::new(
//!     "Least Astonishment", "Urban", "Music", "Visual", "Infographic", "http://x",
//! )]);
//!
//! let query = ResourceQuery::new("least astonishment", "URBAN", "music", "visual");
//! let resource = resolve(&table, &query).expect("combination exists");
//! println!("{} → {}", resource.kind, resource.link);
//!
//! let answers = SurveyAnswers {
//!     recall_confidence: Some("Yes".into()),
//!     analogy_usage: Some("Used none".into()),
//!     co_regulation: Some(vec!["chatbot".into()]),
//!     perceived_gain: Some("Some".into()),
//!     perceived_cost: Some("Difficult".into()),
//! };
//! let record = score(&answers, &ScoreConfig::default());
//! println!("RC+ = {:?}, U = {:?}", record.recall_plus, record.utility);
//! ```
//!
//! ## References
//!
//! - Anderson, J. R. (2007). *How Can the Human Mind Occur in the Physical
//!   Universe?* - ACT-R production utility
//! - Gentner, D. (1983). *Structure-mapping: A theoretical framework for
//!   analogy*

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::needless_return)]

pub mod normalize;
pub mod resolver;
pub mod scoring;
pub mod survey;
pub mod table;

pub use normalize::{normalize, same_label};
pub use resolver::{
	resolve, resolve_key, Attribute, AttributeKey, ResolveError, ResourceQuery,
};
pub use scoring::{
	co_regulation_weight, production_probabilities, production_probability, score, score_parsed,
	CombinedScore, ScoreConfig, ScoreConfigError, ScoreRecord, CO_REGULATION_CAP, CO_REGULATION_STEP,
	SELECTION_TEMPERATURE,
};
pub use survey::{
	parse_co_regulation, AnalogyUsage, Categorical, CoRegulationAction, CoRegulationSelection,
	ParsedAnswers, PerceivedCost, PerceivedGain, Question, RecallConfidence, SurveyAnswers,
	Weighted,
};
pub use table::{ReferenceRow, ReferenceTable, ResourceDescriptor, TableError, TableSchema};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
