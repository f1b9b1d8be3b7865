//! Survey Answers
//!
//! The five self-report questions, as tagged categories.
//!
//! Answers arrive as free-text labels (English or Spanish, any case, with or
//! without accents). Each question parses its label into an enum variant;
//! anything outside the enumeration parses to `None`, which the scorer
//! reports as *unscored* instead of silently weighting it zero.
//!
//! | Question | Variants → weight |
//! |---|---|
//! | Recall confidence (RC) | Yes 0.9, Somewhat 0.6, No 0.3 |
//! | Analogy usage (λRA) | Generated & compared 0.3, Used given 0.2, Read only 0.1, None 0.0 |
//! | Co-regulation (λCSD) | 0.1 per distinct action, capped (see [`crate::scoring`]) |
//! | Perceived gain (Gi) | A lot 0.9, Some 0.7, Little 0.4, Nothing 0.1 |
//! | Perceived cost (Ci) | Very easy 0.1, Manageable 0.3, Difficult 0.6, Very difficult 0.9 |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::normalize::normalize;

// ============================================================================
// Categorical answers
// ============================================================================

/// A closed set of answer labels for one question.
pub trait Categorical: Sized + Copy + 'static {
	/// Every variant, in questionnaire order.
	const ALL: &'static [Self];

	/// Stable machine code (`snake_case`).
	fn code(self) -> &'static str;

	/// Accepted labels, already normalized.
	fn labels(self) -> &'static [&'static str];

	/// Parse a label. Unknown labels yield `None`.
	fn from_label(label: &str) -> Option<Self> {
		let wanted = normalize(label);
		if wanted.is_empty() {
			return None;
		}
		Self::ALL
			.iter()
			.copied()
			.find(|v| v.code() == wanted || v.labels().contains(&wanted.as_str()))
	}
}

/// A categorical answer that carries a fixed weight.
pub trait Weighted: Categorical {
	/// Numeric weight of this answer.
	fn weight(self) -> f64;
}

/// "Do you remember the principle?" (RC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallConfidence {
	/// Clear recall
	Yes,
	/// Partial recall
	Somewhat,
	/// No recall
	No,
}

impl Categorical for RecallConfidence {
	const ALL: &'static [Self] = &[Self::Yes, Self::Somewhat, Self::No];

	fn code(self) -> &'static str {
		match self {
			Self::Yes => "yes",
			Self::Somewhat => "somewhat",
			Self::No => "no",
		}
	}

	fn labels(self) -> &'static [&'static str] {
		match self {
			Self::Yes => &["yes", "si"],
			Self::Somewhat => &["regular", "regular/somewhat", "mas o menos"],
			Self::No => &["no"],
		}
	}
}

impl Weighted for RecallConfidence {
	fn weight(self) -> f64 {
		match self {
			Self::Yes => 0.9,
			Self::Somewhat => 0.6,
			Self::No => 0.3,
		}
	}
}

/// "How did you use the analogy?" (λRA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalogyUsage {
	/// Built an own analogy and compared it with the given one
	GeneratedAndCompared,
	/// Understood the given analogy and applied it
	UsedGiven,
	/// Read the analogy without understanding it
	ReadNotUnderstood,
	/// Did not use any analogy
	UsedNone,
}

impl Categorical for AnalogyUsage {
	const ALL: &'static [Self] = &[
		Self::GeneratedAndCompared,
		Self::UsedGiven,
		Self::ReadNotUnderstood,
		Self::UsedNone,
	];

	fn code(self) -> &'static str {
		match self {
			Self::GeneratedAndCompared => "generated_and_compared",
			Self::UsedGiven => "used_given",
			Self::ReadNotUnderstood => "read_not_understood",
			Self::UsedNone => "used_none",
		}
	}

	fn labels(self) -> &'static [&'static str] {
		match self {
			Self::GeneratedAndCompared => &[
				"generated own analogy and compared",
				"genere mi propia analogia y la compare",
			],
			Self::UsedGiven => &[
				"understood and used given analogy",
				"entendi y use la analogia dada",
			],
			Self::ReadNotUnderstood => &[
				"read but did not understand",
				"la lei pero no la entendi",
			],
			Self::UsedNone => &["used none", "no use ninguna"],
		}
	}
}

impl Weighted for AnalogyUsage {
	fn weight(self) -> f64 {
		match self {
			Self::GeneratedAndCompared => 0.3,
			Self::UsedGiven => 0.2,
			Self::ReadNotUnderstood => 0.1,
			Self::UsedNone => 0.0,
		}
	}
}

/// Co-regulation strategies the student may report (λCSD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoRegulationAction {
	/// Asked the tutoring chatbot
	Chatbot,
	/// Exchanged feedback with peers
	PeerFeedback,
	/// Consulted the teacher
	TeacherConsultation,
	/// Looked for extra resources
	ExtraResources,
	/// Explained the principle to themselves
	SelfExplanation,
}

impl Categorical for CoRegulationAction {
	const ALL: &'static [Self] = &[
		Self::Chatbot,
		Self::PeerFeedback,
		Self::TeacherConsultation,
		Self::ExtraResources,
		Self::SelfExplanation,
	];

	fn code(self) -> &'static str {
		match self {
			Self::Chatbot => "chatbot",
			Self::PeerFeedback => "peer-feedback",
			Self::TeacherConsultation => "teacher-consultation",
			Self::ExtraResources => "extra-resources",
			Self::SelfExplanation => "self-explanation",
		}
	}

	fn labels(self) -> &'static [&'static str] {
		match self {
			Self::Chatbot => &["chat bot", "asistente virtual"],
			Self::PeerFeedback => &["peer feedback", "retroalimentacion de pares"],
			Self::TeacherConsultation => &["teacher consultation", "consulta al docente"],
			Self::ExtraResources => &["extra resources", "recursos adicionales"],
			Self::SelfExplanation => &["self explanation", "autoexplicacion"],
		}
	}
}

/// "How much did you gain?" (Gi)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerceivedGain {
	/// A lot
	ALot,
	/// Some
	Some,
	/// Little
	Little,
	/// Nothing
	Nothing,
}

impl Categorical for PerceivedGain {
	const ALL: &'static [Self] = &[Self::ALot, Self::Some, Self::Little, Self::Nothing];

	fn code(self) -> &'static str {
		match self {
			Self::ALot => "a_lot",
			Self::Some => "some",
			Self::Little => "little",
			Self::Nothing => "nothing",
		}
	}

	fn labels(self) -> &'static [&'static str] {
		match self {
			Self::ALot => &["a lot", "mucho"],
			Self::Some => &["algo"],
			Self::Little => &["poco"],
			Self::Nothing => &["nada"],
		}
	}
}

impl Weighted for PerceivedGain {
	fn weight(self) -> f64 {
		match self {
			Self::ALot => 0.9,
			Self::Some => 0.7,
			Self::Little => 0.4,
			Self::Nothing => 0.1,
		}
	}
}

/// "How hard was it?" (Ci)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerceivedCost {
	/// Very easy
	VeryEasy,
	/// Manageable
	Manageable,
	/// Difficult
	Difficult,
	/// Very difficult
	VeryDifficult,
}

impl Categorical for PerceivedCost {
	const ALL: &'static [Self] = &[
		Self::VeryEasy,
		Self::Manageable,
		Self::Difficult,
		Self::VeryDifficult,
	];

	fn code(self) -> &'static str {
		match self {
			Self::VeryEasy => "very_easy",
			Self::Manageable => "manageable",
			Self::Difficult => "difficult",
			Self::VeryDifficult => "very_difficult",
		}
	}

	fn labels(self) -> &'static [&'static str] {
		match self {
			Self::VeryEasy => &["very easy", "muy facil"],
			Self::Manageable => &["manejable"],
			Self::Difficult => &["dificil"],
			Self::VeryDifficult => &["very difficult", "muy dificil"],
		}
	}
}

impl Weighted for PerceivedCost {
	fn weight(self) -> f64 {
		match self {
			Self::VeryEasy => 0.1,
			Self::Manageable => 0.3,
			Self::Difficult => 0.6,
			Self::VeryDifficult => 0.9,
		}
	}
}

/// Distinct co-regulation actions, in first-seen order.
pub type CoRegulationSelection = SmallVec<[CoRegulationAction; 5]>;

/// Parse a list of co-regulation labels.
///
/// Blank entries are ignored and repeated actions count once. Returns `None`
/// if any entry is not a known action.
#[must_use]
pub fn parse_co_regulation<S: AsRef<str>>(labels: &[S]) -> Option<CoRegulationSelection> {
	let mut selected = CoRegulationSelection::new();
	for label in labels {
		let label = label.as_ref();
		if normalize(label).is_empty() {
			continue;
		}
		let action = CoRegulationAction::from_label(label)?;
		if !selected.contains(&action) {
			selected.push(action);
		}
	}
	Some(selected)
}

// ============================================================================
// Answer sets
// ============================================================================

/// The five questions, for reporting which ones went unscored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
	/// RC
	RecallConfidence,
	/// λRA
	AnalogyUsage,
	/// λCSD
	CoRegulation,
	/// Gi
	PerceivedGain,
	/// Ci
	PerceivedCost,
}

/// One respondent's raw answers. `None` means the question was not answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAnswers {
	/// Recall confidence label
	pub recall_confidence: Option<String>,
	/// Analogy usage label
	pub analogy_usage: Option<String>,
	/// Selected co-regulation action labels
	pub co_regulation: Option<Vec<String>>,
	/// Perceived gain label
	pub perceived_gain: Option<String>,
	/// Perceived cost label
	pub perceived_cost: Option<String>,
}

/// Answers after label parsing. `None` marks an unscored question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnswers {
	/// Parsed RC
	pub recall_confidence: Option<RecallConfidence>,
	/// Parsed λRA
	pub analogy_usage: Option<AnalogyUsage>,
	/// Parsed λCSD selection
	pub co_regulation: Option<CoRegulationSelection>,
	/// Parsed Gi
	pub perceived_gain: Option<PerceivedGain>,
	/// Parsed Ci
	pub perceived_cost: Option<PerceivedCost>,
}

impl SurveyAnswers {
	/// Parse every answer into its category.
	#[must_use]
	pub fn parse(&self) -> ParsedAnswers {
		ParsedAnswers {
			recall_confidence: self.recall_confidence.as_deref().and_then(RecallConfidence::from_label),
			analogy_usage: self.analogy_usage.as_deref().and_then(AnalogyUsage::from_label),
			co_regulation: self.co_regulation.as_deref().and_then(parse_co_regulation),
			perceived_gain: self.perceived_gain.as_deref().and_then(PerceivedGain::from_label),
			perceived_cost: self.perceived_cost.as_deref().and_then(PerceivedCost::from_label),
		}
	}
}
