//! Cognitive Scoring
//!
//! ACT-R production utility from a five-question self-report.
//!
//! Weights come from the answer tables in [`crate::survey`]. They combine as:
//!
//! 1. **Boosted recall**: `RC⁺ = RC + λRA + λCSD`
//! 2. **Utility** (gain minus cost): `Uᵢ = Gᵢ - Cᵢ`
//! 3. **Production selection** (softmax at temperature θ):
//!    ```text
//!    P(i) = e^(Uᵢ/θ) / Σⱼ e^(Uⱼ/θ)
//!    ```
//!    A single report competes with no other production, so `Pᵢ = 1.0`
//!    whenever `Uᵢ` is defined.
//! 4. **Combined score**, one of [`CombinedScore`].
//!
//! A weight that cannot be read from its answer is *unscored* (`None`), and
//! so is every quantity derived from it. Partial records are ordinary
//! results, never errors.

use serde::{Deserialize, Serialize};

use crate::survey::{ParsedAnswers, Question, SurveyAnswers, Weighted};

/// ACT-R default softmax temperature for production selection.
pub const SELECTION_TEMPERATURE: f64 = 0.2;
/// λCSD contribution of each distinct co-regulation action.
pub const CO_REGULATION_STEP: f64 = 0.1;
/// Ceiling on λCSD regardless of how many actions were selected.
pub const CO_REGULATION_CAP: f64 = 0.3;

/// Formula for the single headline score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinedScore {
	/// `(RC⁺ × Gᵢ) / Cᵢ`; unscored when `Cᵢ` is zero.
	#[default]
	RecallGainPerCost,
	/// The production-selection probability `Pᵢ`.
	SelectionProbability,
}

impl CombinedScore {
	/// Stable snake-case name, as serialized.
	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::RecallGainPerCost => "recall_gain_per_cost",
			Self::SelectionProbability => "selection_probability",
		}
	}
}

/// Configuration for scoring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreConfig {
	/// `θ` - softmax temperature
	pub temperature: f64,
	/// λCSD per selected action
	pub co_regulation_step: f64,
	/// λCSD ceiling
	pub co_regulation_cap: f64,
	/// Headline formula
	pub combined: CombinedScore,
}

impl Default for ScoreConfig {
	fn default() -> Self {
		Self {
			temperature: SELECTION_TEMPERATURE,
			co_regulation_step: CO_REGULATION_STEP,
			co_regulation_cap: CO_REGULATION_CAP,
			combined: CombinedScore::default(),
		}
	}
}

/// A [`ScoreConfig`] value outside its domain.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ScoreConfigError {
	/// θ must be positive and finite.
	#[error("selection temperature must be positive and finite, got {0}")]
	Temperature(f64),

	/// Step and cap must be finite and non-negative.
	#[error("co-regulation step and cap must be finite and non-negative, got step {step} and cap {cap}")]
	CoRegulation {
		/// Per-action step
		step: f64,
		/// Ceiling
		cap: f64,
	},
}

impl ScoreConfig {
	/// Check every parameter against its domain.
	///
	/// # Errors
	///
	/// Returns the first [`ScoreConfigError`] found.
	pub fn validate(&self) -> Result<(), ScoreConfigError> {
		if !is_valid_temperature(self.temperature) {
			return Err(ScoreConfigError::Temperature(self.temperature));
		}
		let in_range = |v: f64| v.is_finite() && v >= 0.0;
		if !in_range(self.co_regulation_step) || !in_range(self.co_regulation_cap) {
			return Err(ScoreConfigError::CoRegulation {
				step: self.co_regulation_step,
				cap: self.co_regulation_cap,
			});
		}
		Ok(())
	}
}

/// Everything computed from one answer set. `None` means unscored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
	/// Recall confidence weight (RC)
	pub recall: Option<f64>,
	/// Analogy usage weight (λRA)
	pub analogy_usage: Option<f64>,
	/// Capped co-regulation weight (λCSD)
	pub co_regulation: Option<f64>,
	/// Perceived gain (Gᵢ)
	pub gain: Option<f64>,
	/// Perceived cost (Cᵢ)
	pub cost: Option<f64>,
	/// `RC + λRA + λCSD`
	pub recall_plus: Option<f64>,
	/// `Gᵢ - Cᵢ`
	pub utility: Option<f64>,
	/// Production-selection probability (`Pᵢ`)
	pub production_probability: Option<f64>,
	/// Headline score under [`ScoreRecord::formula`]
	pub combined: Option<f64>,
	/// Formula used for `combined`
	pub formula: CombinedScore,
	/// Questions whose answers could not be scored
	pub unscored: Vec<Question>,
}

impl ScoreRecord {
	/// Whether every question was scored.
	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.unscored.is_empty()
	}
}

// ============================================================================
// Weights
// ============================================================================

/// λCSD for a number of distinct actions: `min(cap, step × n)`.
///
/// # Examples
///
/// ```
/// use analogic_core::scoring::{co_regulation_weight, ScoreConfig};
///
/// let config = ScoreConfig::default();
/// assert!((co_regulation_weight(2, &config) - 0.2).abs() < 1e-12);
/// assert_eq!(co_regulation_weight(5, &config), 0.3);
/// ```
#[inline]
#[must_use]
pub fn co_regulation_weight(selected: usize, config: &ScoreConfig) -> f64 {
	#[allow(clippy::cast_precision_loss)]
	let raw = config.co_regulation_step * selected as f64;
	raw.min(config.co_regulation_cap)
}

// ============================================================================
// Production selection
// ============================================================================

/// Softmax selection probabilities over competing production utilities.
///
/// `P(i) = e^(Uᵢ/θ) / Σⱼ e^(Uⱼ/θ)`
///
/// Shifted by the maximum utility for numerical stability. A lone production
/// always gets exactly `1.0`, whatever θ. Competing productions need a
/// positive, finite θ; otherwise the result is empty.
#[must_use]
pub fn production_probabilities(utilities: &[f64], temperature: f64) -> Vec<f64> {
	match utilities {
		[] => return Vec::new(),
		[_] => return vec![1.0],
		_ if !is_valid_temperature(temperature) => return Vec::new(),
		_ => {}
	}

	let max = utilities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	let exps: Vec<f64> = utilities
		.iter()
		.map(|&u| ((u - max) / temperature).exp())
		.collect();
	let total: f64 = exps.iter().sum();

	exps.into_iter().map(|e| e / total).collect()
}

/// Selection probability of a single production with no competitors.
#[inline]
#[must_use]
pub fn production_probability(utility: f64, temperature: f64) -> Option<f64> {
	production_probabilities(&[utility], temperature).first().copied()
}

#[inline]
fn is_valid_temperature(temperature: f64) -> bool {
	temperature.is_finite() && temperature > 0.0
}

// ============================================================================
// Scoring
// ============================================================================

/// Score a raw answer set.
///
/// # Examples
///
/// ```
/// use analogic_core::scoring::{score, ScoreConfig};
/// use analogic_core::survey::SurveyAnswers;
///
/// let answers = SurveyAnswers {
///     recall_confidence: Some("Yes".into()),
///     analogy_usage: Some("Understood and used given analogy".into()),
///     co_regulation: Some(vec!["chatbot".into(), "peer-feedback".into()]),
///     perceived_gain: Some("A lot".into()),
///     perceived_cost: Some("Manageable".into()),
/// };
///
/// let record = score(&answers, &ScoreConfig::default());
/// assert!(record.is_complete());
/// assert!((record.recall_plus.unwrap() - 1.3).abs() < 1e-9);
/// assert!((record.utility.unwrap() - 0.6).abs() < 1e-9);
/// assert_eq!(record.production_probability, Some(1.0));
/// ```
#[must_use]
pub fn score(answers: &SurveyAnswers, config: &ScoreConfig) -> ScoreRecord {
	score_parsed(&answers.parse(), config)
}

/// Score answers that were already parsed.
#[must_use]
pub fn score_parsed(parsed: &ParsedAnswers, config: &ScoreConfig) -> ScoreRecord {
	let recall = parsed.recall_confidence.map(Weighted::weight);
	let analogy_usage = parsed.analogy_usage.map(Weighted::weight);
	let co_regulation = parsed
		.co_regulation
		.as_ref()
		.map(|selection| co_regulation_weight(selection.len(), config));
	let gain = parsed.perceived_gain.map(Weighted::weight);
	let cost = parsed.perceived_cost.map(Weighted::weight);

	let unscored: Vec<Question> = [
		(Question::RecallConfidence, recall.is_none()),
		(Question::AnalogyUsage, analogy_usage.is_none()),
		(Question::CoRegulation, co_regulation.is_none()),
		(Question::PerceivedGain, gain.is_none()),
		(Question::PerceivedCost, cost.is_none()),
	]
	.into_iter()
	.filter_map(|(question, missing)| missing.then_some(question))
	.collect();

	// Derived quantities only exist when all five weights do.
	let weights = match (recall, analogy_usage, co_regulation, gain, cost) {
		(Some(rc), Some(ra), Some(csd), Some(g), Some(c)) => Some((rc, ra, csd, g, c)),
		_ => None,
	};

	let recall_plus = weights.map(|(rc, ra, csd, _, _)| rc + ra + csd);
	let utility = weights.map(|(_, _, _, g, c)| g - c);
	let production_probability =
		utility.and_then(|u| production_probability(u, config.temperature));

	let combined = match config.combined {
		CombinedScore::RecallGainPerCost => weights.and_then(|(_, _, _, g, c)| {
			let boosted = recall_plus?;
			(c > 0.0).then(|| boosted * g / c)
		}),
		CombinedScore::SelectionProbability => production_probability,
	};

	ScoreRecord {
		recall,
		analogy_usage,
		co_regulation,
		gain,
		cost,
		recall_plus,
		utility,
		production_probability,
		combined,
		formula: config.combined,
		unscored,
	}
}
