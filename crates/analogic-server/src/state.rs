//! Shared application state.

use std::sync::Arc;

use analogic_core::scoring::ScoreConfig;
use analogic_core::table::ReferenceTable;

use crate::generator::{GenerationOptions, TextGenerator};
use crate::journal::{Journal, JournalPaths};

/// The three journals the handlers append to.
#[derive(Debug, Clone)]
pub struct Journals {
	/// Student answers
	pub responses: Journal,
	/// Generated analogies
	pub analogies: Journal,
	/// Scored self-reports
	pub self_reports: Journal,
}

impl Journals {
	/// Open (lazily) the journals at `paths`.
	#[must_use]
	pub fn new(paths: &JournalPaths) -> Self {
		Self {
			responses: Journal::new(paths.responses.clone()),
			analogies: Journal::new(paths.analogies.clone()),
			self_reports: Journal::new(paths.self_reports.clone()),
		}
	}
}

/// State cloned into every handler. The table is immutable once built.
#[derive(Clone)]
pub struct AppState {
	/// Reference table, loaded once at startup
	pub table: Arc<ReferenceTable>,
	/// Self-report scoring parameters
	pub scoring: Arc<ScoreConfig>,
	/// CSV journals
	pub journals: Journals,
	/// Analogy generator; `None` disables the endpoint
	pub generator: Option<Arc<dyn TextGenerator>>,
	/// Sampling options for analogies
	pub generation: GenerationOptions,
	/// Shared secret for admin downloads; `None` refuses every download
	pub admin_key: Option<Arc<str>>,
}

impl AppState {
	/// State with default scoring, no generator and no admin key.
	#[must_use]
	pub fn new(table: ReferenceTable, paths: &JournalPaths) -> Self {
		Self {
			table: Arc::new(table),
			scoring: Arc::new(ScoreConfig::default()),
			journals: Journals::new(paths),
			generator: None,
			generation: GenerationOptions::default(),
			admin_key: None,
		}
	}

	/// Attach a text generator.
	#[must_use]
	pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>, options: GenerationOptions) -> Self {
		self.generator = Some(generator);
		self.generation = options;
		self
	}

	/// Enable admin downloads with `key`. Blank keys leave them disabled.
	#[must_use]
	pub fn with_admin_key(mut self, key: Option<&str>) -> Self {
		self.admin_key = key.map(str::trim).filter(|k| !k.is_empty()).map(Arc::from);
		self
	}

	/// Whether `candidate` matches the admin key.
	#[must_use]
	pub fn is_admin(&self, candidate: Option<&str>) -> bool {
		match (self.admin_key.as_deref(), candidate) {
			(Some(key), Some(candidate)) => key == candidate,
			_ => false,
		}
	}
}
