//! Configuration for the Analogic server
//!
//! CLI arguments with environment variable fallbacks, using clap.
//! A `.env` file in the working directory is loaded first by `main`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::generator::GenerationOptions;
use crate::journal::JournalPaths;

/// ACT-R Analogic - resources, analogies and self-report scoring
#[derive(Parser, Debug, Clone)]
#[command(name = "analogic-server")]
#[command(about = "HTTP backend for the ACT-R Analogic tutor")]
#[command(version)]
pub struct Args {
	/// Address to listen on
	#[arg(long, env = "LISTEN", default_value = "0.0.0.0:10000")]
	pub listen: SocketAddr,

	/// Directory holding the CSV journals (created if absent)
	#[arg(long, env = "DATA_DIR", default_value = "data")]
	pub data_dir: PathBuf,

	/// Reference table (.csv, .xlsx, .xls or .ods)
	#[arg(
		long,
		env = "REFERENCE_TABLE",
		default_value = "data/Rutas_Completas_Principios_Contexto_Formato.xlsx"
	)]
	pub reference_table: PathBuf,

	/// API key for the OpenAI-compatible text generation endpoint.
	/// Analogy generation is disabled when absent.
	#[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
	pub openai_api_key: Option<String>,

	/// Base URL of the OpenAI-compatible API
	#[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
	pub openai_base_url: String,

	/// Chat model used for analogies
	#[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4")]
	pub openai_model: String,

	/// Token budget per analogy
	#[arg(long, env = "ANALOGY_MAX_TOKENS", default_value = "400")]
	pub analogy_max_tokens: u32,

	/// Sampling temperature for analogies
	#[arg(long, env = "ANALOGY_TEMPERATURE", default_value = "0.7")]
	pub analogy_temperature: f32,

	/// Upstream generation timeout in seconds
	#[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value = "60")]
	pub generation_timeout_secs: u64,

	/// Shared secret for the admin download endpoints.
	/// Downloads are refused when absent.
	#[arg(long, env = "ADMIN_KEY", hide_env_values = true)]
	pub admin_key: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	pub log_level: String,

	/// Emit logs as JSON lines
	#[arg(long, env = "LOG_JSON", default_value = "false")]
	pub log_json: bool,
}

impl Args {
	/// Validate configuration values clap cannot check on its own.
	///
	/// # Errors
	///
	/// Returns a description of the first invalid value.
	pub fn validate(&self) -> Result<(), String> {
		if self.analogy_max_tokens == 0 {
			return Err("ANALOGY_MAX_TOKENS must be greater than zero".to_owned());
		}
		if !(0.0..=2.0).contains(&self.analogy_temperature) {
			return Err(format!(
				"ANALOGY_TEMPERATURE must be within 0.0..=2.0, got {}",
				self.analogy_temperature
			));
		}
		if self.generation_timeout_secs == 0 {
			return Err("GENERATION_TIMEOUT_SECS must be greater than zero".to_owned());
		}
		Ok(())
	}

	/// Journal file locations under `data_dir`.
	#[must_use]
	pub fn journal_paths(&self) -> JournalPaths {
		JournalPaths::in_dir(&self.data_dir)
	}

	/// Generation options for analogy requests.
	#[must_use]
	pub const fn generation_options(&self) -> GenerationOptions {
		GenerationOptions {
			max_tokens: self.analogy_max_tokens,
			temperature: self.analogy_temperature,
		}
	}

	/// Upstream generation timeout.
	#[must_use]
	pub const fn generation_timeout(&self) -> Duration {
		Duration::from_secs(self.generation_timeout_secs)
	}

	/// API key, ignoring blank values.
	#[must_use]
	pub fn api_key(&self) -> Option<&str> {
		self.openai_api_key
			.as_deref()
			.map(str::trim)
			.filter(|k| !k.is_empty())
	}
}
