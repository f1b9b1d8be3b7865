//! Append-only CSV journals
//!
//! Every accepted submission becomes one row in a flat CSV file. The header
//! is written when the file is created; later appends add rows only.
//!
//! Appends run on tokio's blocking pool and are serialized per journal by a
//! mutex, so rows never interleave.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use analogic_core::scoring::ScoreRecord;
use analogic_core::survey::SurveyAnswers;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

/// Timestamp format of the `fecha` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Journal I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
	/// Opening or writing the file failed.
	#[error("journal I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Serializing the row failed.
	#[error("journal CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// The blocking writer task panicked or was cancelled.
	#[error("journal task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}

/// Locations of the three journals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalPaths {
	/// Student answers (`respuestas_estudiantes.csv`)
	pub responses: PathBuf,
	/// Generated analogies (`analogias_generadas.csv`)
	pub analogies: PathBuf,
	/// Scored self-reports (`autoreportes.csv`)
	pub self_reports: PathBuf,
}

impl JournalPaths {
	/// Standard file names under `dir`.
	#[must_use]
	pub fn in_dir(dir: impl AsRef<Path>) -> Self {
		let dir = dir.as_ref();
		Self {
			responses: dir.join("respuestas_estudiantes.csv"),
			analogies: dir.join("analogias_generadas.csv"),
			self_reports: dir.join("autoreportes.csv"),
		}
	}
}

/// Current local time in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn timestamp() -> String {
	chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One append-only CSV file.
#[derive(Debug, Clone)]
pub struct Journal {
	path: Arc<PathBuf>,
	lock: Arc<Mutex<()>>,
}

impl Journal {
	/// Journal at `path`. The file is created on first append.
	#[must_use]
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: Arc::new(path.into()),
			lock: Arc::new(Mutex::new(())),
		}
	}

	/// File location.
	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Append one row, writing the header first if the file is new or empty.
	///
	/// # Errors
	///
	/// Returns [`JournalError`] if the file cannot be opened or written.
	pub async fn append<R>(&self, row: R) -> Result<(), JournalError>
	where
		R: Serialize + Send + 'static,
	{
		let path = Arc::clone(&self.path);
		let lock = Arc::clone(&self.lock);

		tokio::task::spawn_blocking(move || {
			let _guard = lock.lock();
			append_row(&path, &row)
		})
		.await??;

		debug!(path = %self.path.display(), "journal row appended");
		Ok(())
	}

	/// Whole file contents, or `None` if nothing has been written yet.
	///
	/// Reads under the append lock, so the last row is never half-written.
	///
	/// # Errors
	///
	/// Returns [`JournalError`] if the file exists but cannot be read.
	pub async fn read(&self) -> Result<Option<Vec<u8>>, JournalError> {
		let path = Arc::clone(&self.path);
		let lock = Arc::clone(&self.lock);

		let bytes = tokio::task::spawn_blocking(move || {
			let _guard = lock.lock();
			read_all(&path)
		})
		.await??;
		Ok(bytes)
	}
}

fn read_all(path: &Path) -> Result<Option<Vec<u8>>, JournalError> {
	match std::fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e.into()),
	}
}

fn append_row<R: Serialize>(path: &Path, row: &R) -> Result<(), JournalError> {
	let file = OpenOptions::new().create(true).append(true).open(path)?;
	let is_new = file.metadata()?.len() == 0;

	let mut writer = csv::WriterBuilder::new()
		.has_headers(is_new)
		.from_writer(file);
	writer.serialize(row)?;
	writer.flush()?;
	Ok(())
}

// ============================================================================
// Rows
// ============================================================================

/// A student's answer to an activity.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEntry {
	pub fecha: String,
	pub nombre_completo: String,
	pub numero_identificacion: String,
	pub edad: String,
	pub principio: String,
	pub entorno: String,
	pub interes: String,
	pub modalidad: String,
	pub tipo_recurso: String,
	pub link_recurso: String,
	pub respuesta: String,
	pub fase: String,
}

/// A generated analogy, kept for audit.
#[derive(Debug, Clone, Serialize)]
pub struct AnalogyEntry {
	pub fecha: String,
	pub nombre_completo: String,
	pub numero_identificacion: String,
	pub principio: String,
	pub interes: String,
	pub entorno: String,
	pub modalidad: String,
	pub estilo: String,
	pub modelo: String,
	pub prompt: String,
	pub analogia: String,
}

/// A scored self-report. Unscored values are written as empty cells.
#[derive(Debug, Clone, Serialize)]
pub struct SelfReportEntry {
	pub fecha: String,
	pub nombre_completo: String,
	pub numero_identificacion: String,
	pub edad: String,
	pub fase: String,
	pub principio: String,
	pub entorno: String,
	pub interes: String,
	pub modalidad: String,
	/// Free-text answer, if any
	pub respuesta: String,
	pub confianza_recuerdo: String,
	pub uso_analogia: String,
	/// Selected actions joined with `;`
	pub acciones_corregulacion: String,
	pub ganancia_percibida: String,
	pub costo_percibido: String,
	pub rc: Option<f64>,
	pub lambda_ra: Option<f64>,
	pub lambda_csd: Option<f64>,
	pub gi: Option<f64>,
	pub ci: Option<f64>,
	pub rc_plus: Option<f64>,
	pub ui: Option<f64>,
	pub ppi: Option<f64>,
	pub puntaje: Option<f64>,
	pub formula: String,
	pub completo: bool,
}

/// Who submitted a self-report, and in which context.
#[derive(Debug, Clone, Default)]
pub struct Respondent {
	pub nombre_completo: String,
	pub numero_identificacion: String,
	pub edad: String,
	pub fase: String,
	pub principio: String,
	pub entorno: String,
	pub interes: String,
	pub modalidad: String,
	pub respuesta: String,
}

impl SelfReportEntry {
	/// Row for `respondent`, with raw `answers` next to their `record`.
	#[must_use]
	pub fn new(respondent: Respondent, answers: &SurveyAnswers, record: &ScoreRecord) -> Self {
		let text = |answer: &Option<String>| answer.clone().unwrap_or_default();
		Self {
			fecha: timestamp(),
			nombre_completo: respondent.nombre_completo,
			numero_identificacion: respondent.numero_identificacion,
			edad: respondent.edad,
			fase: respondent.fase,
			principio: respondent.principio,
			entorno: respondent.entorno,
			interes: respondent.interes,
			modalidad: respondent.modalidad,
			respuesta: respondent.respuesta,
			confianza_recuerdo: text(&answers.recall_confidence),
			uso_analogia: text(&answers.analogy_usage),
			acciones_corregulacion: answers.co_regulation.as_deref().unwrap_or_default().join(";"),
			ganancia_percibida: text(&answers.perceived_gain),
			costo_percibido: text(&answers.perceived_cost),
			rc: record.recall,
			lambda_ra: record.analogy_usage,
			lambda_csd: record.co_regulation,
			gi: record.gain,
			ci: record.cost,
			rc_plus: record.recall_plus,
			ui: record.utility,
			ppi: record.production_probability,
			puntaje: record.combined,
			formula: record.formula.name().to_owned(),
			completo: record.is_complete(),
		}
	}
}
