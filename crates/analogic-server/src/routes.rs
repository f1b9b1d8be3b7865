//! HTTP handlers
//!
//! JSON in, JSON out. Field names follow the tutor's front end (Spanish,
//! snake case). Identity fields may arrive as strings or numbers; both are
//! stored as text.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use analogic_core::resolver::{resolve, ResourceQuery};
use analogic_core::scoring::{score, ScoreRecord};
use analogic_core::survey::SurveyAnswers;

use crate::error::ApiError;
use crate::generator::GenerationError;
use crate::journal::{timestamp, AnalogyEntry, Journal, Respondent, ResponseEntry, SelfReportEntry};
use crate::prompt::AnalogyPrompt;
use crate::state::AppState;

type Body<T> = Result<Json<T>, JsonRejection>;

// ============================================================================
// Field coercion
// ============================================================================

/// Text form of a JSON value: strings verbatim, everything else as JSON.
pub(crate) fn value_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

fn optional_text(value: Option<&Value>) -> String {
	value.map(value_text).unwrap_or_default()
}

/// Co-regulation actions as a list or a `,`/`;` separated string.
pub(crate) fn action_list(value: &Value) -> Vec<String> {
	match value {
		Value::Array(items) => items.iter().map(value_text).collect(),
		Value::String(s) => s
			.split([',', ';'])
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_owned)
			.collect(),
		other => vec![value_text(other)],
	}
}

/// Collects required fields, remembering which ones are absent.
struct Required {
	missing: Vec<&'static str>,
}

impl Required {
	const fn new() -> Self {
		Self { missing: Vec::new() }
	}

	fn take(&mut self, name: &'static str, value: Option<&Value>) -> String {
		value.map_or_else(
			|| {
				self.missing.push(name);
				String::new()
			},
			value_text,
		)
	}

	fn finish(self, action: &str) -> Result<(), ApiError> {
		if self.missing.is_empty() {
			Ok(())
		} else {
			Err(ApiError::BadRequest(format!(
				"Datos incompletos para {action}: faltan {}",
				self.missing.join(", ")
			)))
		}
	}
}

// ============================================================================
// Liveness
// ============================================================================

/// `GET /`
pub async fn index() -> &'static str {
	"ACT-R Analogic backend activo"
}

#[derive(Debug, Serialize)]
pub struct Health {
	status: &'static str,
	version: &'static str,
	reference_rows: usize,
	generator: Option<String>,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Health> {
	Json(Health {
		status: "ok",
		version: env!("CARGO_PKG_VERSION"),
		reference_rows: state.table.len(),
		generator: state.generator.as_ref().map(|g| g.model().to_owned()),
	})
}

// ============================================================================
// Resource resolution
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ResourceRequest {
	principio: Option<Value>,
	entorno: Option<Value>,
	interes: Option<Value>,
	modalidad: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
	tipo: String,
	link: String,
}

/// `POST /api/buscar_recurso`
#[instrument(name = "buscar_recurso", skip_all)]
pub async fn find_resource(
	State(state): State<AppState>,
	body: Body<ResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
	let Json(request) = body?;
	let query = ResourceQuery {
		principle: request.principio.as_ref().map(value_text),
		environment: request.entorno.as_ref().map(value_text),
		interest: request.interes.as_ref().map(value_text),
		modality: request.modalidad.as_ref().map(value_text),
	};

	let resource = resolve(&state.table, &query)?;
	info!(tipo = %resource.kind, "resource resolved");

	Ok(Json(ResourceResponse {
		tipo: resource.kind.clone(),
		link: resource.link.clone(),
	}))
}

// ============================================================================
// Student answers
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
	nombre_completo: Option<Value>,
	numero_identificacion: Option<Value>,
	edad: Option<Value>,
	principio: Option<Value>,
	entorno: Option<Value>,
	interes: Option<Value>,
	modalidad: Option<Value>,
	tipo_recurso: Option<Value>,
	link_recurso: Option<Value>,
	respuesta: Option<Value>,
	fase: Option<Value>,
}

impl AnswerRequest {
	fn into_entry(self) -> Result<ResponseEntry, ApiError> {
		let mut required = Required::new();
		let entry = ResponseEntry {
			fecha: timestamp(),
			nombre_completo: required.take("nombre_completo", self.nombre_completo.as_ref()),
			numero_identificacion: required.take("numero_identificacion", self.numero_identificacion.as_ref()),
			edad: required.take("edad", self.edad.as_ref()),
			principio: required.take("principio", self.principio.as_ref()),
			entorno: required.take("entorno", self.entorno.as_ref()),
			interes: required.take("interes", self.interes.as_ref()),
			modalidad: required.take("modalidad", self.modalidad.as_ref()),
			tipo_recurso: required.take("tipo_recurso", self.tipo_recurso.as_ref()),
			link_recurso: required.take("link_recurso", self.link_recurso.as_ref()),
			respuesta: required.take("respuesta", self.respuesta.as_ref()),
			fase: required.take("fase", self.fase.as_ref()),
		};
		required.finish("registrar respuesta")?;
		Ok(entry)
	}
}

#[derive(Debug, Serialize)]
pub struct Acknowledgement {
	mensaje: &'static str,
}

/// `POST /api/registrar_respuesta`
#[instrument(name = "registrar_respuesta", skip_all)]
pub async fn record_answer(
	State(state): State<AppState>,
	body: Body<AnswerRequest>,
) -> Result<Json<Acknowledgement>, ApiError> {
	let Json(request) = body?;
	let entry = request.into_entry()?;
	info!(fase = %entry.fase, "recording answer");

	state.journals.responses.append(entry).await?;

	Ok(Json(Acknowledgement {
		mensaje: "Respuesta registrada exitosamente",
	}))
}

// ============================================================================
// Analogy generation
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalogyRequest {
	nombre_completo: Option<Value>,
	numero_identificacion: Option<Value>,
	principio: Option<Value>,
	entorno: Option<Value>,
	interes: Option<Value>,
	modalidad: Option<Value>,
	tipo_recurso: Option<Value>,
	link_recurso: Option<Value>,
	estilo: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AnalogyResponse {
	analogia: String,
}

/// `POST /api/generar_analogia`
#[instrument(name = "generar_analogia", skip_all)]
pub async fn generate_analogy(
	State(state): State<AppState>,
	body: Body<AnalogyRequest>,
) -> Result<Json<AnalogyResponse>, ApiError> {
	let Json(request) = body?;

	let mut required = Required::new();
	let nombre_completo = required.take("nombre_completo", request.nombre_completo.as_ref());
	let numero_identificacion = required.take("numero_identificacion", request.numero_identificacion.as_ref());
	let principio = required.take("principio", request.principio.as_ref());
	let entorno = required.take("entorno", request.entorno.as_ref());
	let interes = required.take("interes", request.interes.as_ref());
	let modalidad = required.take("modalidad", request.modalidad.as_ref());
	let _ = required.take("tipo_recurso", request.tipo_recurso.as_ref());
	let _ = required.take("link_recurso", request.link_recurso.as_ref());
	required.finish("generar analogía")?;

	let estilo = request.estilo.as_ref().map(value_text);
	let prompt = AnalogyPrompt {
		principle: &principio,
		environment: &entorno,
		interest: &interes,
		modality: &modalidad,
		style: estilo.as_deref(),
	};
	let chat = prompt.to_chat();
	let style = prompt.style().to_owned();

	let generator = state.generator.as_ref().ok_or(GenerationError::NotConfigured)?;
	let analogia = generator
		.generate(&chat, &state.generation)
		.await
		.inspect_err(|e| warn!(error = %e, "analogy generation failed"))?;
	info!(model = generator.model(), chars = analogia.len(), "analogy generated");

	state
		.journals
		.analogies
		.append(AnalogyEntry {
			fecha: timestamp(),
			nombre_completo,
			numero_identificacion,
			principio,
			interes,
			entorno,
			modalidad,
			estilo: style,
			modelo: generator.model().to_owned(),
			prompt: chat.user,
			analogia: analogia.clone(),
		})
		.await?;

	Ok(Json(AnalogyResponse { analogia }))
}

// ============================================================================
// Self-reports
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelfReportRequest {
	nombre_completo: Option<Value>,
	numero_identificacion: Option<Value>,
	edad: Option<Value>,
	fase: Option<Value>,
	principio: Option<Value>,
	entorno: Option<Value>,
	interes: Option<Value>,
	modalidad: Option<Value>,
	respuesta: Option<Value>,
	confianza_recuerdo: Option<Value>,
	uso_analogia: Option<Value>,
	acciones_corregulacion: Option<Value>,
	ganancia_percibida: Option<Value>,
	costo_percibido: Option<Value>,
}

impl SelfReportRequest {
	fn answers(&self) -> SurveyAnswers {
		SurveyAnswers {
			recall_confidence: self.confianza_recuerdo.as_ref().map(value_text),
			analogy_usage: self.uso_analogia.as_ref().map(value_text),
			co_regulation: self.acciones_corregulacion.as_ref().map(action_list),
			perceived_gain: self.ganancia_percibida.as_ref().map(value_text),
			perceived_cost: self.costo_percibido.as_ref().map(value_text),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct SelfReportResponse {
	complete: bool,
	#[serde(flatten)]
	record: ScoreRecord,
}

/// `POST /api/registrar_autoreporte`
///
/// Partial answer sets are recorded and answered with `complete: false`.
#[instrument(name = "registrar_autoreporte", skip_all)]
pub async fn record_self_report(
	State(state): State<AppState>,
	body: Body<SelfReportRequest>,
) -> Result<Json<SelfReportResponse>, ApiError> {
	let Json(request) = body?;

	let mut required = Required::new();
	let nombre_completo = required.take("nombre_completo", request.nombre_completo.as_ref());
	let numero_identificacion = required.take("numero_identificacion", request.numero_identificacion.as_ref());
	required.finish("registrar autoreporte")?;

	let answers = request.answers();
	let record = score(&answers, &state.scoring);
	if record.is_complete() {
		info!(score = ?record.combined, "self-report scored");
	} else {
		warn!(unscored = ?record.unscored, "self-report partially scored");
	}

	let respondent = Respondent {
		nombre_completo,
		numero_identificacion,
		edad: optional_text(request.edad.as_ref()),
		fase: optional_text(request.fase.as_ref()),
		principio: optional_text(request.principio.as_ref()),
		entorno: optional_text(request.entorno.as_ref()),
		interes: optional_text(request.interes.as_ref()),
		modalidad: optional_text(request.modalidad.as_ref()),
		respuesta: optional_text(request.respuesta.as_ref()),
	};
	let entry = SelfReportEntry::new(respondent, &answers, &record);
	state.journals.self_reports.append(entry).await?;

	Ok(Json(SelfReportResponse {
		complete: record.is_complete(),
		record,
	}))
}

// ============================================================================
// Admin downloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
	key: Option<String>,
}

async fn download(state: &AppState, journal: &Journal, key: Option<&str>) -> Result<impl IntoResponse, ApiError> {
	if !state.is_admin(key) {
		warn!(path = %journal.path().display(), "download refused");
		return Err(ApiError::Unauthorized);
	}
	let bytes = journal
		.read()
		.await?
		.ok_or_else(|| ApiError::NotFound("No hay datos".to_owned()))?;
	let name = journal
		.path()
		.file_name()
		.map_or_else(|| "journal.csv".to_owned(), |n| n.to_string_lossy().into_owned());
	info!(file = %name, bytes = bytes.len(), "journal downloaded");

	Ok((
		[
			(header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
			(header::CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
		],
		bytes,
	))
}

/// `GET /admin/download_respuestas?key=`
pub async fn download_responses(
	State(state): State<AppState>,
	Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse, ApiError> {
	download(&state, &state.journals.responses, params.key.as_deref()).await
}

/// `GET /admin/download_analogias?key=`
pub async fn download_analogies(
	State(state): State<AppState>,
	Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse, ApiError> {
	download(&state, &state.journals.analogies, params.key.as_deref()).await
}

/// `GET /admin/download_autoreportes?key=`
pub async fn download_self_reports(
	State(state): State<AppState>,
	Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse, ApiError> {
	download(&state, &state.journals.self_reports, params.key.as_deref()).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_value_text_coerces_numbers() {
		assert_eq!(value_text(&json!("Ana")), "Ana");
		assert_eq!(value_text(&json!(1_020_304)), "1020304");
		assert_eq!(value_text(&json!(17)), "17");
		assert_eq!(value_text(&json!(true)), "true");
		assert_eq!(value_text(&Value::Null), "");
	}

	#[test]
	fn test_action_list_forms() {
		assert_eq!(
			action_list(&json!(["chatbot", "peer-feedback"])),
			vec!["chatbot".to_owned(), "peer-feedback".to_owned()]
		);
		assert_eq!(
			action_list(&json!("chatbot; peer-feedback ,self-explanation")),
			vec!["chatbot".to_owned(), "peer-feedback".to_owned(), "self-explanation".to_owned()]
		);
		assert!(action_list(&json!("")).is_empty());
	}

	#[test]
	fn test_answer_request_reports_missing_fields() {
		let request: AnswerRequest = serde_json::from_value(json!({
			"nombre_completo": "Ana",
			"numero_identificacion": 123,
			"principio": "Closure",
		}))
		.expect("deserializes");
		let err = request.into_entry().expect_err("fields missing");
		let message = err.to_string();
		assert!(message.contains("edad"));
		assert!(message.contains("fase"));
		assert!(!message.contains("nombre_completo"));
	}
}
