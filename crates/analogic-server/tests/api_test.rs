//! Router tests: requests go through the full axum stack with a stub
//! generator and journals in a temporary directory.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use analogic_core::table::{ReferenceRow, ReferenceTable};
use analogic_server::generator::{ChatPrompt, GenerationError, GenerationOptions, TextGenerator};
use analogic_server::journal::JournalPaths;
use analogic_server::{app, AppState};

struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
	async fn generate(
		&self,
		prompt: &ChatPrompt,
		_options: &GenerationOptions,
	) -> Result<String, GenerationError> {
		let first = prompt.user.lines().find(|l| l.starts_with("Dominio objetivo")).unwrap_or_default();
		Ok(format!("Analogía para {first}"))
	}

	fn model(&self) -> &str {
		"echo"
	}
}

struct SlowGenerator;

#[async_trait]
impl TextGenerator for SlowGenerator {
	async fn generate(&self, _: &ChatPrompt, _: &GenerationOptions) -> Result<String, GenerationError> {
		Err(GenerationError::Timeout)
	}

	fn model(&self) -> &str {
		"slow"
	}
}

struct Harness {
	dir: TempDir,
	router: Router,
}

impl Harness {
	fn new(configure: impl FnOnce(AppState) -> AppState) -> Self {
		let dir = tempfile::tempdir().expect("tempdir");
		let table = ReferenceTable::from_rows(vec![
			ReferenceRow::new("Least Astonishment", "Urbano", "Música", "Visual", "Infografía", "https://r/1"),
			ReferenceRow::new("Least Astonishment", "Urbano", "Música", "Visual", "Video", "https://r/dup"),
			ReferenceRow::new("Closure", "Rural", "Deportes", "Auditiva", "Podcast", "https://r/2"),
		]);
		let state = configure(AppState::new(table, &JournalPaths::in_dir(dir.path())));
		Self {
			dir,
			router: app(state),
		}
	}

	fn journal(&self, name: &str) -> String {
		std::fs::read_to_string(self.dir.path().join(name)).expect("journal written")
	}

	async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
		let request = Request::post(uri)
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.expect("request");
		self.send(request).await
	}

	async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
		let request = Request::get(uri).body(Body::empty()).expect("request");
		let response = self.router.clone().oneshot(request).await.expect("response");
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
		(status, bytes.to_vec())
	}

	async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
		let response = self.router.clone().oneshot(request).await.expect("response");
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
		let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		(status, value)
	}
}

fn answer_body() -> Value {
	json!({
		"nombre_completo": "Ana Pérez",
		"numero_identificacion": 1_020_304,
		"edad": 17,
		"principio": "Closure",
		"entorno": "Rural",
		"interes": "Deportes",
		"modalidad": "Auditiva",
		"tipo_recurso": "Podcast",
		"link_recurso": "https://r/2",
		"respuesta": "El cierre agrupa lo incompleto",
		"fase": "pretest",
	})
}

// ============================================================================
// Liveness
// ============================================================================

#[tokio::test]
async fn test_index_and_health() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness.get("/").await;
	assert_eq!(status, StatusCode::OK);
	assert!(String::from_utf8_lossy(&body).contains("ACT-R Analogic"));

	let request = Request::get("/health").body(Body::empty()).expect("request");
	let (status, health) = harness.send(request).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(health["status"], "ok");
	assert_eq!(health["reference_rows"], 3);
	assert_eq!(health["generator"], Value::Null);
}

// ============================================================================
// Resource resolution
// ============================================================================

#[tokio::test]
async fn test_find_resource_normalizes_and_takes_first_row() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness
		.post(
			"/api/buscar_recurso",
			json!({"principio": " least ASTONISHMENT", "entorno": "urbano", "interes": "musica", "modalidad": "VISUAL"}),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"tipo": "Infografía", "link": "https://r/1"}));
}

#[tokio::test]
async fn test_find_resource_not_found() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness
		.post(
			"/api/buscar_recurso",
			json!({"principio": "Closure", "entorno": "Rural", "interes": "Cocina", "modalidad": "Visual"}),
		)
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_find_resource_missing_field_is_bad_request() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness
		.post("/api/buscar_recurso", json!({"principio": "Closure", "entorno": "Rural", "modalidad": "Visual"}))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["error"].as_str().is_some_and(|e| e.contains("interest")));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
	let harness = Harness::new(|s| s);
	let request = Request::post("/api/buscar_recurso")
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from("{not json"))
		.expect("request");
	let (status, body) = harness.send(request).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["error"].is_string());
}

// ============================================================================
// Student answers
// ============================================================================

#[tokio::test]
async fn test_record_answer_appends_with_header_once() {
	let harness = Harness::new(|s| s);
	for _ in 0..2 {
		let (status, body) = harness.post("/api/registrar_respuesta", answer_body()).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["mensaje"], "Respuesta registrada exitosamente");
	}

	let journal = harness.journal("respuestas_estudiantes.csv");
	let lines: Vec<&str> = journal.lines().collect();
	assert_eq!(lines.len(), 3);
	assert!(lines[0].starts_with("fecha,nombre_completo,numero_identificacion,edad,"));
	assert!(lines[1].contains("Ana Pérez,1020304,17,Closure"));
}

#[tokio::test]
async fn test_record_answer_missing_field() {
	let harness = Harness::new(|s| s);
	let mut body = answer_body();
	let _ = body.as_object_mut().expect("object").remove("fase");
	let (status, response) = harness.post("/api/registrar_respuesta", body).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(response["error"].as_str().is_some_and(|e| e.contains("fase")));
	assert!(!harness.dir.path().join("respuestas_estudiantes.csv").exists());
}

// ============================================================================
// Analogy generation
// ============================================================================

fn analogy_body() -> Value {
	json!({
		"nombre_completo": "Ana Pérez",
		"numero_identificacion": "1020304",
		"principio": "Closure",
		"entorno": "Rural",
		"interes": "Deportes",
		"modalidad": "Auditiva",
		"tipo_recurso": "Podcast",
		"link_recurso": "https://r/2",
		"estilo": "narrativo",
	})
}

#[tokio::test]
async fn test_generate_analogy() {
	let harness =
		Harness::new(|s| s.with_generator(Arc::new(EchoGenerator), GenerationOptions::default()));
	let (status, body) = harness.post("/api/generar_analogia", analogy_body()).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["analogia"], "Analogía para Dominio objetivo: el principio ISO \"Closure\".");

	let journal = harness.journal("analogias_generadas.csv");
	assert!(journal.starts_with("fecha,nombre_completo,numero_identificacion,principio,interes,entorno,modalidad,estilo,modelo,prompt,analogia"));
	assert!(journal.contains("narrativo,echo,"));
}

#[tokio::test]
async fn test_generate_analogy_without_generator() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness.post("/api/generar_analogia", analogy_body()).await;
	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(body["error"].as_str().is_some_and(|e| e.contains("not configured")));
	assert!(!harness.dir.path().join("analogias_generadas.csv").exists());
}

#[tokio::test]
async fn test_generate_analogy_timeout() {
	let harness =
		Harness::new(|s| s.with_generator(Arc::new(SlowGenerator), GenerationOptions::default()));
	let (status, _) = harness.post("/api/generar_analogia", analogy_body()).await;
	assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_generate_analogy_missing_field() {
	let harness =
		Harness::new(|s| s.with_generator(Arc::new(EchoGenerator), GenerationOptions::default()));
	let mut body = analogy_body();
	let _ = body.as_object_mut().expect("object").remove("link_recurso");
	let (status, _) = harness.post("/api/generar_analogia", body).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Self-reports
// ============================================================================

#[tokio::test]
async fn test_self_report_complete() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness
		.post(
			"/api/registrar_autoreporte",
			json!({
				"nombre_completo": "Ana Pérez",
				"numero_identificacion": 1_020_304,
				"fase": "postest",
				"respuesta": "Relacioné el cierre con un marcador de fútbol",
				"confianza_recuerdo": "Sí",
				"uso_analogia": "Understood and used given analogy",
				"acciones_corregulacion": ["chatbot", "peer-feedback"],
				"ganancia_percibida": "Mucho",
				"costo_percibido": "Manejable",
			}),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["complete"], true);

	let close = |key: &str, expected: f64| {
		let value = body[key].as_f64().expect("scored");
		assert!((value - expected).abs() < 1e-9, "{key} = {value}, expected {expected}");
	};
	close("recall", 0.9);
	close("analogy_usage", 0.2);
	close("co_regulation", 0.2);
	close("recall_plus", 1.3);
	close("utility", 0.6);
	close("production_probability", 1.0);
	close("combined", 3.9);

	let journal = harness.journal("autoreportes.csv");
	let lines: Vec<&str> = journal.lines().collect();
	assert_eq!(lines.len(), 2);
	assert!(lines[0].contains(",modalidad,respuesta,confianza_recuerdo,"));
	assert!(lines[1].contains(",Relacioné el cierre con un marcador de fútbol,Sí,"));
	assert!(lines[1].contains("chatbot;peer-feedback"));
	assert!(lines[1].ends_with("recall_gain_per_cost,true"));
}

#[tokio::test]
async fn test_self_report_partial_is_recorded() {
	let harness = Harness::new(|s| s);
	let (status, body) = harness
		.post(
			"/api/registrar_autoreporte",
			json!({
				"nombre_completo": "Ana Pérez",
				"numero_identificacion": "1020304",
				"confianza_recuerdo": "Yes",
				"uso_analogia": "Used none",
				"acciones_corregulacion": "",
				"ganancia_percibida": "Some",
				"costo_percibido": "Muy dificl",
			}),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["complete"], false);
	assert_eq!(body["co_regulation"], 0.0);
	assert_eq!(body["cost"], Value::Null);
	assert_eq!(body["utility"], Value::Null);
	assert_eq!(body["unscored"], json!(["perceived_cost"]));

	let journal = harness.journal("autoreportes.csv");
	assert!(journal.lines().nth(1).is_some_and(|l| l.ends_with(",false")));
}

#[tokio::test]
async fn test_self_report_requires_identity() {
	let harness = Harness::new(|s| s);
	let (status, _) = harness
		.post("/api/registrar_autoreporte", json!({"confianza_recuerdo": "Yes"}))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Admin downloads
// ============================================================================

#[tokio::test]
async fn test_download_requires_key() {
	let harness = Harness::new(|s| s.with_admin_key(Some("secreto")));
	let (status, _) = harness.get("/admin/download_respuestas").await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	let (status, _) = harness.get("/admin/download_respuestas?key=otro").await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_download_disabled_without_configured_key() {
	let harness = Harness::new(|s| s);
	let (status, _) = harness.get("/admin/download_respuestas?key=").await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_download_missing_journal() {
	let harness = Harness::new(|s| s.with_admin_key(Some("secreto")));
	let (status, _) = harness.get("/admin/download_analogias?key=secreto").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_returns_csv() {
	let harness = Harness::new(|s| s.with_admin_key(Some("secreto")));
	let (status, _) = harness.post("/api/registrar_respuesta", answer_body()).await;
	assert_eq!(status, StatusCode::OK);

	let request = Request::get("/admin/download_respuestas?key=secreto")
		.body(Body::empty())
		.expect("request");
	let response = harness.router.clone().oneshot(request).await.expect("response");
	assert_eq!(response.status(), StatusCode::OK);
	let disposition = response
		.headers()
		.get(header::CONTENT_DISPOSITION)
		.and_then(|v| v.to_str().ok())
		.unwrap_or_default()
		.to_owned();
	assert_eq!(disposition, "attachment; filename=\"respuestas_estudiantes.csv\"");

	let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
	let text = String::from_utf8_lossy(&bytes);
	assert!(text.starts_with("fecha,"));
	assert_eq!(text.lines().count(), 2);
}
