//! Analogic server binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use analogic_core::table::{ReferenceTable, TableSchema};
use analogic_server::config::Args;
use analogic_server::generator::OpenAiGenerator;
use analogic_server::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let _ = dotenvy::dotenv();
	let args = Args::parse();

	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| format!("analogic_server={},tower_http={},info", args.log_level, args.log_level).into());
	if args.log_json {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json())
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.init();
	}

	if let Err(e) = args.validate() {
		error!("Configuration error: {}", e);
		std::process::exit(1);
	}

	std::fs::create_dir_all(&args.data_dir)
		.with_context(|| format!("creating data directory {}", args.data_dir.display()))?;

	let table = ReferenceTable::load(&args.reference_table, &TableSchema::default())
		.with_context(|| format!("loading reference table {}", args.reference_table.display()))?;
	if table.is_empty() {
		warn!("Reference table has no rows; every lookup will miss");
	}

	let mut state = AppState::new(table, &args.journal_paths()).with_admin_key(args.admin_key.as_deref());
	state.scoring.validate().context("invalid scoring configuration")?;
	if let Some(key) = args.api_key() {
		let generator = OpenAiGenerator::new(
			&args.openai_base_url,
			key,
			args.openai_model.clone(),
			args.generation_timeout(),
		)
		.context("building text generation client")?;
		state = state.with_generator(Arc::new(generator), args.generation_options());
	}

	info!("======================================");
	info!("  ACT-R Analogic");
	info!("======================================");
	info!("Listen: {}", args.listen);
	info!("Reference table: {} ({} rows)", args.reference_table.display(), state.table.len());
	info!("Data directory: {}", args.data_dir.display());
	match &state.generator {
		Some(generator) => info!("Analogies: {} via {}", generator.model(), args.openai_base_url),
		None => warn!("Analogies: disabled (OPENAI_API_KEY not set)"),
	}
	if state.admin_key.is_none() {
		warn!("Admin downloads: disabled (ADMIN_KEY not set)");
	}
	info!("======================================");

	let listener = tokio::net::TcpListener::bind(args.listen)
		.await
		.with_context(|| format!("binding {}", args.listen))?;
	axum::serve(listener, app(state))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("server error")?;

	info!("Shut down");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Failed to listen for shutdown signal: {}", e);
	}
}
