//! Resolve and Score Example
//!
//! This example walks one student through the tutor's core:
//! 1. Load a small reference table from CSV
//! 2. Resolve a resource from a messy, accented query
//! 3. Score a complete self-report, then a partial one
//!
//! Run with: `cargo run --example resolve_and_score`

use analogic_core::{
	resolver::{resolve, ResourceQuery},
	scoring::{score, ScoreConfig},
	survey::SurveyAnswers,
	table::{ReferenceTable, TableSchema},
};

const TABLE: &str = "\
Principio ISO,Entorno General,Interés Vivencial,Modalidad Sensorial Preferida,Ejemplo de Formato,Link
Least Astonishment,Urbano,Música,Visual,Infografía,https://recursos.example/la-urbano-musica
Least Astonishment,Rural,Deportes,Auditiva,Podcast,https://recursos.example/la-rural-deportes
Closure,Urbano,Videojuegos,Kinestésica,Simulación,https://recursos.example/closure-juegos
";

fn main() {
	println!("=== Resolve and Score ===\n");

	let table = match ReferenceTable::from_csv_reader(TABLE.as_bytes(), &TableSchema::default()) {
		Ok(table) => table,
		Err(e) => {
			eprintln!("Could not load table: {e}");
			return;
		}
	};
	println!("Loaded {} reference rows\n", table.len());

	// Capitalization, accents and stray spaces do not matter
	let query = ResourceQuery::new("  LEAST ASTONISHMENT", "urbano", "musica", "VISUAL ");
	match resolve(&table, &query) {
		Ok(resource) => println!("Resource: {} → {}", resource.kind, resource.link),
		Err(e) => println!("Resolution failed: {e}"),
	}

	// A combination that is not in the table
	let missing = ResourceQuery::new("Closure", "Rural", "Cocina", "Visual");
	if let Err(e) = resolve(&table, &missing) {
		println!("Closure/Rural/Cocina/Visual: {e}");
	}

	println!("\n--- Complete self-report ---");
	let config = ScoreConfig::default();
	let answers = SurveyAnswers {
		recall_confidence: Some("Sí".into()),
		analogy_usage: Some("Understood and used given analogy".into()),
		co_regulation: Some(vec!["chatbot".into(), "peer-feedback".into()]),
		perceived_gain: Some("A lot".into()),
		perceived_cost: Some("Manejable".into()),
	};
	print_record(&score(&answers, &config));

	println!("\n--- Partial self-report (misspelled cost) ---");
	let partial = SurveyAnswers {
		perceived_cost: Some("Muy dificl".into()),
		..answers
	};
	print_record(&score(&partial, &config));
}

fn print_record(record: &analogic_core::scoring::ScoreRecord) {
	let show = |v: Option<f64>| v.map_or_else(|| "unscored".to_owned(), |x| format!("{x:.3}"));

	println!("  RC      = {}", show(record.recall));
	println!("  λRA     = {}", show(record.analogy_usage));
	println!("  λCSD    = {}", show(record.co_regulation));
	println!("  Gi      = {}", show(record.gain));
	println!("  Ci      = {}", show(record.cost));
	println!("  RC+     = {}", show(record.recall_plus));
	println!("  Ui      = {}", show(record.utility));
	println!("  Ppi     = {}", show(record.production_probability));
	println!("  score   = {} ({:?})", show(record.combined), record.formula);
	if !record.is_complete() {
		println!("  unscored: {:?}", record.unscored);
	}
}
