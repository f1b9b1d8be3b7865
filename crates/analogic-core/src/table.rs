//! Reference Table
//!
//! The immutable lookup table behind resource resolution.
//!
//! Each row binds a student context
//! `(principle, environment, interest, modality)` to a learning resource
//! `(kind, link)`. The table is loaded once at startup from a CSV file or a
//! spreadsheet and never mutated afterwards; callers share it by reference.
//!
//! Key columns are normalized once at load time, so resolution is a plain
//! equality scan over precomputed keys.
//!
//! Loading is strict about the schema: a missing required column is a
//! [`TableError::MissingColumn`] and the table is not built at all.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::normalize::same_label;
use crate::resolver::AttributeKey;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while loading a reference table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
	/// The file could not be opened or read.
	#[error("I/O error reading reference table: {0}")]
	Io(#[from] std::io::Error),

	/// The CSV input is malformed.
	#[error("Invalid CSV reference table: {0}")]
	Csv(#[from] csv::Error),

	/// The spreadsheet could not be parsed.
	#[cfg(feature = "spreadsheet")]
	#[error("Invalid spreadsheet reference table: {0}")]
	Spreadsheet(#[from] calamine::Error),

	/// A required column is absent from the header row.
	#[error("Missing column '{column}' in reference table")]
	MissingColumn {
		/// Expected header text
		column: String,
	},

	/// The workbook has no sheet, or the sheet has no header row.
	#[error("Reference table has no header row")]
	MissingHeader,

	/// The file extension is not a supported table format.
	#[error("Unsupported reference table format: {0}")]
	UnsupportedFormat(PathBuf),
}

// ============================================================================
// Schema
// ============================================================================

/// Header names of the six required columns.
///
/// Headers are matched after normalization, so `"Interes vivencial"` finds
/// the `"Interés Vivencial"` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
	/// Guiding principle column
	pub principle: String,
	/// General environment column
	pub environment: String,
	/// Lived interest column
	pub interest: String,
	/// Preferred sensory modality column
	pub modality: String,
	/// Resource format column
	pub resource_kind: String,
	/// Resource link column
	pub resource_link: String,
}

impl Default for TableSchema {
	fn default() -> Self {
		Self {
			principle: "Principio ISO".to_owned(),
			environment: "Entorno General".to_owned(),
			interest: "Interés Vivencial".to_owned(),
			modality: "Modalidad Sensorial Preferida".to_owned(),
			resource_kind: "Ejemplo de Formato".to_owned(),
			resource_link: "Link".to_owned(),
		}
	}
}

impl TableSchema {
	/// Column names in positional order: four keys, then kind and link.
	fn columns(&self) -> [&str; 6] {
		[
			&self.principle,
			&self.environment,
			&self.interest,
			&self.modality,
			&self.resource_kind,
			&self.resource_link,
		]
	}

	/// Locate every required column in a header row.
	fn locate(&self, header: &[String]) -> Result<[usize; 6], TableError> {
		let mut positions = [0_usize; 6];

		for (slot, column) in positions.iter_mut().zip(self.columns()) {
			*slot = header
				.iter()
				.position(|h| same_label(h, column))
				.ok_or_else(|| TableError::MissingColumn {
					column: column.to_owned(),
				})?;
		}

		Ok(positions)
	}
}

// ============================================================================
// Rows
// ============================================================================

/// What a matching row points the student to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
	/// Resource format (infographic, podcast, video, ...)
	pub kind: String,
	/// Resource URI
	pub link: String,
}

/// One valid context combination and its resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
	/// Principle as written in the source table
	pub principle: String,
	/// Environment as written in the source table
	pub environment: String,
	/// Interest as written in the source table
	pub interest: String,
	/// Modality as written in the source table
	pub modality: String,
	/// Normalized lookup key
	pub key: AttributeKey,
	/// Associated resource
	pub resource: ResourceDescriptor,
}

impl ReferenceRow {
	/// Build a row, precomputing its normalized key.
	#[must_use]
	pub fn new(
		principle: impl Into<String>,
		environment: impl Into<String>,
		interest: impl Into<String>,
		modality: impl Into<String>,
		kind: impl Into<String>,
		link: impl Into<String>,
	) -> Self {
		let principle = principle.into();
		let environment = environment.into();
		let interest = interest.into();
		let modality = modality.into();
		let key = AttributeKey::new(&principle, &environment, &interest, &modality);

		Self {
			principle,
			environment,
			interest,
			modality,
			key,
			resource: ResourceDescriptor {
				kind: kind.into(),
				link: link.into(),
			},
		}
	}
}

// ============================================================================
// Table
// ============================================================================

/// Immutable reference table, in source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTable {
	rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
	/// Build a table from already-parsed rows.
	#[must_use]
	pub const fn from_rows(rows: Vec<ReferenceRow>) -> Self {
		Self { rows }
	}

	/// Build a table from a header row and string records.
	///
	/// Cells past the end of a short record read as empty. Records whose six
	/// required cells are all blank are skipped.
	///
	/// # Errors
	///
	/// Returns [`TableError::MissingColumn`] if the header lacks a required
	/// column.
	pub fn from_records<I>(
		header: &[String],
		records: I,
		schema: &TableSchema,
	) -> Result<Self, TableError>
	where
		I: IntoIterator<Item = Vec<String>>,
	{
		let [p, e, i, m, k, l] = schema.locate(header)?;

		let rows = records
			.into_iter()
			.filter_map(|record| {
				let cell = |idx: usize| record.get(idx).map_or("", |c| c.trim()).to_owned();
				let cells = [cell(p), cell(e), cell(i), cell(m), cell(k), cell(l)];
				if cells.iter().all(String::is_empty) {
					return None;
				}
				let [principle, environment, interest, modality, kind, link] = cells;
				Some(ReferenceRow::new(
					principle,
					environment,
					interest,
					modality,
					kind,
					link,
				))
			})
			.collect();

		Ok(Self { rows })
	}

	/// Parse a CSV table (first record is the header).
	///
	/// # Errors
	///
	/// Returns an error if the CSV is malformed or a column is missing.
	pub fn from_csv_reader<R: Read>(reader: R, schema: &TableSchema) -> Result<Self, TableError> {
		let mut reader = csv::ReaderBuilder::new()
			.flexible(true)
			.trim(csv::Trim::All)
			.from_reader(reader);

		let header: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
		let records = reader
			.records()
			.map(|record| record.map(|r| r.iter().map(str::to_owned).collect::<Vec<_>>()))
			.collect::<Result<Vec<_>, _>>()?;

		Self::from_records(&header, records, schema)
	}

	/// Load a CSV table from disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or fails validation.
	pub fn from_csv_path(path: impl AsRef<Path>, schema: &TableSchema) -> Result<Self, TableError> {
		let file = File::open(path)?;
		Self::from_csv_reader(file, schema)
	}

	/// Load the first sheet of a spreadsheet (`.xlsx`, `.xls`, `.ods`, ...).
	///
	/// # Errors
	///
	/// Returns an error if the workbook cannot be parsed, has no header row,
	/// or fails validation.
	#[cfg(feature = "spreadsheet")]
	pub fn from_spreadsheet_path(
		path: impl AsRef<Path>,
		schema: &TableSchema,
	) -> Result<Self, TableError> {
		use calamine::{open_workbook_auto, Reader};

		let mut workbook = open_workbook_auto(path)?;
		let range = workbook
			.worksheet_range_at(0)
			.ok_or(TableError::MissingHeader)??;

		let mut rows = range.rows();
		let header: Vec<String> = rows
			.next()
			.ok_or(TableError::MissingHeader)?
			.iter()
			.map(cell_text)
			.collect();
		let records: Vec<Vec<String>> = rows.map(|row| row.iter().map(cell_text).collect()).collect();

		Self::from_records(&header, records, schema)
	}

	/// Load a table, picking the parser from the file extension.
	///
	/// # Errors
	///
	/// Returns [`TableError::UnsupportedFormat`] for unknown extensions, or
	/// any error of the selected parser.
	pub fn load(path: impl AsRef<Path>, schema: &TableSchema) -> Result<Self, TableError> {
		let path = path.as_ref();
		let extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.map(str::to_ascii_lowercase);

		match extension.as_deref() {
			Some("csv") => Self::from_csv_path(path, schema),
			#[cfg(feature = "spreadsheet")]
			Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Self::from_spreadsheet_path(path, schema),
			_ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
		}
	}

	/// Rows in source order.
	#[must_use]
	pub fn rows(&self) -> &[ReferenceRow] {
		&self.rows
	}

	/// Number of rows.
	#[must_use]
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Whether the table has no rows.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// First row whose normalized key equals `key`.
	#[must_use]
	pub fn find(&self, key: &AttributeKey) -> Option<&ReferenceRow> {
		self.rows.iter().find(|row| row.key == *key)
	}
}

#[cfg(feature = "spreadsheet")]
fn cell_text(cell: &calamine::Data) -> String {
	match cell {
		calamine::Data::Empty => String::new(),
		calamine::Data::String(text) => text.trim().to_owned(),
		other => other.to_string(),
	}
}
