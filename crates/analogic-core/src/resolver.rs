//! Resource Resolution
//!
//! Maps a student context to a learning resource.
//!
//! ```text
//! (principle, environment, interest, modality)
//!         │ normalize
//!         ▼
//!   AttributeKey ──scan──▶ first matching ReferenceRow ──▶ (kind, link)
//! ```
//!
//! A query must carry all four attributes. A missing attribute is rejected
//! before any scan; an unmatched key is [`ResolveError::NotFound`]. Neither
//! is a system fault.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::table::{ReferenceTable, ResourceDescriptor};

/// One of the four context attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
	/// Guiding principle being taught
	Principle,
	/// Student's general environment
	Environment,
	/// Student's lived interest
	Interest,
	/// Preferred sensory modality
	Modality,
}

impl Attribute {
	/// All attributes, in key order.
	pub const ALL: [Self; 4] = [
		Self::Principle,
		Self::Environment,
		Self::Interest,
		Self::Modality,
	];

	/// Stable lowercase name.
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Principle => "principle",
			Self::Environment => "environment",
			Self::Interest => "interest",
			Self::Modality => "modality",
		}
	}
}

impl std::fmt::Display for Attribute {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Normalized composite lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeKey {
	/// Normalized principle
	pub principle: String,
	/// Normalized environment
	pub environment: String,
	/// Normalized interest
	pub interest: String,
	/// Normalized modality
	pub modality: String,
}

impl AttributeKey {
	/// Normalize four raw labels into a key.
	#[must_use]
	pub fn new(principle: &str, environment: &str, interest: &str, modality: &str) -> Self {
		Self {
			principle: normalize(principle),
			environment: normalize(environment),
			interest: normalize(interest),
			modality: normalize(modality),
		}
	}
}

/// Why a query did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// The caller omitted a required attribute.
	#[error("missing required attribute: {0}")]
	MissingAttribute(Attribute),

	/// No row matches the normalized key.
	#[error("no resource for this combination")]
	NotFound,
}

impl ResolveError {
	/// Whether this is a malformed request rather than a lookup miss.
	#[must_use]
	pub const fn is_malformed(&self) -> bool {
		matches!(self, Self::MissingAttribute(_))
	}
}

/// Raw resolution query, as received from a caller.
///
/// Present-but-empty attributes are accepted (they normalize to `""` and
/// simply fail to match); only absent ones are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuery {
	/// Guiding principle
	pub principle: Option<String>,
	/// General environment
	pub environment: Option<String>,
	/// Lived interest
	pub interest: Option<String>,
	/// Preferred sensory modality
	pub modality: Option<String>,
}

impl ResourceQuery {
	/// Query with all four attributes present.
	#[must_use]
	pub fn new(
		principle: impl Into<String>,
		environment: impl Into<String>,
		interest: impl Into<String>,
		modality: impl Into<String>,
	) -> Self {
		Self {
			principle: Some(principle.into()),
			environment: Some(environment.into()),
			interest: Some(interest.into()),
			modality: Some(modality.into()),
		}
	}

	fn get(&self, attribute: Attribute) -> Option<&str> {
		match attribute {
			Attribute::Principle => self.principle.as_deref(),
			Attribute::Environment => self.environment.as_deref(),
			Attribute::Interest => self.interest.as_deref(),
			Attribute::Modality => self.modality.as_deref(),
		}
	}

	/// Validate presence and normalize into a lookup key.
	///
	/// # Errors
	///
	/// Returns [`ResolveError::MissingAttribute`] for the first absent
	/// attribute, in key order.
	pub fn key(&self) -> Result<AttributeKey, ResolveError> {
		if let Some(missing) = Attribute::ALL.into_iter().find(|a| self.get(*a).is_none()) {
			return Err(ResolveError::MissingAttribute(missing));
		}

		Ok(AttributeKey::new(
			self.principle.as_deref().unwrap_or_default(),
			self.environment.as_deref().unwrap_or_default(),
			self.interest.as_deref().unwrap_or_default(),
			self.modality.as_deref().unwrap_or_default(),
		))
	}
}

/// Resolve a query against the reference table.
///
/// Deterministic: the first matching row in table order wins, so duplicate
/// key tuples never make the result depend on call order.
///
/// # Errors
///
/// - [`ResolveError::MissingAttribute`] if the query is incomplete (no scan
///   is performed)
/// - [`ResolveError::NotFound`] if no row matches
///
/// # Examples
///
/// ```
/// use analogic_core::resolver::{resolve, ResourceQuery};
/// use analogic_core::table::{ReferenceRow, ReferenceTable};
///
/// let table = ReferenceTable::from_rows(vec![ReferenceRow::new(
///     "Least Astonishment", "Urban", "Música", "Visual", "Infographic", "http://x",
/// )]);
///
/// let query = ResourceQuery::new("least astonishment", "URBAN", "musica", " visual ");
/// let resource = resolve(&table, &query).unwrap();
/// assert_eq!(resource.kind, "Infographic");
/// ```
pub fn resolve<'t>(
	table: &'t ReferenceTable,
	query: &ResourceQuery,
) -> Result<&'t ResourceDescriptor, ResolveError> {
	let key = query.key()?;
	resolve_key(table, &key)
}

/// Resolve an already-normalized key.
///
/// # Errors
///
/// Returns [`ResolveError::NotFound`] if no row matches.
pub fn resolve_key<'t>(
	table: &'t ReferenceTable,
	key: &AttributeKey,
) -> Result<&'t ResourceDescriptor, ResolveError> {
	table
		.find(key)
		.map(|row| &row.resource)
		.ok_or(ResolveError::NotFound)
}
