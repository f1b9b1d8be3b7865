//! Text Normalization
//!
//! Canonical comparison keys for categorical labels.
//!
//! Spreadsheet cells and form answers arrive with arbitrary capitalization,
//! accents and stray whitespace. Every comparison in this crate goes through
//! [`normalize`] on both sides:
//!
//! ```text
//! "  Interés Vivencial " → "interes vivencial"
//! ```
//!
//! 1. Lower-case
//! 2. Canonical decomposition (NFD)
//! 3. Drop nonspacing marks (general category `Mn`, the decomposed accents)
//! 4. Trim surrounding whitespace
//!
//! Spacing marks (`Mc`) are kept, so dependent vowel signs in scripts such
//! as Devanagari still distinguish keys (`"का"` is not `"क"`).

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Normalize a label into its comparison key.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use analogic_core::normalize::normalize;
///
/// assert_eq!(normalize("Interés"), "interes");
/// assert_eq!(normalize("  INTERES "), "interes");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
	let folded: String = text
		.to_lowercase()
		.nfd()
		.filter(|c| !is_nonspacing_mark(*c))
		// Dropping a mark can join two runs of combining marks; restore canonical order.
		.nfd()
		.collect();

	// Trim last: a stray leading mark can hide whitespace until it is dropped.
	folded.trim().to_owned()
}

#[inline]
fn is_nonspacing_mark(c: char) -> bool {
	c.general_category() == GeneralCategory::NonspacingMark
}

/// Whether two labels are equal after normalization.
#[inline]
#[must_use]
pub fn same_label(a: &str, b: &str) -> bool {
	normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_strips_accents() {
		assert_eq!(normalize("Interés"), "interes");
		assert_eq!(normalize("Música"), "musica");
		assert_eq!(normalize("Ñandú"), "nandu");
	}

	#[test]
	fn test_case_and_accent_insensitive() {
		let a = normalize("Interés");
		assert_eq!(a, normalize("interes"));
		assert_eq!(a, normalize("INTERES"));
		assert_eq!(a, normalize("INTERÉS"));
	}

	#[test]
	fn test_trims_whitespace() {
		assert_eq!(normalize("  Least Astonishment\t\n"), "least astonishment");
	}

	#[test]
	fn test_inner_whitespace_kept() {
		assert_eq!(normalize("Muy  fácil"), "muy  facil");
	}

	#[test]
	fn test_idempotent() {
		for sample in ["Interés", "  ÁÉÍÓÚ ü ", "Modalidad Sensorial", "", "\u{301} a", "Çà"] {
			let once = normalize(sample);
			assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
		}
	}

	#[test]
	fn test_spacing_marks_kept() {
		assert_ne!(normalize("का"), normalize("क"));
		assert_eq!(normalize("का"), "का");
		// Nonspacing marks go in every script
		assert_eq!(normalize("कं"), "क");
	}

	#[test]
	fn test_same_label() {
		assert!(same_label("Difícil", "dificil"));
		assert!(!same_label("Difícil", "Muy difícil"));
	}
}
