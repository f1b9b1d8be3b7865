//! Property tests for label normalization.

use analogic_core::normalize::{normalize, same_label};
use proptest::prelude::*;

/// Latin and Greek letters, Latin-1 accents, loose combining marks, digits and
/// whitespace: what labels in the reference table and survey forms are made of.
const LABEL: &str = "[ \\t\\n0-9A-Za-z\\x{C0}-\\x{17F}\\x{391}-\\x{3C9}\\x{300}-\\x{36F}]{0,48}";

proptest! {
	#[test]
	fn normalize_is_idempotent(s in LABEL) {
		let once = normalize(&s);
		prop_assert_eq!(normalize(&once), once);
	}

	#[test]
	fn normalized_labels_have_no_surrounding_whitespace(s in LABEL) {
		let key = normalize(&s);
		prop_assert_eq!(key.trim(), key.as_str());
	}

	#[test]
	fn normalized_labels_have_no_combining_accents(s in LABEL) {
		let key = normalize(&s);
		prop_assert!(!key.chars().any(|c| ('\u{300}'..='\u{36F}').contains(&c)), "normalized key contains a combining accent: {:?}", key);
	}

	#[test]
	fn case_and_padding_do_not_change_the_key(s in "[a-z ]{0,32}", pad in "[ \\t]{0,4}") {
		let padded = format!("{pad}{}{pad}", s.to_uppercase());
		prop_assert!(same_label(&padded, &s));
	}

	#[test]
	fn acute_accent_is_ignored(s in "[a-z]{1,16}") {
		let accented: String = s.chars().flat_map(|c| [c, '\u{301}']).collect();
		prop_assert_eq!(normalize(&accented), s);
	}
}
