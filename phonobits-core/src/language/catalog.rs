use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;

use super::rules::LanguageRules;
use crate::error::CorpusError;

/// Read-only mapping from ISO code to `LanguageRules`.
///
/// Built at start (usually from `Catalog::builtin`, optionally extended from a
/// JSON file) and only read afterwards.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
	languages: BTreeMap<String, LanguageRules>,
}

impl Catalog {
	/// The hand-written rule sets shipped with the library.
	pub fn builtin() -> Self {
		let mut catalog = Self::default();

		catalog.insert(
			LanguageRules::new("Finnish", "fin")
				.with_substitutions([("b", "p"), ("ng", "G"), ("g", "k"), ("G", "ng")])
				.with_multigraphs(["ng", "aa", "ää", "ee", "ii", "oo", "öö", "uu", "yy", "ie", "uo", "yö"]),
		);
		catalog.insert(LanguageRules::new("Māori", "mri").with_multigraphs(["wh", "ng"]));
		catalog.insert(
			LanguageRules::new("Somali", "som")
				.with_multigraphs(["kh", "sh", "dh", "aa", "ee", "ii", "oo", "uu"]),
		);
		catalog.insert(
			LanguageRules::new("Spanish", "spa")
				.with_overrides([("y", "i")])
				.with_substitutions([
					("á", "a"), ("é", "e"), ("í", "i"), ("ó", "o"), ("ú", "u"),
					("v", "b"), ("x", "gs"),
					("que", "ke"), ("qui", "ki"),
					("ge", "je"), ("gi", "ji"), ("gue", "ge"), ("gui", "gi"),
					("ü", "u"),
					("ce", "ze"), ("ci", "zi"), ("ca", "ka"), ("co", "ko"), ("cu", "ku"),
				])
				.with_multigraphs(["ch", "ll"])
				.with_silent(["h"]),
		);
		catalog.insert(
			LanguageRules::new("Albanian", "sqi")
				.with_substitutions([("é", "e")])
				.with_multigraphs(["dh", "gj", "ll", "nj", "rr", "sh", "th", "xh", "zh"]),
		);
		// glottal stops are not written in Tagalog orthography
		catalog.insert(
			LanguageRules::new("Tagalog", "tgl")
				.with_overrides([("ng", "nang"), ("mga", "manga")])
				.with_substitutions([
					("ca", "ka"), ("ce", "se"), ("ci", "si"), ("co", "ko"), ("cu", "ku"),
					("j", "h"), ("v", "b"), ("x", "s"), ("z", "s"),
					("á", "a"), ("â", "a"),
				])
				.with_multigraphs(["ng"]),
		);
		catalog.insert(LanguageRules::new("Tok Pisin", "tpi").with_multigraphs(["ng", "ai", "au", "oi"]));
		// syllable-final n is a distinct segment
		catalog.insert(
			LanguageRules::new("Toki Pona", "tok").with_substitutions([
				("n", "N"),
				("Na", "na"), ("Ne", "ne"), ("Ni", "ni"), ("No", "no"), ("Nu", "nu"),
			]),
		);

		catalog
	}

	/// Adds or replaces the rules registered under `rules.code`.
	pub fn insert(&mut self, rules: LanguageRules) {
		self.languages.insert(rules.code.clone(), rules);
	}

	/// Merges rule sets from a JSON file holding an array of `LanguageRules`.
	///
	/// Entries whose code already exists replace the previous rules.
	pub fn extend_from_json<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, CorpusError> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
		let languages: Vec<LanguageRules> = serde_json::from_str(&text)?;
		let added = languages.len();
		for rules in languages {
			self.insert(rules);
		}
		info!("loaded {} rule sets from {}", added, path.display());
		Ok(added)
	}

	pub fn get(&self, code: &str) -> Option<&LanguageRules> {
		self.languages.get(code)
	}

	/// Same as `get`, but an unknown code is an error.
	pub fn require(&self, code: &str) -> Result<&LanguageRules, CorpusError> {
		self.get(code)
			.ok_or_else(|| CorpusError::UnknownLanguage(code.to_owned()))
	}

	/// Known ISO codes, sorted.
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.languages.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.languages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.languages.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_has_all_languages() {
		let catalog = Catalog::builtin();
		let codes: Vec<&str> = catalog.codes().collect();
		assert_eq!(codes, vec!["fin", "mri", "som", "spa", "sqi", "tgl", "tok", "tpi"]);
		assert_eq!(catalog.require("spa").unwrap().name, "Spanish");
	}

	#[test]
	fn unknown_code_is_an_error() {
		let catalog = Catalog::builtin();
		assert!(matches!(catalog.require("xxx"), Err(CorpusError::UnknownLanguage(code)) if code == "xxx"));
	}

	#[test]
	fn finnish_keeps_ng_but_hardens_g() {
		let fin = Catalog::builtin().require("fin").unwrap().clone();
		assert_eq!(fin.normalize("kengät"), "kengät");
		assert_eq!(fin.normalize("gaala"), "kaala");
	}

	#[test]
	fn extend_from_json_overrides_existing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("extra.json");
		fs::write(
			&path,
			r#"[
				{"name": "Hawaiian", "code": "haw", "multigraphs": []},
				{"name": "Māori (macrons)", "code": "mri", "multigraphs": ["wh", "ng"],
				 "substitutions": [["ā", "aa"]]}
			]"#,
		)
		.unwrap();

		let mut catalog = Catalog::builtin();
		assert_eq!(catalog.extend_from_json(&path).unwrap(), 2);
		assert_eq!(catalog.len(), 9);
		assert_eq!(catalog.require("mri").unwrap().normalize("kāinga"), "kaainga");
	}

	#[test]
	fn extend_from_invalid_json_fails() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.json");
		fs::write(&path, "{").unwrap();

		let mut catalog = Catalog::default();
		assert!(matches!(catalog.extend_from_json(&path), Err(CorpusError::Rules(_))));
		assert!(catalog.is_empty());
	}
}
