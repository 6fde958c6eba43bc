use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Spelling-normalisation rules for one language.
///
/// A `LanguageRules` value describes how an orthographic word is turned into
/// phonetic segments. It is plain configuration: built once at start,
/// shared by reference, never mutated afterwards.
///
/// # Application order
/// 1. `overrides`: the whole word is replaced if it has an entry
/// 2. `substitutions`: applied one after the other, each on the output of the previous
/// 3. `multigraphs`: tried in listed order at every position, first match wins
/// 4. `silent`: matched segments in this set are dropped
///
/// # Invariants
/// - The order of `substitutions` and `multigraphs` is significant and preserved
/// - A misordered rule list is a configuration bug, not a runtime error
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct LanguageRules {
	/// Display name, e.g. `"Spanish"`.
	pub name: String,

	/// ISO 639-3 code, e.g. `"spa"`. Used as the catalog key.
	pub code: String,

	/// Irregularly spelled words, e.g. Spanish `"y"` → `"i"`.
	#[serde(default)]
	pub overrides: HashMap<String, String>,

	/// Ordered `(pattern, replacement)` pairs.
	#[serde(default)]
	pub substitutions: Vec<(String, String)>,

	/// Ordered multi-character graphemes, e.g. `"ch"`.
	#[serde(default)]
	pub multigraphs: Vec<String>,

	/// Segments that consume characters but produce no output.
	#[serde(default)]
	pub silent: HashSet<String>,
}

impl LanguageRules {
	/// Creates an empty rule set: every character becomes its own segment.
	pub fn new(name: &str, code: &str) -> Self {
		Self {
			name: name.to_owned(),
			code: code.to_owned(),
			..Self::default()
		}
	}

	pub fn with_overrides<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		self.overrides
			.extend(pairs.into_iter().map(|(w, r)| (w.to_owned(), r.to_owned())));
		self
	}

	/// Appends substitution rules after the existing ones.
	pub fn with_substitutions<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		self.substitutions
			.extend(pairs.into_iter().map(|(p, r)| (p.to_owned(), r.to_owned())));
		self
	}

	/// Appends multigraphs after the existing ones (lower priority).
	pub fn with_multigraphs<'a>(mut self, multigraphs: impl IntoIterator<Item = &'a str>) -> Self {
		self.multigraphs.extend(multigraphs.into_iter().map(str::to_owned));
		self
	}

	pub fn with_silent<'a>(mut self, segments: impl IntoIterator<Item = &'a str>) -> Self {
		self.silent.extend(segments.into_iter().map(str::to_owned));
		self
	}

	/// Applies the whole-word override and then every substitution rule in order.
	///
	/// Each rule replaces all non-overlapping occurrences found by a
	/// left-to-right scan, so earlier rules can create or destroy the
	/// context of later ones.
	pub fn normalize(&self, word: &str) -> String {
		let mut word = match self.overrides.get(word) {
			Some(replacement) => replacement.clone(),
			None => word.to_owned(),
		};
		for (pattern, replacement) in &self.substitutions {
			if word.contains(pattern.as_str()) {
				word = word.replace(pattern.as_str(), replacement);
			}
		}
		word
	}

	/// Returns the segment starting at byte offset `at` of `word`.
	///
	/// The first listed multigraph matching at `at` wins, otherwise the single
	/// character at `at`. Returns `None` only when `at` is at the end of `word`.
	/// Empty multigraphs are ignored, they would never advance the cursor.
	pub fn next_segment<'w>(&self, word: &'w str, at: usize) -> Option<&'w str> {
		let rest = &word[at..];
		for multigraph in &self.multigraphs {
			if !multigraph.is_empty() && rest.starts_with(multigraph.as_str()) {
				return Some(&rest[..multigraph.len()]);
			}
		}
		let c = rest.chars().next()?;
		Some(&rest[..c.len_utf8()])
	}

	pub fn is_silent(&self, segment: &str) -> bool {
		self.silent.contains(segment)
	}
}
