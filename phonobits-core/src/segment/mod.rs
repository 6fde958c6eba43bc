use crate::language::LanguageRules;

/// Value of the edge sentinel that pads contexts at word boundaries.
pub const EDGE: &str = "#";

/// One phonetic unit of a segmented word.
///
/// `position` is the 0-based index among the *kept* segments of the word.
/// The edge sentinel is the only segment without a position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhoneticSegment {
	pub value: String,
	pub position: Option<usize>,
}

impl PhoneticSegment {
	pub fn new(value: &str, position: usize) -> Self {
		Self { value: value.to_owned(), position: Some(position) }
	}

	/// The word-boundary sentinel (`"#"`, no position).
	pub fn edge() -> Self {
		Self { value: EDGE.to_owned(), position: None }
	}

	pub fn is_edge(&self) -> bool {
		self.position.is_none() && self.value == EDGE
	}
}

/// Segments a lowercase orthographic word under `rules`.
///
/// Steps, in this order:
/// - whole-word override, then substitution rules (`LanguageRules::normalize`)
/// - left-to-right tokenisation, first listed multigraph wins, else one character
/// - silent segments are dropped; positions are given to kept segments only
///
/// An empty word yields an empty sequence. Every character of the normalised
/// word is consumed by exactly one kept or silent segment.
pub fn segment_word(rules: &LanguageRules, word: &str) -> Vec<PhoneticSegment> {
	let word = rules.normalize(word);

	let mut segments = Vec::new();
	let mut i = 0;
	while let Some(segment) = rules.next_segment(&word, i) {
		i += segment.len();
		if !rules.is_silent(segment) {
			segments.push(PhoneticSegment::new(segment, segments.len()));
		}
	}
	segments
}

impl LanguageRules {
	/// Shorthand for `segment_word(self, word)`.
	pub fn segment(&self, word: &str) -> Vec<PhoneticSegment> {
		segment_word(self, word)
	}
}

/// Segment values of a sequence, in order.
pub fn values(segments: &[PhoneticSegment]) -> Vec<&str> {
	segments.iter().map(|s| s.value.as_str()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::language::Catalog;

	fn positions(segments: &[PhoneticSegment]) -> Vec<usize> {
		segments.iter().filter_map(|s| s.position).collect()
	}

	#[test]
	fn multigraph_word_keeps_positions() {
		let rules = LanguageRules::new("Test", "tst").with_multigraphs(["ch"]);
		let segments = segment_word(&rules, "chacha");
		assert_eq!(values(&segments), vec!["ch", "a", "ch", "a"]);
		assert_eq!(positions(&segments), vec![0, 1, 2, 3]);
	}

	#[test]
	fn priority_order_beats_length() {
		let rules = LanguageRules::new("Test", "tst").with_multigraphs(["ng", "n", "g"]);
		assert_eq!(values(&segment_word(&rules, "ng")), vec!["ng"]);
	}

	#[test]
	fn empty_word_has_no_segments() {
		let rules = Catalog::builtin().require("spa").unwrap().clone();
		assert!(segment_word(&rules, "").is_empty());
	}

	#[test]
	fn silent_segments_take_no_position() {
		let rules = LanguageRules::new("Test", "tst").with_silent(["h"]);
		let segments = segment_word(&rules, "haha");
		assert_eq!(values(&segments), vec!["a", "a"]);
		assert_eq!(positions(&segments), vec![0, 1]);
	}

	#[test]
	fn word_made_only_of_silent_segments() {
		let rules = LanguageRules::new("Test", "tst").with_silent(["h"]);
		assert!(segment_word(&rules, "hhh").is_empty());
	}

	#[test]
	fn spanish_rules_in_order() {
		let spa = Catalog::builtin().require("spa").unwrap().clone();
		// "y" override, then "h" silent, "ll" and "ch" multigraphs
		assert_eq!(values(&spa.segment("y")), vec!["i"]);
		assert_eq!(values(&spa.segment("hablar")), vec!["a", "b", "l", "a", "r"]);
		assert_eq!(values(&spa.segment("calle")), vec!["k", "a", "ll", "e"]);
		assert_eq!(values(&spa.segment("muchacho")), vec!["m", "u", "ch", "a", "ch", "o"]);
		// "gue" is rewritten after "ge", so it keeps the hard g
		assert_eq!(values(&spa.segment("guerra")), vec!["g", "e", "r", "r", "a"]);
		assert_eq!(values(&spa.segment("gente")), vec!["j", "e", "n", "t", "e"]);
	}

	#[test]
	fn tagalog_overrides() {
		let tgl = Catalog::builtin().require("tgl").unwrap().clone();
		assert_eq!(values(&tgl.segment("mga")), vec!["m", "a", "ng", "a"]);
		assert_eq!(values(&tgl.segment("ng")), vec!["n", "a", "ng"]);
	}

	#[test]
	fn toki_pona_final_n() {
		let tok = Catalog::builtin().require("tok").unwrap().clone();
		assert_eq!(values(&tok.segment("sina")), vec!["s", "i", "n", "a"]);
		assert_eq!(values(&tok.segment("pona")), vec!["p", "o", "n", "a"]);
		assert_eq!(values(&tok.segment("tan")), vec!["t", "a", "N"]);
	}

	#[test]
	fn every_character_is_consumed_once() {
		let rules = LanguageRules::new("Test", "tst")
			.with_multigraphs(["sh", "aa"])
			.with_silent(["x"]);
		let word = "shaaxbaash";
		let segments = segment_word(&rules, word);
		let kept: usize = segments.iter().map(|s| s.value.chars().count()).sum();
		let silent = word.matches('x').count();
		assert_eq!(kept + silent, word.chars().count());
	}

	#[test]
	fn edge_segment() {
		let edge = PhoneticSegment::edge();
		assert!(edge.is_edge());
		assert_eq!(edge.value, EDGE);
		assert!(!PhoneticSegment::new("#", 0).is_edge());
	}
}
