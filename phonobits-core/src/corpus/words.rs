use std::sync::LazyLock;

use regex::Regex;

/// Maximal runs of Unicode letters.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").unwrap());

/// Splits free text into lowercase orthographic words.
///
/// Anything that is not a letter separates words: digits, underscore,
/// whitespace, punctuation, combining marks and joiners.
pub fn split_words(text: &str) -> Vec<String> {
	let lower = text.to_lowercase();
	WORD_RE
		.find_iter(&lower)
		.map(|m| m.as_str().to_owned())
		.collect()
}
