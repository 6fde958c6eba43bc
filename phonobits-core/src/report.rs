use std::collections::{HashMap, HashSet};

use log::debug;

use crate::corpus::{Translation, VerseId};
use crate::error::ModelError;
use crate::model::{EndOfWord, NGramModel};
use crate::segment::{PhoneticSegment, values};

/// Parameters shared by every report.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
	/// Order used by single-order reports.
	pub default_n: usize,
	/// Order sweeps run over `0..max_n`.
	pub max_n: usize,
	/// Positions at or past this index are ignored by `position_bits`.
	pub max_position: usize,
	/// Number of words listed by `common_words`.
	pub top_words: usize,
	/// One sequence per word (`true`) or per verse (`false`).
	pub word_breaks: bool,
	pub end_of_word: EndOfWord,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			default_n: 2,
			max_n: 8,
			max_position: 15,
			top_words: 10,
			word_breaks: true,
			end_of_word: EndOfWord::Free,
		}
	}
}

impl AnalysisConfig {
	fn model(&self, n: usize, sequences: &[Vec<PhoneticSegment>]) -> NGramModel {
		NGramModel::train_parallel(n, self.end_of_word, sequences)
	}
}

/// Summary of one translation at the default order.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicStats {
	pub total_words: usize,
	/// Verses present in the file, skipped ones included.
	pub verses: usize,
	pub distinct_words: usize,
	pub total_segments: usize,
	pub segments_per_word: f64,
	/// Sorted distinct segment values.
	pub distinct_segments: Vec<String>,
	pub total_bits: f64,
}

pub fn basic_stats(
	translation: &Translation,
	skip: &HashSet<VerseId>,
	config: &AnalysisConfig,
) -> Result<BasicStats, ModelError> {
	let words = translation.segmented(skip, true);
	let verses = translation.verses(&HashSet::new()).count();
	let distinct_words: HashSet<&str> = translation.words(skip).collect();

	let total_segments: usize = words.iter().map(Vec::len).sum();
	let mut distinct_segments: Vec<String> = words
		.iter()
		.flatten()
		.map(|s| s.value.clone())
		.collect::<HashSet<_>>()
		.into_iter()
		.collect();
	distinct_segments.sort();

	let model = config.model(config.default_n, &words);
	let total_bits = model.total_cost(&words)?;

	let segments_per_word = if words.is_empty() { 0.0 } else { total_segments as f64 / words.len() as f64 };

	Ok(BasicStats {
		total_words: words.len(),
		verses,
		distinct_words: distinct_words.len(),
		total_segments,
		segments_per_word,
		distinct_segments,
		total_bits,
	})
}

/// The first kept verse and how its words were segmented.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentationSample {
	pub content: String,
	pub words: Vec<Vec<String>>,
}

pub fn segmentation_sample(translation: &Translation, skip: &HashSet<VerseId>) -> Option<SegmentationSample> {
	let verse = translation.verses(skip).next()?;
	let words = verse
		.segmented_words(translation.language())
		.iter()
		.map(|w| values(w).into_iter().map(str::to_owned).collect::<Vec<String>>())
		.collect();
	Some(SegmentationSample { content: verse.content.clone(), words })
}

/// Occurrences of every segment value, most frequent first.
pub fn segment_frequencies(translation: &Translation, skip: &HashSet<VerseId>, word_breaks: bool) -> Vec<(String, usize)> {
	let mut freqs: HashMap<String, usize> = HashMap::new();
	for segment in translation.segmented(skip, word_breaks).iter().flatten() {
		*freqs.entry(segment.value.clone()).or_insert(0) += 1;
	}
	let mut freqs: Vec<(String, usize)> = freqs.into_iter().collect();
	freqs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
	freqs
}

/// Result of one order of an order sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderResult {
	pub n: usize,
	pub total_bits: f64,
	pub total_segments: usize,
	/// Mean number of distinct continuations per context.
	pub mean_branching: f64,
}

impl OrderResult {
	pub fn bits_per_segment(&self) -> f64 {
		if self.total_segments == 0 {
			return 0.0;
		}
		self.total_bits / self.total_segments as f64
	}
}

/// Trains and scores one model per order in `0..config.max_n`.
///
/// Each order gets its own model: counts cannot be reused across orders.
pub fn order_sweep(
	translation: &Translation,
	skip: &HashSet<VerseId>,
	config: &AnalysisConfig,
) -> Result<Vec<OrderResult>, ModelError> {
	let sequences = translation.segmented(skip, config.word_breaks);
	let total_segments: usize = sequences.iter().map(Vec::len).sum();

	let mut results = Vec::with_capacity(config.max_n);
	for n in 0..config.max_n {
		let model = config.model(n, &sequences);
		let total_bits = model.total_cost(&sequences)?;
		debug!("{} n={} total bits {:.1}", translation.name(), n, total_bits);
		results.push(OrderResult {
			n,
			total_bits,
			total_segments,
			mean_branching: model.mean_branching().unwrap_or(0.0),
		});
	}
	Ok(results)
}

/// Distribution of word-initial segments (order 1).
#[derive(Clone, Debug, PartialEq)]
pub struct FirstSegments {
	/// `(segment, count, probability)`, most frequent first.
	pub entries: Vec<(String, usize, f64)>,
	/// Entropy of the distribution in bits.
	pub expected_bits: f64,
}

/// Always trained with `EndOfWord::Free`, so a fully silent word adds no
/// edge entry to the distribution.
///
/// # Errors
/// `UnobservedContext` if the translation has no non-empty word.
pub fn first_segments(translation: &Translation, skip: &HashSet<VerseId>) -> Result<FirstSegments, ModelError> {
	let words = translation.segmented(skip, true);
	let model = NGramModel::train_parallel(1, EndOfWord::Free, &words);

	let left_edge = model.leading_context();
	let row = model
		.continuations_of(&left_edge)
		.ok_or_else(|| ModelError::UnobservedContext { context: left_edge.clone() })?;

	let total = row.total() as f64;
	let entries = row
		.sorted()
		.into_iter()
		.map(|(segment, count)| (segment.to_owned(), count, count as f64 / total))
		.collect();

	Ok(FirstSegments { entries, expected_bits: row.entropy() })
}

/// Mean cost of the segment at each word position, at the default order.
///
/// Index `i` of the result is position `i`. The list stops at the first
/// position no word reaches, and never exceeds `config.max_position`.
pub fn position_bits(
	translation: &Translation,
	skip: &HashSet<VerseId>,
	config: &AnalysisConfig,
) -> Result<Vec<f64>, ModelError> {
	let n = config.default_n;
	let sequences = translation.segmented(skip, config.word_breaks);
	let model = config.model(n, &sequences);

	let mut position_bits: Vec<Vec<f64>> = vec![Vec::new(); config.max_position];
	for sequence in &sequences {
		let mut history = model.leading_context();
		for segment in sequence {
			let Some(position) = segment.position else { continue };
			if position >= config.max_position {
				break;
			}

			let context = &history[history.len() - n..];
			position_bits[position].push(model.segment_cost(segment, context)?);
			history.push(segment.value.clone());
		}
	}

	Ok(position_bits
		.into_iter()
		.take_while(|bits| !bits.is_empty())
		.map(|bits| bits.iter().sum::<f64>() / bits.len() as f64)
		.collect())
}

/// A frequent orthographic word and its cost at the default order.
#[derive(Clone, Debug, PartialEq)]
pub struct CommonWord {
	pub word: String,
	pub count: usize,
	pub bits: f64,
}

/// The `config.top_words` most frequent words, ties in order of first use.
pub fn common_words(
	translation: &Translation,
	skip: &HashSet<VerseId>,
	config: &AnalysisConfig,
) -> Result<Vec<CommonWord>, ModelError> {
	let rules = translation.language();
	let words: Vec<&str> = translation.words(skip).collect();
	let segmented: Vec<Vec<PhoneticSegment>> = words.iter().map(|w| rules.segment(w)).collect();
	let model = config.model(config.default_n, &segmented);

	// (count, first index) per word
	let mut freqs: HashMap<&str, (usize, usize)> = HashMap::new();
	for (i, &word) in words.iter().enumerate() {
		freqs.entry(word).or_insert((0, i)).0 += 1;
	}
	let mut ranked: Vec<(&str, usize, usize)> = freqs.into_iter().map(|(w, (c, i))| (w, c, i)).collect();
	ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

	ranked
		.into_iter()
		.take(config.top_words)
		.map(|(word, count, _)| {
			let bits = model.sequence_cost(&rules.segment(word))?;
			Ok(CommonWord { word: word.to_owned(), count, bits })
		})
		.collect()
}
