use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::debug;

use super::continuations::Continuations;
use crate::error::ModelError;
use crate::segment::{EDGE, PhoneticSegment};

/// A context: the `n` segment values preceding a target, edges included.
pub type Context = Vec<String>;

/// Whether a sequence pays for signalling its own end.
///
/// - `Free`: the trailing edge sentinel only pads the last context and is
///   never predicted. This is the default.
/// - `Costed`: the trailing edge sentinel is a prediction target in both
///   training and scoring, so every sequence also pays for its end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndOfWord {
	#[default]
	Free,
	Costed,
}

/// Fixed-order n-gram model over phonetic segments.
///
/// The `NGramModel` stores, for every context of `n` segment values seen
/// during training, how often each following segment was observed. It then
/// answers the information cost, in bits, of a segment or a whole sequence.
///
/// # Responsibilities
/// - Accumulate continuation counts from segment sequences (any number of calls)
/// - Compute `-log2(p)` costs from exact frequencies, without smoothing
/// - Merge with another model of the same order (parallel training)
///
/// # Invariants
/// - Every key of `continuations` has exactly `n` values
/// - For every context, the row total equals the number of times it was observed
/// - `n` and `end_of_word` never change after construction
///
/// # Concurrency
/// Training takes `&mut self` and queries take `&self`; sharing a model
/// across threads while training needs external synchronisation.
#[derive(Clone, Debug, PartialEq)]
pub struct NGramModel {
	/// The order of the model (number of context segments, may be 0)
	n: usize,

	end_of_word: EndOfWord,

	/// Mapping from a context to the continuations observed after it
	continuations: HashMap<Context, Continuations>,
}

impl NGramModel {
	/// Creates an empty model of order `n` with `EndOfWord::Free`.
	///
	/// Order 0 is a single unigram distribution keyed by the empty context.
	pub fn new(n: usize) -> Self {
		Self::with_end_of_word(n, EndOfWord::Free)
	}

	pub fn with_end_of_word(n: usize, end_of_word: EndOfWord) -> Self {
		Self { n, end_of_word, continuations: HashMap::new() }
	}

	pub fn order(&self) -> usize {
		self.n
	}

	pub fn end_of_word(&self) -> EndOfWord {
		self.end_of_word
	}

	/// `n` edges, the segment values, then one trailing edge.
	fn padded(&self, segments: &[PhoneticSegment]) -> Vec<String> {
		let mut padded = Vec::with_capacity(self.n + segments.len() + 1);
		padded.extend(std::iter::repeat_n(EDGE.to_owned(), self.n));
		padded.extend(segments.iter().map(|s| s.value.clone()));
		padded.push(EDGE.to_owned());
		padded
	}

	/// Number of predicted positions for a sequence of `len` segments.
	fn targets(&self, len: usize) -> usize {
		match self.end_of_word {
			EndOfWord::Free => len,
			EndOfWord::Costed => len + 1,
		}
	}

	/// Adds one segment sequence (a word, or a whole verse) to the model.
	///
	/// For each predicted position `i`, the context is `padded[i..i + n]` and
	/// the target `padded[i + n]`. Counts are additive across calls.
	///
	/// # Notes
	/// - With `EndOfWord::Free` an empty sequence records nothing.
	pub fn train(&mut self, segments: &[PhoneticSegment]) {
		let padded = self.padded(segments);
		for i in 0..self.targets(segments.len()) {
			let context = &padded[i..i + self.n];
			let target = &padded[i + self.n];

			// Get or create the row for this context
			match self.continuations.get_mut(context) {
				Some(row) => row.add(target),
				None => {
					let mut row = Continuations::default();
					row.add(target);
					self.continuations.insert(context.to_vec(), row);
				}
			}
		}
	}

	/// Trains on every sequence, in order.
	pub fn train_all(&mut self, sequences: &[Vec<PhoneticSegment>]) {
		for segments in sequences {
			self.train(segments);
		}
	}

	/// Builds a model from `sequences` using all CPU cores.
	///
	/// # Behavior
	/// - Splits the sequences into chunks (based on CPU cores * factor).
	/// - Trains one partial model per chunk on a scoped thread.
	/// - Merges all partial models sequentially.
	///
	/// The result is equal to sequential training because counts are additive.
	pub fn train_parallel(n: usize, end_of_word: EndOfWord, sequences: &[Vec<PhoneticSegment>]) -> Self {
		let mut final_model = Self::with_end_of_word(n, end_of_word);
		if sequences.is_empty() {
			return final_model;
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = sequences.len().div_ceil(chunks);
		debug!(
			"training order {} model on {} sequences, {} per chunk",
			n,
			sequences.len(),
			chunk_size
		);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in sequences.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial_model = Self::with_end_of_word(n, end_of_word);
					partial_model.train_all(chunk);
					// The receiver outlives the scope, sending cannot fail
					let _ = tx.send(partial_model);
				});
			}
		});
		drop(tx);

		for partial_model in rx.iter() {
			final_model.merge_rows(&partial_model);
		}
		debug!("order {} model has {} contexts", n, final_model.context_count());

		final_model
	}

	/// Merges another n-gram model into this one.
	///
	/// # Notes
	/// - Both models must have the same order `n` and end-of-word mode.
	/// - Occurrence counts for matching contexts and targets are summed.
	///
	/// # Errors
	/// Returns `ModelError::OrderMismatch` if the models are not compatible.
	pub fn merge(&mut self, other: &Self) -> Result<(), ModelError> {
		if self.n != other.n || self.end_of_word != other.end_of_word {
			return Err(ModelError::OrderMismatch {
				expected: format!("order {} ({:?} end of word)", self.n, self.end_of_word),
				got: format!("order {} ({:?} end of word)", other.n, other.end_of_word),
			});
		}
		self.merge_rows(other);
		Ok(())
	}

	fn merge_rows(&mut self, other: &Self) {
		for (context, row) in &other.continuations {
			if let Some(existing) = self.continuations.get_mut(context) {
				existing.merge(row);
			} else {
				self.continuations.insert(context.clone(), row.clone());
			}
		}
	}

	fn cost_of(&self, target: &str, context: &[String]) -> Result<f64, ModelError> {
		if context.len() != self.n {
			return Err(ModelError::ContextLength { expected: self.n, got: context.len() });
		}
		let row = self
			.continuations
			.get(context)
			.ok_or_else(|| ModelError::UnobservedContext { context: context.to_vec() })?;
		row.cost(target).ok_or_else(|| ModelError::UnobservedTarget {
			context: context.to_vec(),
			target: target.to_owned(),
		})
	}

	/// Information cost, in bits, of `target` following `context`.
	///
	/// # Errors
	/// - `ContextLength` if `context` does not hold exactly `n` values
	/// - `UnobservedContext` if the context never occurred during training
	/// - `UnobservedTarget` if `target` never followed this context
	pub fn segment_cost(&self, target: &PhoneticSegment, context: &[String]) -> Result<f64, ModelError> {
		self.cost_of(&target.value, context)
	}

	/// Total information cost, in bits, of a segment sequence.
	///
	/// Uses the same padding and the same predicted positions as `train`, so
	/// with `EndOfWord::Free` the end of the sequence costs nothing.
	///
	/// # Errors
	/// The first unobserved context or target aborts the sum.
	pub fn sequence_cost(&self, segments: &[PhoneticSegment]) -> Result<f64, ModelError> {
		let padded = self.padded(segments);
		let mut bits = 0.0;
		for i in 0..self.targets(segments.len()) {
			bits += self.cost_of(&padded[i + self.n], &padded[i..i + self.n])?;
		}
		Ok(bits)
	}

	/// Sum of `sequence_cost` over many sequences.
	pub fn total_cost(&self, sequences: &[Vec<PhoneticSegment>]) -> Result<f64, ModelError> {
		sequences.iter().map(|s| self.sequence_cost(s)).sum()
	}

	/// Read-only access to the whole continuation table.
	pub fn continuations(&self) -> &HashMap<Context, Continuations> {
		&self.continuations
	}

	/// The row of a single context, if it was observed.
	pub fn continuations_of(&self, context: &[String]) -> Option<&Continuations> {
		self.continuations.get(context)
	}

	/// The context made of `n` edges: the one predicting the first segment.
	pub fn leading_context(&self) -> Context {
		vec![EDGE.to_owned(); self.n]
	}

	/// Number of distinct observed contexts.
	pub fn context_count(&self) -> usize {
		self.continuations.len()
	}

	/// Mean number of distinct continuations per context, `None` if untrained.
	pub fn mean_branching(&self) -> Option<f64> {
		if self.continuations.is_empty() {
			return None;
		}
		let branches: usize = self.continuations.values().map(Continuations::len).sum();
		Some(branches as f64 / self.continuations.len() as f64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn seq(values: &[&str]) -> Vec<PhoneticSegment> {
		values
			.iter()
			.enumerate()
			.map(|(i, v)| PhoneticSegment::new(v, i))
			.collect()
	}

	fn ctx(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[test]
	fn unique_continuation_costs_zero() {
		let mut model = NGramModel::new(1);
		model.train(&seq(&["a", "b"]));

		let b = PhoneticSegment::new("b", 1);
		assert_eq!(model.segment_cost(&b, &ctx(&["a"])), Ok(0.0));
	}

	#[test]
	fn unseen_context_is_an_error() {
		let mut model = NGramModel::new(1);
		model.train(&seq(&["a", "b"]));

		let a = PhoneticSegment::new("a", 0);
		assert_eq!(
			model.segment_cost(&a, &ctx(&["z"])),
			Err(ModelError::UnobservedContext { context: ctx(&["z"]) })
		);
		assert!(matches!(
			model.sequence_cost(&seq(&["z"])),
			Err(ModelError::UnobservedTarget { .. })
		));
	}

	#[test]
	fn unseen_context_midway_through_a_sequence() {
		let mut model = NGramModel::new(2);
		model.train(&seq(&["a", "b"]));
		model.train(&seq(&["c", "b"]));

		// "a b" only ever ended a word, so it never predicted anything
		assert_eq!(
			model.sequence_cost(&seq(&["a", "b", "b"])),
			Err(ModelError::UnobservedContext { context: ctx(&["a", "b"]) })
		);
	}

	#[test]
	fn unseen_target_is_an_error() {
		let mut model = NGramModel::new(1);
		model.train(&seq(&["a", "b"]));

		let c = PhoneticSegment::new("c", 1);
		assert_eq!(
			model.segment_cost(&c, &ctx(&["a"])),
			Err(ModelError::UnobservedTarget { context: ctx(&["a"]), target: "c".to_owned() })
		);
	}

	#[test]
	fn wrong_context_length_is_an_error() {
		let mut model = NGramModel::new(2);
		model.train(&seq(&["a", "b"]));

		let b = PhoneticSegment::new("b", 1);
		assert_eq!(
			model.segment_cost(&b, &ctx(&["a"])),
			Err(ModelError::ContextLength { expected: 2, got: 1 })
		);
	}

	#[test]
	fn trailing_edge_is_never_a_target() {
		let mut model = NGramModel::new(1);
		model.train(&seq(&["a", "b"]));

		assert_eq!(model.context_count(), 2);
		assert!(model.continuations_of(&ctx(&["b"])).is_none());
		assert_eq!(model.continuations_of(&ctx(&["#"])).unwrap().count("a"), 1);
	}

	#[test]
	fn sequence_cost_sums_segment_costs() {
		let mut model = NGramModel::new(1);
		model.train(&seq(&["a", "b"]));
		model.train(&seq(&["a", "c"]));

		// a|# costs 0, b|a costs 1
		assert_eq!(model.sequence_cost(&seq(&["a", "b"])), Ok(1.0));
		assert_eq!(model.sequence_cost(&seq(&[])), Ok(0.0));
	}

	#[test]
	fn costed_end_of_word_predicts_the_edge() {
		let mut model = NGramModel::with_end_of_word(1, EndOfWord::Costed);
		model.train(&seq(&["a", "b"]));
		model.train(&seq(&["a"]));

		// a|# = 0, then after "a": b once, # once
		assert_eq!(model.continuations_of(&ctx(&["a"])).unwrap().count("#"), 1);
		assert_eq!(model.sequence_cost(&seq(&["a"])), Ok(1.0));
		assert_eq!(model.sequence_cost(&seq(&["a", "b"])), Ok(1.0));
	}

	#[test]
	fn order_zero_is_a_unigram() {
		let mut model = NGramModel::new(0);
		model.train(&seq(&["a", "b"]));
		model.train(&seq(&["a"]));

		let row = model.continuations_of(&[]).unwrap();
		assert_eq!(row.total(), 3);
		let expected = -(2.0f64 / 3.0).log2();
		assert!((model.sequence_cost(&seq(&["a"])).unwrap() - expected).abs() < 1e-12);
	}

	#[test]
	fn row_totals_match_context_observations() {
		let words = vec![seq(&["k", "a", "t", "a"]), seq(&["t", "a", "k", "a"]), seq(&["a"])];
		let mut model = NGramModel::new(2);
		model.train_all(&words);

		let mut observed: HashMap<Vec<String>, usize> = HashMap::new();
		for word in &words {
			let padded = model.padded(word);
			for i in 0..word.len() {
				*observed.entry(padded[i..i + 2].to_vec()).or_insert(0) += 1;
			}
		}
		assert_eq!(observed.len(), model.context_count());
		for (context, row) in model.continuations() {
			assert_eq!(row.total(), observed[context]);
		}
	}

	#[test]
	fn costs_are_never_negative() {
		let words = vec![seq(&["a", "b", "a"]), seq(&["b", "a"]), seq(&["a", "a", "a"])];
		let mut model = NGramModel::new(1);
		model.train_all(&words);

		for word in &words {
			assert!(model.sequence_cost(word).unwrap() >= 0.0);
		}
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let words: Vec<Vec<PhoneticSegment>> = (0..500)
			.map(|i| match i % 3 {
				0 => seq(&["k", "a"]),
				1 => seq(&["a", "ng", "a"]),
				_ => seq(&["ng", "i", "k"]),
			})
			.collect();

		let mut sequential = NGramModel::new(2);
		sequential.train_all(&words);
		let parallel = NGramModel::train_parallel(2, EndOfWord::Free, &words);

		assert_eq!(parallel, sequential);
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = NGramModel::new(1);
		let right = NGramModel::new(2);
		assert!(matches!(left.merge(&right), Err(ModelError::OrderMismatch { .. })));

		let costed = NGramModel::with_end_of_word(1, EndOfWord::Costed);
		assert!(left.merge(&costed).is_err());
	}

	#[test]
	fn merge_adds_counts() {
		let mut left = NGramModel::new(1);
		left.train(&seq(&["a", "b"]));
		let mut right = NGramModel::new(1);
		right.train(&seq(&["a", "c"]));

		left.merge(&right).unwrap();
		let row = left.continuations_of(&ctx(&["a"])).unwrap();
		assert_eq!(row.total(), 2);
		assert_eq!(left.mean_branching(), Some(1.5));
	}

	#[test]
	fn leading_context_is_all_edges() {
		assert_eq!(NGramModel::new(3).leading_context(), ctx(&["#", "#", "#"]));
		assert!(NGramModel::new(0).leading_context().is_empty());
		assert_eq!(NGramModel::new(1).mean_branching(), None);
	}
}
