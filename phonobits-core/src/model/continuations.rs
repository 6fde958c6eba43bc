use std::collections::HashMap;

/// Observed continuations of a single context.
///
/// A `Continuations` row corresponds to one context (the `n` segment values
/// preceding a target) and stores how often each following segment value was
/// observed after it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate continuation occurrences during training
/// - Turn counts into probabilities and bit costs
/// - Merge with another row of the same context (parallel training support)
///
/// ## Invariants
/// - Each stored count is strictly positive
/// - `total` is always the sum of all stored counts
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Continuations {
	/// Occurrences indexed by the following segment value.
	/// Example: { "a" => 42, "ch" => 3 }
	targets: HashMap<String, usize>,
	/// Number of times the context itself was observed.
	total: usize,
}

impl Continuations {
	/// Records one occurrence of `target` after this context.
	pub fn add(&mut self, target: &str) {
		match self.targets.get_mut(target) {
			Some(count) => *count += 1,
			None => {
				self.targets.insert(target.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	/// How many times `target` followed this context (0 if never).
	pub fn count(&self, target: &str) -> usize {
		self.targets.get(target).copied().unwrap_or(0)
	}

	/// How many times this context was observed.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct continuations.
	pub fn len(&self) -> usize {
		self.targets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}

	/// Relative frequency of `target`, or `None` if it was never observed.
	pub fn probability(&self, target: &str) -> Option<f64> {
		let count = *self.targets.get(target)?;
		Some(count as f64 / self.total as f64)
	}

	/// Information cost of `target` in bits: `-log2(count / total)`.
	///
	/// Returns `None` if `target` was never observed after this context.
	/// A unique continuation costs exactly `0.0`.
	pub fn cost(&self, target: &str) -> Option<f64> {
		let count = *self.targets.get(target)?;
		if count == self.total {
			return Some(0.0);
		}
		Some(-(count as f64 / self.total as f64).log2())
	}

	/// Expected bits of the next segment: `Σ -p·log2(p)` over all continuations.
	pub fn entropy(&self) -> f64 {
		let total = self.total as f64;
		self.targets
			.values()
			.map(|&count| {
				let p = count as f64 / total;
				-p * p.log2()
			})
			.sum()
	}

	/// Continuations sorted by descending count, ties by value.
	pub fn sorted(&self) -> Vec<(&str, usize)> {
		let mut entries: Vec<(&str, usize)> = self.targets.iter().map(|(k, v)| (k.as_str(), *v)).collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		entries
	}

	/// Iterates over `(target, count)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.targets.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Merges another row of the same context into this one.
	///
	/// This method is intended for parallel training, where partial models
	/// built from disjoint chunks are combined into a single one.
	pub fn merge(&mut self, other: &Self) {
		for (target, count) in &other.targets {
			*self.targets.entry(target.clone()).or_insert(0) += *count;
		}
		self.total += other.total;
	}
}
