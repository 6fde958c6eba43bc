/// Expected chapters of every translation, in file order, with verse counts.
#[derive(Clone, Debug, PartialEq)]
pub struct ChapterLayout {
	chapters: Vec<(String, usize)>,
}

impl ChapterLayout {
	pub fn new<'a>(chapters: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
		Self {
			chapters: chapters.into_iter().map(|(name, n)| (name.to_owned(), n)).collect(),
		}
	}

	/// Number of verses of `chapter`, `None` if it is not part of the layout.
	pub fn verse_count(&self, chapter: &str) -> Option<usize> {
		self.chapters
			.iter()
			.find(|(name, _)| name == chapter)
			.map(|(_, n)| *n)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.chapters.iter().map(|(name, n)| (name.as_str(), *n))
	}

	pub fn len(&self) -> usize {
		self.chapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chapters.is_empty()
	}
}

impl Default for ChapterLayout {
	fn default() -> Self {
		Self::new([
			("Joshua 1", 18),
			("Joshua 2", 24),
			("Joshua 3", 17),
			("Esther 1", 22),
			("Esther 2", 23),
			("Esther 3", 15),
			("Lamentations 1", 22),
			("Lamentations 2", 22),
			("Lamentations 3", 66),
		])
	}
}
