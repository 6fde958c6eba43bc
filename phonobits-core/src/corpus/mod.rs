//! Translation corpus: verse files, chapters and word splitting.

use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};

use crate::error::CorpusError;
use crate::io::list_files;
use crate::language::Catalog;

/// Chapter names and verse counts shared by every translation.
pub mod layout;

/// Verse files of a single edition.
pub mod translation;

/// Free text → lowercase orthographic words.
pub mod words;

pub use layout::ChapterLayout;
pub use translation::{Chapter, Translation, Verse, VerseId};
pub use words::split_words;

/// Every translation of a directory plus the verses missing from any of them.
///
/// Reports skip `missing` so that all translations are compared on the same
/// verses.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
	pub translations: Vec<Translation>,
	pub missing: HashSet<VerseId>,
}

impl Corpus {
	/// Loads all `.txt` translation files of `dir`, sorted by file name.
	///
	/// # Errors
	/// Fails on the first file that cannot be read or parsed.
	pub fn load_dir<P: AsRef<Path>>(dir: P, catalog: &Catalog, layout: &ChapterLayout) -> Result<Self, CorpusError> {
		let mut corpus = Self::default();
		for path in list_files(&dir, "txt")? {
			corpus.add(Translation::from_file(&path, catalog, layout)?);
		}
		info!(
			"loaded {} translations from {}, {} verses missing in at least one",
			corpus.translations.len(),
			dir.as_ref().display(),
			corpus.missing.len()
		);
		Ok(corpus)
	}

	/// Adds a translation and records its missing verses.
	pub fn add(&mut self, translation: Translation) {
		for id in translation.missing() {
			warn!("{} is missing {}:{}", translation.name(), id.chapter, id.index + 1);
			self.missing.insert(id);
		}
		self.translations.push(translation);
	}
}
