use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use super::layout::ChapterLayout;
use super::words::split_words;
use crate::error::CorpusError;
use crate::io::{get_filename, read_lines};
use crate::language::{Catalog, LanguageRules};
use crate::segment::{PhoneticSegment, segment_word};

static FILE_NAME_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^verses-([a-z]{3})-([a-zA-Z_]+)\.txt$").unwrap());
static VERSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+): ").unwrap());

/// Chapter name and 0-based verse index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseId {
	pub chapter: String,
	pub index: usize,
}

impl VerseId {
	pub fn new(chapter: &str, index: usize) -> Self {
		Self { chapter: chapter.to_owned(), index }
	}
}

/// One verse of a translation and its orthographic words.
#[derive(Clone, Debug)]
pub struct Verse {
	pub id: VerseId,
	pub content: String,
	/// Lowercase words, in order, as split by `split_words`.
	pub words: Vec<String>,
}

impl Verse {
	pub fn new(id: VerseId, content: &str) -> Self {
		Self { id, content: content.to_owned(), words: split_words(content) }
	}

	/// One segment sequence per word.
	pub fn segmented_words(&self, rules: &LanguageRules) -> Vec<Vec<PhoneticSegment>> {
		self.words.iter().map(|w| segment_word(rules, w)).collect()
	}

	/// All words' segments concatenated; positions stay relative to each word.
	pub fn all_segments(&self, rules: &LanguageRules) -> Vec<PhoneticSegment> {
		self.segmented_words(rules).into_iter().flatten().collect()
	}
}

#[derive(Clone, Debug)]
pub struct Chapter {
	pub name: String,
	/// Indexed by verse number - 1, `None` when the file lacks the verse.
	pub verses: Vec<Option<Verse>>,
}

/// A single edition of the text in one language.
#[derive(Clone, Debug)]
pub struct Translation {
	language: LanguageRules,
	edition: String,
	chapters: Vec<Chapter>,
}

impl Translation {
	/// Loads `verses-<iso>-<Edition_Name>.txt`.
	///
	/// # Format
	/// - Even lines (0-based) hold content, odd lines must be blank
	/// - `N: text` is verse N of the current chapter
	/// - Any other content line opens the next chapter of `layout`
	///
	/// # Errors
	/// - `FileName` / `UnknownLanguage` if the name cannot be resolved
	/// - `Format` on the first malformed line, or if chapters differ from `layout`
	pub fn from_file<P: AsRef<Path>>(path: P, catalog: &Catalog, layout: &ChapterLayout) -> Result<Self, CorpusError> {
		let path = path.as_ref();
		let filename = get_filename(path)?;
		let captures = FILE_NAME_RE
			.captures(&filename)
			.ok_or_else(|| CorpusError::FileName(filename.clone()))?;
		let language = catalog.require(&captures[1])?.clone();
		let edition = captures[2].replace('_', " ");

		let lines = read_lines(path)?;
		let chapters = parse_chapters(&filename, &lines, layout)?;

		Ok(Self { language, edition, chapters })
	}

	/// Builds a translation from already parsed chapters.
	pub fn new(language: LanguageRules, edition: &str, chapters: Vec<Chapter>) -> Self {
		Self { language, edition: edition.to_owned(), chapters }
	}

	/// `"Edition (Language)"`.
	pub fn name(&self) -> String {
		format!("{} ({})", self.edition, self.language.name)
	}

	pub fn language(&self) -> &LanguageRules {
		&self.language
	}

	pub fn edition(&self) -> &str {
		&self.edition
	}

	pub fn chapters(&self) -> &[Chapter] {
		&self.chapters
	}

	/// Present verses, in order, skipping the ids in `skip`.
	pub fn verses<'a>(&'a self, skip: &'a HashSet<VerseId>) -> impl Iterator<Item = &'a Verse> + 'a {
		self.chapters
			.iter()
			.flat_map(|chapter| chapter.verses.iter().flatten())
			.filter(move |verse| !skip.contains(&verse.id))
	}

	/// Ids of verses absent from the file.
	pub fn missing(&self) -> Vec<VerseId> {
		self.chapters
			.iter()
			.flat_map(|chapter| {
				chapter
					.verses
					.iter()
					.enumerate()
					.filter(|(_, verse)| verse.is_none())
					.map(move |(i, _)| VerseId::new(&chapter.name, i))
			})
			.collect()
	}

	/// Segment sequences of all kept verses.
	///
	/// One sequence per word when `word_breaks` is set, otherwise one per verse.
	pub fn segmented(&self, skip: &HashSet<VerseId>, word_breaks: bool) -> Vec<Vec<PhoneticSegment>> {
		let mut sequences = Vec::new();
		for verse in self.verses(skip) {
			if word_breaks {
				sequences.extend(verse.segmented_words(&self.language));
			} else {
				sequences.push(verse.all_segments(&self.language));
			}
		}
		sequences
	}

	/// All orthographic words of the kept verses, in order.
	pub fn words<'a>(&'a self, skip: &'a HashSet<VerseId>) -> impl Iterator<Item = &'a str> + 'a {
		self.verses(skip).flat_map(|verse| verse.words.iter().map(String::as_str))
	}
}

fn parse_chapters(filename: &str, lines: &[String], layout: &ChapterLayout) -> Result<Vec<Chapter>, CorpusError> {
	let mut chapters: Vec<Chapter> = Vec::new();

	for (i, line) in lines.iter().enumerate() {
		let line_no = i + 1;
		if line.trim() != line.as_str() {
			warn!("{} line {} has leading/trailing whitespace", filename, line_no);
		}

		if i % 2 == 1 {
			if !line.is_empty() {
				return Err(CorpusError::format(filename, line_no, "expected a blank line"));
			}
			continue;
		}

		if line.starts_with(|c: char| c.is_ascii_digit()) {
			let current_chapter = chapters
				.last_mut()
				.ok_or_else(|| CorpusError::format(filename, line_no, "verse before any chapter"))?;
			let captures = VERSE_RE
				.captures(line)
				.ok_or_else(|| CorpusError::format(filename, line_no, "expected `N: text`"))?;
			let number: usize = captures[1]
				.parse()
				.map_err(|_| CorpusError::format(filename, line_no, "verse number out of range"))?;
			if number == 0 || number > current_chapter.verses.len() {
				return Err(CorpusError::format(
					filename,
					line_no,
					format!("{} has no verse {}", current_chapter.name, number),
				));
			}

			let content = &line[captures[0].len()..];
			let id = VerseId::new(&current_chapter.name, number - 1);
			current_chapter.verses[number - 1] = Some(Verse::new(id, content));
		} else {
			if line.is_empty() {
				return Err(CorpusError::format(filename, line_no, "expected a chapter name or a verse"));
			}
			let expected = layout.iter().nth(chapters.len());
			match expected {
				Some((name, count)) if name == line.as_str() => chapters.push(Chapter {
					name: line.clone(),
					verses: vec![None; count],
				}),
				Some((name, _)) => {
					return Err(CorpusError::format(
						filename,
						line_no,
						format!("expected chapter {:?}, found {:?}", name, line),
					));
				}
				None => {
					return Err(CorpusError::format(filename, line_no, format!("unexpected chapter {:?}", line)));
				}
			}
		}
	}

	if chapters.len() != layout.len() {
		return Err(CorpusError::format(
			filename,
			lines.len(),
			format!("found {} chapters, expected {}", chapters.len(), layout.len()),
		));
	}

	Ok(chapters)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn layout() -> ChapterLayout {
		ChapterLayout::new([("Ruth 1", 3), ("Ruth 2", 2)])
	}

	fn lines(text: &str) -> Vec<String> {
		text.split('\n').map(str::to_owned).collect()
	}

	#[test]
	fn parses_chapters_and_verses() {
		let text = "Ruth 1\n\n1: Uno dos.\n\n3: Tres.\n\nRuth 2\n\n2: Cuatro";
		let chapters = parse_chapters("f.txt", &lines(text), &layout()).unwrap();

		assert_eq!(chapters.len(), 2);
		assert_eq!(chapters[0].verses.len(), 3);
		assert!(chapters[0].verses[1].is_none());
		let verse = chapters[0].verses[2].as_ref().unwrap();
		assert_eq!(verse.id, VerseId::new("Ruth 1", 2));
		assert_eq!(verse.content, "Tres.");
		assert_eq!(verse.words, vec!["tres"]);
	}

	#[test]
	fn rejects_non_blank_separator() {
		let text = "Ruth 1\n1: Uno";
		let err = parse_chapters("f.txt", &lines(text), &layout()).unwrap_err();
		assert!(matches!(err, CorpusError::Format { line: 2, .. }));
	}

	#[test]
	fn rejects_out_of_order_chapter() {
		let text = "Ruth 2\n\n1: Uno";
		assert!(matches!(
			parse_chapters("f.txt", &lines(text), &layout()),
			Err(CorpusError::Format { line: 1, .. })
		));
	}

	#[test]
	fn rejects_verse_outside_chapter() {
		let text = "Ruth 1\n\n4: Cuatro\n\nRuth 2";
		assert!(matches!(
			parse_chapters("f.txt", &lines(text), &layout()),
			Err(CorpusError::Format { line: 3, .. })
		));
		assert!(parse_chapters("f.txt", &lines("1: Uno"), &layout()).is_err());
	}

	#[test]
	fn rejects_missing_chapters() {
		let text = "Ruth 1\n\n1: Uno";
		assert!(parse_chapters("f.txt", &lines(text), &layout()).is_err());
	}

	#[test]
	fn segmented_with_and_without_word_breaks() {
		let text = "Ruth 1\n\n1: chacha hola\n\nRuth 2";
		let chapters = parse_chapters("f.txt", &lines(text), &layout()).unwrap();
		let spa = Catalog::builtin().require("spa").unwrap().clone();
		let translation = Translation::new(spa, "Test", chapters);
		let skip = HashSet::new();

		let words = translation.segmented(&skip, true);
		assert_eq!(words.len(), 2);
		assert_eq!(words[1].len(), 3);

		let verses = translation.segmented(&skip, false);
		assert_eq!(verses.len(), 1);
		assert_eq!(verses[0].len(), 7);
		assert_eq!(verses[0][4].position, Some(0));
	}

	#[test]
	fn missing_and_skipped_verses() {
		let text = "Ruth 1\n\n1: Uno\n\n2: Dos\n\nRuth 2\n\n2: Cuatro";
		let chapters = parse_chapters("f.txt", &lines(text), &layout()).unwrap();
		let spa = Catalog::builtin().require("spa").unwrap().clone();
		let translation = Translation::new(spa, "Reina Valera", chapters);

		assert_eq!(translation.name(), "Reina Valera (Spanish)");
		assert_eq!(translation.missing(), vec![VerseId::new("Ruth 1", 2), VerseId::new("Ruth 2", 0)]);

		let skip: HashSet<VerseId> = [VerseId::new("Ruth 1", 1)].into_iter().collect();
		let words: Vec<&str> = translation.words(&skip).collect();
		assert_eq!(words, vec!["uno", "cuatro"]);
	}
}
