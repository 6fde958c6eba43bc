//! phonobits CLI: information content of phonemic transcriptions.
//!
//! Usage:
//!   phonobits --dir translations stats
//!   phonobits total-bits --max-n 6
//!   phonobits segment spa "Y la muchacha habló"

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use phonobits_core::corpus::{ChapterLayout, Corpus, split_words};
use phonobits_core::report::{self, AnalysisConfig};
use phonobits_core::segment::values;
use phonobits_core::{Catalog, EndOfWord};

#[derive(Parser)]
#[command(name = "phonobits", version, about = "Bits per phonetic segment across translations")]
struct Cli {
	/// Directory holding verses-<iso>-<Edition>.txt files
	#[arg(long, default_value = "translations")]
	dir: PathBuf,

	/// JSON file with extra or replacement language rules
	#[arg(long)]
	rules: Option<PathBuf>,

	/// Model order for single-order reports
	#[arg(short, long, default_value_t = 2)]
	n: usize,

	/// Order sweeps run over 0..max-n
	#[arg(long, default_value_t = 8)]
	max_n: usize,

	/// Treat each verse as one sequence instead of one sequence per word
	#[arg(long)]
	no_word_breaks: bool,

	/// Charge bits for the end of each sequence
	#[arg(long)]
	end_of_word: bool,

	#[arg(short, long)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Word, verse and segment counts with total bits
	Stats,
	/// Segmentation of the first verse of each translation
	Segmentation,
	/// Segment frequencies and bits per segment for each order
	BitsPerSegment,
	/// Total bits and mean branching for each order
	TotalBits,
	/// Distribution of word-initial segments
	FirstSegments,
	/// Mean bits of the segment at each word position
	Positions {
		#[arg(long, default_value_t = 15)]
		max_position: usize,
	},
	/// Bits of the most frequent words
	CommonWords {
		#[arg(long, default_value_t = 10)]
		top: usize,
	},
	/// Segment free text with a language's rules
	Segment {
		/// ISO 639-3 code, e.g. spa
		language: String,
		text: String,
	},
}

impl Cli {
	fn config(&self) -> AnalysisConfig {
		let mut config = AnalysisConfig {
			default_n: self.n,
			max_n: self.max_n,
			word_breaks: !self.no_word_breaks,
			end_of_word: if self.end_of_word { EndOfWord::Costed } else { EndOfWord::Free },
			..AnalysisConfig::default()
		};
		match self.command {
			Commands::Positions { max_position } => config.max_position = max_position,
			Commands::CommonWords { top } => config.top_words = top,
			_ => (),
		}
		config
	}

	fn catalog(&self) -> Result<Catalog> {
		let mut catalog = Catalog::builtin();
		if let Some(path) = &self.rules {
			catalog
				.extend_from_json(path)
				.with_context(|| format!("loading rules from {}", path.display()))?;
		}
		Ok(catalog)
	}
}

fn segment_text(catalog: &Catalog, language: &str, text: &str) -> Result<()> {
	let rules = catalog.require(language)?;
	for word in split_words(text) {
		println!("{:<12} {:?}", word, values(&rules.segment(&word)));
	}
	Ok(())
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let default_level = if cli.verbose { LevelFilter::Info } else { LevelFilter::Warn };
	env_logger::Builder::new()
		.filter_level(default_level)
		.parse_default_env()
		.init();

	let catalog = cli.catalog()?;
	let config = cli.config();

	let corpus = match &cli.command {
		Commands::Segment { language, text } => return segment_text(&catalog, language, text),
		_ => Corpus::load_dir(&cli.dir, &catalog, &ChapterLayout::default())
			.with_context(|| format!("loading translations from {}", cli.dir.display()))?,
	};
	let skip = &corpus.missing;

	match &cli.command {
		Commands::Stats => {
			for translation in &corpus.translations {
				let stats = report::basic_stats(translation, skip, &config)?;
				println!("{}", translation.name());
				println!("{} total words", stats.total_words);
				println!("{} verses", stats.verses);
				println!("{} distinct orthographic words", stats.distinct_words);
				println!("{} total segments", stats.total_segments);
				println!("{:.2} average segments per word", stats.segments_per_word);
				println!("{} distinct segments {:?}", stats.distinct_segments.len(), stats.distinct_segments);
				println!("{} bits", stats.total_bits.round());
				println!();
			}
		}
		Commands::Segmentation => {
			for translation in &corpus.translations {
				println!("{}", translation.name());
				if let Some(sample) = report::segmentation_sample(translation, skip) {
					println!("{}", sample.content);
					println!("{:?}", sample.words);
				}
				println!();
			}
		}
		Commands::BitsPerSegment => {
			for translation in &corpus.translations {
				println!("{}", translation.name());
				let freqs = report::segment_frequencies(translation, skip, config.word_breaks);
				println!("{} distinct segments", freqs.len());
				for (segment, count) in &freqs {
					println!("  {:<4} {:>6}", segment, count);
				}
				for result in report::order_sweep(translation, skip, &config)? {
					println!("  n = {}: {:.2} bits per segment", result.n, result.bits_per_segment());
				}
				println!();
			}
		}
		Commands::TotalBits => {
			for translation in &corpus.translations {
				println!("{}", translation.name());
				for result in report::order_sweep(translation, skip, &config)? {
					println!(
						"  n = {}: {:>8} bits, {:.2} average possible continuations",
						result.n,
						result.total_bits.round(),
						result.mean_branching
					);
				}
				println!();
			}
		}
		Commands::FirstSegments => {
			println!("First segments");
			println!();
			for translation in &corpus.translations {
				println!("{}", translation.name());
				let first = report::first_segments(translation, skip)?;
				for (segment, times, odds) in &first.entries {
					println!("  {:<3} {:>4}  {:.2}%", segment, times, 100.0 * odds);
				}
				println!("Expected bits: {:.2}", first.expected_bits);
			}
			println!();
		}
		Commands::Positions { .. } => {
			println!("Average bits for segment at word position (n = {})", config.default_n);
			for translation in &corpus.translations {
				let averages = report::position_bits(translation, skip, &config)?;
				let cells: Vec<String> = averages.iter().map(|b| format!("{:.2}", b)).collect();
				println!("{:<40} {}", translation.name(), cells.join(" "));
			}
		}
		Commands::CommonWords { .. } => {
			for translation in &corpus.translations {
				println!("{}", translation.name());
				for word in report::common_words(translation, skip, &config)? {
					println!("{:<8} {:>4} {:.2}", word.word, word.count, word.bits);
				}
				println!();
			}
		}
		// answered without a corpus
		Commands::Segment { .. } => (),
	}

	Ok(())
}
