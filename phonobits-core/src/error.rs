use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while querying or combining n-gram models.
///
/// Unobserved contexts and targets are the zero-frequency problem: the model
/// applies no smoothing, so they are reported instead of being given a cost.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
	#[error("context {context:?} was never observed during training")]
	UnobservedContext { context: Vec<String> },

	#[error("segment {target:?} was never observed after context {context:?}")]
	UnobservedTarget { context: Vec<String>, target: String },

	#[error("context has {got} segments, model order is {expected}")]
	ContextLength { expected: usize, got: usize },

	#[error("cannot merge models: expected {expected}, got {got}")]
	OrderMismatch { expected: String, got: String },
}

/// Errors raised while loading rule files or translation files.
#[derive(Debug, Error)]
pub enum CorpusError {
	#[error("{}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{0}: expected a name like verses-<iso>-<Edition_Name>.txt")]
	FileName(String),

	#[error("no rules for language code {0:?}")]
	UnknownLanguage(String),

	#[error("{file}:{line}: {message}")]
	Format {
		file: String,
		line: usize,
		message: String,
	},

	#[error("invalid rules file: {0}")]
	Rules(#[from] serde_json::Error),

	#[error(transparent)]
	Model(#[from] ModelError),
}

impl CorpusError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}

	pub(crate) fn format(file: &str, line: usize, message: impl Into<String>) -> Self {
		Self::Format { file: file.to_owned(), line, message: message.into() }
	}
}
