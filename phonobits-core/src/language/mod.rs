//! Per-language segmentation rules.

/// Catalog of rule sets keyed by ISO code.
pub mod catalog;

/// The `LanguageRules` configuration record.
pub mod rules;

pub use catalog::Catalog;
pub use rules::LanguageRules;
