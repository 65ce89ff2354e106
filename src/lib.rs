//! # countryclean
//!
//! Canonicalizes the country identity of loosely structured survey records.
//!
//! Each record carries a country code and a country name that may be missing,
//! conflicting, misspelled, written as an alias ("U.K.", "Burma"), or given as
//! a three-letter code ("DEU"). This crate reconciles the pair into one valid
//! two-letter ISO code and its canonical English display name, normalizes
//! every other field to a trimmed string or null, and keeps statistics on
//! which corrections were made.
//!
//! ## Quick Start
//!
//! ```
//! use countryclean::{build_reference, clean_batch, RawRecord};
//!
//! let reference = build_reference();
//! let records = vec![
//!     RawRecord::new()
//!         .with("Country Code", "USA")
//!         .with("Country name (from Country)", "America"),
//!     RawRecord::new()
//!         .with("Country Code", "")
//!         .with("Country name (from Country)", "Czech Republic"),
//! ];
//!
//! let batch = clean_batch(&records, &reference);
//! assert_eq!(batch.records[0].country_code(), Some("US"));
//! assert_eq!(batch.records[0].country_name(), Some("United States"));
//! assert_eq!(batch.records[1].country_code(), Some("CZ"));
//! println!("{}", batch.stats);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): chunked batch cleaning on the rayon thread pool
//!   via [`CleanOptions::parallel`]

pub mod aliases;
pub mod batch;
pub mod clean_options;
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod record;
pub mod reference;
pub mod stats;

// Re-exports
pub use aliases::AliasTable;
pub use batch::{BatchCleaner, CleanedBatch};
pub use clean_options::CleanOptions;
pub use error::{Error, Result};
pub use normalize::{normalize, normalize_str, simplify_name};
pub use reconcile::{reconcile, NameResolution, Reconciler, ResolutionPath};
pub use record::{CleanedRecord, FieldMapping, RawRecord, RawValue};
pub use reference::{
    CountryNameProvider, CountryReference, CustomTable, FallbackTable, LocaleRegionNames,
    ReferenceSource,
};
pub use stats::ReconciliationStats;

use std::sync::LazyLock;

static BUILTIN_ALIASES: LazyLock<AliasTable> = LazyLock::new(AliasTable::builtin);

/// Builds the country reference from the bundled locale data.
///
/// Falls back to a small table of major countries if no locale data is
/// available; never fails. Build it once and reuse it across batches.
pub fn build_reference() -> CountryReference {
    CountryReference::build()
}

/// Cleans a batch of records with the built-in alias tables and default options.
///
/// Output has exactly one cleaned record per input record, in input order.
pub fn clean_batch(records: &[RawRecord], reference: &CountryReference) -> CleanedBatch {
    BatchCleaner::new(reference, &BUILTIN_ALIASES).clean_batch(records)
}

/// Cleans a batch with the built-in alias tables and custom options.
pub fn clean_batch_with_options(
    records: &[RawRecord],
    reference: &CountryReference,
    options: &CleanOptions,
) -> CleanedBatch {
    BatchCleaner::new(reference, &BUILTIN_ALIASES)
        .with_options(options.clone())
        .clean_batch(records)
}
