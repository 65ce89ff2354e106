//! Batch cleaning.
//!
//! Runs the field normalizer over every field of every record and the
//! country reconciler over each record's country pair. Output is one-to-one
//! with input: records are never dropped, bad country data becomes `None`.

use crate::aliases::AliasTable;
use crate::clean_options::CleanOptions;
use crate::normalize::normalize;
use crate::reconcile::Reconciler;
use crate::record::{CleanedRecord, RawRecord};
use crate::reference::CountryReference;
use crate::stats::ReconciliationStats;
use serde::Serialize;
use std::collections::HashMap;

/// Cleaned records of one run plus the run's statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanedBatch {
    /// Cleaned records, in input order.
    pub records: Vec<CleanedRecord>,
    /// Counters accumulated over the run.
    pub stats: ReconciliationStats,
}

impl CleanedBatch {
    /// Number of cleaned records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts null values per field, in order of first appearance.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();

        for record in &self.records {
            for (field, value) in record.iter() {
                let slot = *index.entry(field).or_insert_with(|| {
                    counts.push((field.to_string(), 0));
                    counts.len() - 1
                });
                if value.is_none() {
                    counts[slot].1 += 1;
                }
            }
        }

        counts
    }
}

/// Cleans records against shared reference and alias tables.
#[derive(Debug, Clone)]
pub struct BatchCleaner<'a> {
    reconciler: Reconciler<'a>,
    options: CleanOptions,
}

impl<'a> BatchCleaner<'a> {
    /// Creates a cleaner with default options.
    pub fn new(reference: &'a CountryReference, aliases: &'a AliasTable) -> Self {
        Self {
            reconciler: Reconciler::new(reference, aliases),
            options: CleanOptions::default(),
        }
    }

    /// Replaces the cleaning options.
    pub fn with_options(mut self, options: CleanOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the active options.
    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Cleans one record, adding its reconciliation to `stats`.
    pub fn clean_record(&self, raw: &RawRecord, stats: &mut ReconciliationStats) -> CleanedRecord {
        let mapping = &self.options.mapping;

        // Country columns keep their position; `assemble` fills in their values.
        let fields: Vec<(String, Option<String>)> = raw
            .iter()
            .map(|(field, value)| {
                let value = if mapping.is_country_field(field) {
                    None
                } else {
                    normalize(Some(value))
                };
                (field.to_string(), value)
            })
            .collect();

        let raw_code = normalize(raw.get(&mapping.code_field));
        let raw_name = normalize(raw.get(&mapping.name_field));
        let (code, name) = self
            .reconciler
            .reconcile(raw_code.as_deref(), raw_name.as_deref(), stats);

        CleanedRecord::assemble(fields, mapping, code, name)
    }

    /// Cleans a batch with a fresh statistics accumulator.
    ///
    /// # Example
    ///
    /// ```
    /// use countryclean::{AliasTable, BatchCleaner, CountryReference, RawRecord};
    ///
    /// let reference = CountryReference::build();
    /// let aliases = AliasTable::builtin();
    /// let records = vec![
    ///     RawRecord::new().with("Country Code", "gbr").with("Gender", " FEMALE "),
    ///     RawRecord::new().with("Country name (from Country)", "Viet Nam"),
    /// ];
    ///
    /// let batch = BatchCleaner::new(&reference, &aliases).clean_batch(&records);
    /// assert_eq!(batch.records[0].country_name(), Some("United Kingdom"));
    /// assert_eq!(batch.records[1].country_code(), Some("VN"));
    /// assert_eq!(batch.stats.total, 2);
    /// ```
    pub fn clean_batch(&self, records: &[RawRecord]) -> CleanedBatch {
        let batch = if self.options.parallel {
            self.clean_parallel(records)
        } else {
            self.clean_sequential(records)
        };

        tracing::info!(
            total = batch.stats.total,
            code_inferred = batch.stats.code_inferred_from_name,
            name_inferred = batch.stats.name_inferred_from_code,
            corrected = batch.stats.name_corrected_to_canonical,
            aliases = batch.stats.alias_name_resolved,
            three_letter = batch.stats.three_letter_normalized,
            nullified = batch.stats.invalid_code_nullified,
            "cleaned batch"
        );
        batch
    }

    fn clean_sequential(&self, records: &[RawRecord]) -> CleanedBatch {
        let mut stats = ReconciliationStats::new();
        let records = records
            .iter()
            .map(|raw| self.clean_record(raw, &mut stats))
            .collect();
        CleanedBatch { records, stats }
    }

    #[cfg(feature = "parallel")]
    fn clean_parallel(&self, records: &[RawRecord]) -> CleanedBatch {
        use rayon::prelude::*;

        // Each chunk owns its stats; chunks come back in input order
        let chunks: Vec<CleanedBatch> = records
            .par_chunks(self.options.chunk_size.max(1))
            .map(|chunk| self.clean_sequential(chunk))
            .collect();

        let mut batch = CleanedBatch {
            records: Vec::with_capacity(records.len()),
            stats: ReconciliationStats::new(),
        };
        for chunk in chunks {
            batch.records.extend(chunk.records);
            batch.stats += chunk.stats;
        }
        batch
    }

    #[cfg(not(feature = "parallel"))]
    fn clean_parallel(&self, records: &[RawRecord]) -> CleanedBatch {
        self.clean_sequential(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DEFAULT_CODE_FIELD, DEFAULT_NAME_FIELD};

    fn survey_row(code: &str, name: &str) -> RawRecord {
        RawRecord::new()
            .with("Timestamp", "2023-01-05 10:00")
            .with("Gender", "  MALE")
            .with(DEFAULT_CODE_FIELD, code)
            .with("Goal-Other", 0i64)
            .with(DEFAULT_NAME_FIELD, name)
            .with("Voyage Tier", "")
    }

    #[test]
    fn test_empty_batch() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let batch = BatchCleaner::new(&reference, &aliases).clean_batch(&[]);
        assert!(batch.is_empty());
        assert_eq!(batch.stats, ReconciliationStats::default());
    }

    #[test]
    fn test_fields_normalized_and_order_kept() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let cleaner = BatchCleaner::new(&reference, &aliases);
        let batch = cleaner.clean_batch(&[survey_row("can", "")]);

        let record = &batch.records[0];
        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "Timestamp",
                "Gender",
                DEFAULT_CODE_FIELD,
                "Goal-Other",
                DEFAULT_NAME_FIELD,
                "Voyage Tier"
            ]
        );
        assert_eq!(record.get("Gender"), Some("MALE"));
        assert_eq!(record.get("Goal-Other"), Some("0"));
        assert_eq!(record.get("Voyage Tier"), None);
        assert_eq!(record.country_code(), Some("CA"));
        assert_eq!(record.country_name(), Some("Canada"));
        assert_eq!(batch.stats.three_letter_normalized, 1);
        assert_eq!(batch.stats.name_inferred_from_code, 1);
    }

    #[test]
    fn test_country_columns_keep_position_when_nullified() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let cleaner = BatchCleaner::new(&reference, &aliases);
        let batch = cleaner.clean_batch(&[survey_row(" 123 ", " ")]);

        let record = &batch.records[0];
        let fields: Vec<(&str, Option<&str>)> = record.iter().collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[2], (DEFAULT_CODE_FIELD, None));
        assert_eq!(fields[4], (DEFAULT_NAME_FIELD, None));
        assert_eq!(fields[1], ("Gender", Some("MALE")));
        assert_eq!(batch.stats.invalid_code_nullified, 1);
    }

    #[test]
    fn test_missing_country_fields_become_null() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let cleaner = BatchCleaner::new(&reference, &aliases);
        let batch = cleaner.clean_batch(&[RawRecord::new().with("Gender", "FEMALE")]);

        let record = &batch.records[0];
        assert!(record.has_field(DEFAULT_CODE_FIELD));
        assert!(record.has_field(DEFAULT_NAME_FIELD));
        assert_eq!(record.country_code(), None);
        assert_eq!(record.country_name(), None);
        assert_eq!(batch.stats.total, 1);
        assert_eq!(batch.stats.invalid_code_nullified, 0);
    }

    #[test]
    fn test_numeric_country_code() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let cleaner = BatchCleaner::new(&reference, &aliases);
        let raw = RawRecord::new().with(DEFAULT_CODE_FIELD, 44i64);
        let batch = cleaner.clean_batch(&[raw]);
        assert_eq!(batch.records[0].country_code(), None);
        assert_eq!(batch.stats.invalid_code_nullified, 1);
    }

    #[test]
    fn test_custom_field_mapping() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let cleaner = BatchCleaner::new(&reference, &aliases)
            .with_options(CleanOptions::new().with_fields("iso", "country").unwrap());
        let raw = RawRecord::new().with("iso", "").with("country", "Holland");
        let batch = cleaner.clean_batch(&[raw]);
        assert_eq!(batch.records[0].get("iso"), Some("NL"));
        assert_eq!(batch.records[0].get("country"), Some("Netherlands"));
        assert!(!batch.records[0].has_field(DEFAULT_CODE_FIELD));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let pool = [("US", ""), ("", "uk"), ("zz", "Atlantis"), ("DEU", "Germany"), ("123", "")];
        let records: Vec<RawRecord> = (0..1000)
            .map(|i| {
                let (code, name) = pool[i % pool.len()];
                survey_row(code, name)
            })
            .collect();

        let sequential = BatchCleaner::new(&reference, &aliases).clean_batch(&records);
        let parallel = BatchCleaner::new(&reference, &aliases)
            .with_options(CleanOptions::new().parallel().with_chunk_size(100))
            .clean_batch(&records);

        assert_eq!(parallel.len(), records.len());
        assert_eq!(parallel.records, sequential.records);
        assert_eq!(parallel.stats, sequential.stats);
        assert_eq!(parallel.stats.total, 1000);
    }

    #[test]
    fn test_null_counts() {
        let reference = CountryReference::build();
        let aliases = AliasTable::builtin();
        let cleaner = BatchCleaner::new(&reference, &aliases);
        let batch = cleaner.clean_batch(&[survey_row("FR", ""), survey_row("", "")]);

        let counts = batch.null_counts();
        assert_eq!(counts[0], ("Timestamp".to_string(), 0));
        assert!(counts.contains(&("Voyage Tier".to_string(), 2)));
        assert!(counts.contains(&(DEFAULT_CODE_FIELD.to_string(), 1)));
        assert!(counts.contains(&(DEFAULT_NAME_FIELD.to_string(), 1)));
    }
}
