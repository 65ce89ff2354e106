//! Country reference data.
//!
//! A [`CountryReference`] is the ground truth the reconciler checks against:
//! two-letter code to canonical English name, and the reverse lookup from
//! lowercased name to code. It is built once from a [`CountryNameProvider`]
//! and never mutated afterwards.

mod regions;

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

static RE_TWO_LETTER_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// Returns true if `code` is exactly two uppercase ASCII letters.
pub(crate) fn is_two_letter_code(code: &str) -> bool {
    RE_TWO_LETTER_CODE.is_match(code)
}

/// Where a reference's names came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Full region-naming data.
    Locale,
    /// The hardcoded table of major countries.
    Fallback,
    /// Names supplied by the caller.
    Custom,
}

impl fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceSource::Locale => write!(f, "locale"),
            ReferenceSource::Fallback => write!(f, "fallback"),
            ReferenceSource::Custom => write!(f, "custom"),
        }
    }
}

/// Source of canonical English country display names.
pub trait CountryNameProvider {
    /// Returns the display name for a two-letter code, or `None` if the
    /// provider does not recognize it.
    fn display_name(&self, code: &str) -> Option<String>;

    /// Returns false if the provider has no data at all on this platform.
    fn is_available(&self) -> bool {
        true
    }

    /// Which kind of source this provider represents.
    fn source(&self) -> ReferenceSource;
}

/// Region names from the bundled English locale data.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleRegionNames;

impl CountryNameProvider for LocaleRegionNames {
    fn display_name(&self, code: &str) -> Option<String> {
        lookup(regions::REGION_NAMES, code)
    }

    fn source(&self) -> ReferenceSource {
        ReferenceSource::Locale
    }
}

/// The small built-in table of major countries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTable;

impl FallbackTable {
    /// Iterates over the table in declaration order.
    pub fn entries() -> impl Iterator<Item = (&'static str, &'static str)> {
        regions::FALLBACK_NAMES.iter().copied()
    }
}

impl CountryNameProvider for FallbackTable {
    fn display_name(&self, code: &str) -> Option<String> {
        regions::FALLBACK_NAMES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| name.to_string())
    }

    fn source(&self) -> ReferenceSource {
        ReferenceSource::Fallback
    }
}

/// Names supplied by the caller, e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct CustomTable {
    names: HashMap<String, String>,
}

impl CustomTable {
    /// Builds a table from code/name pairs.
    ///
    /// Codes must be two uppercase ASCII letters.
    pub fn from_pairs<I, C, N>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let mut names = HashMap::new();
        for (code, name) in pairs {
            let code = code.into();
            if !is_two_letter_code(&code) {
                return Err(Error::InvalidCountryCode(code));
            }
            names.insert(code, name.into());
        }
        Ok(Self { names })
    }

    /// Parses a JSON object mapping codes to names, e.g. `{"US": "United States"}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let names: BTreeMap<String, String> = serde_json::from_str(json)?;
        Self::from_pairs(names)
    }
}

impl CountryNameProvider for CustomTable {
    fn display_name(&self, code: &str) -> Option<String> {
        self.names.get(code).cloned()
    }

    fn is_available(&self) -> bool {
        !self.names.is_empty()
    }

    fn source(&self) -> ReferenceSource {
        ReferenceSource::Custom
    }
}

fn lookup(table: &[(&str, &str)], code: &str) -> Option<String> {
    table
        .binary_search_by(|(c, _)| (*c).cmp(code))
        .ok()
        .map(|i| table[i].1.to_string())
}

/// Bidirectional code/name mapping used as ground truth.
#[derive(Debug, Clone)]
pub struct CountryReference {
    code_to_name: BTreeMap<String, String>,
    name_to_code: HashMap<String, String>,
    source: ReferenceSource,
}

impl CountryReference {
    /// Builds the reference from the bundled locale data.
    pub fn build() -> Self {
        Self::build_with(&LocaleRegionNames)
    }

    /// Builds the reference from the fallback table only.
    pub fn fallback() -> Self {
        let mut reference = Self::empty(ReferenceSource::Fallback);
        for (code, name) in FallbackTable::entries() {
            reference.insert(code.to_string(), name.to_string());
        }
        reference
    }

    /// Builds the reference by asking `provider` about every code `AA..=ZZ`.
    ///
    /// Falls back to [`FallbackTable`] if the provider is unavailable or
    /// recognizes no code at all.
    pub fn build_with(provider: &dyn CountryNameProvider) -> Self {
        if !provider.is_available() {
            tracing::warn!(source = %provider.source(), "country name provider unavailable, using fallback table");
            return Self::fallback();
        }

        let mut reference = Self::empty(provider.source());
        for first in b'A'..=b'Z' {
            for second in b'A'..=b'Z' {
                let code: String = [first as char, second as char].iter().collect();
                if let Some(name) = provider.display_name(&code) {
                    reference.insert(code, name);
                }
            }
        }

        if reference.is_empty() {
            tracing::warn!(source = %provider.source(), "country name provider returned no codes, using fallback table");
            return Self::fallback();
        }

        tracing::debug!(source = %reference.source, codes = reference.len(), "built country reference");
        reference
    }

    /// Builds a custom reference from code/name pairs.
    ///
    /// ```
    /// use countryclean::{CountryReference, ReferenceSource};
    ///
    /// let reference = CountryReference::from_pairs([("NZ", "Aotearoa")]).unwrap();
    /// assert_eq!(reference.code_for("aotearoa"), Some("NZ"));
    /// assert_eq!(reference.source(), ReferenceSource::Custom);
    /// ```
    pub fn from_pairs<I, C, N>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        Ok(Self::build_with(&CustomTable::from_pairs(pairs)?))
    }

    fn empty(source: ReferenceSource) -> Self {
        Self {
            code_to_name: BTreeMap::new(),
            name_to_code: HashMap::new(),
            source,
        }
    }

    // A later code with the same lowercased name overwrites the earlier one.
    fn insert(&mut self, code: String, name: String) {
        self.name_to_code.insert(name.to_lowercase(), code.clone());
        self.code_to_name.insert(code, name);
    }

    /// Returns the canonical name for a code.
    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.code_to_name.get(code).map(String::as_str)
    }

    /// Returns the code for a canonical name, matched case-insensitively.
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.name_to_code
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Returns true if the code has a canonical name.
    pub fn contains_code(&self, code: &str) -> bool {
        self.code_to_name.contains_key(code)
    }

    /// Iterates over `(code, name)` pairs sorted by code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.code_to_name
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Iterates over known codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.code_to_name.keys().map(String::as_str)
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.code_to_name.len()
    }

    /// Returns true if no code is known.
    pub fn is_empty(&self) -> bool {
        self.code_to_name.is_empty()
    }

    /// Which provider the names came from.
    pub fn source(&self) -> ReferenceSource {
        self.source
    }
}

impl Default for CountryReference {
    fn default() -> Self {
        Self::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLocaleData;

    impl CountryNameProvider for NoLocaleData {
        fn display_name(&self, _code: &str) -> Option<String> {
            None
        }

        fn source(&self) -> ReferenceSource {
            ReferenceSource::Locale
        }
    }

    struct Unavailable;

    impl CountryNameProvider for Unavailable {
        fn display_name(&self, _code: &str) -> Option<String> {
            Some("should not be asked".to_string())
        }

        fn is_available(&self) -> bool {
            false
        }

        fn source(&self) -> ReferenceSource {
            ReferenceSource::Locale
        }
    }

    /// Two codes sharing one display name.
    struct Colliding;

    impl CountryNameProvider for Colliding {
        fn display_name(&self, code: &str) -> Option<String> {
            match code {
                "AB" | "XY" => Some("Twin Land".to_string()),
                _ => None,
            }
        }

        fn source(&self) -> ReferenceSource {
            ReferenceSource::Custom
        }
    }

    #[test]
    fn test_locale_table_sorted() {
        let codes: Vec<&str> = regions::REGION_NAMES.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(codes, sorted);
        assert!(codes.iter().all(|c| is_two_letter_code(c)));
    }

    #[test]
    fn test_build_locale() {
        let reference = CountryReference::build();
        assert_eq!(reference.source(), ReferenceSource::Locale);
        assert_eq!(reference.len(), regions::REGION_NAMES.len());
        assert_eq!(reference.name_for("US"), Some("United States"));
        assert_eq!(reference.name_for("CI"), Some("Côte d’Ivoire"));
        assert_eq!(reference.code_for("GERMANY"), Some("DE"));
        assert_eq!(reference.code_for("côte d’ivoire"), Some("CI"));
        assert!(!reference.contains_code("AA"));
    }

    #[test]
    fn test_reference_is_consistent() {
        let reference = CountryReference::build();
        for (code, name) in reference.iter() {
            assert_eq!(reference.code_for(name), Some(code));
        }
    }

    #[test]
    fn test_fallback_when_provider_empty() {
        let reference = CountryReference::build_with(&NoLocaleData);
        assert_eq!(reference.source(), ReferenceSource::Fallback);
        assert_eq!(reference.len(), 22);
        for code in [
            "US", "GB", "CA", "AU", "DE", "FR", "IT", "ES", "NL", "SE", "NO", "DK", "FI", "PL",
            "BR", "MX", "IN", "CN", "JP", "KR", "RU", "ZA",
        ] {
            assert!(reference.contains_code(code), "missing {}", code);
        }
        assert_eq!(reference.name_for("KR"), Some("South Korea"));
    }

    #[test]
    fn test_fallback_when_provider_unavailable() {
        let reference = CountryReference::build_with(&Unavailable);
        assert_eq!(reference.source(), ReferenceSource::Fallback);
        assert!(!reference.is_empty());
    }

    #[test]
    fn test_name_collision_last_wins() {
        let reference = CountryReference::build_with(&Colliding);
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.code_for("twin land"), Some("XY"));
        assert_eq!(reference.name_for("AB"), Some("Twin Land"));
    }

    #[test]
    fn test_custom_table() {
        let table = CustomTable::from_json_str(r#"{"US": "USA!", "FR": "France"}"#).unwrap();
        let reference = CountryReference::build_with(&table);
        assert_eq!(reference.source(), ReferenceSource::Custom);
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.name_for("US"), Some("USA!"));
    }

    #[test]
    fn test_reference_from_pairs() {
        let reference =
            CountryReference::from_pairs([("GB", "Britain"), ("IE", "Ireland")]).unwrap();
        assert_eq!(reference.source(), ReferenceSource::Custom);
        assert_eq!(reference.code_for("BRITAIN"), Some("GB"));
        assert!(!reference.contains_code("US"));

        let err = CountryReference::from_pairs([("G1", "Nowhere")]).unwrap_err();
        assert!(matches!(err, Error::InvalidCountryCode(ref c) if c == "G1"));
    }

    #[test]
    fn test_custom_table_rejects_bad_codes() {
        let err = CustomTable::from_json_str(r#"{"usa": "United States"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCountryCode(ref c) if c == "usa"));

        let err = CustomTable::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_empty_custom_table_falls_back() {
        let table = CustomTable::from_pairs(Vec::<(String, String)>::new()).unwrap();
        let reference = CountryReference::build_with(&table);
        assert_eq!(reference.source(), ReferenceSource::Fallback);
    }
}
