//! Country reconciliation.
//!
//! Turns one record's raw country code and raw country name into a single
//! consistent `(code, name)` pair. The steps run in a fixed order:
//!
//! 1. **Code normalization** - trim, uppercase, map alpha-3, strip non-letters,
//!    keep only two-letter results
//! 2. **Name resolution** - alias table, then canonical names, then the
//!    diacritic-stripped form against the alias table
//! 3. **Reconciliation** - a known code wins; otherwise the name supplies the
//!    code; otherwise the code is dropped
//! 4. **Backfill** - a known code with no name gets its canonical name
//! 5. **Final consistency** - any name left disagreeing with its code is
//!    replaced by the canonical name
//!
//! Every input yields a result; malformed data degrades to `None`.

use crate::aliases::AliasTable;
use crate::normalize::{normalize_str, simplify_name};
use crate::reference::{is_two_letter_code, CountryReference};
use crate::stats::ReconciliationStats;
use regex::Regex;
use std::sync::LazyLock;

static RE_NON_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Z]").unwrap());

/// How a free-text name was matched to a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Exact (case-insensitive) alias match.
    Alias,
    /// Exact (case-insensitive) canonical name match.
    Canonical,
    /// Alias match after stripping diacritics and normalizing quotes.
    SimplifiedAlias,
    /// No match.
    Unresolved,
}

impl ResolutionPath {
    /// Returns true for the two alias paths.
    pub fn is_alias(self) -> bool {
        matches!(self, ResolutionPath::Alias | ResolutionPath::SimplifiedAlias)
    }
}

/// Outcome of resolving a free-text name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolution {
    /// Candidate code, if the name was recognized.
    pub code: Option<String>,
    /// Canonical name for the candidate, or the trimmed input when the
    /// reference has no entry for it.
    pub display: Option<String>,
    /// Which lookup produced the candidate.
    pub via: ResolutionPath,
}

impl NameResolution {
    fn unresolved(display: Option<String>) -> Self {
        Self {
            code: None,
            display,
            via: ResolutionPath::Unresolved,
        }
    }
}

/// Reconciles country pairs against one reference and alias table.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    reference: &'a CountryReference,
    aliases: &'a AliasTable,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler over shared, read-only tables.
    pub fn new(reference: &'a CountryReference, aliases: &'a AliasTable) -> Self {
        Self { reference, aliases }
    }

    /// Step 1: normalizes a raw code to two uppercase letters, or `None`.
    pub fn normalize_code(&self, raw: &str, stats: &mut ReconciliationStats) -> Option<String> {
        let mut code = raw.trim().to_uppercase();

        if code.chars().count() == 3 {
            if let Some(two) = self.aliases.two_letter_for(&code) {
                code = two.to_string();
                stats.three_letter_normalized += 1;
            }
        }

        // "U.S." -> "US"
        let code = RE_NON_LETTER.replace_all(&code, "");
        if is_two_letter_code(&code) {
            Some(code.into_owned())
        } else {
            None
        }
    }

    /// Step 2: matches a free-text name to a candidate code.
    ///
    /// An alias that is spelled exactly like the reference's canonical name
    /// for its target counts as a canonical match.
    pub fn resolve_name(&self, raw: &str) -> NameResolution {
        let Some(trimmed) = normalize_str(raw) else {
            return NameResolution::unresolved(None);
        };
        let lower = trimmed.to_lowercase();

        if let Some(code) = self.aliases.code_for_alias(&lower) {
            return self.resolved(code, &trimmed, &lower, ResolutionPath::Alias);
        }

        if let Some(code) = self.reference.code_for(&lower) {
            return self.resolved(code, &trimmed, &lower, ResolutionPath::Canonical);
        }

        if let Some(code) = self.aliases.code_for_alias(&simplify_name(&lower)) {
            return self.resolved(code, &trimmed, &lower, ResolutionPath::SimplifiedAlias);
        }

        NameResolution::unresolved(Some(trimmed))
    }

    fn resolved(&self, code: &str, trimmed: &str, lower: &str, via: ResolutionPath) -> NameResolution {
        match self.reference.name_for(code) {
            Some(canonical) => {
                let via = if via.is_alias() && canonical.to_lowercase() == lower {
                    ResolutionPath::Canonical
                } else {
                    via
                };
                NameResolution {
                    code: Some(code.to_string()),
                    display: Some(canonical.to_string()),
                    via,
                }
            }
            None => NameResolution {
                code: Some(code.to_string()),
                display: Some(trimmed.to_string()),
                via,
            },
        }
    }

    /// Reconciles one record's country pair, updating `stats`.
    ///
    /// # Example
    ///
    /// ```
    /// use countryclean::{AliasTable, CountryReference, Reconciler, ReconciliationStats};
    ///
    /// let reference = CountryReference::build();
    /// let aliases = AliasTable::builtin();
    /// let mut stats = ReconciliationStats::new();
    ///
    /// let reconciler = Reconciler::new(&reference, &aliases);
    /// let (code, name) = reconciler.reconcile(Some("USA"), None, &mut stats);
    /// assert_eq!(code.as_deref(), Some("US"));
    /// assert_eq!(name.as_deref(), Some("United States"));
    /// assert_eq!(stats.three_letter_normalized, 1);
    /// ```
    pub fn reconcile(
        &self,
        raw_code: Option<&str>,
        raw_name: Option<&str>,
        stats: &mut ReconciliationStats,
    ) -> (Option<String>, Option<String>) {
        stats.total += 1;

        let code_supplied = raw_code.is_some_and(|c| !c.trim().is_empty());
        let mut code = raw_code.and_then(|c| self.normalize_code(c, stats));
        let mut name = raw_name.and_then(normalize_str);

        let known = code.as_deref().and_then(|c| self.reference.name_for(c));
        match known {
            // Known code: it wins over whatever the name says
            Some(canonical) => {
                if name
                    .as_deref()
                    .is_some_and(|current| !eq_ignore_case(current, canonical))
                {
                    name = Some(canonical.to_string());
                    stats.name_corrected_to_canonical += 1;
                }
            }
            None => {
                let resolution = match name.as_deref() {
                    Some(n) => self.resolve_name(n),
                    None => NameResolution::unresolved(None),
                };

                match resolution.code {
                    Some(candidate) => {
                        if !self.reference.contains_code(&candidate) {
                            tracing::debug!(
                                code = %candidate,
                                name = ?resolution.display,
                                "alias target has no reference entry, keeping raw name"
                            );
                        }
                        code = Some(candidate);
                        name = resolution.display;
                        stats.code_inferred_from_name += 1;
                        if resolution.via.is_alias() {
                            stats.alias_name_resolved += 1;
                        }
                    }
                    None => {
                        if code_supplied {
                            stats.invalid_code_nullified += 1;
                        }
                        code = None;
                    }
                }
            }
        }

        if name.is_none() {
            if let Some(canonical) = code.as_deref().and_then(|c| self.reference.name_for(c)) {
                name = Some(canonical.to_string());
                stats.name_inferred_from_code += 1;
            }
        }

        let mismatch = match (code.as_deref(), name.as_deref()) {
            (Some(c), Some(current)) => self
                .reference
                .name_for(c)
                .filter(|canonical| !eq_ignore_case(current, canonical)),
            _ => None,
        };
        if let Some(canonical) = mismatch {
            name = Some(canonical.to_string());
            stats.name_corrected_to_canonical += 1;
        }

        (code, name)
    }
}

/// Reconciles one country pair. See [`Reconciler::reconcile`].
pub fn reconcile(
    raw_code: Option<&str>,
    raw_name: Option<&str>,
    reference: &CountryReference,
    aliases: &AliasTable,
    stats: &mut ReconciliationStats,
) -> (Option<String>, Option<String>) {
    Reconciler::new(reference, aliases).reconcile(raw_code, raw_name, stats)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
