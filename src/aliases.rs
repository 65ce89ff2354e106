//! Alias tables.
//!
//! Static equivalences that the reference data does not cover on its own:
//! ISO alpha-3 codes, and informal, former, or punctuated country names.
//! Targets are not guaranteed to exist in every [`CountryReference`], so
//! the reconciler must tolerate codes the reference does not know.
//!
//! [`CountryReference`]: crate::CountryReference

use std::collections::HashMap;

/// Alpha-3 code to alpha-2 code.
const THREE_LETTER_CODES: &[(&str, &str)] = &[
    ("USA", "US"),
    ("GBR", "GB"),
    ("DEU", "DE"),
    ("FRA", "FR"),
    ("ITA", "IT"),
    ("ESP", "ES"),
    ("NLD", "NL"),
    ("SWE", "SE"),
    ("NOR", "NO"),
    ("DNK", "DK"),
    ("FIN", "FI"),
    ("POL", "PL"),
    ("RUS", "RU"),
    ("CHN", "CN"),
    ("JPN", "JP"),
    ("KOR", "KR"),
    ("BRA", "BR"),
    ("MEX", "MX"),
    ("CAN", "CA"),
    ("AUS", "AU"),
    ("NZL", "NZ"),
    ("IND", "IN"),
    ("IRN", "IR"),
    ("TUR", "TR"),
    ("EGY", "EG"),
    ("ZAF", "ZA"),
    ("ARE", "AE"),
    ("PAK", "PK"),
    ("BGD", "BD"),
    ("IDN", "ID"),
    ("VNM", "VN"),
    ("THA", "TH"),
    ("MYS", "MY"),
    ("PHL", "PH"),
    ("SGP", "SG"),
    ("HKG", "HK"),
    ("TWN", "TW"),
    ("IRL", "IE"),
    ("PRT", "PT"),
    ("CHE", "CH"),
    ("AUT", "AT"),
    ("BEL", "BE"),
    ("ARG", "AR"),
    ("COL", "CO"),
    ("CHL", "CL"),
    ("PER", "PE"),
    ("NGA", "NG"),
    ("KEN", "KE"),
    ("GHA", "GH"),
    ("ISR", "IL"),
    ("SAU", "SA"),
    ("UKR", "UA"),
    ("ROU", "RO"),
    ("GRC", "GR"),
    ("CZE", "CZ"),
    ("HUN", "HU"),
];

/// Lowercased name variant to alpha-2 code.
const NAME_ALIASES: &[(&str, &str)] = &[
    // United States
    ("usa", "US"),
    ("u.s.a.", "US"),
    ("u.s.", "US"),
    ("us", "US"),
    ("united states of america", "US"),
    ("united states", "US"),
    // United Kingdom
    ("uk", "GB"),
    ("u.k.", "GB"),
    ("great britain", "GB"),
    ("britain", "GB"),
    ("england", "GB"),
    ("scotland", "GB"),
    ("wales", "GB"),
    ("united kingdom", "GB"),
    // Korea
    ("south korea", "KR"),
    ("korea, republic of", "KR"),
    ("republic of korea", "KR"),
    ("korea", "KR"),
    // Russia
    ("russian federation", "RU"),
    ("russia", "RU"),
    // Netherlands
    ("the netherlands", "NL"),
    ("netherlands", "NL"),
    ("holland", "NL"),
    // Ivory Coast
    ("cote d'ivoire", "CI"),
    ("côte d’ivoire", "CI"),
    ("ivory coast", "CI"),
    // Czechia
    ("czech republic", "CZ"),
    ("czechia", "CZ"),
    // Myanmar
    ("burma", "MM"),
    ("myanmar", "MM"),
    // Former and formal names
    ("turkey", "TR"),
    ("swaziland", "SZ"),
    ("macedonia", "MK"),
    ("cabo verde", "CV"),
    ("east timor", "TL"),
    ("vatican", "VA"),
    ("holy see", "VA"),
    ("brunei darussalam", "BN"),
    ("lao people's democratic republic", "LA"),
    ("democratic republic of the congo", "CD"),
    ("dr congo", "CD"),
    ("republic of the congo", "CG"),
    ("hong kong", "HK"),
    ("macau", "MO"),
    ("macao", "MO"),
    ("palestine", "PS"),
    ("uae", "AE"),
    ("u.a.e.", "AE"),
    // Ampersand spellings written out
    ("bosnia and herzegovina", "BA"),
    ("trinidad and tobago", "TT"),
    ("antigua and barbuda", "AG"),
    ("saint kitts and nevis", "KN"),
    ("saint lucia", "LC"),
    ("saint vincent and the grenadines", "VC"),
    ("sao tome and principe", "ST"),
    // Others common
    ("laos", "LA"),
    ("viet nam", "VN"),
    ("venezuela (bolivarian republic of)", "VE"),
    ("moldova, republic of", "MD"),
    ("iran, islamic republic of", "IR"),
    ("syrian arab republic", "SY"),
    ("tanzania, united republic of", "TZ"),
    ("bolivia (plurinational state of)", "BO"),
];

/// Three-letter code and name alias lookups.
#[derive(Debug, Clone)]
pub struct AliasTable {
    three_letter_to_two_letter: HashMap<String, String>,
    name_alias_to_code: HashMap<String, String>,
}

impl AliasTable {
    /// Loads the built-in tables.
    pub fn builtin() -> Self {
        Self {
            three_letter_to_two_letter: to_map(THREE_LETTER_CODES),
            name_alias_to_code: to_map(NAME_ALIASES),
        }
    }

    /// Creates a table with no entries.
    pub fn empty() -> Self {
        Self {
            three_letter_to_two_letter: HashMap::new(),
            name_alias_to_code: HashMap::new(),
        }
    }

    /// Adds a name alias. The alias is stored lowercased.
    pub fn with_name_alias(mut self, alias: &str, code: &str) -> Self {
        self.name_alias_to_code
            .insert(alias.to_lowercase(), code.to_uppercase());
        self
    }

    /// Adds a three-letter code. The code is stored uppercased.
    pub fn with_three_letter(mut self, alpha3: &str, code: &str) -> Self {
        self.three_letter_to_two_letter
            .insert(alpha3.to_uppercase(), code.to_uppercase());
        self
    }

    /// Maps an uppercase three-letter code to its two-letter equivalent.
    pub fn two_letter_for(&self, alpha3: &str) -> Option<&str> {
        self.three_letter_to_two_letter
            .get(alpha3)
            .map(String::as_str)
    }

    /// Looks up an already lowercased name alias.
    pub fn code_for_alias(&self, lowercase_name: &str) -> Option<&str> {
        self.name_alias_to_code
            .get(lowercase_name)
            .map(String::as_str)
    }

    /// Number of three-letter entries.
    pub fn three_letter_len(&self) -> usize {
        self.three_letter_to_two_letter.len()
    }

    /// Number of name alias entries.
    pub fn name_alias_len(&self) -> usize {
        self.name_alias_to_code.len()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(key, code)| (key.to_string(), code.to_string()))
        .collect()
}
