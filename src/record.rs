//! Raw and cleaned record model.
//!
//! Records are flat, ordered field maps. Field order is kept as it arrives so
//! cleaned output lines up column-for-column with the input.

use crate::error::{json_type_name, Error, Result};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Default name of the country-code column in survey exports.
pub const DEFAULT_CODE_FIELD: &str = "Country Code";

/// Default name of the country-name column in survey exports.
pub const DEFAULT_NAME_FIELD: &str = "Country name (from Country)";

/// A scalar value as found in a raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Explicit null.
    Null,
    /// Text, untrimmed.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl RawValue {
    fn from_json(field: &str, value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(RawValue::Null),
            serde_json::Value::Bool(b) => Ok(RawValue::Bool(b)),
            serde_json::Value::Number(n) => Ok(n.as_f64().map_or(RawValue::Null, RawValue::Number)),
            serde_json::Value::String(s) => Ok(RawValue::Text(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(Error::NonScalarField {
                    field: field.to_string(),
                })
            }
        }
    }
}

/// Names of the two country columns in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Field holding the country code.
    pub code_field: String,
    /// Field holding the country display name.
    pub name_field: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            code_field: DEFAULT_CODE_FIELD.to_string(),
            name_field: DEFAULT_NAME_FIELD.to_string(),
        }
    }
}

impl FieldMapping {
    /// Creates a mapping for custom column names.
    ///
    /// The two columns must differ; a shared column would let the display
    /// name overwrite the code.
    pub fn new(code_field: impl Into<String>, name_field: impl Into<String>) -> Result<Self> {
        let code_field = code_field.into();
        let name_field = name_field.into();
        if code_field == name_field {
            return Err(Error::SharedCountryField(code_field));
        }
        Ok(Self {
            code_field,
            name_field,
        })
    }

    /// Returns true if `field` is one of the country columns.
    pub fn is_country_field(&self, field: &str) -> bool {
        field == self.code_field || field == self.name_field
    }
}

/// One input row: field name to scalar value, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing an existing value with the same name.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field, replacing an existing value with the same name.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Looks up a field by name.
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterates over fields in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a record from a JSON object with scalar values.
    ///
    /// # Example
    ///
    /// ```
    /// use countryclean::{RawRecord, RawValue};
    ///
    /// let value = serde_json::json!({ "Country Code": "us", "Goal-Other": 0 });
    /// let record = RawRecord::from_json(value)?;
    /// assert_eq!(record.get("Goal-Other"), Some(&RawValue::Number(0.0)));
    /// # Ok::<(), countryclean::Error>(())
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut fields = Vec::with_capacity(map.len());
                for (field, value) in map {
                    let value = RawValue::from_json(&field, value)?;
                    fields.push((field, value));
                }
                Ok(Self { fields })
            }
            other => Err(Error::NotAnObject(json_type_name(&other))),
        }
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        RawRecord::from_json(value).map_err(de::Error::custom)
    }
}

/// One output row: every field trimmed or null, country pair reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    fields: Vec<(String, Option<String>)>,
    code_index: usize,
    name_index: usize,
}

impl CleanedRecord {
    /// Assembles a cleaned record. Country fields missing from `fields` are appended.
    pub(crate) fn assemble(
        mut fields: Vec<(String, Option<String>)>,
        mapping: &FieldMapping,
        country_code: Option<String>,
        country_name: Option<String>,
    ) -> Self {
        let code_index = place(&mut fields, &mapping.code_field, country_code);
        let name_index = place(&mut fields, &mapping.name_field, country_name);
        Self {
            fields,
            code_index,
            name_index,
        }
    }

    /// Returns the reconciled two-letter country code.
    pub fn country_code(&self) -> Option<&str> {
        self.fields[self.code_index].1.as_deref()
    }

    /// Returns the reconciled country display name.
    pub fn country_name(&self) -> Option<&str> {
        self.fields[self.name_index].1.as_deref()
    }

    /// Looks up a field by name. `None` both for missing and null fields.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Returns true if the record has a field with this name.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    /// Iterates over fields in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn place(fields: &mut Vec<(String, Option<String>)>, field: &str, value: Option<String>) -> usize {
    match fields.iter().position(|(name, _)| name == field) {
        Some(index) => {
            fields[index].1 = value;
            index
        }
        None => {
            fields.push((field.to_string(), value));
            fields.len() - 1
        }
    }
}

impl Serialize for CleanedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_order() {
        let record = RawRecord::from_json(json!({
            "Timestamp": "2024-01-01",
            "Gender": "FEMALE",
            "Country Code": "FR",
        }))
        .unwrap();
        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Timestamp", "Gender", "Country Code"]);
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = RawRecord::from_json(json!({ "Goal": ["a", "b"] })).unwrap_err();
        assert!(matches!(err, Error::NonScalarField { ref field } if field == "Goal"));

        let err = RawRecord::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::NotAnObject("array")));
    }

    #[test]
    fn test_deserialize_records() {
        let records: Vec<RawRecord> =
            serde_json::from_str(r#"[{"Gender": " MALE ", "Source-Other": 3}, {}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Gender"), Some(&RawValue::from(" MALE ")));
        assert_eq!(records[0].get("Source-Other"), Some(&RawValue::Number(3.0)));
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let record = RawRecord::new().with("Gender", "x").with("Gender", "y");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("Gender"), Some(&RawValue::from("y")));
    }

    #[test]
    fn test_cleaned_record_appends_missing_country_fields() {
        let mapping = FieldMapping::default();
        let record = CleanedRecord::assemble(
            vec![("Gender".to_string(), Some("MALE".to_string()))],
            &mapping,
            Some("DE".to_string()),
            Some("Germany".to_string()),
        );
        assert_eq!(record.len(), 3);
        assert_eq!(record.country_code(), Some("DE"));
        assert_eq!(record.country_name(), Some("Germany"));
        assert_eq!(record.get(DEFAULT_NAME_FIELD), Some("Germany"));
    }

    #[test]
    fn test_cleaned_record_serializes_nulls() {
        let mapping = FieldMapping::new("code", "name").unwrap();
        let record = CleanedRecord::assemble(
            vec![
                ("code".to_string(), None),
                ("goal".to_string(), None),
                ("name".to_string(), None),
            ],
            &mapping,
            None,
            None,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "code": null, "goal": null, "name": null }));
    }
}
