//! JSON document layouts accepted by the CLI.
//!
//! Records arrive either as a bare array or as an array nested under one key
//! of a top-level object (`{"chingus": [...]}` in the survey export). The
//! cleaned output is written back in the same layout.

use countryclean::{CleanedRecord, RawRecord};
use serde_json::{Map, Value};
use std::error::Error;

/// Where the records sit inside the document.
#[derive(Debug)]
enum Layout {
    Array,
    Keyed { root: Map<String, Value>, key: String },
}

/// A parsed input document.
#[derive(Debug)]
pub struct Document {
    layout: Layout,
    pub records: Vec<RawRecord>,
}

impl Document {
    /// Parses a document, looking for records under `key` when the root is an object.
    pub fn parse(json: &str, key: &str) -> Result<Self, Box<dyn Error>> {
        let root: Value = serde_json::from_str(json)?;

        let (layout, items) = match root {
            Value::Array(items) => (Layout::Array, items),
            Value::Object(mut root) => match root.remove(key) {
                Some(Value::Array(items)) => (
                    Layout::Keyed {
                        root,
                        key: key.to_string(),
                    },
                    items,
                ),
                Some(_) => return Err(format!("'{}' is not an array of records", key).into()),
                None => return Err(format!("no '{}' array in input object", key).into()),
            },
            _ => return Err("input must be a JSON array or object".into()),
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| RawRecord::from_json(item).map_err(|e| format!("record {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { layout, records })
    }

    /// Renders cleaned records in the input's layout.
    pub fn render(self, cleaned: &[CleanedRecord], compact: bool) -> Result<String, Box<dyn Error>> {
        let records = serde_json::to_value(cleaned)?;
        let value = match self.layout {
            Layout::Array => records,
            Layout::Keyed { mut root, key } => {
                root.insert(key, records);
                Value::Object(root)
            }
        };

        let json = if compact {
            serde_json::to_string(&value)?
        } else {
            serde_json::to_string_pretty(&value)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countryclean::{build_reference, clean_batch};

    #[test]
    fn test_parse_array() {
        let doc = Document::parse(r#"[{"Country Code": "US"}, {}]"#, "chingus").unwrap();
        assert_eq!(doc.records.len(), 2);
    }

    #[test]
    fn test_parse_keyed_and_render() {
        let json = r#"{"meta": 1, "chingus": [{"Country Code": "usa", "Gender": " "}]}"#;
        let doc = Document::parse(json, "chingus").unwrap();
        let batch = clean_batch(&doc.records, &build_reference());

        let out: Value = serde_json::from_str(&doc.render(&batch.records, true).unwrap()).unwrap();
        assert_eq!(out["meta"], 1);
        assert_eq!(out["chingus"][0]["Country Code"], "US");
        assert_eq!(out["chingus"][0]["Gender"], Value::Null);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Document::parse(r#"{"rows": []}"#, "chingus").is_err());
        assert!(Document::parse(r#"{"chingus": 3}"#, "chingus").is_err());
        assert!(Document::parse("42", "chingus").is_err());

        let err = Document::parse(r#"[{"a": 1}, {"b": [1]}]"#, "chingus").unwrap_err();
        assert!(err.to_string().starts_with("record 1"));
    }
}
