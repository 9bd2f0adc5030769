//! The `application/sparql-results+json` SELECT result shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tabular, self-describing SELECT result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectResults {
    /// Declares the variables bound in each row.
    #[serde(default)]
    pub head: Head,
    /// The solution rows.
    #[serde(default)]
    pub results: Rows,
}

/// Result header: the projected variable names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Head {
    /// Variable names, in projection order.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// The `results` member holding the bindings array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rows {
    /// One map per solution, variable name → typed value.
    #[serde(default)]
    pub bindings: Vec<BTreeMap<String, BindingValue>>,
}

/// One bound value: its term kind, lexical form, and optional datatype/lang.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingValue {
    /// `"uri"`, `"literal"`, or `"bnode"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The lexical value.
    pub value: String,
    /// Datatype IRI for typed literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Language tag for language-tagged literals.
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl SelectResults {
    /// Returns the string value bound to `var` in `row`, if present.
    pub fn value<'a>(&'a self, row: usize, var: &str) -> Option<&'a str> {
        self.results
            .bindings
            .get(row)
            .and_then(|b| b.get(var))
            .map(|v| v.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_standard_results_shape() {
        let body = r#"{
            "head": { "vars": ["eventId", "createdAt"] },
            "results": { "bindings": [
                {
                    "eventId": { "type": "literal", "value": "abc" },
                    "createdAt": {
                        "type": "literal",
                        "value": "2026-01-01T00:00:00Z",
                        "datatype": "http://www.w3.org/2001/XMLSchema#dateTime"
                    }
                }
            ] }
        }"#;
        let results: SelectResults = serde_json::from_str(body).expect("should parse");
        assert_eq!(results.head.vars, vec!["eventId", "createdAt"]);
        assert_eq!(results.value(0, "eventId"), Some("abc"));
        assert_eq!(
            results.results.bindings[0]["createdAt"].datatype.as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#dateTime")
        );
        assert_eq!(results.value(0, "missing"), None);
    }

    #[test]
    fn tolerates_an_empty_result_document() {
        let results: SelectResults = serde_json::from_str("{}").expect("should parse");
        assert!(results.results.bindings.is_empty());
    }
}
