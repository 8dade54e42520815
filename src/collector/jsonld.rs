//! Structured-data extraction from JSON-LD value trees.
//!
//! One generic walk over the parsed value tree serves both extractions:
//! `@type` names and `sameAs` reference presence.

use serde_json::Value;
use std::collections::BTreeSet;

/// Facts gathered from the JSON-LD blocks of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonLdFacts {
    /// Every type name found under an `@type` key, duplicates collapsed.
    pub types: BTreeSet<String>,
    /// Whether any block carries a `sameAs` key.
    pub same_as_present: bool,
}

/// Walks a value tree depth-first, calling `visit` for every object
/// key/value pair.
fn walk_entries<F>(node: &Value, visit: &mut F)
where
    F: FnMut(&str, &Value),
{
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                visit(key, value);
                walk_entries(value, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_entries(item, visit);
            }
        }
        _ => {}
    }
}

/// Collects type names and `sameAs` presence from parsed JSON-LD blocks.
pub fn collect_facts(blocks: &[Value]) -> JsonLdFacts {
    let mut facts = JsonLdFacts::default();

    for block in blocks {
        walk_entries(block, &mut |key, value| match key {
            "@type" => match value {
                Value::String(name) => {
                    facts.types.insert(name.clone());
                }
                Value::Array(names) => {
                    for name in names.iter().filter_map(Value::as_str) {
                        facts.types.insert(name.to_string());
                    }
                }
                _ => {}
            },
            "sameAs" => facts.same_as_present = true,
            _ => {}
        });
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_nested_types() {
        let block = json!({
            "@type": "Organization",
            "member": {
                "@type": ["Person", "Author"],
                "affiliation": { "@type": "Organization" }
            }
        });

        let facts = collect_facts(&[block]);
        let types: Vec<&str> = facts.types.iter().map(String::as_str).collect();
        assert_eq!(types, vec!["Author", "Organization", "Person"]);
    }

    #[test]
    fn test_detects_same_as_anywhere() {
        let block = json!({
            "@type": "WebPage",
            "publisher": {
                "sameAs": ["https://twitter.com/example"]
            }
        });

        let facts = collect_facts(&[block]);
        assert!(facts.same_as_present);
    }

    #[test]
    fn test_ignores_non_string_types() {
        let block = json!({ "@type": 42, "items": [{ "@type": ["HowTo", 7] }] });

        let facts = collect_facts(&[block]);
        assert_eq!(facts.types.len(), 1);
        assert!(facts.types.contains("HowTo"));
        assert!(!facts.same_as_present);
    }

    #[test]
    fn test_empty_input() {
        let facts = collect_facts(&[]);
        assert!(facts.types.is_empty());
        assert!(!facts.same_as_present);
    }
}
