use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaxonomyError;

/// A single entry in a SKOS-style controlled vocabulary, with its labels
/// and notes keyed by language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concept {
    pub id: String,
    pub uri: String,
    #[serde(default)]
    pub in_scheme: Vec<String>,
    pub pref_label: HashMap<String, String>,
    #[serde(default)]
    pub alt_label: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub hidden_label: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub definition: HashMap<String, Option<String>>,
    #[serde(default)]
    pub scope_note: HashMap<String, Option<String>>,
    #[serde(default)]
    pub note: HashMap<String, Option<String>>,
    #[serde(default)]
    pub example: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub path: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub broader: Vec<String>,
    #[serde(default)]
    pub narrower: Vec<String>,
    #[serde(default)]
    pub exact_match: Vec<String>,
    #[serde(default)]
    pub close_match: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
}

impl Concept {
    /// The preferred label for `lang`, or an arbitrary one if `lang` is
    /// absent — mirrors the reference service's "any language beats none"
    /// fallback used for embedding rows and autocomplete.
    pub fn pref_label_or_any(&self, lang: &str) -> Option<&str> {
        self.pref_label
            .get(lang)
            .or_else(|| self.pref_label.values().next())
            .map(String::as_str)
    }

    /// Parses one row of a `taxonomy.json` array, applying legacy key
    /// renames (`desc` -> `definition`, `examples` -> `example`) and
    /// broadcasting scalar/list multilingual fields across `langs`.
    pub fn from_row(mut row: Value, langs: &[String]) -> Result<Self, TaxonomyError> {
        let obj = row
            .as_object_mut()
            .ok_or(TaxonomyError::MissingId)?;

        if !obj.contains_key("definition") {
            if let Some(desc) = obj.remove("desc") {
                obj.insert("definition".into(), desc);
            }
        }
        if !obj.contains_key("example") {
            if let Some(examples) = obj.remove("examples") {
                obj.insert("example".into(), examples);
            }
        }

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(TaxonomyError::MissingId)?;
        let uri = obj
            .get("uri")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| id.clone());

        let pref = as_lang_dict(obj.get("prefLabel"), langs, &id, "prefLabel")?;
        let alt = as_lang_dict(obj.get("altLabel"), langs, &id, "altLabel")?;
        let hidden = as_lang_dict(obj.get("hiddenLabel"), langs, &id, "hiddenLabel")?;
        let definition = as_lang_dict(obj.get("definition"), langs, &id, "definition")?;
        let scope_note = as_lang_dict(obj.get("scopeNote"), langs, &id, "scopeNote")?;
        let note = as_lang_dict(obj.get("note"), langs, &id, "note")?;
        let example = as_lang_dict(obj.get("example"), langs, &id, "example")?;
        let path = as_lang_dict(obj.get("path"), langs, &id, "path")?;

        Ok(Concept {
            id,
            uri,
            in_scheme: string_list(obj.get("inScheme")),
            pref_label: pref
                .into_iter()
                .map(|(k, v)| (k, scalar_string(&v)))
                .collect(),
            alt_label: alt.into_iter().map(|(k, v)| (k, to_str_list(v))).collect(),
            hidden_label: hidden
                .into_iter()
                .map(|(k, v)| (k, to_str_list(v)))
                .collect(),
            definition: definition
                .into_iter()
                .map(|(k, v)| (k, scalar_opt_string(&v)))
                .collect(),
            scope_note: scope_note
                .into_iter()
                .map(|(k, v)| (k, scalar_opt_string(&v)))
                .collect(),
            note: note
                .into_iter()
                .map(|(k, v)| (k, scalar_opt_string(&v)))
                .collect(),
            example: example.into_iter().map(|(k, v)| (k, to_str_list(v))).collect(),
            path: path.into_iter().map(|(k, v)| (k, to_str_list(v))).collect(),
            broader: string_list(obj.get("broader")),
            narrower: string_list(obj.get("narrower")),
            exact_match: string_list(obj.get("exactMatch")),
            close_match: string_list(obj.get("closeMatch")),
            related: string_list(obj.get("related")),
        })
    }
}

/// Normalizes a raw multilingual JSON field into `lang -> value`:
/// - `null`/absent -> empty map
/// - an object -> itself, gaps filled with its first value (matching the
///   reference service's `_as_lang_dict`, which assumes a sparse map still
///   carries one canonical value to broadcast)
/// - a list -> the same list broadcast to every language
/// - a scalar -> the same scalar broadcast to every language
fn as_lang_dict(
    value: Option<&Value>,
    langs: &[String],
    _id: &str,
    _field: &'static str,
) -> Result<HashMap<String, Value>, TaxonomyError> {
    let Some(value) = value else {
        return Ok(HashMap::new());
    };
    match value {
        Value::Null => Ok(HashMap::new()),
        Value::Object(map) => {
            if map.is_empty() {
                return Ok(HashMap::new());
            }
            let first = map.values().next().cloned().unwrap_or(Value::Null);
            Ok(langs
                .iter()
                .map(|l| (l.clone(), map.get(l).cloned().unwrap_or_else(|| first.clone())))
                .collect())
        }
        Value::Array(_) | Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(langs
            .iter()
            .map(|l| (l.clone(), value.clone()))
            .collect()),
    }
}

fn scalar_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn scalar_opt_string(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn to_str_list(v: Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().map(scalar_string).collect(),
        Value::Null => Vec::new(),
        other => vec![scalar_string(&other)],
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn langs() -> Vec<String> {
        vec!["es".into(), "en".into()]
    }

    #[test]
    fn scalar_pref_label_broadcasts_to_all_languages() {
        let row = json!({
            "id": "c1",
            "prefLabel": "Chocolate",
        });
        let c = Concept::from_row(row, &langs()).unwrap();
        assert_eq!(c.pref_label.get("es").unwrap(), "Chocolate");
        assert_eq!(c.pref_label.get("en").unwrap(), "Chocolate");
        assert_eq!(c.uri, "c1");
    }

    #[test]
    fn sparse_object_pref_label_fills_gaps_with_first_value() {
        let row = json!({
            "id": "c2",
            "prefLabel": {"es": "Chocolate"},
        });
        let c = Concept::from_row(row, &langs()).unwrap();
        assert_eq!(c.pref_label.get("es").unwrap(), "Chocolate");
        assert_eq!(c.pref_label.get("en").unwrap(), "Chocolate");
    }

    #[test]
    fn legacy_desc_and_examples_keys_are_renamed() {
        let row = json!({
            "id": "c3",
            "prefLabel": "Candy",
            "desc": "Sweet treat",
            "examples": ["bonbon", "truffle"],
        });
        let c = Concept::from_row(row, &langs()).unwrap();
        assert_eq!(c.definition.get("es").unwrap().as_deref(), Some("Sweet treat"));
        assert_eq!(c.example.get("es").unwrap(), &vec!["bonbon".to_string(), "truffle".to_string()]);
    }

    #[test]
    fn missing_id_is_an_error() {
        let row = json!({"prefLabel": "x"});
        assert!(matches!(
            Concept::from_row(row, &langs()),
            Err(TaxonomyError::MissingId)
        ));
    }

    #[test]
    fn empty_string_definition_becomes_none() {
        let row = json!({"id": "c4", "prefLabel": "x", "definition": ""});
        let c = Concept::from_row(row, &langs()).unwrap();
        assert_eq!(c.definition.get("es").unwrap(), &None);
    }
}
