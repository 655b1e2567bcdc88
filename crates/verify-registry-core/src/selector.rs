//! Selector construction and evaluation.
//!
//! A [`Selector`] is an equality conjunction over one record type and at
//! most [`MAX_EXTRA_PREDICATES`] further fields. It renders to the ledger's
//! rich-query text:
//!
//! ```text
//! {"selector":{"Type":"Document","hash":"..."}}
//! ```
//!
//! Field names and values are always JSON-escaped, never interpolated raw.
//! Stores parse that text back into a [`SelectorQuery`] to filter records.

use std::fmt;

use serde_json::Value;

use crate::error::{CoreError, ValidationError};
use crate::record::fields;
use crate::types::RecordType;
use crate::validation::{validate_selector_value, DEFAULT_MAX_VALUE_LEN};

/// Maximum number of equality predicates besides the record type.
pub const MAX_EXTRA_PREDICATES: usize = 2;

/// One `field == value` condition.
#[derive(Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: &'static str,
    pub value: String,
}

/// Equality selector over a single record type.
#[derive(Clone, PartialEq, Eq)]
pub struct Selector {
    record_type: RecordType,
    predicates: Vec<Predicate>,
    max_value_len: usize,
}

impl Selector {
    /// All records of the given type.
    pub fn of_type(record_type: RecordType) -> Self {
        Self {
            record_type,
            predicates: Vec::new(),
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }

    /// Bound the length of values added after this call.
    pub fn max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = max;
        self
    }

    /// Add an equality condition.
    pub fn and_eq(mut self, field: &'static str, value: &str) -> Result<Self, ValidationError> {
        if self.predicates.len() >= MAX_EXTRA_PREDICATES {
            return Err(ValidationError::TooManyPredicates {
                max: MAX_EXTRA_PREDICATES,
            });
        }
        validate_selector_value(field, value, self.max_value_len)?;
        self.predicates.push(Predicate {
            field,
            value: value.to_string(),
        });
        Ok(self)
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Names of every field the selector constrains, `Type` first.
    pub fn field_names(&self) -> Vec<&'static str> {
        std::iter::once(fields::TYPE)
            .chain(self.predicates.iter().map(|p| p.field))
            .collect()
    }

    /// Render the rich-query text, preserving condition order.
    pub fn to_query_string(&self) -> String {
        let mut out = String::from("{\"selector\":{");
        push_pair(&mut out, fields::TYPE, self.record_type.tag());
        for predicate in &self.predicates {
            out.push(',');
            push_pair(&mut out, predicate.field, &predicate.value);
        }
        out.push_str("}}");
        out
    }
}

fn push_pair(out: &mut String, field: &str, value: &str) {
    // Display on a JSON string value yields the escaped, quoted literal.
    out.push_str(&Value::from(field).to_string());
    out.push(':');
    out.push_str(&Value::from(value).to_string());
}

// Values may be credentials, so only field names are shown.
impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("record_type", &self.record_type)
            .field("fields", &self.field_names())
            .finish()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({} == ..)", self.field)
    }
}

/// A parsed selector, as evaluated by a store.
///
/// Matches a record iff the record is a JSON object and every condition
/// names a string field whose value is exactly equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorQuery {
    conditions: Vec<(String, String)>,
}

impl SelectorQuery {
    /// Parse rich-query text of the form `{"selector":{...}}`.
    ///
    /// Only string equality conditions are supported.
    pub fn parse(query: &str) -> Result<Self, CoreError> {
        let root: Value = serde_json::from_str(query)
            .map_err(|e| CoreError::MalformedSelector(e.to_string()))?;
        let selector = root
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| CoreError::MalformedSelector("missing selector object".into()))?;

        let conditions = selector
            .iter()
            .map(|(field, value)| match value {
                Value::String(s) => Ok((field.clone(), s.clone())),
                other => Err(CoreError::MalformedSelector(format!(
                    "field {} must be compared to a string, got {}",
                    field, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { conditions })
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    /// Evaluate against stored bytes. Non-JSON values never match.
    pub fn matches(&self, record: &[u8]) -> bool {
        match serde_json::from_slice::<Value>(record) {
            Ok(value) => self.matches_value(&value),
            Err(_) => false,
        }
    }

    /// Evaluate against a decoded JSON value.
    pub fn matches_value(&self, record: &Value) -> bool {
        let Some(object) = record.as_object() else {
            return false;
        };
        self.conditions.iter().all(|(field, expected)| {
            matches!(object.get(field), Some(Value::String(actual)) if actual == expected)
        })
    }
}

impl From<&Selector> for SelectorQuery {
    fn from(selector: &Selector) -> Self {
        let conditions = std::iter::once((
            fields::TYPE.to_string(),
            selector.record_type.tag().to_string(),
        ))
        .chain(
            selector
                .predicates
                .iter()
                .map(|p| (p.field.to_string(), p.value.clone())),
        )
        .collect();
        Self { conditions }
    }
}
