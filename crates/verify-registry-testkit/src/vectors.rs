//! Golden test vectors.
//!
//! The ledger matches selectors against stored JSON literally, so both the
//! rendered selector text and the record encodings are a compatibility
//! surface. These vectors pin them down.

use verify_registry_core::{fields, Admin, AdminId, Document, Identifier, RecordType, Selector};

/// What a vector exercises.
#[derive(Debug, Clone)]
pub enum VectorInput {
    /// A selector over a record type with up to two equality conditions.
    Selector {
        record_type: RecordType,
        conditions: &'static [(&'static str, &'static str)],
    },
    /// Encoding of a document.
    Document {
        identifier: &'static str,
        content: &'static str,
    },
    /// Encoding of an admin with the given message log.
    Admin {
        admin_id: &'static str,
        username: &'static str,
        password: &'static str,
        messages: &'static [&'static str],
    },
}

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub input: VectorInput,
    /// Expected output text.
    pub expected: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "all documents",
            input: VectorInput::Selector {
                record_type: RecordType::Document,
                conditions: &[],
            },
            expected: r#"{"selector":{"Type":"Document"}}"#,
        },
        GoldenVector {
            name: "document by hash",
            input: VectorInput::Selector {
                record_type: RecordType::Document,
                conditions: &[(fields::HASH, "abcXYZ")],
            },
            expected: r#"{"selector":{"Type":"Document","hash":"abcXYZ"}}"#,
        },
        GoldenVector {
            name: "admin by credentials",
            input: VectorInput::Selector {
                record_type: RecordType::Admin,
                conditions: &[(fields::USERNAME, "alice"), (fields::PASSWORD, "pw")],
            },
            expected: r#"{"selector":{"Type":"admin","username":"alice","password":"pw"}}"#,
        },
        GoldenVector {
            name: "quote injection is escaped",
            input: VectorInput::Selector {
                record_type: RecordType::Admin,
                conditions: &[
                    (fields::USERNAME, "alice"),
                    (fields::PASSWORD, r#"x","password":{"$gt":""}"#),
                ],
            },
            expected: r#"{"selector":{"Type":"admin","username":"alice","password":"x\",\"password\":{\"$gt\":\"\"}"}}"#,
        },
        GoldenVector {
            name: "backslash and unicode",
            input: VectorInput::Selector {
                record_type: RecordType::Document,
                conditions: &[(fields::HASH, "a\\b é")],
            },
            expected: r#"{"selector":{"Type":"Document","hash":"a\\b é"}}"#,
        },
        GoldenVector {
            name: "document encoding",
            input: VectorInput::Document {
                identifier: "QwErTy",
                content: "hello \"world\"",
            },
            expected: r#"{"Type":"Document","document":"hello \"world\"","hash":"QwErTy"}"#,
        },
        GoldenVector {
            name: "admin encoding",
            input: VectorInput::Admin {
                admin_id: "a1",
                username: "alice",
                password: "pw",
                messages: &["first", "second"],
            },
            expected: r#"{"Type":"admin","adminID":"a1","username":"alice","password":"pw","message":["first","second"]}"#,
        },
    ]
}

/// Produce the actual output for a vector.
pub fn render_vector(vector: &GoldenVector) -> Result<String, String> {
    match &vector.input {
        VectorInput::Selector {
            record_type,
            conditions,
        } => {
            let selector = conditions
                .iter()
                .try_fold(Selector::of_type(*record_type), |s, &(field, value)| {
                    s.and_eq(field, value)
                })
                .map_err(|e| e.to_string())?;
            Ok(selector.to_query_string())
        }
        VectorInput::Document {
            identifier,
            content,
        } => {
            let bytes = Document::new(Identifier::new(*identifier), *content)
                .encode()
                .map_err(|e| e.to_string())?;
            String::from_utf8(bytes).map_err(|e| e.to_string())
        }
        VectorInput::Admin {
            admin_id,
            username,
            password,
            messages,
        } => {
            let mut admin = Admin::new(AdminId::new(*admin_id), *username, *password, messages[0]);
            for message in &messages[1..] {
                admin.append_message(*message);
            }
            let bytes = admin.encode().map_err(|e| e.to_string())?;
            String::from_utf8(bytes).map_err(|e| e.to_string())
        }
    }
}

/// Check every vector, returning `(name, matches, actual)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| match render_vector(v) {
            Ok(actual) => (v.name.to_string(), actual == v.expected, actual),
            Err(e) => (v.name.to_string(), false, e),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verify_registry_core::SelectorQuery;

    #[test]
    fn test_all_vectors_match() {
        for (name, ok, actual) in verify_all_vectors() {
            assert!(ok, "vector '{}' rendered {}", name, actual);
        }
    }

    #[test]
    fn test_selector_vectors_parse_back() {
        for vector in all_vectors() {
            if let VectorInput::Selector { conditions, .. } = vector.input {
                let parsed = SelectorQuery::parse(vector.expected).unwrap();
                assert_eq!(parsed.conditions().len(), conditions.len() + 1, "{}", vector.name);
            }
        }
    }
}
