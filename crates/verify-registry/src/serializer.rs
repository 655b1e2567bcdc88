//! Query result serialization.
//!
//! A drained result set becomes one JSON array:
//!
//! ```text
//! [{"Key":"k1","Record":{...}},{"Key":"k2","Record":{...}}]
//! ```
//!
//! `Key` is JSON-string-encoded. `Record` is the stored value copied
//! byte-for-byte; it is checked to be well-formed JSON but never re-encoded.

use bytes::Bytes;
use serde_json::value::RawValue;
use verify_registry_store::{KeyValue, ScopedIterator};

use crate::error::{RegistryError, Result};

/// Drain `results` into a JSON array in iterator order.
///
/// The cursor is closed exactly once, whether draining succeeds or stops at
/// the first error.
pub async fn serialize_results(mut results: ScopedIterator) -> Result<Bytes> {
    match write_array(&mut results).await {
        Ok(buffer) => {
            results.close()?;
            Ok(Bytes::from(buffer))
        }
        Err(e) => {
            if let Err(close_err) = results.close() {
                tracing::warn!(error = %close_err, "failed to close query iterator after error");
            }
            Err(e)
        }
    }
}

async fn write_array(results: &mut ScopedIterator) -> Result<Vec<u8>> {
    let mut buffer = vec![b'['];
    let mut written = 0usize;

    while let Some(kv) = results.next().await? {
        if written > 0 {
            buffer.push(b',');
        }
        write_entry(&mut buffer, &kv)?;
        written += 1;
    }

    buffer.push(b']');
    tracing::debug!(records = written, bytes = buffer.len(), "serialized query result");
    Ok(buffer)
}

fn write_entry(buffer: &mut Vec<u8>, kv: &KeyValue) -> Result<()> {
    serde_json::from_slice::<&RawValue>(&kv.value).map_err(|e| {
        RegistryError::Serialization(format!("record at key {:?} is not valid JSON: {}", kv.key, e))
    })?;

    buffer.extend_from_slice(b"{\"Key\":");
    serde_json::to_writer(&mut *buffer, &kv.key)
        .map_err(|e| RegistryError::Serialization(e.to_string()))?;
    buffer.extend_from_slice(b",\"Record\":");
    buffer.extend_from_slice(&kv.value);
    buffer.push(b'}');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verify_registry_store::VecResultsIterator;

    fn results(items: Vec<(&str, &str)>) -> ScopedIterator {
        ScopedIterator::wrap(VecResultsIterator::new(
            items
                .into_iter()
                .map(|(k, v)| KeyValue::new(k, v.to_string())),
        ))
    }

    #[tokio::test]
    async fn test_empty_result_is_empty_array() {
        let out = serialize_results(results(vec![])).await.unwrap();
        assert_eq!(&out[..], b"[]");
    }

    #[tokio::test]
    async fn test_records_pass_through_verbatim() {
        let record = "{ \"Type\":\"Document\",  \"document\":\"a\\u0041\" }";
        let out = serialize_results(results(vec![("k1", record), ("k2", "[1,2]")]))
            .await
            .unwrap();
        let expected = format!(r#"[{{"Key":"k1","Record":{}}},{{"Key":"k2","Record":[1,2]}}]"#, record);
        assert_eq!(std::str::from_utf8(&out).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_keys_are_json_escaped() {
        let out = serialize_results(results(vec![("a\"b\\c", "{}")])).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["Key"], "a\"b\\c");
    }

    #[tokio::test]
    async fn test_output_parses_and_keeps_order() {
        let out = serialize_results(results(vec![
            ("z", r#"{"n":"1"}"#),
            ("a", r#"{"n":"2"}"#),
        ]))
        .await
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["Key"], "z");
        assert_eq!(parsed[1]["Key"], "a");
        assert_eq!(parsed[1]["Record"]["n"], "2");
    }

    #[tokio::test]
    async fn test_invalid_record_is_serialization_error() {
        let err = serialize_results(results(vec![("ok", "{}"), ("bad", "not json")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Serialization(_)));
    }
}
