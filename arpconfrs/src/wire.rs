//! Persisted form of [`ConnectionParameters`], keyed by stable field tags.
//!
//! This is server-side storage: the password is written in the clear here and
//! nowhere else. Unknown tags are skipped so older readers survive newer
//! writers.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ConnectorError, Result};
use crate::fields::{self, FieldKind};
use crate::params::{ConnectionParameters, FieldValue};
use crate::secret::SensitiveString;

pub type TaggedFields = BTreeMap<u32, Value>;

pub fn encode(params: &ConnectionParameters) -> TaggedFields {
    let mut out = TaggedFields::new();
    for field in fields::FIELDS {
        let value = match params.value(field) {
            FieldValue::Text(Some(s)) => Value::String(s.to_string()),
            FieldValue::Secret(Some(s)) => Value::String(s.expose_secret().to_string()),
            FieldValue::Text(None) | FieldValue::Secret(None) => continue,
            FieldValue::Int(n) => Value::from(n),
            FieldValue::Bool(b) => Value::Bool(b),
        };
        out.insert(field.tag, value);
    }
    out
}

pub fn decode(tagged: &TaggedFields) -> Result<ConnectionParameters> {
    let mut params = ConnectionParameters::default();
    for (tag, value) in tagged {
        let Some(field) = fields::by_tag(*tag) else {
            tracing::warn!(tag = *tag, "ignoring unknown field tag");
            continue;
        };
        if value.is_null() {
            continue;
        }
        let mismatch = || {
            ConnectorError::Wire(format!(
                "tag {tag} ({}) has unexpected value {value}",
                field.name
            ))
        };
        match field.kind {
            FieldKind::Text => {
                let s = value.as_str().ok_or_else(mismatch)?;
                params.set_text(field, s.to_string());
            }
            FieldKind::Secret => {
                let s = value.as_str().ok_or_else(mismatch)?;
                params.set_secret(field, SensitiveString::new(s));
            }
            FieldKind::Int { .. } => {
                let n = value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(mismatch)?;
                params.set_int(field, n);
            }
            FieldKind::Bool { .. } => {
                let b = value.as_bool().ok_or_else(mismatch)?;
                params.set_bool(field, b);
            }
        }
    }
    Ok(params)
}

pub fn to_json(params: &ConnectionParameters) -> Result<String> {
    Ok(serde_json::to_string(&encode(params))?)
}

pub fn from_json(json: &str) -> Result<ConnectionParameters> {
    let tagged: TaggedFields = serde_json::from_str(json)?;
    decode(&tagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_uses_tags_and_exposes_password() {
        let params = ConnectionParameters::new("h", "50000", "SALES", "u", "pw");
        let tagged = encode(&params);
        assert_eq!(tagged[&1], json!("h"));
        assert_eq!(tagged[&3], json!("SALES"));
        assert_eq!(tagged[&5], json!("pw"));
        assert_eq!(tagged[&6], json!(500));
        assert_eq!(tagged[&7], json!(false));
    }

    #[test]
    fn unset_text_fields_are_omitted() {
        let tagged = encode(&ConnectionParameters::default());
        assert!(!tagged.contains_key(&1));
        assert!(!tagged.contains_key(&5));
        assert_eq!(tagged[&9], json!(60));
    }

    #[test]
    fn decode_skips_unknown_tags_and_defaults_missing_ones() {
        let params = from_json(r#"{"1": "h", "2": "1", "77": "future", "8": 3}"#).unwrap();
        assert_eq!(params.host.as_deref(), Some("h"));
        assert_eq!(params.max_idle_conns, 3);
        assert_eq!(params.fetch_size, 500);
        assert!(params.password.is_none());
    }

    #[test]
    fn decode_names_tag_on_type_mismatch() {
        let err = from_json(r#"{"6": "many"}"#).unwrap_err();
        assert!(err.to_string().contains("tag 6 (fetch_size)"));
    }

    #[test]
    fn persisted_round_trip_keeps_secret() {
        let params = ConnectionParameters::new("h", "1", "d", "u", "pw").with_external_query(true);
        let back = from_json(&to_json(&params).unwrap()).unwrap();
        assert_eq!(back.password.unwrap().expose_secret(), "pw");
        assert!(back.enable_external_query);
    }
}
