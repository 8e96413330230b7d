//! Client-facing views generated from the field schema.

use serde_json::{json, Map, Value};

use crate::fields::{FieldKind, FIELDS};
use crate::params::{ConnectionParameters, FieldValue};
use crate::variant::Variant;

/// Shown in place of a secret that has a value.
pub const MASK: &str = "********";

/// Field values keyed by property name, safe to send to a client.
pub fn masked_values(params: &ConnectionParameters) -> Value {
    let mut out = Map::new();
    for field in FIELDS {
        let value = match params.value(field) {
            FieldValue::Text(v) => v.map_or(Value::Null, |s| Value::String(s.to_string())),
            FieldValue::Secret(v) => v.map_or(Value::Null, |_| Value::String(MASK.to_string())),
            FieldValue::Int(n) => Value::from(n),
            FieldValue::Bool(b) => Value::Bool(b),
        };
        out.insert(field.name.to_string(), value);
    }
    Value::Object(out)
}

/// Form description for the host's renderer.
pub fn ui_layout(variant: &Variant) -> Value {
    let elements: Vec<Value> = FIELDS
        .iter()
        .map(|field| {
            let (ui_type, default) = match field.kind {
                FieldKind::Text => ("text", Value::Null),
                FieldKind::Secret => ("password", Value::Null),
                FieldKind::Int { default } => ("number", Value::from(default)),
                FieldKind::Bool { default } => ("checkbox", Value::Bool(default)),
            };
            json!({
                "propName": field.name,
                "tag": field.tag,
                "label": field.label,
                "uiType": ui_type,
                "required": field.required,
                "secret": field.is_secret(),
                "metadataImpacting": field.metadata_impacting,
                "default": default,
            })
        })
        .collect();

    json!({
        "sourceType": variant.source_type.value,
        "label": variant.source_type.label,
        "uiConfig": variant.source_type.ui_config,
        "externalQuerySupported": variant.source_type.external_query_supported,
        "elements": elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::DB2_V11;

    #[test]
    fn password_is_masked() {
        let params = ConnectionParameters::new("h", "1", "d", "u", "topsecret");
        let values = masked_values(&params);
        assert_eq!(values["password"], json!(MASK));
        assert_eq!(values["host"], json!("h"));
        assert_eq!(values["fetch_size"], json!(500));
        assert!(!values.to_string().contains("topsecret"));
    }

    #[test]
    fn unset_password_is_null() {
        let values = masked_values(&ConnectionParameters::default());
        assert!(values["password"].is_null());
    }

    #[test]
    fn layout_describes_every_field() {
        let layout = ui_layout(&DB2_V11);
        assert_eq!(layout["sourceType"], json!("IBMDB2V11ARP"));
        let elements = layout["elements"].as_array().unwrap();
        assert_eq!(elements.len(), FIELDS.len());
        assert_eq!(elements[4]["uiType"], json!("password"));
        assert_eq!(elements[4]["secret"], json!(true));
        assert_eq!(elements[8]["default"], json!(60));
        assert_eq!(elements[6]["uiType"], json!("checkbox"));
    }
}
