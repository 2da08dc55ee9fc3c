use serde_json::Value;
use thiserror::Error;

use super::types::{Document, Schema};

/// Errors that abort building the handler index.
///
/// All of these are detected while walking the document at startup; none of
/// them can occur at request time.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A `$ref` does not point to a known schema under `components.schemas`.
    #[error("unknown schema {ref_path}")]
    UnresolvedRef { ref_path: String },

    /// The `type` field is outside the recognized set.
    #[error("unknown type {ty}")]
    UnknownType { ty: String },

    /// An array schema without `items`.
    #[error("empty items in array")]
    EmptyArrayItems,

    /// An inline example whose shape contradicts its schema type.
    #[error("unexpected {found} example for {expected} schema")]
    ExampleShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A response key that is not parseable as a status code.
    #[error("invalid status code {code:?}")]
    InvalidStatus { code: String },
}

/// Walk a schema, resolving references and validating the parts the mock
/// server relies on.
///
/// This is checking only; no payload is ever synthesized from a schema.
/// Examples are validated against the declared type so that a malformed
/// document fails at startup instead of producing nonsense at request time.
pub fn check_schema(doc: &Document, schema: &Schema) -> Result<(), SpecError> {
    if let Some(ref_path) = &schema.ref_path {
        let resolved = doc.resolve_ref(ref_path)?;
        return check_schema(doc, resolved);
    }

    let Some(ty) = schema.schema_type.as_deref() else {
        return Ok(());
    };

    match ty {
        "boolean" | "integer" | "number" | "string" => Ok(()),
        "array" => {
            let items = schema.items.as_deref().ok_or(SpecError::EmptyArrayItems)?;
            check_schema(doc, items)?;
            check_example_shape(schema.example.as_ref(), "array")
        }
        "object" => {
            for prop in schema.properties.values() {
                check_schema(doc, prop)?;
            }
            check_example_shape(schema.example.as_ref(), "object")
        }
        other => Err(SpecError::UnknownType {
            ty: other.to_string(),
        }),
    }
}

fn check_example_shape(example: Option<&Value>, expected: &'static str) -> Result<(), SpecError> {
    let Some(example) = example else {
        return Ok(());
    };
    let ok = match expected {
        "array" => example.is_array(),
        "object" => example.is_object(),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(SpecError::ExampleShape {
            expected,
            found: value_kind(example),
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_doc() -> Document {
        Document::default()
    }

    #[test]
    fn test_primitive_types_pass() {
        let doc = empty_doc();
        for ty in ["boolean", "integer", "number", "string"] {
            let schema = Schema {
                schema_type: Some(ty.to_string()),
                ..Schema::default()
            };
            assert!(check_schema(&doc, &schema).is_ok(), "type {ty}");
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let doc = empty_doc();
        let schema = Schema {
            schema_type: Some("tuple".to_string()),
            ..Schema::default()
        };
        let err = check_schema(&doc, &schema).unwrap_err();
        assert!(matches!(err, SpecError::UnknownType { ty } if ty == "tuple"));
    }

    #[test]
    fn test_array_requires_items() {
        let doc = empty_doc();
        let schema = Schema {
            schema_type: Some("array".to_string()),
            ..Schema::default()
        };
        assert!(matches!(
            check_schema(&doc, &schema),
            Err(SpecError::EmptyArrayItems)
        ));
    }

    #[test]
    fn test_array_example_must_be_sequence() {
        let doc = empty_doc();
        let schema = Schema {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(Schema {
                schema_type: Some("string".to_string()),
                ..Schema::default()
            })),
            example: Some(json!({"not": "an array"})),
            ..Schema::default()
        };
        assert!(matches!(
            check_schema(&doc, &schema),
            Err(SpecError::ExampleShape {
                expected: "array",
                found: "object"
            })
        ));
    }

    #[test]
    fn test_ref_resolution() {
        let doc: Document = serde_yaml::from_str(
            r#"
components:
  schemas:
    User:
      type: object
      properties:
        id: { type: string }
"#,
        )
        .unwrap();
        let schema = Schema {
            ref_path: Some("#/components/schemas/User".to_string()),
            ..Schema::default()
        };
        assert!(check_schema(&doc, &schema).is_ok());

        let missing = Schema {
            ref_path: Some("#/components/schemas/Ghost".to_string()),
            ..Schema::default()
        };
        assert!(matches!(
            check_schema(&doc, &missing),
            Err(SpecError::UnresolvedRef { .. })
        ));
    }
}
