//! Synthesize a representative JSON value from a JSON schema.

use serde_json::{Map, Value, json};

const REF_PREFIX: &str = "#/components/schemas/";

/// Build a sample value for `schema`.
///
/// `$ref`s are resolved against `schemas` (the document's
/// `components.schemas`). A reference back to a schema that is already
/// being expanded samples as `null` so recursive types terminate.
pub fn schema_to_sample(schema: &Value, schemas: &Map<String, Value>) -> Value {
    Sampler {
        schemas,
        expanding: Vec::new(),
    }
    .sample(schema)
}

#[derive(Debug)]
struct Sampler<'a> {
    schemas: &'a Map<String, Value>,
    expanding: Vec<&'a str>,
}

impl<'a> Sampler<'a> {
    fn sample(&mut self, schema: &'a Value) -> Value {
        let Some(schema) = schema.as_object() else {
            return json!({});
        };

        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return self.sample_ref(reference);
        }

        let ty = schema.get("type").and_then(Value::as_str);

        if ty == Some("object")
            && let Some(properties) = schema.get("properties").and_then(Value::as_object)
        {
            return Value::Object(
                properties
                    .iter()
                    .map(|(key, prop)| (key.clone(), self.sample(prop)))
                    .collect(),
            );
        }

        if ty == Some("array")
            && let Some(items) = schema.get("items")
        {
            return Value::Array(vec![self.sample(items)]);
        }

        match ty {
            Some("string") => json!("example"),
            Some("number" | "integer") => json!(0),
            Some("boolean") => json!(false),
            Some("object") => json!({}),
            Some("array") => json!([]),
            _ => Value::Null,
        }
    }

    fn sample_ref(&mut self, reference: &'a str) -> Value {
        let Some(name) = reference.strip_prefix(REF_PREFIX) else {
            return Value::Null;
        };
        if self.expanding.contains(&name) {
            return Value::Null;
        }
        let Some(target) = self.schemas.get(name) else {
            return Value::Null;
        };

        self.expanding.push(name);
        let sample = self.sample(target);
        self.expanding.pop();
        sample
    }
}
