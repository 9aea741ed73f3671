use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record as returned by the backend.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Write payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Field → value mapping for a single-row write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WritePayload(Map<String, Value>);

impl WritePayload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_json(value: Value) -> Result<Self, PayloadError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(PayloadError::NotAnObject("null")),
            Value::Bool(_) => Err(PayloadError::NotAnObject("boolean")),
            Value::Number(_) => Err(PayloadError::NotAnObject("number")),
            Value::String(_) => Err(PayloadError::NotAnObject("string")),
            Value::Array(_) => Err(PayloadError::NotAnObject("array")),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for WritePayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    mod from_json {
        use super::*;

        #[test]
        fn object_returns_payload_with_same_fields() {
            let payload = WritePayload::from_json(json!({"nome": "Teste", "cor": "azul"})).unwrap();

            assert_eq!(payload.len(), 2);
            assert!(payload.contains("nome"));
            assert!(payload.contains("cor"));
        }

        #[rstest]
        #[case(json!(null), "null")]
        #[case(json!(true), "boolean")]
        #[case(json!(3), "number")]
        #[case(json!("x"), "string")]
        #[case(json!([1, 2]), "array")]
        fn non_object_returns_error(#[case] value: Value, #[case] kind: &'static str) {
            assert_eq!(
                WritePayload::from_json(value),
                Err(PayloadError::NotAnObject(kind))
            );
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn remove_returns_value_and_drops_field() {
            let mut payload = WritePayload::new().with("nome", "Teste").with("cor", "azul");

            assert_eq!(payload.remove("cor"), Some(json!("azul")));
            assert!(!payload.contains("cor"));
            assert_eq!(payload.len(), 1);
        }

        #[test]
        fn remove_missing_field_returns_none() {
            let mut payload = WritePayload::new().with("nome", "Teste");

            assert_eq!(payload.remove("cor"), None);
            assert_eq!(payload.len(), 1);
        }

        #[test]
        fn remove_keeps_remaining_fields_in_insertion_order() {
            let mut payload = WritePayload::new()
                .with("nome", "Teste")
                .with("cor", "azul")
                .with("acabamento", "polido")
                .with("unidade", "m2");

            payload.remove("cor");

            assert_eq!(
                payload.field_names().collect::<Vec<_>>(),
                ["nome", "acabamento", "unidade"]
            );
        }

        #[test]
        fn from_json_keeps_field_order() {
            let value = serde_json::from_str(r#"{"unidade":"m2","nome":"Teste","cor":"azul"}"#)
                .unwrap();
            let payload = WritePayload::from_json(value).unwrap();

            assert_eq!(
                payload.field_names().collect::<Vec<_>>(),
                ["unidade", "nome", "cor"]
            );
        }

        #[test]
        fn clone_is_independent_of_original() {
            let original = WritePayload::new().with("nome", "Teste").with("cor", "azul");
            let mut working = original.clone();
            working.remove("cor");

            assert!(original.contains("cor"));
        }
    }

    #[test]
    fn serializes_as_plain_object() {
        let payload = WritePayload::new().with("quantidade", 4);
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"quantidade": 4}));
    }
}
