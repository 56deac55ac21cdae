//! Row type returned by the execution layer.

use crate::error::{Error, Result};
use crate::value::{FromScalar, Scalar};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One fetched row: an ordered mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Scalar)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style column insert; an existing column is overwritten in place.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert or overwrite a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Raw value of a column.
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Typed value of a column.
    ///
    /// Returns [`Error::Decode`] when the column is missing or has the wrong type.
    pub fn try_get<T: FromScalar>(&self, column: &str) -> Result<T> {
        let value = self
            .get(column)
            .ok_or_else(|| Error::decode(column, "column not present in row"))?;
        T::from_scalar(column, value)
    }

    /// Check whether the row has a column.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    /// Iterate `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert the row into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(c, v)| {
                let value = serde_json::to_value(v).unwrap_or(serde_json::Value::Null);
                (c.clone(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let row = Row::new().with("id", 7).with("name", "alice").with("score", Scalar::Null);

        assert_eq!(row.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(row.try_get::<String>("name").unwrap(), "alice");
        assert_eq!(row.try_get::<Option<f64>>("score").unwrap(), None);

        let err = row.try_get::<i64>("missing").unwrap_err();
        assert!(matches!(err, Error::Decode { ref column, .. } if column == "missing"));
    }

    #[test]
    fn json_keeps_column_order() {
        let row: Row = vec![("b", Scalar::from(1)), ("a", Scalar::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"b":1,"a":"x"}"#);
        assert_eq!(row.to_json()["a"], serde_json::json!("x"));
    }
}
