//! Type-erased cell values.
//!
//! Values are serialized with postcard together with the Rust type name of the
//! stored value, so a cell can hold any `Serialize` type and typed reads can
//! reject a mismatched type instead of misreading bytes.

use std::any::type_name;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{GraphError, Result, ValueError};

/// A cached cell value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredValue {
    bytes: Vec<u8>,
    type_name: &'static str,
}

impl StoredValue {
    /// Serialize `value`. `key` is only used for error messages.
    pub fn encode<T: Serialize>(key: &str, value: &T) -> Result<Self> {
        let bytes = postcard::to_stdvec(value).map_err(|e| ValueError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            bytes,
            type_name: type_name::<T>(),
        })
    }

    /// Deserialize as `T`, checking the stored type name first.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let requested_type_name = type_name::<T>();
        if self.type_name != requested_type_name {
            return Err(ValueError::TypeMismatch {
                key: key.to_string(),
                expected: requested_type_name.to_string(),
                found: self.type_name.to_string(),
            }
            .into());
        }

        postcard::from_bytes(&self.bytes).map_err(|e| {
            ValueError::Deserialization {
                key: key.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Read access to the values of a cell's declared dependencies.
///
/// Passed to each compute function. Reading a name the cell did not declare
/// fails with [`GraphError::UndeclaredDependency`].
pub struct Inputs<'a> {
    cell: &'a str,
    values: Vec<(&'a str, &'a StoredValue)>,
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(cell: &'a str, values: Vec<(&'a str, &'a StoredValue)>) -> Self {
        Self { cell, values }
    }

    /// Load a dependency value by name.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .values
            .iter()
            .find(|(dep, _)| *dep == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| GraphError::UndeclaredDependency {
                cell: self.cell.to_string(),
                dependency: name.to_string(),
            })?;
        value.decode(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn decode_rejects_type_mismatch() {
        let value = StoredValue::encode("data", &vec![1u8, 2, 3]).expect("encode should succeed");

        let err = value.decode::<Vec<u16>>("data").expect_err("decode should fail");
        let Error::Value(ValueError::TypeMismatch {
            key,
            expected,
            found,
        }) = err
        else {
            panic!("expected type mismatch error");
        };

        assert_eq!(key, "data");
        assert_eq!(expected, std::any::type_name::<Vec<u16>>());
        assert_eq!(found, std::any::type_name::<Vec<u8>>());
    }

    #[test]
    fn decode_returns_encoded_value() {
        let value = StoredValue::encode("label", &"medium".to_string()).unwrap();
        assert_eq!(value.type_name(), std::any::type_name::<String>());
        assert_eq!(value.decode::<String>("label").unwrap(), "medium");
    }

    #[test]
    fn inputs_reject_undeclared_names() {
        let count = StoredValue::encode("count", &3i64).unwrap();
        let inputs = Inputs::new("doubled", vec![("count", &count)]);

        assert_eq!(inputs.load::<i64>("count").unwrap(), 3);

        let err = inputs.load::<i64>("other").expect_err("load should fail");
        let Error::Graph(GraphError::UndeclaredDependency { cell, dependency }) = err else {
            panic!("expected undeclared dependency error");
        };
        assert_eq!(cell, "doubled");
        assert_eq!(dependency, "other");
    }
}
