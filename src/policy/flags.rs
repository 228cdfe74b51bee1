use serde_json::{Map, Value};
use thiserror::Error;

use super::RemoteFlags;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFlags {
    #[error("expected a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
    #[error("flag '{flag}' is not a boolean")]
    NotABoolean { flag: &'static str },
}

impl RemoteFlags {
    /// Reads the flags out of a decoded API response.
    ///
    /// Only a JSON object is accepted. Absent and `null` keys keep their
    /// default, unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, InvalidFlags> {
        let object = value.as_object().ok_or(InvalidFlags::NotAnObject {
            kind: json_kind(value),
        })?;

        let defaults = Self::default();
        Ok(Self {
            disposable: read_flag(object, "disposable", defaults.disposable)?,
            public_domain: read_flag(object, "public_domain", defaults.public_domain)?,
            mx: read_flag(object, "mx", defaults.mx)?,
            blocklisted: read_flag(object, "blocklisted", defaults.blocklisted)?,
            relay_domain: read_flag(object, "relay_domain", defaults.relay_domain)?,
            spam: read_flag(object, "spam", defaults.spam)?,
        })
    }
}

fn read_flag(
    object: &Map<String, Value>,
    flag: &'static str,
    default: bool,
) -> Result<bool, InvalidFlags> {
    match object.get(flag) {
        // null == clé absente
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(InvalidFlags::NotABoolean { flag }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
