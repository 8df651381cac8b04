//! Typed scalar values stored in simulated memory

use std::fmt;

use crate::error::{MmuError, Result};
use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Char(u8),
    Short(i16),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
}

impl Value {
    /// Parse command text as a value of `kind`. A char takes the first
    /// character of the text, which must be ASCII.
    pub fn parse(kind: DataType, text: &str) -> Result<Self> {
        let invalid = || MmuError::InvalidValue {
            kind: kind.label().to_string(),
            text: text.to_string(),
        };
        let value = match kind {
            DataType::Char => {
                let c = text.chars().next().filter(char::is_ascii).ok_or_else(invalid)?;
                Value::Char(c as u8)
            }
            DataType::Short => Value::Short(text.parse().map_err(|_| invalid())?),
            DataType::Int => Value::Int(text.parse().map_err(|_| invalid())?),
            DataType::Float => Value::Float(text.parse().map_err(|_| invalid())?),
            DataType::Long => Value::Long(text.parse().map_err(|_| invalid())?),
            DataType::Double => Value::Double(text.parse().map_err(|_| invalid())?),
            DataType::FreeSpace => return Err(invalid()),
        };
        Ok(value)
    }

    /// Little-endian encoding, `kind.size_of()` bytes long
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            Value::Char(v) => vec![v],
            Value::Short(v) => v.to_le_bytes().to_vec(),
            Value::Int(v) => v.to_le_bytes().to_vec(),
            Value::Float(v) => v.to_le_bytes().to_vec(),
            Value::Long(v) => v.to_le_bytes().to_vec(),
            Value::Double(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Decode an element previously written with `to_bytes`.
    ///
    /// Returns `None` for free space or when `bytes` has the wrong length.
    pub fn from_bytes(kind: DataType, bytes: &[u8]) -> Option<Self> {
        let value = match kind {
            DataType::Char => Value::Char(*bytes.first()?),
            DataType::Short => Value::Short(i16::from_le_bytes(bytes.try_into().ok()?)),
            DataType::Int => Value::Int(i32::from_le_bytes(bytes.try_into().ok()?)),
            DataType::Float => Value::Float(f32::from_le_bytes(bytes.try_into().ok()?)),
            DataType::Long => Value::Long(i64::from_le_bytes(bytes.try_into().ok()?)),
            DataType::Double => Value::Double(f64::from_le_bytes(bytes.try_into().ok()?)),
            DataType::FreeSpace => return None,
        };
        Some(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Char(v) => write!(f, "{}", *v as char),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Value::parse(DataType::Char, "hello"), Ok(Value::Char(b'h')));
        assert_eq!(Value::parse(DataType::Short, "-12"), Ok(Value::Short(-12)));
        assert_eq!(Value::parse(DataType::Double, "2.5"), Ok(Value::Double(2.5)));
        assert_eq!(
            Value::parse(DataType::Int, "abc"),
            Err(MmuError::InvalidValue {
                kind: "int".to_string(),
                text: "abc".to_string(),
            })
        );
        assert!(Value::parse(DataType::Short, "70000").is_err());
    }

    #[test]
    fn test_parse_char_rejects_non_ascii() {
        assert_eq!(
            Value::parse(DataType::Char, "\u{e9}t\u{e9}"),
            Err(MmuError::InvalidValue {
                kind: "char".to_string(),
                text: "\u{e9}t\u{e9}".to_string(),
            })
        );
        assert!(Value::parse(DataType::Char, "").is_err());
        assert_eq!(Value::parse(DataType::Char, "~"), Ok(Value::Char(b'~')));
    }

    #[test]
    fn test_bytes_match_kind_width() {
        for (kind, text) in [
            (DataType::Char, "z"),
            (DataType::Short, "7"),
            (DataType::Int, "-9"),
            (DataType::Float, "1.5"),
            (DataType::Long, "123456789012"),
            (DataType::Double, "0.25"),
        ] {
            let value = Value::parse(kind, text).unwrap();
            let bytes = value.to_bytes();
            assert_eq!(bytes.len() as u32, kind.size_of());
            assert_eq!(Value::from_bytes(kind, &bytes), Some(value));
        }
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert_eq!(Value::from_bytes(DataType::Int, &[1, 2]), None);
        assert_eq!(Value::from_bytes(DataType::FreeSpace, &[1]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Char(b'A').to_string(), "A");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Long(-3).to_string(), "-3");
    }
}
