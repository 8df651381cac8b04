//! Type catalog: scalar data kinds and their byte widths

use std::fmt;
use std::str::FromStr;

use crate::error::MmuError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    FreeSpace,
    Char,
    Short,
    Int,
    Float,
    Long,
    Double,
}

impl DataType {
    /// Width in bytes of one element. Free space has no element width.
    pub fn size_of(self) -> u32 {
        match self {
            DataType::FreeSpace => 0,
            DataType::Char => 1,
            DataType::Short => 2,
            DataType::Int | DataType::Float => 4,
            DataType::Long | DataType::Double => 8,
        }
    }

    #[inline]
    pub fn is_free(self) -> bool {
        self == DataType::FreeSpace
    }

    pub fn label(self) -> &'static str {
        match self {
            DataType::FreeSpace => "free",
            DataType::Char => "char",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Long => "long",
            DataType::Double => "double",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the labels a user may type. The free marker is not one of them.
impl FromStr for DataType {
    type Err = MmuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" => Ok(DataType::Char),
            "short" => Ok(DataType::Short),
            "int" => Ok(DataType::Int),
            "float" => Ok(DataType::Float),
            "long" => Ok(DataType::Long),
            "double" => Ok(DataType::Double),
            _ => Err(MmuError::UnknownDataKind(s.to_string())),
        }
    }
}
