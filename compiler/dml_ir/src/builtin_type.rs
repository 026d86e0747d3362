//! Built-in scalar type identification.
//!
//! The symbol table is seeded with exactly these types, keyed by their
//! lowercase keyword spelling.
//!
//! ```ignore
//! use dml_ir::BuiltinType;
//!
//! assert_eq!(BuiltinType::from_keyword("datetime"), Some(BuiltinType::DateTime));
//! assert_eq!(BuiltinType::Guid.keyword(), "guid");
//! ```

use std::fmt;

/// Every built-in scalar type of the modeling language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuiltinType {
    /// No value; only meaningful as an operation result.
    Void,
    Bool,
    /// Unsigned 8-bit integer
    Byte,
    /// Signed 8-bit integer
    SByte,
    Char,
    Decimal,
    /// 64-bit floating point
    Double,
    /// 32-bit floating point
    Float,
    /// Signed 16-bit integer
    Short,
    /// Signed 32-bit integer
    Int,
    /// Signed 64-bit integer
    Long,
    /// Unsigned 16-bit integer
    UShort,
    /// Unsigned 32-bit integer
    UInt,
    /// Unsigned 64-bit integer
    ULong,
    String,
    /// Unique identifier
    Guid,
    DateTime,
}

impl BuiltinType {
    /// All built-in types, in table order.
    pub const ALL: [BuiltinType; 17] = [
        Self::Void,
        Self::Bool,
        Self::Byte,
        Self::Char,
        Self::Decimal,
        Self::Double,
        Self::Float,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::UInt,
        Self::ULong,
        Self::UShort,
        Self::SByte,
        Self::String,
        Self::Guid,
        Self::DateTime,
    ];

    /// Look up a built-in by its keyword. Matching is exact: `Int` is not `int`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "void" => Self::Void,
            "bool" => Self::Bool,
            "byte" => Self::Byte,
            "sbyte" => Self::SByte,
            "char" => Self::Char,
            "decimal" => Self::Decimal,
            "double" => Self::Double,
            "float" => Self::Float,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "ushort" => Self::UShort,
            "uint" => Self::UInt,
            "ulong" => Self::ULong,
            "string" => Self::String,
            "guid" => Self::Guid,
            "datetime" => Self::DateTime,
            _ => return None,
        })
    }

    /// The keyword as written in source.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::SByte => "sbyte",
            Self::Char => "char",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Float => "float",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::UShort => "ushort",
            Self::UInt => "uint",
            Self::ULong => "ulong",
            Self::String => "string",
            Self::Guid => "guid",
            Self::DateTime => "datetime",
        }
    }

    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
