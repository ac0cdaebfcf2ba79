// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed values for attribute and parameter payloads.
//!
//! The RTI moves opaque byte arrays. [`DataType`] names the primitive kind a
//! FOM declares for a field and [`TypedValue`] is the decoded scalar. The
//! encoding is the standard HLA basic representation (big-endian), see
//! [`DataType::hla_name`].

mod hla;

use std::fmt;

/// Primitive value kinds usable for attributes and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "lowercase"))]
pub enum DataType {
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
}

impl DataType {
    /// Every data type, in declaration order.
    pub const ALL: [DataType; 9] = [
        DataType::Byte,
        DataType::Char,
        DataType::Short,
        DataType::Int,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::Boolean,
        DataType::String,
    ];

    /// Name of the HLA encoded datatype used on the wire.
    pub const fn hla_name(self) -> &'static str {
        match self {
            DataType::Byte => "HLAoctet",
            DataType::Char => "HLAunicodeChar",
            DataType::Short => "HLAinteger16BE",
            DataType::Int => "HLAinteger32BE",
            DataType::Long => "HLAinteger64BE",
            DataType::Float => "HLAfloat32BE",
            DataType::Double => "HLAfloat64BE",
            DataType::Boolean => "HLAboolean",
            DataType::String => "HLAunicodeString",
        }
    }

    /// Name of the Rust type a getter for this kind returns.
    pub const fn rust_name(self) -> &'static str {
        match self {
            DataType::Byte => "u8",
            DataType::Char => "char",
            DataType::Short => "i16",
            DataType::Int => "i32",
            DataType::Long => "i64",
            DataType::Float => "f32",
            DataType::Double => "f64",
            DataType::Boolean => "bool",
            DataType::String => "String",
        }
    }

    /// Safe default returned when a field is missing or malformed.
    pub fn default_value(self) -> TypedValue {
        match self {
            DataType::Byte => TypedValue::Byte(0),
            DataType::Char => TypedValue::Char('\0'),
            DataType::Short => TypedValue::Short(0),
            DataType::Int => TypedValue::Int(0),
            DataType::Long => TypedValue::Long(0),
            DataType::Float => TypedValue::Float(0.0),
            DataType::Double => TypedValue::Double(0.0),
            DataType::Boolean => TypedValue::Boolean(false),
            DataType::String => TypedValue::String(String::new()),
        }
    }

    /// Decode `buf` as this kind. `None` when the bytes do not fit the representation.
    pub fn decode(self, buf: &[u8]) -> Option<TypedValue> {
        let value = match self {
            DataType::Byte => TypedValue::Byte(hla::decode_octet(buf)?),
            DataType::Char => TypedValue::Char(hla::decode_unicode_char(buf)?),
            DataType::Short => TypedValue::Short(hla::decode_i16(buf)?),
            DataType::Int => TypedValue::Int(hla::decode_i32(buf)?),
            DataType::Long => TypedValue::Long(hla::decode_i64(buf)?),
            DataType::Float => TypedValue::Float(hla::decode_f32(buf)?),
            DataType::Double => TypedValue::Double(hla::decode_f64(buf)?),
            DataType::Boolean => TypedValue::Boolean(hla::decode_boolean(buf)?),
            DataType::String => TypedValue::String(hla::decode_unicode_string(buf)?),
        };
        Some(value)
    }

    /// Parse a lowercase name (`"int"`, `"string"`, ...) or an HLA datatype name.
    pub fn parse(name: &str) -> Option<DataType> {
        let lower = name.to_ascii_lowercase();
        DataType::ALL.into_iter().find(|dt| {
            dt.to_string() == lower || dt.hla_name().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Byte => "byte",
            DataType::Char => "char",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
            DataType::String => "string",
        };
        f.write_str(name)
    }
}

/// A decoded attribute or parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Byte(u8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
}

impl TypedValue {
    pub fn data_type(&self) -> DataType {
        match self {
            TypedValue::Byte(_) => DataType::Byte,
            TypedValue::Char(_) => DataType::Char,
            TypedValue::Short(_) => DataType::Short,
            TypedValue::Int(_) => DataType::Int,
            TypedValue::Long(_) => DataType::Long,
            TypedValue::Float(_) => DataType::Float,
            TypedValue::Double(_) => DataType::Double,
            TypedValue::Boolean(_) => DataType::Boolean,
            TypedValue::String(_) => DataType::String,
        }
    }

    /// Encode to the HLA representation of [`Self::data_type`].
    ///
    /// A `Char` outside the Basic Multilingual Plane has no HLAunicodeChar
    /// form and is encoded as U+FFFD.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            TypedValue::Byte(v) => hla::encode_octet(*v),
            TypedValue::Char(c) => hla::encode_unicode_char(*c).unwrap_or_else(|| vec![0xFF, 0xFD]),
            TypedValue::Short(v) => hla::encode_i16(*v),
            TypedValue::Int(v) => hla::encode_i32(*v),
            TypedValue::Long(v) => hla::encode_i64(*v),
            TypedValue::Float(v) => hla::encode_f32(*v),
            TypedValue::Double(v) => hla::encode_f64(*v),
            TypedValue::Boolean(v) => hla::encode_boolean(*v),
            TypedValue::String(s) => hla::encode_unicode_string(s),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Byte(v) => write!(f, "{}", v),
            TypedValue::Char(v) => write!(f, "{}", v),
            TypedValue::Short(v) => write!(f, "{}", v),
            TypedValue::Int(v) => write!(f, "{}", v),
            TypedValue::Long(v) => write!(f, "{}", v),
            TypedValue::Float(v) => write!(f, "{}", v),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::Boolean(v) => write!(f, "{}", v),
            TypedValue::String(v) => write!(f, "{:?}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_checks_kind_width() {
        let int_bytes = TypedValue::Int(42).encode();
        assert_eq!(DataType::Int.decode(&int_bytes), Some(TypedValue::Int(42)));
        // 4 bytes is not a valid HLAinteger64BE or HLAinteger16BE
        assert_eq!(DataType::Long.decode(&int_bytes), None);
        assert_eq!(DataType::Short.decode(&int_bytes), None);
    }

    #[test]
    fn test_defaults_match_kind() {
        for dt in DataType::ALL {
            assert_eq!(dt.default_value().data_type(), dt);
        }
        assert_eq!(DataType::String.default_value(), TypedValue::String(String::new()));
    }

    #[test]
    fn test_hla_names() {
        assert_eq!(DataType::Double.hla_name(), "HLAfloat64BE");
        assert_eq!(DataType::Boolean.hla_name(), "HLAboolean");
        assert_eq!(DataType::String.rust_name(), "String");
    }

    #[test]
    fn test_parse_accepts_both_spellings() {
        assert_eq!(DataType::parse("int"), Some(DataType::Int));
        assert_eq!(DataType::parse("Double"), Some(DataType::Double));
        assert_eq!(DataType::parse("HLAunicodeString"), Some(DataType::String));
        assert_eq!(DataType::parse("quaternion"), None);
    }

    #[test]
    fn test_non_bmp_char_degrades() {
        let bytes = TypedValue::Char('\u{1F600}').encode();
        assert_eq!(
            DataType::Char.decode(&bytes),
            Some(TypedValue::Char(char::REPLACEMENT_CHARACTER))
        );
    }
}
