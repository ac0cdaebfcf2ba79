// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed access to attribute/parameter payloads.
//!
//! Federates built independently evolve their FOMs at different speeds, so a
//! missing or malformed field is not an error here: every getter returns the
//! kind's safe default (0, `false`, `""`, empty bytes). A field that is
//! present but cannot be decoded is logged at `warn`.

use crate::codec::{DataType, TypedValue};
use std::collections::HashMap;

/// Name → raw bytes payload with typed getters and fluent setters.
pub trait ValueMap {
    fn values(&self) -> &HashMap<String, Vec<u8>>;
    fn values_mut(&mut self) -> &mut HashMap<String, Vec<u8>>;

    /// Human-readable owner used in log lines (class name).
    fn owner(&self) -> &str;

    fn is_present(&self, name: &str) -> bool {
        self.values().contains_key(name)
    }

    fn raw(&self, name: &str) -> Option<&[u8]> {
        self.values().get(name).map(Vec::as_slice)
    }

    /// Decode a field; `None` when absent or malformed.
    fn get_value(&self, name: &str, data_type: DataType) -> Option<TypedValue> {
        let raw = self.raw(name)?;
        let decoded = data_type.decode(raw);
        if decoded.is_none() {
            log::warn!(
                "[values] {}.{}: {} bytes are not a valid {}",
                self.owner(),
                name,
                raw.len(),
                data_type.hla_name()
            );
        }
        decoded
    }

    /// Decode a field, falling back to the kind's default.
    fn get_or_default(&self, name: &str, data_type: DataType) -> TypedValue {
        self.get_value(name, data_type)
            .unwrap_or_else(|| data_type.default_value())
    }

    fn get_bytes(&self, name: &str) -> Vec<u8> {
        self.raw(name).map(<[u8]>::to_vec).unwrap_or_default()
    }

    fn get_byte(&self, name: &str) -> u8 {
        match self.get_value(name, DataType::Byte) {
            Some(TypedValue::Byte(v)) => v,
            _ => 0,
        }
    }

    fn get_char(&self, name: &str) -> char {
        match self.get_value(name, DataType::Char) {
            Some(TypedValue::Char(v)) => v,
            _ => '\0',
        }
    }

    fn get_short(&self, name: &str) -> i16 {
        match self.get_value(name, DataType::Short) {
            Some(TypedValue::Short(v)) => v,
            _ => 0,
        }
    }

    fn get_int(&self, name: &str) -> i32 {
        match self.get_value(name, DataType::Int) {
            Some(TypedValue::Int(v)) => v,
            _ => 0,
        }
    }

    fn get_long(&self, name: &str) -> i64 {
        match self.get_value(name, DataType::Long) {
            Some(TypedValue::Long(v)) => v,
            _ => 0,
        }
    }

    fn get_float(&self, name: &str) -> f32 {
        match self.get_value(name, DataType::Float) {
            Some(TypedValue::Float(v)) => v,
            _ => 0.0,
        }
    }

    fn get_double(&self, name: &str) -> f64 {
        match self.get_value(name, DataType::Double) {
            Some(TypedValue::Double(v)) => v,
            _ => 0.0,
        }
    }

    fn get_boolean(&self, name: &str) -> bool {
        matches!(
            self.get_value(name, DataType::Boolean),
            Some(TypedValue::Boolean(true))
        )
    }

    fn get_string(&self, name: &str) -> String {
        match self.get_value(name, DataType::String) {
            Some(TypedValue::String(v)) => v,
            _ => String::new(),
        }
    }

    fn set_bytes(&mut self, name: &str, bytes: Vec<u8>) -> &mut Self
    where
        Self: Sized,
    {
        self.values_mut().insert(name.to_string(), bytes);
        self
    }

    fn set_value(&mut self, name: &str, value: &TypedValue) -> &mut Self
    where
        Self: Sized,
    {
        self.set_bytes(name, value.encode())
    }

    fn set_byte(&mut self, name: &str, v: u8) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Byte(v))
    }

    fn set_char(&mut self, name: &str, v: char) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Char(v))
    }

    fn set_short(&mut self, name: &str, v: i16) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Short(v))
    }

    fn set_int(&mut self, name: &str, v: i32) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Int(v))
    }

    fn set_long(&mut self, name: &str, v: i64) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Long(v))
    }

    fn set_float(&mut self, name: &str, v: f32) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Float(v))
    }

    fn set_double(&mut self, name: &str, v: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Double(v))
    }

    fn set_boolean(&mut self, name: &str, v: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::Boolean(v))
    }

    fn set_string(&mut self, name: &str, v: &str) -> &mut Self
    where
        Self: Sized,
    {
        self.set_value(name, &TypedValue::String(v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Bag(HashMap<String, Vec<u8>>);

    impl ValueMap for Bag {
        fn values(&self) -> &HashMap<String, Vec<u8>> {
            &self.0
        }
        fn values_mut(&mut self) -> &mut HashMap<String, Vec<u8>> {
            &mut self.0
        }
        fn owner(&self) -> &str {
            "Bag"
        }
    }

    #[test]
    fn test_empty_map_returns_defaults() {
        let bag = Bag::default();
        assert_eq!(bag.get_byte("x"), 0);
        assert_eq!(bag.get_char("x"), '\0');
        assert_eq!(bag.get_short("x"), 0);
        assert_eq!(bag.get_int("x"), 0);
        assert_eq!(bag.get_long("x"), 0);
        assert_eq!(bag.get_float("x"), 0.0);
        assert_eq!(bag.get_double("x"), 0.0);
        assert!(!bag.get_boolean("x"));
        assert_eq!(bag.get_string("x"), "");
        assert!(bag.get_bytes("x").is_empty());
        assert!(!bag.is_present("x"));
    }

    #[test]
    fn test_fluent_setters() {
        let mut bag = Bag::default();
        bag.set_int("count", 3)
            .set_string("name", "alpha")
            .set_boolean("flag", true)
            .set_double("speed", 12.5);
        assert_eq!(bag.get_int("count"), 3);
        assert_eq!(bag.get_string("name"), "alpha");
        assert!(bag.get_boolean("flag"));
        assert_eq!(bag.get_double("speed"), 12.5);
        assert!(bag.is_present("count"));
        assert!(!bag.is_present("missing"));
    }

    #[test]
    fn test_wrong_type_degrades_to_default() {
        let mut bag = Bag::default();
        bag.set_string("count", "seven");
        assert_eq!(bag.get_int("count"), 0);
        assert_eq!(bag.get_long("count"), 0);
        // the raw bytes are still reachable
        assert!(!bag.get_bytes("count").is_empty());
    }

    #[test]
    fn test_partial_map() {
        let mut bag = Bag::default();
        bag.set_short("a", -2);
        assert_eq!(bag.get_short("a"), -2);
        assert_eq!(bag.get_or_default("b", DataType::Float), TypedValue::Float(0.0));
        assert_eq!(bag.get_value("b", DataType::Float), None);
    }
}
