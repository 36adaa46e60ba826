//! Tagged representation of prover output and the integer normalization pass.
//!
//! snarkjs emits every field element as a decimal string. The verifier contracts
//! want exact integers, so [`unstringify`] walks the nested value and turns every
//! numeric-string leaf into a [`U256`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use alloy_primitives::U256;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("decimal pattern"));
static HEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").expect("hex pattern"));

/// A value produced by the external prover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofValue {
    Int(U256),
    Text(String),
    /// A JSON number that was never a string; normalization leaves it alone.
    Number(Number),
    Bool(bool),
    List(Vec<ProofValue>),
    Map(BTreeMap<String, ProofValue>),
    Null,
}

/// Parses a decimal or `0x` hexadecimal string into a 256-bit integer.
///
/// Returns `None` when the text matches neither pattern or does not fit in 256 bits.
pub fn parse_uint(text: &str) -> Option<U256> {
    if DECIMAL_PATTERN.is_match(text) {
        U256::from_str_radix(text, 10).ok()
    } else if HEX_PATTERN.is_match(text) {
        U256::from_str_radix(&text[2..], 16).ok()
    } else {
        None
    }
}

/// Recursively converts every numeric-string leaf to [`ProofValue::Int`].
///
/// Lists keep their order and length, maps keep their key set, and every other
/// leaf passes through untouched, so applying it twice is the same as once.
pub fn unstringify(value: ProofValue) -> ProofValue {
    match value {
        ProofValue::Text(text) => match parse_uint(&text) {
            Some(int) => ProofValue::Int(int),
            None => ProofValue::Text(text),
        },
        ProofValue::List(items) => ProofValue::List(items.into_iter().map(unstringify).collect()),
        ProofValue::Map(entries) => {
            ProofValue::Map(entries.into_iter().map(|(key, value)| (key, unstringify(value))).collect())
        }
        other => other,
    }
}

/// Inverse of [`unstringify`]: renders every integer leaf as a decimal string.
pub fn stringify(value: ProofValue) -> ProofValue {
    match value {
        ProofValue::Int(int) => ProofValue::Text(int.to_string()),
        ProofValue::List(items) => ProofValue::List(items.into_iter().map(stringify).collect()),
        ProofValue::Map(entries) => {
            ProofValue::Map(entries.into_iter().map(|(key, value)| (key, stringify(value))).collect())
        }
        other => other,
    }
}

impl ProofValue {
    pub fn get(&self, key: &str) -> Option<&ProofValue> {
        match self {
            ProofValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    pub fn at(&self, index: usize) -> Option<&ProofValue> {
        match self {
            ProofValue::List(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            ProofValue::Int(int) => Some(*int),
            ProofValue::Number(number) => number.as_u64().map(U256::from),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ProofValue]> {
        match self {
            ProofValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProofValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::from(self)
    }
}

impl From<Value> for ProofValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ProofValue::Null,
            Value::Bool(flag) => ProofValue::Bool(flag),
            Value::Number(number) => ProofValue::Number(number),
            Value::String(text) => ProofValue::Text(text),
            Value::Array(items) => ProofValue::List(items.into_iter().map(ProofValue::from).collect()),
            Value::Object(entries) => {
                ProofValue::Map(entries.into_iter().map(|(key, value)| (key, ProofValue::from(value))).collect())
            }
        }
    }
}

impl From<&ProofValue> for Value {
    fn from(value: &ProofValue) -> Self {
        match value {
            ProofValue::Int(int) => Value::String(int.to_string()),
            ProofValue::Text(text) => Value::String(text.clone()),
            ProofValue::Number(number) => Value::Number(number.clone()),
            ProofValue::Bool(flag) => Value::Bool(*flag),
            ProofValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            ProofValue::Map(entries) => {
                Value::Object(entries.iter().map(|(key, value)| (key.clone(), Value::from(value))).collect())
            }
            ProofValue::Null => Value::Null,
        }
    }
}

impl From<U256> for ProofValue {
    fn from(int: U256) -> Self {
        ProofValue::Int(int)
    }
}

impl From<&str> for ProofValue {
    fn from(text: &str) -> Self {
        ProofValue::Text(text.to_string())
    }
}

impl Serialize for ProofValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProofValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ProofValue::from)
    }
}
