//! Account snapshot value tree
//!
//! Brokers report balances as arbitrary-precision integers. [`BrokerValue`]
//! keeps them exact, and [`BrokerValue::normalize`] turns the tree into JSON
//! that clients can parse without losing digits:
//!
//! - `Integer` becomes its exact decimal string, at any depth
//! - `Null` stays `null`
//! - everything else keeps its JSON type

use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint};
use serde_json::{Number, Value};

/// Largest integer an IEEE-754 double represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Tagged value tree: scalar | sequence | mapping | null
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerValue {
    Null,
    Bool(bool),
    /// Broker-side big integer (token balances in neuron)
    Integer(BigInt),
    /// Plain JSON number that fits native precision
    Number(Number),
    Text(String),
    List(Vec<BrokerValue>),
    Map(BTreeMap<String, BrokerValue>),
}

impl BrokerValue {
    /// Build a mapping from key/value pairs
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, BrokerValue)>,
    {
        BrokerValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert into client-safe JSON. Total: every tree has an image.
    pub fn normalize(&self) -> Value {
        match self {
            BrokerValue::Null => Value::Null,
            BrokerValue::Bool(b) => Value::Bool(*b),
            BrokerValue::Integer(i) => Value::String(i.to_string()),
            BrokerValue::Number(n) => Value::Number(n.clone()),
            BrokerValue::Text(s) => Value::String(s.clone()),
            BrokerValue::List(items) => Value::Array(items.iter().map(Self::normalize).collect()),
            BrokerValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.normalize()))
                    .collect(),
            ),
        }
    }

    /// Read a broker JSON document.
    ///
    /// Integer literals outside the safe range become [`BrokerValue::Integer`];
    /// the exact digits survive because serde_json keeps the literal text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => BrokerValue::Null,
            Value::Bool(b) => BrokerValue::Bool(b),
            Value::Number(n) => classify_number(n),
            Value::String(s) => BrokerValue::Text(s),
            Value::Array(items) => {
                BrokerValue::List(items.into_iter().map(Self::from_json).collect())
            }
            Value::Object(entries) => BrokerValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn classify_number(n: Number) -> BrokerValue {
    let literal = n.to_string();
    let digits = literal.strip_prefix('-').unwrap_or(&literal);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return BrokerValue::Number(n);
    }
    match literal.parse::<BigInt>() {
        Ok(i) if i.magnitude() > &BigUint::from(MAX_SAFE_INTEGER) => BrokerValue::Integer(i),
        _ => BrokerValue::Number(n),
    }
}

impl From<&str> for BrokerValue {
    fn from(s: &str) -> Self {
        BrokerValue::Text(s.to_string())
    }
}
