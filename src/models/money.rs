//! Monetary amounts.
//!
//! The backend serializes decimals as strings. Amounts stay strings until
//! they are formatted or turned into a request number, and arithmetic is
//! done on integer cents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money(String);

impl Money {
    pub fn new(raw: impl Into<String>) -> Self {
        Money(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn cents(&self) -> Option<i64> {
        parse_cents(&self.0)
    }

    /// Value sent in request bodies.
    pub fn to_number(&self) -> Option<f64> {
        self.cents().map(|cents| cents as f64 / 100.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cents() {
            Some(cents) => f.write_str(&format_cop(cents)),
            None => write!(f, "${}", self.0),
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => Ok(Money(raw)),
            Value::Number(number) => Ok(Money(number.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a decimal amount, found {other}"
            ))),
        }
    }
}

/// Parses `"150"`, `"150.5"` or `"150.00"` into cents. More than two
/// decimals, signs other than a leading `-`, and empty input are rejected.
pub fn parse_cents(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };
    if whole.is_empty() || fraction.len() > 2 {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    let cents = whole.checked_mul(100)?.checked_add(fraction)?;
    Some(if negative { -cents } else { cents })
}

/// Colombian peso format: `$ 150.000,00`.
pub fn format_cop(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{sign}$ {grouped},{fraction:02}")
}
