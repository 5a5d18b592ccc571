//! Loosely-typed scalar inputs as they show up in bestiary records, homebrew
//! settings and note front-matter, plus the coercions that turn them into
//! combat numbers.
//!
//! Every coercion here fails soft: empty text, `null`, non-finite and
//! non-numeric values all come back as `None` so callers can pick their own
//! fallback (usually `0` or "leave unchanged").

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A number as authored by a human: a real number, numeric text, or junk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl NumberInput {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            NumberInput::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            NumberInput::Text(s) => parse_number(s),
            NumberInput::Other(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            NumberInput::Other(_) => None,
        }
    }

    /// Fractions truncate toward zero; out-of-range values saturate.
    pub fn to_i32(&self) -> Option<i32> {
        self.to_f64().map(|v| v.trunc() as i32)
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_f64().map(|v| v.trunc() as i64)
    }

    /// True only for an actual number literal (not numeric text).
    pub fn is_number(&self) -> bool {
        matches!(self, NumberInput::Number(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NumberInput::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i32> for NumberInput {
    fn from(n: i32) -> Self {
        NumberInput::Number(n.into())
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        NumberInput::Text(s.to_string())
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// HP coercion: first present raw value, `0` when it is missing or unusable.
pub fn coerce_hp(raw: Option<&NumberInput>) -> i32 {
    raw.and_then(NumberInput::to_i32).unwrap_or(0)
}

/// Armor class is usually a number, but statblocks also carry text like "15 (natural armor)".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArmorClass {
    Number(serde_json::Number),
    Text(String),
}

impl From<i32> for ArmorClass {
    fn from(n: i32) -> Self {
        ArmorClass::Number(n.into())
    }
}

impl fmt::Display for ArmorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmorClass::Number(n) => write!(f, "{}", n),
            ArmorClass::Text(s) => f.write_str(s),
        }
    }
}

/// "1/4", 0.25 and 5 are all valid challenge ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChallengeRating {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeRating::Number(n) => write!(f, "{}", n),
            ChallengeRating::Text(s) => f.write_str(s),
        }
    }
}

/// Initiative modifier; some systems roll with several modifiers at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Modifier {
    Flat(i32),
    Many(Vec<i32>),
}

impl Default for Modifier {
    fn default() -> Self {
        Modifier::Flat(0)
    }
}

impl Modifier {
    pub fn total(&self) -> i32 {
        match self {
            Modifier::Flat(m) => *m,
            Modifier::Many(ms) => ms.iter().sum(),
        }
    }

    /// Interpret a raw modifier field. Arrays keep their shape; anything
    /// that is neither numeric nor a list yields `None`.
    pub fn from_value(value: &Value) -> Option<Modifier> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(|v| Modifier::Flat(v.trunc() as i32)),
            Value::String(s) => parse_number(s).map(|v| Modifier::Flat(v.trunc() as i32)),
            Value::Array(items) => Some(Modifier::Many(
                items
                    .iter()
                    .map(|item| Modifier::from_value(item).map(|m| m.total()).unwrap_or(0))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Modifier::Flat(m) => Value::from(*m),
            Modifier::Many(ms) => Value::from(ms.clone()),
        }
    }
}

impl From<i32> for Modifier {
    fn from(m: i32) -> Self {
        Modifier::Flat(m)
    }
}

/// Where a creature came from: one book or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    One(String),
    Many(Vec<String>),
}

/// Keeps "field absent" (`None`) apart from "field present but null" (`Some(None)`).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
