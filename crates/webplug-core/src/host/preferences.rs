use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host preferences handed to plugins during initialization.
///
/// Keys are case-insensitive: they are stored lowercased, so `LogLevel` and
/// `loglevel` name the same preference. Values are kept as strings and parsed
/// on read by the typed getters, which fall back to the supplied default when
/// the key is missing or the value does not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>", into = "BTreeMap<String, String>")]
pub struct Preferences {
    values: BTreeMap<String, String>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a preference, replacing any previous value for the same key
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_lowercase(), value.into());
        self
    }

    /// Raw string value, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Accepts `true`/`false` in any case
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "true" => true,
            Some(v) if v == "false" => false,
            _ => default,
        }
    }

    /// Accepts decimal and `0x`-prefixed hexadecimal integers
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(parse_integer).unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(lowercased key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (digits, radix) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };
    // Only the one sign stripped above is allowed
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    // Parsing with the sign attached keeps i64::MIN in range
    let signed = if negative { format!("-{}", digits) } else { digits.to_string() };
    i64::from_str_radix(&signed, radix).ok()
}

/// Error for preference values that are not scalars
#[derive(Debug)]
pub struct InvalidPreference {
    key: String,
}

impl fmt::Display for InvalidPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preference '{}' must be a string, number or boolean", self.key)
    }
}

impl TryFrom<BTreeMap<String, Value>> for Preferences {
    type Error = InvalidPreference;

    fn try_from(raw: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut prefs = Preferences::new();
        for (key, value) in raw {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                _ => return Err(InvalidPreference { key }),
            };
            prefs.set(&key, value);
        }
        Ok(prefs)
    }
}

impl From<Preferences> for BTreeMap<String, String> {
    fn from(prefs: Preferences) -> Self {
        prefs.values
    }
}
