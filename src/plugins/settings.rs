use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a plugin setting is edited.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingKind {
    Text,
    Number { minimum: i64, maximum: i64 },
    /// A fixed set of `(label, value)` choices.
    List(Vec<(&'static str, &'static str)>),
}

/// One entry of a plugin's settings schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: SettingKind,
    pub default: Option<Value>,
}

impl SettingSpec {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Text,
            default: None,
        }
    }

    pub fn number(key: &'static str, label: &'static str, minimum: i64, maximum: i64, default: i64) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Number { minimum, maximum },
            default: Some(Value::from(default)),
        }
    }

    pub fn list(
        key: &'static str,
        label: &'static str,
        options: Vec<(&'static str, &'static str)>,
        default: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::List(options),
            default: Some(Value::from(default)),
        }
    }
}

/// Settings object handed to a plugin for one request.
///
/// Lookups treat `null`, `false` and empty strings as absent, so a blank
/// `query` is the same as no `query` at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginSettings(Map<String, Value>);

impl PluginSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| is_present(v))
    }

    /// A setting as text; numbers are formatted.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// A setting as a non-negative integer; numeric strings are accepted.
    pub fn number(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Fill keys missing here from `defaults` without overriding present ones.
    pub fn merged_over(mut self, defaults: &PluginSettings) -> Self {
        for (key, value) in &defaults.0 {
            if self.get(key).is_none() {
                self.0.insert(key.clone(), value.clone());
            }
        }
        self
    }

    /// Fill keys missing here from the schema defaults.
    pub fn with_schema_defaults(mut self, schema: &[SettingSpec]) -> Self {
        for spec in schema {
            if let Some(default) = &spec.default {
                if self.get(spec.key).is_none() {
                    self.0.insert(spec.key.to_string(), default.clone());
                }
            }
        }
        self
    }

    /// Parse a `key=value` pair as given on the command line.
    pub fn parse_pair(pair: &str) -> Result<(String, Value), String> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Invalid setting '{}': expected key=value", pair))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Invalid setting '{}': empty key", pair));
        }

        let value = value.trim();
        let value = match value.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => match value {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(value.to_string()),
            },
        };

        Ok((key.to_string(), value))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
