//! The mutable render configuration owned by each `CardMaker` instance.
//!
//! The store is deliberately loose: it records what was set and answers
//! queries, but it never validates what a value means for a key. Components
//! downstream interpret values through the accessors at the bottom of this
//! file and raise domain errors when a value cannot carry the meaning they
//! need.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Keys addressing the scalar configuration slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Default text alignment ("left", "center", "right")
    Align,
    /// Background color token or image source; "" means unset
    Background,
    /// Default text color
    Color,
    /// Download trigger target; "" means unset
    Download,
    /// Container target the surface attaches to
    Container,
    /// Surface width in pixels
    Width,
    /// Surface height in pixels
    Height,
}

impl ConfigKey {
    /// All keys, in declaration order.
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::Align,
        ConfigKey::Background,
        ConfigKey::Color,
        ConfigKey::Download,
        ConfigKey::Container,
        ConfigKey::Width,
        ConfigKey::Height,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::Align => "align",
            ConfigKey::Background => "background",
            ConfigKey::Color => "color",
            ConfigKey::Download => "download",
            ConfigKey::Container => "container",
            ConfigKey::Width => "width",
            ConfigKey::Height => "height",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A loosely typed configuration value.
///
/// Any variant may be stored under any key; interpretation happens at the
/// point of use.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Text(String),
    Pixels(u32),
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            ConfigValue::Pixels(_) => None,
        }
    }

    /// Interpret the value as a pixel count; textual digits are accepted.
    pub fn as_pixels(&self) -> Option<u32> {
        match self {
            ConfigValue::Pixels(n) => Some(*n),
            ConfigValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// The empty string is the "required but unset" sentinel.
    fn is_unset(&self) -> bool {
        matches!(self, ConfigValue::Text(s) if s.is_empty())
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        ConfigValue::Pixels(n)
    }
}

/// Per-instance configuration store with merge-on-set semantics.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    values: HashMap<ConfigKey, ConfigValue>,
}

impl ConfigStore {
    /// A store populated with the documented defaults.
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(ConfigKey::Align, ConfigValue::from("left"));
        values.insert(ConfigKey::Background, ConfigValue::from(""));
        values.insert(ConfigKey::Color, ConfigValue::from("black"));
        values.insert(ConfigKey::Download, ConfigValue::from(""));
        values.insert(ConfigKey::Container, ConfigValue::from("root"));
        values.insert(ConfigKey::Width, ConfigValue::from(300u32));
        values.insert(ConfigKey::Height, ConfigValue::from(150u32));
        Self { values }
    }

    /// The full record, by shared reference.
    pub fn all(&self) -> &HashMap<ConfigKey, ConfigValue> {
        &self.values
    }

    /// Fetch one key; the unset sentinel is an error here.
    pub fn get(&self, key: ConfigKey) -> Result<ConfigValue> {
        match self.values.get(&key) {
            Some(v) if !v.is_unset() => Ok(v.clone()),
            _ => Err(Error::ConfigKeyError(key.name().to_string())),
        }
    }

    /// Fetch one key; unset maps to `None`, never an error.
    pub fn lookup(&self, key: ConfigKey) -> Option<ConfigValue> {
        self.values
            .get(&key)
            .filter(|v| !v.is_unset())
            .cloned()
    }

    /// Fetch several keys at once. Each requested key maps to its current
    /// value, with unset keys mapping to `None`.
    pub fn get_many(&self, keys: &[ConfigKey]) -> HashMap<ConfigKey, Option<ConfigValue>> {
        keys.iter().map(|&k| (k, self.lookup(k))).collect()
    }

    /// Merge one key into the store and return its post-update value.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.values.insert(key, value.into());
        self.lookup(key)
    }

    /// Merge a batch of entries; later entries overwrite earlier ones for
    /// the same key. Returns the post-update values for the affected keys.
    pub fn set_many<I>(&mut self, entries: I) -> HashMap<ConfigKey, Option<ConfigValue>>
    where
        I: IntoIterator<Item = (ConfigKey, ConfigValue)>,
    {
        let affected: Vec<ConfigKey> = entries
            .into_iter()
            .map(|(k, v)| {
                self.values.insert(k, v);
                k
            })
            .collect();
        affected.iter().map(|&k| (k, self.lookup(k))).collect()
    }

    /// Interpret a key as text, raising the domain error for unset slots.
    pub(crate) fn text(&self, key: ConfigKey) -> Result<String> {
        let value = self.get(key)?;
        match value {
            ConfigValue::Text(s) => Ok(s),
            ConfigValue::Pixels(n) => Ok(n.to_string()),
        }
    }

    /// Interpret a key as a positive pixel dimension.
    pub(crate) fn dimension(&self, key: ConfigKey) -> Result<u32> {
        let value = self.get(key)?;
        match value.as_pixels() {
            Some(n) if n > 0 => Ok(n),
            _ => Err(Error::ConfigError(format!(
                "'{}' must be a positive pixel count, got {:?}",
                key, value
            ))),
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
