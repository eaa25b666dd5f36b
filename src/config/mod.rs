//! Typed, nested key-value configuration.
//!
//! A [`Config`] parameterizes agents, environments and experiments without
//! recompiling. Lookups are permissive: a missing key, or a key holding a
//! value of a different type, yields the caller-supplied default instead of
//! an error.
//!
//! ```
//! use rlharness::config::Config;
//!
//! let config = Config::parse_text("{\n  \"x\": 5,\n  \"y\": \"hi\"\n}")?;
//! assert_eq!(config.get::<i64>("x", 0), 5);
//! assert_eq!(config.get::<f64>("x", 0.0), 0.0);
//! # Ok::<(), rlharness::Error>(())
//! ```

mod text;
mod value;

use std::{collections::BTreeMap, fs, path::Path};

pub use value::{ConfigScalar, ConfigValue};

use crate::{Error, Result};

/// Scalar values plus named nested sections.
///
/// Scalars and sections live in separate maps, so a scalar `"agent"` and a
/// section `"agent"` never shadow each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
    sections: BTreeMap<String, Config>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the line-oriented text format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for unterminated quotes or empty keys.
    pub fn parse_text(source: &str) -> Result<Self> {
        text::parse(source)
    }

    /// Load a configuration file in the text format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file cannot be read, or
    /// [`Error::ConfigParse`] if its contents are malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse_text(&source)?;
        tracing::debug!(path = %path.display(), keys = config.len(), "loaded config");
        Ok(config)
    }

    /// Render the scalar values in the text format.
    ///
    /// Sections are not written.
    pub fn to_text(&self) -> String {
        text::write(self)
    }

    /// Write the scalar values to a file in the text format.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_text()).map_err(|source| Error::Io {
            operation: format!("write config file {path:?}"),
            source,
        })
    }

    /// Typed lookup with a fallback.
    ///
    /// Returns `default` if `key` is absent or holds a different type.
    pub fn get<T: ConfigScalar>(&self, key: &str, default: T) -> T {
        self.values
            .get(key)
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    /// Borrowing string lookup with a fallback.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.values.get(key) {
            Some(ConfigValue::Str(value)) => value,
            _ => default,
        }
    }

    /// Typed lookup without a fallback.
    ///
    /// Returns `None` if `key` is absent or holds a value that does not
    /// convert to `T`, the same rule [`get`](Self::get) applies.
    pub fn get_opt<T: ConfigScalar>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(T::from_value)
    }

    /// Raw value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Store or overwrite a scalar value.
    ///
    /// Empty keys cannot be written back as text and are dropped.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        if key.is_empty() {
            tracing::warn!("ignoring config value with an empty key");
            return;
        }
        self.values.insert(key, value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Nested section, or an empty config if absent.
    pub fn section(&self, name: &str) -> Config {
        self.sections.get(name).cloned().unwrap_or_default()
    }

    /// Borrow a nested section if present.
    pub fn section_ref(&self, name: &str) -> Option<&Config> {
        self.sections.get(name)
    }

    /// Store or overwrite a nested section.
    pub fn set_section(&mut self, name: impl Into<String>, section: Config) {
        self.sections.insert(name.into(), section);
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Scalar keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Scalar entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of scalar values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.sections.is_empty()
    }

    /// Overlay `other` on top of `self`: its scalars and sections win.
    pub fn merged_with(&self, other: &Config) -> Config {
        let mut merged = self.clone();
        for (key, value) in &other.values {
            merged.values.insert(key.clone(), value.clone());
        }
        for (name, section) in &other.sections {
            merged.sections.insert(name.clone(), section.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Config::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_return_default() {
        let config = Config::new();
        assert_eq!(config.get::<i64>("missing", 7), 7);
        assert_eq!(config.get::<i32>("missing", -2), -2);
        assert_eq!(config.get::<u64>("missing", 9), 9);
        assert_eq!(config.get::<usize>("missing", 4), 4);
        assert_eq!(config.get::<f64>("missing", 1.5), 1.5);
        assert_eq!(config.get::<String>("missing", "d".to_string()), "d");
        assert!(config.get("missing", true));
        assert_eq!(config.get_str("missing", "fallback"), "fallback");
    }

    #[test]
    fn optional_lookup_treats_mismatch_as_absent() {
        let config = Config::new()
            .with("seed", 5)
            .with("negative", -3)
            .with("word", "abc")
            .with("real", 2.0);
        assert_eq!(config.get_opt::<u64>("seed"), Some(5));
        assert_eq!(config.get_opt::<u64>("negative"), None);
        assert_eq!(config.get_opt::<u64>("word"), None);
        assert_eq!(config.get_opt::<u64>("real"), None);
        assert_eq!(config.get_opt::<u64>("missing"), None);
    }

    #[test]
    fn empty_key_is_not_stored() {
        let config = Config::new().with("", 1).with("x", 2);
        assert_eq!(config.len(), 1);
        assert!(!config.has(""));
        assert_eq!(Config::parse_text(&config.to_text()).unwrap(), config);
    }

    #[test]
    fn scalars_and_sections_are_keyed_separately() {
        let mut config = Config::new().with("agent", "random");
        config.set_section("agent", Config::new().with("seed", 3));

        assert_eq!(config.get_str("agent", ""), "random");
        assert_eq!(config.section("agent").get::<i64>("seed", 0), 3);
        assert!(config.has("agent"));
        assert!(config.has_section("agent"));
        assert!(!config.has_section("environment"));
        assert!(config.section("environment").is_empty());
    }

    #[test]
    fn set_overwrites_including_type() {
        let mut config = Config::new().with("x", 1);
        config.set("x", "one");
        assert_eq!(config.get::<i64>("x", 0), 0);
        assert_eq!(config.get_str("x", ""), "one");
    }

    #[test]
    fn merge_prefers_overlay() {
        let base: Config = [("a", 1), ("b", 2)].into_iter().collect();
        let overlay = Config::new().with("b", 20);
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.get::<i64>("a", 0), 1);
        assert_eq!(merged.get::<i64>("b", 0), 20);
    }
}
