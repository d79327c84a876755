//! Layout configuration for the formatter.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::value::Value;

/// Caller-supplied formatting policy. Read-only while a value is formatted.
///
/// Loaded from JSON with [`LayoutConfig::from_json`]; missing fields take their
/// defaults:
///
/// ```json
/// { "include_names": true, "multi_line": true, "naming": "smart" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Prefix each value with a name (`x: 1`).
    pub include_names: bool,
    /// One value per line, indented by two spaces.
    pub multi_line: bool,
    /// Overrides the separator in both layouts.
    pub separator: Option<String>,
    /// Wrap values as `Kind(...)` rather than `(...)`.
    pub include_type_name: bool,
    /// Names used in order before falling back to `naming`.
    pub explicit_names: Option<Vec<String>>,
    /// Inference for values not covered by `explicit_names`.
    pub naming: NamingStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            include_names: false,
            multi_line: false,
            separator: None,
            include_type_name: true,
            explicit_names: None,
            naming: NamingStrategy::Positional,
        }
    }
}

impl LayoutConfig {
    pub const SINGLE_LINE_SEPARATOR: &'static str = ", ";
    pub const MULTI_LINE_SEPARATOR: &'static str = ",\n";

    /// Bare `(1, 2)`: no type name, no value names.
    pub fn compact() -> Self {
        Self {
            include_type_name: false,
            ..Self::default()
        }
    }

    /// Multi-line with positional names.
    pub fn pretty() -> Self {
        Self {
            include_names: true,
            multi_line: true,
            ..Self::default()
        }
    }

    pub fn with_type_name(mut self, include: bool) -> Self {
        self.include_type_name = include;
        self
    }

    pub fn with_names(mut self, include: bool) -> Self {
        self.include_names = include;
        self
    }

    pub fn with_multi_line(mut self, multi_line: bool) -> Self {
        self.multi_line = multi_line;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets explicit names and turns name output on.
    pub fn with_explicit_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit_names = Some(names.into_iter().map(Into::into).collect());
        self.include_names = true;
        self
    }

    /// Sets the naming strategy and turns name output on.
    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self.include_names = true;
        self
    }

    /// Separator between rendered values for the active layout.
    pub fn separator(&self) -> &str {
        match (&self.separator, self.multi_line) {
            (Some(custom), _) => custom,
            (None, false) => Self::SINGLE_LINE_SEPARATOR,
            (None, true) => Self::MULTI_LINE_SEPARATOR,
        }
    }

    /// Explicit names must be non-blank and distinct.
    pub fn validate(&self) -> ConfigResult<()> {
        let Some(names) = &self.explicit_names else {
            return Ok(());
        };
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::validation(format!(
                    "explicit name at position {index} is blank"
                )));
            }
            if names[..index].contains(name) {
                return Err(ConfigError::validation(format!(
                    "explicit name {name:?} is used more than once"
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON layout configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// How names are inferred for values the explicit list does not cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// `value0`, `value1`, ...
    #[default]
    Positional,
    /// Lower-cased runtime type name of the value.
    TypeBased,
    /// Guess from the value's shape (`email`, `age`, `items`, ...).
    Smart,
    /// Caller-supplied generator. Not serializable.
    #[serde(skip)]
    Custom(NameGenerator),
}

impl NamingStrategy {
    pub fn custom<F>(generator: F) -> Self
    where
        F: Fn(&Value, usize) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(NameGenerator(Arc::new(generator)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStrategy::Positional => "positional",
            NamingStrategy::TypeBased => "type_based",
            NamingStrategy::Smart => "smart",
            NamingStrategy::Custom(_) => "custom",
        }
    }
}

impl FromStr for NamingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(NamingStrategy::Positional),
            "type_based" | "type" => Ok(NamingStrategy::TypeBased),
            "smart" => Ok(NamingStrategy::Smart),
            other => Err(ConfigError::unknown_strategy(other)),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name generator: `(value, index) -> Option<name>`. `None` falls back to the
/// positional name.
#[derive(Clone)]
pub struct NameGenerator(Arc<dyn Fn(&Value, usize) -> Option<String> + Send + Sync>);

impl NameGenerator {
    pub fn generate(&self, value: &Value, index: usize) -> Option<String> {
        (self.0)(value, index)
    }
}

impl PartialEq for NameGenerator {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for NameGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameGenerator(..)")
    }
}
