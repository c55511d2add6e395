//! Format registry: the recognized input patterns and output templates for
//! each supported locale.
//!
//! The registry is an explicit instance rather than process-global state.
//! Callers construct one (usually via [`FormatRegistry::with_defaults`]) at
//! the composition root and share it with [`crate::Unlocalizer`] /
//! [`crate::Localizer`] instances through an `Arc`, which keeps tests and
//! concurrent callers naturally isolated. Last registration for a locale wins.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Capture-group indices (1-based) that locate each date field inside an
/// input pattern's match.
///
/// `y`, `m` and `d` are always required. `h` and `i` are required for
/// timestamp patterns; `s` may be absent, in which case seconds default to
/// `00` during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSlices {
    pub y: usize,
    pub m: usize,
    pub d: usize,
    pub h: Option<usize>,
    pub i: Option<usize>,
    pub s: Option<usize>,
}

impl DateSlices {
    /// Slices for a date-only pattern.
    pub fn date(y: usize, m: usize, d: usize) -> Self {
        Self {
            y,
            m,
            d,
            h: None,
            i: None,
            s: None,
        }
    }

    /// Slices for a timestamp pattern, optionally with a seconds group.
    pub fn timestamp(y: usize, m: usize, d: usize, h: usize, i: usize, s: Option<usize>) -> Self {
        Self {
            y,
            m,
            d,
            h: Some(h),
            i: Some(i),
            s,
        }
    }

    fn max_index(&self) -> usize {
        [
            Some(self.y),
            Some(self.m),
            Some(self.d),
            self.h,
            self.i,
            self.s,
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
    }
}

/// One recognized input pattern: a regex plus the slice mapping that pulls
/// date fields out of its capture groups.
#[derive(Debug, Clone)]
pub struct InputPattern {
    pattern: Regex,
    slices: DateSlices,
}

impl InputPattern {
    /// Compile a pattern and validate it against its slices.
    ///
    /// # Errors
    /// [`Error::Configuration`] when the pattern is empty, fails to compile,
    /// or defines fewer capture groups than the largest slice index.
    pub fn new(pattern: &str, slices: DateSlices) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::Configuration {
                locale: String::new(),
                reason: "input pattern must not be empty".to_string(),
            });
        }

        let compiled = Regex::new(pattern).map_err(|e| Error::Configuration {
            locale: String::new(),
            reason: format!("invalid input pattern '{}': {}", pattern, e),
        })?;

        // captures_len counts the implicit whole-match group 0.
        if compiled.captures_len() <= slices.max_index() {
            return Err(Error::Configuration {
                locale: String::new(),
                reason: format!(
                    "pattern '{}' has {} capture groups but slices reference group {}",
                    pattern,
                    compiled.captures_len() - 1,
                    slices.max_index()
                ),
            });
        }

        Ok(Self {
            pattern: compiled,
            slices,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn slices(&self) -> &DateSlices {
        &self.slices
    }
}

/// Input format descriptor for one locale: how dates and timestamps typed by
/// a user of that locale look.
#[derive(Debug, Clone)]
pub struct InputFormat {
    pub date: InputPattern,
    pub timestamp: InputPattern,
}

/// Output format descriptor for one locale: the four templates values are
/// rendered with.
///
/// `small` and `full` use `date()`-style characters (`Y m d H i s`);
/// `literal` and `literal_with_time` use `strftime`-style directives with
/// spelled-out names. All four keys must be present; values may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    pub small: String,
    pub literal: String,
    #[serde(rename = "literalWithTime")]
    pub literal_with_time: String,
    pub full: String,
}

impl OutputFormat {
    /// Build an output descriptor from a loose key/value map, e.g. one loaded
    /// from configuration.
    ///
    /// # Errors
    /// [`Error::Configuration`] when any of the four required keys (`small`,
    /// `literal`, `literalWithTime`, `full`) is missing.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let required = ["small", "literal", "literalWithTime", "full"];

        for key in required {
            if !map.contains_key(key) {
                return Err(Error::Configuration {
                    locale: String::new(),
                    reason: format!("output descriptor is missing the '{}' key", key),
                });
            }
        }

        Ok(Self {
            small: map["small"].clone(),
            literal: map["literal"].clone(),
            literal_with_time: map["literalWithTime"].clone(),
            full: map["full"].clone(),
        })
    }
}

#[derive(Debug, Default)]
struct Tables {
    input: HashMap<String, Arc<InputFormat>>,
    output: HashMap<String, Arc<OutputFormat>>,
}

/// Registry of input and output formats, keyed by locale identifier.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    tables: RwLock<Tables>,
}

impl FormatRegistry {
    /// An empty registry with no locales.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in `pt_BR` and `en_US`
    /// formats.
    pub fn with_defaults() -> Self {
        let registry = Self::new();

        registry
            .register_input("pt_BR", builtin_pt_br_input())
            .and_then(|_| registry.register_input("en_US", builtin_en_us_input()))
            .and_then(|_| registry.register_output("pt_BR", builtin_pt_br_output()))
            .and_then(|_| registry.register_output("en_US", builtin_en_us_output()))
            .unwrap_or_else(|e| unreachable!("built-in formats are valid: {}", e));

        registry
    }

    /// Register (or replace) the input format for a locale.
    ///
    /// # Errors
    /// [`Error::Configuration`] when the timestamp pattern's slices omit the
    /// hour or minute group. Pattern-level validation happens in
    /// [`InputPattern::new`].
    pub fn register_input(&self, locale: &str, format: InputFormat) -> Result<()> {
        if format.timestamp.slices.h.is_none() || format.timestamp.slices.i.is_none() {
            return Err(Error::Configuration {
                locale: locale.to_string(),
                reason: "timestamp slices must include hour and minute groups".to_string(),
            });
        }

        let mut tables = self.tables.write().expect("registry lock poisoned");
        tables.input.insert(locale.to_string(), Arc::new(format));

        Ok(())
    }

    /// Register (or replace) the output format for a locale.
    pub fn register_output(&self, locale: &str, format: OutputFormat) -> Result<()> {
        let mut tables = self.tables.write().expect("registry lock poisoned");
        tables.output.insert(locale.to_string(), Arc::new(format));

        Ok(())
    }

    /// Look up the input format for a locale. Absence is a normal outcome.
    pub fn lookup_input(&self, locale: &str) -> Option<Arc<InputFormat>> {
        let tables = self.tables.read().expect("registry lock poisoned");
        tables.input.get(locale).cloned()
    }

    /// Look up the output format for a locale. Absence is a normal outcome.
    pub fn lookup_output(&self, locale: &str) -> Option<Arc<OutputFormat>> {
        let tables = self.tables.read().expect("registry lock poisoned");
        tables.output.get(locale).cloned()
    }

    /// Whether a locale has a registered input format.
    pub fn has_input(&self, locale: &str) -> bool {
        let tables = self.tables.read().expect("registry lock poisoned");
        tables.input.contains_key(locale)
    }
}

// ==================== Built-in formats ====================

fn builtin_pt_br_input() -> InputFormat {
    InputFormat {
        date: InputPattern::new(
            r"^(\d{1,2})/(\d{1,2})/(\d{2,4})$",
            DateSlices::date(3, 2, 1),
        )
        .expect("built-in pattern"),
        timestamp: InputPattern::new(
            r"^(\d{1,2})/(\d{1,2})/(\d{2,4}) (\d{2}):(\d{2})(:(\d{2}))?$",
            DateSlices::timestamp(3, 2, 1, 4, 5, Some(7)),
        )
        .expect("built-in pattern"),
    }
}

fn builtin_en_us_input() -> InputFormat {
    InputFormat {
        date: InputPattern::new(
            r"^(\d{2,4})/(\d{1,2})/(\d{1,2})$",
            DateSlices::date(1, 2, 3),
        )
        .expect("built-in pattern"),
        timestamp: InputPattern::new(
            r"^(\d{2,4})/(\d{1,2})/(\d{1,2}) (\d{2}):(\d{2})(:(\d{2}))?$",
            DateSlices::timestamp(1, 2, 3, 4, 5, Some(7)),
        )
        .expect("built-in pattern"),
    }
}

fn builtin_pt_br_output() -> OutputFormat {
    OutputFormat {
        small: "d/m/Y".to_string(),
        literal: "%A, %e de %B de %Y".to_string(),
        literal_with_time: "%A, %e de %B de %Y, %T".to_string(),
        full: "d/m/Y H:i:s".to_string(),
    }
}

fn builtin_en_us_output() -> OutputFormat {
    OutputFormat {
        small: "Y-m-d".to_string(),
        literal: "%a %d %b %Y".to_string(),
        literal_with_time: "%a %d %b %Y %T".to_string(),
        full: "Y-m-d H:i:s".to_string(),
    }
}
