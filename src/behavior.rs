//! Field eligibility policy and query-tree walker.
//!
//! Hosts (an ORM-style interception layer) call the hooks here from their
//! before-validate, before-save and before-find lifecycle points. Eligible
//! date and decimal leaves in record data or nested query-condition trees are
//! rewritten in place to their canonical storage form; the hook's boolean
//! result aggregates every leaf conversion.
//!
//! Failure semantics: leaves converted before a failing one stay converted.
//! There is no rollback; a `false` result means "reject the operation", but
//! the structure the caller handed in has already been partially rewritten.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::locale::normalize::{is_null_date, parse_iso_lenient};
use crate::locale::template::render_date;
use crate::locale::Unlocalizer;
use crate::metrics::ConversionMetrics;

/// Bookkeeping fields the host framework fills in automatically.
const AUTOMAGIC_FIELDS: [&str; 3] = ["created", "updated", "modified"];

/// Which date conversion a date-like column needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Date only (`Y-m-d`)
    Date,
    /// Time of day only (`H:i:s`)
    Time,
    /// Date with time; `datetime` schema columns resolve here too
    Timestamp,
}

/// Conversion category of a schema column, derived once per model from its
/// declared type string and dispatched by pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date(DateKind),
    Decimal,
    Other,
}

impl ColumnKind {
    /// Classify a schema type string.
    pub fn from_schema_type(schema_type: &str) -> Self {
        match schema_type.to_ascii_lowercase().as_str() {
            "date" => ColumnKind::Date(DateKind::Date),
            "time" => ColumnKind::Date(DateKind::Time),
            "datetime" | "timestamp" => ColumnKind::Date(DateKind::Timestamp),
            "number" | "decimal" | "float" | "double" => ColumnKind::Decimal,
            _ => ColumnKind::Other,
        }
    }
}

/// Per-model behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorSettings {
    /// Skip the host framework's automagic bookkeeping fields (default true)
    #[serde(default = "default_true")]
    pub ignore_automagic: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            ignore_automagic: true,
        }
    }
}

/// Storage templates per date-like column kind, as reported by the host's
/// database connection. `date()`-style template characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeFormats {
    pub date: String,
    pub time: String,
    pub timestamp: String,
}

impl Default for TypeFormats {
    fn default() -> Self {
        Self {
            date: "Y-m-d".to_string(),
            time: "H:i:s".to_string(),
            timestamp: "Y-m-d H:i:s".to_string(),
        }
    }
}

impl TypeFormats {
    fn for_kind(&self, kind: DateKind) -> &str {
        match kind {
            DateKind::Date => &self.date,
            DateKind::Time => &self.time,
            DateKind::Timestamp => &self.timestamp,
        }
    }
}

/// Everything the policy knows about one configured model.
#[derive(Debug, Clone)]
struct ModelBinding {
    columns: HashMap<String, ColumnKind>,
    settings: BehaviorSettings,
}

/// The conversion policy: decides which fields may be converted and walks
/// record data and query-condition trees applying the [`Unlocalizer`].
#[derive(Debug)]
pub struct LocaleBehavior {
    unlocalizer: Unlocalizer,
    type_formats: TypeFormats,
    models: HashMap<String, ModelBinding>,
}

impl LocaleBehavior {
    pub fn new(unlocalizer: Unlocalizer, type_formats: TypeFormats) -> Self {
        Self {
            unlocalizer,
            type_formats,
            models: HashMap::new(),
        }
    }

    /// Configure a model: its schema (field name -> declared type string)
    /// and settings. A model that was never bound yields zero eligible
    /// fields, so its data passes through untouched.
    pub fn bind_model(
        &mut self,
        model: &str,
        schema: &HashMap<String, String>,
        settings: BehaviorSettings,
    ) {
        let columns = schema
            .iter()
            .map(|(field, schema_type)| (field.clone(), ColumnKind::from_schema_type(schema_type)))
            .collect();

        self.models.insert(
            model.to_string(),
            ModelBinding { columns, settings },
        );
    }

    /// The unlocalizer this policy converts with.
    pub fn unlocalizer(&self) -> &Unlocalizer {
        &self.unlocalizer
    }

    /// Mutable access, e.g. to switch the input locale between requests.
    pub fn unlocalizer_mut(&mut self) -> &mut Unlocalizer {
        &mut self.unlocalizer
    }

    /// before-validate hook: convert eligible record fields in place.
    pub fn before_validate(&self, model: &str, data: &mut Map<String, Value>) -> bool {
        self.convert_record(model, data)
    }

    /// before-save hook: convert eligible record fields in place.
    pub fn before_save(&self, model: &str, data: &mut Map<String, Value>) -> bool {
        self.convert_record(model, data)
    }

    /// before-find hook: convert eligible leaves of a query-condition tree
    /// in place. The tree stays usable by the caller afterwards, mutated or
    /// not.
    pub fn before_find(&self, model: &str, conditions: &mut Value) -> bool {
        let Some(binding) = self.models.get(model) else {
            return true;
        };

        self.convert_conditions(binding, conditions)
    }

    fn convert_record(&self, model: &str, data: &mut Map<String, Value>) -> bool {
        let Some(binding) = self.models.get(model) else {
            return true;
        };

        let mut status = true;

        for (field, value) in data.iter_mut() {
            if !Self::eligible(binding, field, value) {
                continue;
            }

            let converted = match binding.columns[field.as_str()] {
                ColumnKind::Date(kind) => self.convert_leaf(value, |v| self.convert_date(kind, v)),
                ColumnKind::Decimal => self.convert_leaf(value, |v| self.convert_decimal(v)),
                ColumnKind::Other => true,
            };

            status = status && converted;
        }

        status
    }

    /// Recursive walk over a condition tree. Combinator keys (`or`/`and`,
    /// case-insensitive) and purely numeric positional keys descend; arrays
    /// descend element-wise. Descent never short-circuits: every leaf is
    /// visited and failures aggregate into the returned flag.
    fn convert_conditions(&self, binding: &ModelBinding, node: &mut Value) -> bool {
        let mut status = true;

        match node {
            Value::Object(map) => {
                for (key, value) in map.iter_mut() {
                    if is_combinator_key(key) {
                        let nested = self.convert_conditions(binding, value);
                        status = status && nested;
                        continue;
                    }

                    let field = condition_field_name(key);
                    if !Self::eligible(binding, field, value) {
                        continue;
                    }

                    let converted = match binding.columns[field] {
                        ColumnKind::Date(kind) => {
                            self.convert_leaf(value, |v| self.convert_date(kind, v))
                        }
                        ColumnKind::Decimal => {
                            self.convert_leaf(value, |v| self.convert_decimal(v))
                        }
                        ColumnKind::Other => true,
                    };

                    status = status && converted;
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    let nested = self.convert_conditions(binding, item);
                    status = status && nested;
                }
            }
            _ => {}
        }

        status
    }

    /// Eligibility rule: the model is configured, the value is non-empty,
    /// the field exists in the schema, and it is not an ignored automagic
    /// field.
    fn eligible(binding: &ModelBinding, field: &str, value: &Value) -> bool {
        if is_empty_value(value) {
            return false;
        }

        if !binding.columns.contains_key(field) {
            return false;
        }

        if binding.settings.ignore_automagic && AUTOMAGIC_FIELDS.contains(&field) {
            return false;
        }

        true
    }

    /// Apply a scalar conversion to a leaf, element-wise for list values.
    /// Every element must succeed for the leaf to succeed.
    fn convert_leaf<F>(&self, value: &mut Value, convert: F) -> bool
    where
        F: Fn(&mut Value) -> bool,
    {
        match value {
            Value::Array(items) => {
                let mut status = true;
                for item in items.iter_mut() {
                    let converted = convert(item);
                    status = status && converted;
                }
                status
            }
            _ => convert(value),
        }
    }

    /// Convert one date-like scalar in place to its storage form.
    ///
    /// Unlocalizes first; a value the locale patterns reject gets one direct
    /// canonical-parse attempt (so already-canonical but unpadded input
    /// survives). The canonical string must then describe a real calendar
    /// moment, which is where out-of-range months and days fail.
    fn convert_date(&self, kind: DateKind, value: &mut Value) -> bool {
        let Some(raw) = value.as_str() else {
            return true;
        };

        if is_null_date(raw) {
            return true;
        }

        if kind == DateKind::Time {
            return self.convert_time(value);
        }

        let include_time = kind == DateKind::Timestamp;

        let canonical = match self.unlocalizer.date(raw, include_time) {
            Ok(Some(canonical)) => canonical,
            Ok(None) => return true,
            // Timestamp columns accept date-only input: midnight is implied.
            Err(_) if include_time => match self.unlocalizer.date(raw, false) {
                Ok(Some(canonical)) => canonical,
                _ => raw.to_string(),
            },
            Err(_) => raw.to_string(),
        };

        let Some(parsed) = parse_iso_lenient(&canonical) else {
            warn!(value = raw, "date leaf failed conversion");
            ConversionMetrics::global().record_failure();
            return false;
        };

        *value = Value::String(render_date(self.type_formats.for_kind(kind), &parsed));
        ConversionMetrics::global().record_date();

        true
    }

    fn convert_time(&self, value: &mut Value) -> bool {
        let Some(raw) = value.as_str() else {
            return true;
        };

        let parsed = NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"));

        let Ok(time) = parsed else {
            warn!(value = raw, "time leaf failed conversion");
            ConversionMetrics::global().record_failure();
            return false;
        };

        let dt = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
            .expect("fixed anchor date")
            .and_time(time);

        *value = Value::String(render_date(&self.type_formats.time, &dt));
        ConversionMetrics::global().record_date();

        true
    }

    /// Convert one decimal scalar in place to dot-decimal form.
    fn convert_decimal(&self, value: &mut Value) -> bool {
        let Some(raw) = value.as_str() else {
            return true;
        };

        let converted = self.unlocalizer.decimal(raw);
        let ok = !converted.is_empty();
        *value = Value::String(converted);

        if ok {
            ConversionMetrics::global().record_decimal();
        } else {
            ConversionMetrics::global().record_failure();
        }

        ok
    }
}

/// `or`/`and` (any case) and purely numeric positional keys group nested
/// condition trees.
fn is_combinator_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("or")
        || key.eq_ignore_ascii_case("and")
        || (!key.is_empty() && key.chars().all(|c| c.is_ascii_digit()))
}

/// Extract the bare field name from a condition key: an optional `Model.`
/// qualifier is discarded (lookup is always against the current model's own
/// schema) and any trailing comparison-operator suffix is stripped.
fn condition_field_name(key: &str) -> &str {
    let unqualified = match key.find('.') {
        Some(dot) => &key[dot + 1..],
        None => key,
    };

    unqualified.split(' ').next().unwrap_or(unqualified)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
