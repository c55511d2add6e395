//! Unlocalizer: converts localized user input (dates, timestamps, decimals)
//! into the canonical ISO / dot-decimal form used for storage.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::locale::conventions::{LocaleConventions, PT_BR};
use crate::locale::formats::{FormatRegistry, InputFormat, InputPattern};
use crate::locale::normalize::{is_iso_date, is_null_date, normalize_date};
use crate::locale::DEFAULT_LOCALE;

/// Date fields pulled out of a matched input pattern.
///
/// Assembled explicitly from the pattern's capture slices so that optional
/// groups have defined defaults instead of leaking empty substitutions into
/// the output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DateParts {
    year: String,
    month: String,
    day: String,
    hour: String,
    minute: String,
    second: String,
}

impl DateParts {
    fn assemble_date(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    fn assemble_timestamp(&self) -> String {
        format!(
            "{}-{}-{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Converts localized values to canonical form.
///
/// Each instance carries its own current locale, so concurrent logical
/// operations get isolation by constructing their own instance around a
/// shared [`FormatRegistry`].
#[derive(Debug, Clone)]
pub struct Unlocalizer {
    registry: Arc<FormatRegistry>,
    locale: String,
    conventions: &'static LocaleConventions,
}

impl Unlocalizer {
    /// Create an unlocalizer bound to the default locale (`pt_BR`).
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self {
            registry,
            locale: DEFAULT_LOCALE.to_string(),
            conventions: &PT_BR,
        }
    }

    /// Switch the current input locale. Chains.
    ///
    /// # Errors
    /// [`Error::UnsupportedLocale`] when the identifier has no host
    /// conventions or no registered input format.
    pub fn set_locale(&mut self, locale: &str) -> Result<&mut Self> {
        let conventions = LocaleConventions::lookup(locale)
            .ok_or_else(|| Error::UnsupportedLocale(locale.to_string()))?;

        if !self.registry.has_input(locale) {
            return Err(Error::UnsupportedLocale(locale.to_string()));
        }

        debug!(locale, "unlocalizer bound to locale");
        self.locale = locale.to_string();
        self.conventions = conventions;

        Ok(self)
    }

    /// The currently bound locale identifier.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The registry this instance reads formats from.
    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    /// Register an input format, for chained configuration.
    pub fn add_format(&self, locale: &str, format: InputFormat) -> Result<&Self> {
        self.registry.register_input(locale, format)?;
        Ok(self)
    }

    /// Look up the input format for a locale. `None` when unregistered.
    pub fn get_format(&self, locale: &str) -> Option<Arc<InputFormat>> {
        self.registry.lookup_input(locale)
    }

    /// Convert a localized date or timestamp to canonical form.
    ///
    /// Null-equivalent input yields `Ok(None)`. Input already in valid ISO
    /// form is normalized and kept. Anything else must match the current
    /// locale's `date` (or, with `include_time`, `timestamp`) pattern.
    ///
    /// # Errors
    /// [`Error::Format`] when the value matches neither ISO form nor the
    /// registered pattern.
    pub fn date(&self, value: &str, include_time: bool) -> Result<Option<String>> {
        if is_null_date(value) {
            return Ok(None);
        }

        if is_iso_date(value) {
            return Ok(Some(normalize_date(value)));
        }

        let format = self
            .registry
            .lookup_input(&self.locale)
            .ok_or_else(|| Error::UnsupportedLocale(self.locale.clone()))?;

        let (pattern, kind) = if include_time {
            (&format.timestamp, "timestamp")
        } else {
            (&format.date, "date")
        };

        let parts = self.extract_parts(pattern, value, kind)?;

        let assembled = if include_time {
            parts.assemble_timestamp()
        } else {
            parts.assemble_date()
        };

        Ok(Some(normalize_date(&assembled)))
    }

    /// Convert a localized decimal string to dot-decimal canonical form.
    ///
    /// The rightmost occurrence of the locale's decimal separator splits the
    /// fractional part; thousands separators (plain and monetary) are
    /// stripped from the integer part. The fraction is kept only when it is
    /// numerically positive or not numeric at all, so clearly-invalid
    /// suffixes pass through (`"3,abc"` becomes `"3.abc"`) and enforcement is
    /// left to downstream numeric coercion. Never fails.
    pub fn decimal(&self, value: &str) -> String {
        if value.is_empty() {
            return value.to_string();
        }

        let Some(point) = value.rfind(self.conventions.decimal_point) else {
            return value.to_string();
        };

        let fraction = &value[point + self.conventions.decimal_point.len_utf8()..];
        let mut integer = value[..point].to_string();

        for sep in [
            self.conventions.thousands_sep,
            self.conventions.mon_thousands_sep,
        ]
        .into_iter()
        .flatten()
        {
            integer = integer.replace(sep, "");
        }

        let keep_fraction = match fraction.parse::<f64>() {
            Ok(numeric) => numeric > 0.0,
            Err(_) => true,
        };

        if keep_fraction {
            format!("{}.{}", integer, fraction)
        } else {
            integer
        }
    }

    fn extract_parts(
        &self,
        pattern: &InputPattern,
        value: &str,
        kind: &'static str,
    ) -> Result<DateParts> {
        let captures = pattern
            .pattern()
            .captures(value)
            .ok_or_else(|| Error::Format {
                value: value.to_string(),
                kind,
                locale: self.locale.clone(),
            })?;

        let slice = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| Error::Format {
                    value: value.to_string(),
                    kind,
                    locale: self.locale.clone(),
                })
        };

        let optional = |index: Option<usize>, default: &str| match index {
            Some(index) => captures
                .get(index)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| default.to_string()),
            None => default.to_string(),
        };

        let slices = pattern.slices();

        Ok(DateParts {
            year: slice(slices.y)?,
            month: slice(slices.m)?,
            day: slice(slices.d)?,
            hour: optional(slices.h, "00"),
            minute: optional(slices.i, "00"),
            second: optional(slices.s, "00"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::formats::DateSlices;

    fn unlocalizer() -> Unlocalizer {
        Unlocalizer::new(Arc::new(FormatRegistry::with_defaults()))
    }

    #[test]
    fn test_default_locale() {
        let unloc = unlocalizer();
        assert_eq!(unloc.locale(), "pt_BR");
    }

    #[test]
    fn test_set_locale_unknown_fails() {
        let mut unloc = unlocalizer();
        let err = unloc.set_locale("xx_XX").unwrap_err();
        assert!(matches!(err, Error::UnsupportedLocale(_)));
        // Failed switch leaves the previous binding intact.
        assert_eq!(unloc.locale(), "pt_BR");
    }

    #[test]
    fn test_set_locale_without_input_format_fails() {
        // en_US conventions exist, but this registry has no formats at all.
        let mut unloc = Unlocalizer::new(Arc::new(FormatRegistry::new()));
        let err = unloc.set_locale("en_US").unwrap_err();
        assert!(matches!(err, Error::UnsupportedLocale(_)));
    }

    #[test]
    fn test_null_dates() {
        let unloc = unlocalizer();

        assert_eq!(unloc.date("", false).unwrap(), None);
        assert_eq!(unloc.date("0000-00-00", false).unwrap(), None);
        assert_eq!(unloc.date("0000-00-00 00:00:00", true).unwrap(), None);
    }

    #[test]
    fn test_iso_passthrough() {
        let unloc = unlocalizer();

        assert_eq!(
            unloc.date("2009-04-21", false).unwrap(),
            Some("2009-04-21".to_string())
        );
        assert_eq!(
            unloc.date("1987-03-01", false).unwrap(),
            Some("1987-03-01".to_string())
        );
    }

    #[test]
    fn test_br_dates() {
        let unloc = unlocalizer();

        assert_eq!(
            unloc.date("21/04/2009", false).unwrap(),
            Some("2009-04-21".to_string())
        );
        assert_eq!(
            unloc.date("21/4/2009", false).unwrap(),
            Some("2009-04-21".to_string())
        );
        assert_eq!(
            unloc.date("01/03/1987", false).unwrap(),
            Some("1987-03-01".to_string())
        );
        assert_eq!(
            unloc.date("1/3/1987", false).unwrap(),
            Some("1987-03-01".to_string())
        );
    }

    #[test]
    fn test_br_timestamps() {
        let unloc = unlocalizer();

        assert_eq!(
            unloc.date("21/04/2009 12:03:01", true).unwrap(),
            Some("2009-04-21 12:03:01".to_string())
        );
        assert_eq!(
            unloc.date("21/4/2009 23:59:59", true).unwrap(),
            Some("2009-04-21 23:59:59".to_string())
        );
        // Missing seconds default to 00.
        assert_eq!(
            unloc.date("1/3/1987 23:59", true).unwrap(),
            Some("1987-03-01 23:59:00".to_string())
        );
    }

    #[test]
    fn test_us_dates() {
        let mut unloc = unlocalizer();
        unloc.set_locale("en_US").unwrap();

        assert_eq!(
            unloc.date("2009/04/21", false).unwrap(),
            Some("2009-04-21".to_string())
        );
        assert_eq!(
            unloc.date("2009-04-21", false).unwrap(),
            Some("2009-04-21".to_string())
        );
    }

    #[test]
    fn test_pattern_mismatch_is_format_error() {
        let unloc = unlocalizer();

        let err = unloc.date("01-01-2001", false).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));

        // A date-only value does not satisfy the timestamp pattern.
        let err = unloc.date("21/04/2009", true).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_out_of_range_month_passes_pattern() {
        // The pattern itself does not validate calendar ranges; callers that
        // need a real date parse the canonical output afterwards.
        let unloc = unlocalizer();
        assert_eq!(
            unloc.date("21/23/1987", false).unwrap(),
            Some("1987-23-21".to_string())
        );
    }

    #[test]
    fn test_br_decimals() {
        let unloc = unlocalizer();

        assert_eq!(unloc.decimal(""), "");
        assert_eq!(unloc.decimal("23.32"), "23.32");
        assert_eq!(unloc.decimal("25,32"), "25.32");
        assert_eq!(unloc.decimal("0,5"), "0.5");
        assert_eq!(unloc.decimal("1.300,52"), "1300.52");
        assert_eq!(unloc.decimal("3.965.300,52"), "3965300.52");
        assert_eq!(unloc.decimal("3,abc"), "3.abc");
    }

    #[test]
    fn test_us_decimals() {
        let mut unloc = unlocalizer();
        unloc.set_locale("en_US").unwrap();

        assert_eq!(unloc.decimal(""), "");
        assert_eq!(unloc.decimal("23.32"), "23.32");
        assert_eq!(unloc.decimal("25.32"), "25.32");
        assert_eq!(unloc.decimal("0.5"), "0.5");
        assert_eq!(unloc.decimal("1,300.52"), "1300.52");
        assert_eq!(unloc.decimal("3,965,300.52"), "3965300.52");
        assert_eq!(unloc.decimal("3.abc"), "3.abc");
    }

    #[test]
    fn test_zero_fraction_dropped() {
        let unloc = unlocalizer();
        assert_eq!(unloc.decimal("25,00"), "25");
    }

    #[test]
    fn test_add_format_and_get_format() {
        let unloc = unlocalizer();

        let format = InputFormat {
            date: InputPattern::new(
                r"^(\d{1,2})\.(\d{1,2})\.(\d{2,4})$",
                DateSlices::date(3, 2, 1),
            )
            .unwrap(),
            timestamp: InputPattern::new(
                r"^(\d{1,2})\.(\d{1,2})\.(\d{2,4}) (\d{2}):(\d{2})(:(\d{2}))?$",
                DateSlices::timestamp(3, 2, 1, 4, 5, Some(7)),
            )
            .unwrap(),
        };

        unloc.add_format("es_ES", format).unwrap();
        assert!(unloc.get_format("es_ES").is_some());
        assert!(unloc.get_format("en_ES").is_none());
    }
}
