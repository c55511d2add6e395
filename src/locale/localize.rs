//! Localizer: renders canonical dates, timestamps, decimals and currency
//! amounts into display strings for a locale.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::error::{Error, Result};
use crate::locale::conventions::{LocaleConventions, PT_BR};
use crate::locale::formats::{FormatRegistry, OutputFormat};
use crate::locale::normalize::{is_null_date, parse_iso_lenient};
use crate::locale::template::{render_date, render_literal};
use crate::locale::{DEFAULT_LOCALE, FALLBACK_OUTPUT_LOCALE};

/// Renders canonical values into localized display strings.
///
/// Like [`crate::Unlocalizer`], each instance carries its own current locale
/// around a shared [`FormatRegistry`]; switching locale never requires an
/// input descriptor, only host conventions. The output descriptor is
/// resolved lazily at render time, falling back to the default output locale
/// when the current one has none registered.
#[derive(Debug, Clone)]
pub struct Localizer {
    registry: Arc<FormatRegistry>,
    locale: String,
    conventions: &'static LocaleConventions,
}

impl Localizer {
    /// Create a localizer bound to the default locale (`pt_BR`).
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self {
            registry,
            locale: DEFAULT_LOCALE.to_string(),
            conventions: &PT_BR,
        }
    }

    /// Switch the current output locale. Chains.
    ///
    /// # Errors
    /// [`Error::UnsupportedLocale`] when the identifier has no host
    /// conventions.
    pub fn set_locale(&mut self, locale: &str) -> Result<&mut Self> {
        let conventions = LocaleConventions::lookup(locale)
            .ok_or_else(|| Error::UnsupportedLocale(locale.to_string()))?;

        debug!(locale, "localizer bound to locale");
        self.locale = locale.to_string();
        self.conventions = conventions;

        Ok(self)
    }

    /// The currently bound locale identifier.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Register an output format, for chained configuration.
    pub fn add_format(&self, locale: &str, format: OutputFormat) -> Result<&Self> {
        self.registry.register_output(locale, format)?;
        Ok(self)
    }

    /// Look up the output format for a locale. `None` when unregistered.
    pub fn get_format(&self, locale: &str) -> Option<Arc<OutputFormat>> {
        self.registry.lookup_output(locale)
    }

    /// Render a canonical date with the locale's `small` template.
    ///
    /// Null-equivalent input renders as the empty string. An unparseable
    /// non-null value silently renders as the current moment instead of
    /// erroring.
    pub fn date(&self, value: &str) -> String {
        if is_null_date(value) {
            return String::new();
        }

        let dt = init_date_time(value);
        render_date(&self.output_format().small, &dt)
    }

    /// Render a canonical timestamp with the locale's `full` template.
    ///
    /// With `seconds` false the template's final two characters are dropped
    /// before rendering. That assumes the template ends with a seconds
    /// directive and its separator prefix occupying exactly two characters
    /// (true of the built-in templates); it is not a general-purpose
    /// transformation.
    pub fn date_time(&self, value: &str, seconds: bool) -> String {
        if is_null_date(value) {
            return String::new();
        }

        let dt = init_date_time(value);
        let format = self.output_format();

        let template = if seconds {
            format.full.as_str()
        } else {
            let cut = format.full.len().saturating_sub(2);
            format.full.get(..cut).unwrap_or(format.full.as_str())
        };

        render_date(template, &dt)
    }

    /// Render a date as a locale-specific literal string with spelled-out
    /// weekday and month names.
    ///
    /// An explicit `format` override wins; otherwise the `literal` or (with
    /// `display_time`) `literalWithTime` template is used.
    pub fn date_literal(&self, value: &str, display_time: bool, format: Option<&str>) -> String {
        if is_null_date(value) {
            return String::new();
        }

        let dt = init_date_time(value);
        let descriptor = self.output_format();

        let template = match format {
            Some(template) => template,
            None if display_time => descriptor.literal_with_time.as_str(),
            None => descriptor.literal.as_str(),
        };

        render_literal(template, &dt, self.conventions)
    }

    /// Render a numeric value as a currency amount with the locale's symbol.
    ///
    /// Non-numeric input (after stripping `,` grouping) passes through
    /// unchanged.
    pub fn currency(&self, value: &str) -> String {
        let stripped = value.replace(',', "");

        if !is_numeric(&stripped) {
            return value.to_string();
        }

        format!(
            "{} {}",
            self.conventions.currency_symbol,
            self.number(value, 2, true)
        )
    }

    /// Render a numeric value with the locale's separators.
    ///
    /// The fractional part is right-padded with zeros and then truncated to
    /// `precision` digits; values are never rounded. With `thousands` the
    /// locale's grouping separator is inserted every three integer digits
    /// from the right. Non-numeric input (after stripping `,` grouping)
    /// passes through unchanged.
    pub fn number(&self, value: &str, precision: usize, thousands: bool) -> String {
        let stripped = value.replace(',', "");

        if !is_numeric(&stripped) {
            return value.to_string();
        }

        let (mut int_part, frac_part) = match stripped.split_once('.') {
            Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
            None => (stripped.clone(), String::new()),
        };

        let mut fraction = frac_part;
        while fraction.len() < precision {
            fraction.push('0');
        }
        fraction.truncate(precision);

        if thousands {
            if let Some(sep) = self.conventions.thousands_sep {
                int_part = group_thousands(&int_part, sep);
            }
        }

        if fraction.is_empty() {
            int_part
        } else {
            format!("{}{}{}", int_part, self.conventions.decimal_point, fraction)
        }
    }

    fn output_format(&self) -> Arc<OutputFormat> {
        self.registry
            .lookup_output(&self.locale)
            .or_else(|| self.registry.lookup_output(FALLBACK_OUTPUT_LOCALE))
            .unwrap_or_else(|| Arc::new(compiled_in_fallback()))
    }
}

/// Parse a canonical date value, falling back to the current moment when it
/// does not parse; see [`Localizer::date`].
fn init_date_time(value: &str) -> NaiveDateTime {
    parse_iso_lenient(value).unwrap_or_else(|| Local::now().naive_local())
}

/// Whether a string is a plain finite decimal number.
fn is_numeric(value: &str) -> bool {
    !value.is_empty()
        && value
            .parse::<f64>()
            .map(|parsed| parsed.is_finite())
            .unwrap_or(false)
}

/// Insert `sep` every three digits from the right, leaving any sign alone.
fn group_thousands(digits: &str, sep: char) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let count = digits.chars().count();

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (count - index) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// Last-resort output templates when the registry has neither the current
/// locale nor the fallback registered.
fn compiled_in_fallback() -> OutputFormat {
    OutputFormat {
        small: "Y-m-d".to_string(),
        literal: "%a %d %b %Y".to_string(),
        literal_with_time: "%a %d %b %Y %T".to_string(),
        full: "Y-m-d H:i:s".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localizer(locale: &str) -> Localizer {
        let mut loc = Localizer::new(Arc::new(FormatRegistry::with_defaults()));
        loc.set_locale(locale).unwrap();
        loc
    }

    #[test]
    fn test_set_locale_unknown_fails() {
        let mut loc = Localizer::new(Arc::new(FormatRegistry::with_defaults()));
        assert!(matches!(
            loc.set_locale("xx_XX").unwrap_err(),
            Error::UnsupportedLocale(_)
        ));
    }

    #[test]
    fn test_null_dates_render_empty() {
        let loc = localizer("pt_BR");

        assert_eq!(loc.date(""), "");
        assert_eq!(loc.date("0000-00-00"), "");
        assert_eq!(loc.date("0000-00-00 00:00:00"), "");
        assert_eq!(loc.date_time("", true), "");
        assert_eq!(loc.date_literal("0000-00-00 00:00:00", false, None), "");
    }

    #[test]
    fn test_br_dates() {
        let loc = localizer("pt_BR");

        assert_eq!(loc.date("2009-04-21"), "21/04/2009");
        assert_eq!(loc.date("1987-03-01"), "01/03/1987");
        assert_eq!(loc.date("1987-3-1"), "01/03/1987");
    }

    #[test]
    fn test_us_dates() {
        let loc = localizer("en_US");

        assert_eq!(loc.date("2009-04-21"), "2009-04-21");
        assert_eq!(loc.date("1987-03-01"), "1987-03-01");
    }

    #[test]
    fn test_br_date_times() {
        let loc = localizer("pt_BR");

        assert_eq!(loc.date_time("2009-04-21 12:03:01", true), "21/04/2009 12:03:01");
        assert_eq!(loc.date_time("2009-4-21 23:59:59", true), "21/04/2009 23:59:59");
        assert_eq!(loc.date_time("1987-3-1 23:59:59", false), "01/03/1987 23:59");
    }

    #[test]
    fn test_unparseable_date_falls_back_to_now() {
        // A malformed non-null value renders as "now" rather than erroring.
        let loc = localizer("pt_BR");
        let today = render_date("d/m/Y", &Local::now().naive_local());

        assert_eq!(loc.date("21/04/2009"), today);
    }

    #[test]
    fn test_date_literal_pt_br() {
        let loc = localizer("pt_BR");

        assert_eq!(
            loc.date_literal("2010-08-26 16:12:40", false, None),
            "quinta, 26 de agosto de 2010"
        );
        assert_eq!(
            loc.date_literal("2010-08-26 16:12:40", true, None),
            "quinta, 26 de agosto de 2010, 16:12:40"
        );
        assert_eq!(
            loc.date_literal("2010-08-26 16:12:40", false, Some("%Y!")),
            "2010!"
        );
    }

    #[test]
    fn test_br_currency() {
        let loc = localizer("pt_BR");

        assert_eq!(loc.currency("12.45"), "R$ 12,45");
        assert_eq!(loc.currency("0.50"), "R$ 0,50");
        assert_eq!(loc.currency("1,234.45"), "R$ 1.234,45");
        assert_eq!(loc.currency("1,234,567.45"), "R$ 1.234.567,45");
        assert_eq!(loc.currency("-"), "-");
    }

    #[test]
    fn test_us_currency() {
        let loc = localizer("en_US");

        assert_eq!(loc.currency("12.45"), "$ 12.45");
        assert_eq!(loc.currency("0.50"), "$ 0.50");
        assert_eq!(loc.currency("1,234.45"), "$ 1,234.45");
    }

    #[test]
    fn test_br_numbers() {
        let loc = localizer("pt_BR");

        assert_eq!(loc.number("1", 2, false), "1,00");
        assert_eq!(loc.number("23", 2, false), "23,00");
        assert_eq!(loc.number("0.5", 2, false), "0,50");
        assert_eq!(loc.number("25.32", 2, false), "25,32");
        assert_eq!(loc.number("25.32", 1, false), "25,3");
        assert_eq!(loc.number("25.32", 0, false), "25");
        assert_eq!(loc.number("1,300.52", 2, false), "1300,52");
        assert_eq!(loc.number("1,300.52", 2, true), "1.300,52");
        assert_eq!(loc.number("3,965,300.52", 2, false), "3965300,52");
        assert_eq!(loc.number("3,965,300.52", 1, true), "3.965.300,5");
    }

    #[test]
    fn test_us_numbers() {
        let loc = localizer("en_US");

        assert_eq!(loc.number("1", 2, false), "1.00");
        assert_eq!(loc.number("0.5", 2, false), "0.50");
        assert_eq!(loc.number("25.32", 1, false), "25.3");
        assert_eq!(loc.number("1,300.52", 2, true), "1,300.52");
        assert_eq!(loc.number("3,965,300.52", 1, true), "3,965,300.5");
    }

    #[test]
    fn test_number_truncates_never_rounds() {
        let loc = localizer("en_US");

        assert_eq!(loc.number("25.329", 2, false), "25.32");
        assert_eq!(loc.number("25.999", 2, false), "25.99");
    }

    #[test]
    fn test_number_non_numeric_passthrough() {
        let loc = localizer("en_US");

        assert_eq!(loc.number("abc", 2, false), "abc");
        assert_eq!(loc.number("", 2, false), "");
    }

    #[test]
    fn test_negative_number_grouping() {
        let loc = localizer("en_US");

        assert_eq!(loc.number("-1234567.5", 2, true), "-1,234,567.50");
    }

    #[test]
    fn test_output_format_fallback() {
        // pt_BR conventions with no pt_BR output registered: rendering falls
        // back to the en_US descriptor.
        let registry = FormatRegistry::new();
        registry
            .register_output(
                "en_US",
                OutputFormat {
                    small: "Y-m-d".to_string(),
                    literal: "%a".to_string(),
                    literal_with_time: "%a %T".to_string(),
                    full: "Y-m-d H:i:s".to_string(),
                },
            )
            .unwrap();

        let mut loc = Localizer::new(Arc::new(registry));
        loc.set_locale("pt_BR").unwrap();

        assert_eq!(loc.date("2009-04-21"), "2009-04-21");
    }
}
