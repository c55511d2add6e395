//! Host locale conventions: the numeric separators, currency symbol and
//! spelled-out date names each supported locale uses.
//!
//! This table stands in for the platform's `localeconv`/`strftime` facilities:
//! conversions never consult the OS locale, so results are identical on every
//! host. Binding to a locale is a lookup here; an unknown identifier is a
//! binding failure.

/// Numeric and date-name conventions for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConventions {
    /// Canonical identifier (e.g. "pt_BR")
    pub id: &'static str,

    /// Decimal separator character
    pub decimal_point: char,

    /// Grouping separator for plain numbers, if the locale uses one
    pub thousands_sep: Option<char>,

    /// Grouping separator for monetary amounts
    pub mon_thousands_sep: Option<char>,

    /// Currency symbol (e.g. "R$", "$")
    pub currency_symbol: &'static str,

    /// Full month names, January first
    pub month_names: [&'static str; 12],

    /// Abbreviated month names, January first
    pub month_abbr: [&'static str; 12],

    /// Full weekday names, Sunday first
    pub weekday_names: [&'static str; 7],

    /// Abbreviated weekday names, Sunday first
    pub weekday_abbr: [&'static str; 7],
}

/// Brazilian Portuguese. Day/month names follow the glibc spelling
/// ("quinta", not "quinta-feira").
pub static PT_BR: LocaleConventions = LocaleConventions {
    id: "pt_BR",
    decimal_point: ',',
    thousands_sep: Some('.'),
    mon_thousands_sep: Some('.'),
    currency_symbol: "R$",
    month_names: [
        "janeiro",
        "fevereiro",
        "março",
        "abril",
        "maio",
        "junho",
        "julho",
        "agosto",
        "setembro",
        "outubro",
        "novembro",
        "dezembro",
    ],
    month_abbr: [
        "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
    ],
    weekday_names: [
        "domingo", "segunda", "terça", "quarta", "quinta", "sexta", "sábado",
    ],
    weekday_abbr: ["dom", "seg", "ter", "qua", "qui", "sex", "sáb"],
};

/// American English.
pub static EN_US: LocaleConventions = LocaleConventions {
    id: "en_US",
    decimal_point: '.',
    thousands_sep: Some(','),
    mon_thousands_sep: Some(','),
    currency_symbol: "$",
    month_names: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    month_abbr: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekday_names: [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ],
    weekday_abbr: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
};

static ALL: [&LocaleConventions; 2] = [&PT_BR, &EN_US];

impl LocaleConventions {
    /// Look up the conventions for a locale identifier.
    ///
    /// Identifier matching treats `-` and `_` as equivalent and is
    /// case-insensitive, so "pt-br" and "PT_BR" both resolve to [`PT_BR`].
    ///
    /// # Returns
    /// * `Some(&'static LocaleConventions)` if the locale is known
    /// * `None` otherwise (callers surface this as an unsupported locale)
    pub fn lookup(id: &str) -> Option<&'static LocaleConventions> {
        let wanted = normalize_locale_id(id)?;

        ALL.iter()
            .copied()
            .find(|conv| normalize_locale_id(conv.id).as_deref() == Some(wanted.as_str()))
    }
}

/// Normalize a locale tag for comparison: trim, lower-case, `_` -> `-`.
fn normalize_locale_id(id: &str) -> Option<String> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut key = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        let ch = match ch {
            '_' => '-',
            other => other,
        };
        key.push(ch.to_ascii_lowercase());
    }

    Some(key)
}
