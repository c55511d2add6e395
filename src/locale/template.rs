//! Date template rendering.
//!
//! Output descriptors carry two template dialects: `small`/`full` use
//! `date()`-style single characters (`Y m d H i s`), while the literal
//! templates use `strftime`-style `%` directives with spelled-out weekday and
//! month names taken from the locale conventions table. Anything a renderer
//! does not recognize is emitted literally.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::locale::conventions::LocaleConventions;

/// Render a `date()`-style template (`Y m d H i s`).
pub fn render_date(template: &str, dt: &NaiveDateTime) -> String {
    let mut out = String::with_capacity(template.len() + 8);

    for ch in template.chars() {
        match ch {
            'Y' => out.push_str(&format!("{:04}", dt.year())),
            'y' => out.push_str(&format!("{:02}", dt.year() % 100)),
            'm' => out.push_str(&format!("{:02}", dt.month())),
            'd' => out.push_str(&format!("{:02}", dt.day())),
            'H' => out.push_str(&format!("{:02}", dt.hour())),
            'i' => out.push_str(&format!("{:02}", dt.minute())),
            's' => out.push_str(&format!("{:02}", dt.second())),
            other => out.push(other),
        }
    }

    out
}

/// Render a `strftime`-style template with locale-specific names.
///
/// Supported directives: `%A %a %B %b %d %e %m %Y %y %H %M %S %T %%`.
/// `%e` is space-padded to width 2, matching the C library behavior.
pub fn render_literal(template: &str, dt: &NaiveDateTime, conv: &LocaleConventions) -> String {
    let weekday = dt.weekday().num_days_from_sunday() as usize;
    let month = (dt.month() - 1) as usize;

    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('A') => out.push_str(conv.weekday_names[weekday]),
            Some('a') => out.push_str(conv.weekday_abbr[weekday]),
            Some('B') => out.push_str(conv.month_names[month]),
            Some('b') => out.push_str(conv.month_abbr[month]),
            Some('d') => out.push_str(&format!("{:02}", dt.day())),
            Some('e') => out.push_str(&format!("{:2}", dt.day())),
            Some('m') => out.push_str(&format!("{:02}", dt.month())),
            Some('Y') => out.push_str(&format!("{:04}", dt.year())),
            Some('y') => out.push_str(&format!("{:02}", dt.year() % 100)),
            Some('H') => out.push_str(&format!("{:02}", dt.hour())),
            Some('M') => out.push_str(&format!("{:02}", dt.minute())),
            Some('S') => out.push_str(&format!("{:02}", dt.second())),
            Some('T') => out.push_str(&format!(
                "{:02}:{:02}:{:02}",
                dt.hour(),
                dt.minute(),
                dt.second()
            )),
            Some('%') => out.push('%'),
            Some(other) => {
                // Unknown directive: emit as-is.
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::conventions::{EN_US, PT_BR};
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        // Thursday, 2010-08-26.
        NaiveDate::from_ymd_opt(2010, 8, 26)
            .unwrap()
            .and_hms_opt(16, 12, 40)
            .unwrap()
    }

    #[test]
    fn test_render_date_small_and_full() {
        let dt = sample();

        assert_eq!(render_date("Y-m-d", &dt), "2010-08-26");
        assert_eq!(render_date("d/m/Y", &dt), "26/08/2010");
        assert_eq!(render_date("d/m/Y H:i:s", &dt), "26/08/2010 16:12:40");
        assert_eq!(render_date("d/m/Y H:i", &dt), "26/08/2010 16:12");
    }

    #[test]
    fn test_render_date_pads_components() {
        let dt = NaiveDate::from_ymd_opt(1987, 3, 1)
            .unwrap()
            .and_hms_opt(5, 3, 9)
            .unwrap();

        assert_eq!(render_date("Y-m-d H:i:s", &dt), "1987-03-01 05:03:09");
        assert_eq!(render_date("y", &dt), "87");
    }

    #[test]
    fn test_render_literal_pt_br() {
        let dt = sample();

        assert_eq!(
            render_literal("%A, %e de %B de %Y", &dt, &PT_BR),
            "quinta, 26 de agosto de 2010"
        );
        assert_eq!(
            render_literal("%A, %e de %B de %Y, %T", &dt, &PT_BR),
            "quinta, 26 de agosto de 2010, 16:12:40"
        );
    }

    #[test]
    fn test_render_literal_en_us() {
        let dt = sample();

        assert_eq!(render_literal("%a %d %b %Y", &dt, &EN_US), "Thu 26 Aug 2010");
        assert_eq!(
            render_literal("%a %d %b %Y %T", &dt, &EN_US),
            "Thu 26 Aug 2010 16:12:40"
        );
    }

    #[test]
    fn test_render_literal_unknown_directive_passthrough() {
        let dt = sample();

        assert_eq!(render_literal("%Q %%", &dt, &EN_US), "%Q %");
        assert_eq!(render_literal("100%", &dt, &EN_US), "100%");
    }
}
