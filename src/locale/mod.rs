//! Locale conversion engine: format registry, date normalization, and the
//! two directions of conversion.
//!
//! # Architecture
//!
//! - `conventions`: host-locale numeric separators, currency symbol and
//!   spelled-out date names
//! - `formats`: the registry of per-locale input patterns and output
//!   templates
//! - `normalize`: canonical-date normalization and the null/ISO predicates
//! - `template`: the two template dialects output descriptors are written in
//! - `unlocalize`: localized input -> canonical form
//! - `localize`: canonical form -> localized display string

pub mod conventions;
pub mod formats;
pub mod normalize;
pub mod template;

mod localize;
mod unlocalize;

pub use conventions::LocaleConventions;
pub use formats::{DateSlices, FormatRegistry, InputFormat, InputPattern, OutputFormat};
pub use localize::Localizer;
pub use normalize::{is_iso_date, is_null_date, normalize_date, parse_iso_lenient};
pub use unlocalize::Unlocalizer;

/// Locale both converters start out bound to.
pub const DEFAULT_LOCALE: &str = "pt_BR";

/// Output locale used when the current one has no registered output format.
pub const FALLBACK_OUTPUT_LOCALE: &str = "en_US";
