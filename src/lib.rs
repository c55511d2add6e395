//! Locale-aware data transcoding: converts dates, timestamps and decimal
//! numbers between a user-facing localized form (e.g. Brazilian `dd/mm/yyyy`,
//! comma decimals) and the canonical machine form (ISO-8601 dates,
//! dot-decimal numbers) used for storage and comparison.
//!
//! # Architecture
//!
//! - [`FormatRegistry`]: per-locale input patterns and output templates,
//!   shared via `Arc` from the composition root
//! - [`Unlocalizer`]: localized input -> canonical form
//! - [`Localizer`]: canonical form -> localized display string
//! - [`LocaleBehavior`]: field eligibility policy and query-tree walker for
//!   ORM-style interception hooks
//! - [`ConversionMetrics`]: process-wide conversion counters
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use locale_bridge::{FormatRegistry, Localizer, Unlocalizer};
//!
//! # fn main() -> locale_bridge::Result<()> {
//! let registry = Arc::new(FormatRegistry::with_defaults());
//!
//! let mut unlocalizer = Unlocalizer::new(Arc::clone(&registry));
//! unlocalizer.set_locale("pt_BR")?;
//! assert_eq!(
//!     unlocalizer.date("21/04/2009", false)?,
//!     Some("2009-04-21".to_string())
//! );
//! assert_eq!(unlocalizer.decimal("1.300,52"), "1300.52");
//!
//! let mut localizer = Localizer::new(registry);
//! localizer.set_locale("pt_BR")?;
//! assert_eq!(localizer.date("2009-04-21"), "21/04/2009");
//! # Ok(())
//! # }
//! ```
//!
//! Both converters carry an explicit current locale per instance; callers
//! that serve concurrent logical operations give each one its own instance
//! around the shared registry.

pub mod behavior;
pub mod error;
pub mod locale;
pub mod metrics;

pub use behavior::{BehaviorSettings, ColumnKind, DateKind, LocaleBehavior, TypeFormats};
pub use error::{Error, Result};
pub use locale::{
    is_iso_date, is_null_date, normalize_date, parse_iso_lenient, DateSlices, FormatRegistry,
    InputFormat, InputPattern, LocaleConventions, Localizer, OutputFormat, Unlocalizer,
    DEFAULT_LOCALE, FALLBACK_OUTPUT_LOCALE,
};
pub use metrics::{ConversionMetrics, MetricsReport};
