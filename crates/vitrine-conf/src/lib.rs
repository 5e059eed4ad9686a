//! # vitrine configuration
//!
//! Layered settings for the showcase site. Values are merged from several
//! sources in priority order (environment variables > TOML file > defaults)
//! and deserialized into a typed [`Settings`] value.
//!
//! ```rust,no_run
//! use vitrine_conf::{EnvSource, SettingsBuilder, TomlFileSource};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlFileSource::optional("vitrine.toml"))
//!     .add_source(EnvSource::new().with_prefix("VITRINE_"))
//!     .build()?;
//! assert!(!settings.email.backend.is_empty());
//! # Ok::<(), vitrine_conf::SettingsError>(())
//! ```

pub mod settings;

pub use settings::builder::{SettingsBuilder, SettingsError};
pub use settings::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
pub use settings::{DispatchMode, EmailSettings, LoggingSettings, Settings, SiteConfig};
