//! # vitrine
//!
//! Content model and contact form flow of an association's showcase
//! website: a home page with a hero banner, a formations listing built from
//! reusable blocks, an about page, a contact page with an editor-defined
//! form, and per-site footer settings.
//!
//! This crate re-exports the workspace crates and wires them together:
//!
//! - [`cms`]: page types, formation blocks, content store, contact form flow
//! - [`forms`]: form field definitions and validation
//! - [`mail`]: email messages and delivery backends
//! - [`conf`]: layered settings
//!
//! ## Feature Flags
//!
//! - `console-mail` - console mail backend, selectable with
//!   `email.backend = "console"`
//! - `full` (default) - everything above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vitrine::{Application, Settings, init_logging};
//!
//! # fn main() -> Result<(), vitrine::AppError> {
//! let settings = Settings::load(Some("vitrine.toml".as_ref()))?;
//! init_logging(&settings.logging)?;
//!
//! let app = Application::from_settings(settings)?;
//! let seeded = app.seed_default_site()?;
//! let form = app.contact_forms().get_form(seeded.contact)?;
//! assert_eq!(form.fields().len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod logging;

pub use vitrine_cms as cms;
pub use vitrine_conf as conf;
pub use vitrine_forms as forms;
pub use vitrine_mail as mail;

pub use app::{Application, SeededSite};
pub use logging::init_logging;
pub use vitrine_conf::Settings;

use thiserror::Error;

/// Errors surfaced by the application facade
#[derive(Debug, Error)]
pub enum AppError {
	#[error("Configuration error: {0}")]
	Settings(#[from] vitrine_conf::SettingsError),

	#[error(transparent)]
	Cms(#[from] vitrine_cms::error::CmsError),

	#[error("Mail error: {0}")]
	Mail(#[from] vitrine_mail::EmailError),

	#[error("Logging error: {0}")]
	Logging(String),
}

pub type AppResult<T> = Result<T, AppError>;
