//! # vitrine mail
//!
//! Email messages and delivery backends used by the contact form.
//!
//! This crate does not speak SMTP: delivery goes through an [`EmailBackend`]
//! supplied by the hosting environment. Two backends ship with it:
//!
//! - **Console Backend**: writes each message to stdout and the log, for development
//! - **Memory Backend**: keeps messages in memory, for tests
//!
//! ## Examples
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vitrine_mail::{EmailBackend, MemoryBackend, send_mail};
//!
//! let backend = MemoryBackend::new();
//! send_mail(
//!     &backend,
//!     "Nouveau message",
//!     "Nom: Alice",
//!     "noreply@monsite.com",
//!     vec!["contact@exemple.com".to_string()],
//! )
//! .await?;
//!
//! assert_eq!(backend.count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod message;
pub mod utils;
pub mod validation;

use thiserror::Error;

#[cfg(feature = "console")]
pub use backends::ConsoleBackend;
pub use backends::{EmailBackend, MemoryBackend, backend_from_settings};
pub use message::{EmailMessage, EmailMessageBuilder};
pub use utils::send_mail;
pub use validation::MAX_EMAIL_LENGTH;

#[derive(Debug, Error)]
pub enum EmailError {
	#[error("Invalid email address: {0}")]
	InvalidAddress(String),

	#[error("Missing required field: {0}")]
	MissingField(String),

	#[error("Backend error: {0}")]
	BackendError(String),

	#[error("Unknown email backend: {0}")]
	UnknownBackend(String),

	#[error("Header injection attempt detected: {0}")]
	HeaderInjection(String),
}

pub type EmailResult<T> = std::result::Result<T, EmailError>;
