use crate::validation::{check_header_injection, validate_email, validate_email_list};
use crate::{EmailError, EmailResult};

/// Represents an email message with validated addresses.
///
/// All fields are private to enforce validation through the builder.
/// Use getter methods for read access and the builder for construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
	subject: String,
	body: String,
	from_email: String,
	to: Vec<String>,
}

impl EmailMessage {
	/// Create a new builder for constructing an `EmailMessage`.
	pub fn builder() -> EmailMessageBuilder {
		EmailMessageBuilder::default()
	}

	/// Get the subject.
	pub fn subject(&self) -> &str {
		&self.subject
	}

	/// Get the body.
	pub fn body(&self) -> &str {
		&self.body
	}

	/// Get the from email address.
	pub fn from_email(&self) -> &str {
		&self.from_email
	}

	/// Get the list of recipients.
	pub fn to(&self) -> &[String] {
		&self.to
	}
}

#[derive(Debug, Default)]
pub struct EmailMessageBuilder {
	subject: String,
	body: String,
	from_email: String,
	to: Vec<String>,
}

impl EmailMessageBuilder {
	pub fn subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = subject.into();
		self
	}

	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	pub fn from(mut self, from: impl Into<String>) -> Self {
		self.from_email = from.into();
		self
	}

	pub fn to(mut self, to: Vec<String>) -> Self {
		self.to = to;
		self
	}

	/// Build the email message with validation.
	///
	/// A message needs a sender and at least one recipient. Every address is
	/// checked with [`validate_email`]; the subject is checked for header
	/// injection.
	pub fn build(self) -> EmailResult<EmailMessage> {
		if self.from_email.is_empty() {
			return Err(EmailError::MissingField("from".to_string()));
		}
		if self.to.is_empty() {
			return Err(EmailError::MissingField("to".to_string()));
		}

		validate_email(&self.from_email)?;
		validate_email_list(&self.to)?;
		check_header_injection(&self.subject)?;

		Ok(EmailMessage {
			subject: self.subject,
			body: self.body,
			from_email: self.from_email,
			to: self.to,
		})
	}
}
