//! Value validators for form fields
//!
//! Each validator returns a [`FieldError::Validation`] carrying a
//! user-facing message.

use crate::field::{FieldError, FieldResult};
use regex::Regex;
use std::sync::LazyLock;

pub use vitrine_mail::MAX_EMAIL_LENGTH;

// HTTP/HTTPS URL pattern.
//
// Validates URLs with:
// - http or https scheme only
// - Valid domain labels (no leading/trailing hyphens)
// - Optional port number (1-5 digits)
// - Optional path, query string, and fragment
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^https?://[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?)*(:[0-9]{1,5})?(/[^\s?#]*)?(\?[^\s#]*)?(#[^\s]*)?$",
	)
	.expect("URL_REGEX: invalid regex pattern")
});

/// Validates that a string value is a well-formed HTTP or HTTPS URL.
///
/// # Examples
///
/// ```
/// use vitrine_forms::validators::validate_url;
///
/// assert!(validate_url("https://exemple.com/formations").is_ok());
/// assert!(validate_url("ftp://exemple.com").is_err());
/// ```
pub fn validate_url(value: &str) -> FieldResult<()> {
	if URL_REGEX.is_match(value) {
		Ok(())
	} else {
		Err(FieldError::Validation("Enter a valid URL.".to_string()))
	}
}

/// Validates an email address.
///
/// # Examples
///
/// ```
/// use vitrine_forms::validators::validate_email;
///
/// assert!(validate_email("contact@exemple.com").is_ok());
/// assert!(validate_email("contact(at)exemple.com").is_err());
/// ```
pub fn validate_email(value: &str) -> FieldResult<()> {
	vitrine_mail::validation::validate_email(value)
		.map_err(|_| FieldError::Validation("Enter a valid email address.".to_string()))
}

/// Validates a comma-separated list of email addresses.
///
/// Empty entries produced by stray commas are ignored; at least one address
/// must remain.
///
/// # Examples
///
/// ```
/// use vitrine_forms::validators::validate_email_list;
///
/// assert!(validate_email_list("a@exemple.com, b@exemple.com").is_ok());
/// assert!(validate_email_list("a@exemple.com, nope").is_err());
/// assert!(validate_email_list(" , ").is_err());
/// ```
pub fn validate_email_list(value: &str) -> FieldResult<()> {
	let addresses = vitrine_mail::validation::split_addresses(value);
	if addresses.is_empty() {
		return Err(FieldError::Validation(
			"Enter at least one email address.".to_string(),
		));
	}
	for address in addresses {
		if validate_email(&address).is_err() {
			return Err(FieldError::Validation(format!(
				"{} is not a valid email address.",
				address
			)));
		}
	}
	Ok(())
}

/// Validates the maximum length, counted in characters (not bytes).
pub fn validate_max_length(value: &str, max_length: usize) -> FieldResult<()> {
	let char_count = value.chars().count();
	if char_count > max_length {
		return Err(FieldError::Validation(format!(
			"Ensure this value has at most {} characters (it has {})",
			max_length, char_count
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("http://localhost:8080/path", true)]
	#[case("https://www.exemple.com/path?q=1#top", true)]
	#[case("exemple.com", false)]
	#[case("https://-bad.com", false)]
	fn test_validate_url(#[case] value: &str, #[case] valid: bool) {
		assert_eq!(validate_url(value).is_ok(), valid);
	}

	#[rstest]
	#[case("contact@exemple.com", true)]
	#[case("contact@localhost", false)]
	#[case("a b@exemple.com", false)]
	fn test_email_agrees_with_mail_delivery(#[case] address: &str, #[case] valid: bool) {
		// Act
		let field = validate_email(address).is_ok();
		let delivery = vitrine_mail::validation::validate_email(address).is_ok();

		// Assert
		assert_eq!(field, valid);
		assert_eq!(field, delivery);
	}

	#[rstest]
	fn test_max_length_counts_characters() {
		// Arrange: 5 accented characters are 10 bytes
		let value = "ééééé";

		// Act & Assert
		assert!(validate_max_length(value, 5).is_ok());
		assert!(validate_max_length(value, 4).is_err());
	}
}
