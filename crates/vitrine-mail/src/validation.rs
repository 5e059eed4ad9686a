//! Address validation and header-injection checks

use crate::{EmailError, EmailResult};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of an address (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

// Dot-atom local part, dotted domain labels without leading/trailing hyphens,
// alphabetic top-level domain of at least two letters.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Validate a single address
///
/// # Examples
///
/// ```
/// use vitrine_mail::validation::validate_email;
///
/// assert!(validate_email("contact@exemple.com").is_ok());
/// assert!(validate_email("contact@exemple").is_err());
/// assert!(validate_email("a b@exemple.com").is_err());
/// ```
pub fn validate_email(address: &str) -> EmailResult<()> {
	if address.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(address) {
		return Err(EmailError::InvalidAddress(address.to_string()));
	}
	Ok(())
}

/// Validate every address of a recipient list
pub fn validate_email_list(addresses: &[String]) -> EmailResult<()> {
	addresses.iter().try_for_each(|a| validate_email(a))
}

/// Split a comma-separated recipient field into trimmed addresses
///
/// # Examples
///
/// ```
/// use vitrine_mail::validation::split_addresses;
///
/// assert_eq!(
///     split_addresses("a@exemple.com, b@exemple.com,"),
///     vec!["a@exemple.com".to_string(), "b@exemple.com".to_string()]
/// );
/// ```
pub fn split_addresses(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|a| !a.is_empty())
		.map(str::to_string)
		.collect()
}

/// Reject CR/LF in values that end up in message headers
pub fn check_header_injection(value: &str) -> EmailResult<()> {
	if value.contains('\r') || value.contains('\n') {
		return Err(EmailError::HeaderInjection(value.escape_debug().to_string()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("contact@exemple.com")]
	#[case("prenom.nom+site@association.fr")]
	#[case("noreply@monsite.com")]
	fn test_valid_addresses(#[case] address: &str) {
		assert!(validate_email(address).is_ok());
	}

	#[rstest]
	#[case("")]
	#[case("plainaddress")]
	#[case("@exemple.com")]
	#[case("contact@")]
	#[case("contact@-exemple.com")]
	#[case("contact@exemple.c")]
	#[case("con..tact@exemple.com")]
	fn test_invalid_addresses(#[case] address: &str) {
		assert!(matches!(
			validate_email(address),
			Err(EmailError::InvalidAddress(_))
		));
	}

	#[rstest]
	fn test_overlong_address_rejected() {
		// Arrange
		let address = format!("{}@exemple.com", "a".repeat(250));

		// Act & Assert
		assert!(validate_email(&address).is_err());
	}

	#[rstest]
	#[case("Bonjour\r\nBcc: victim@exemple.com")]
	#[case("line\nbreak")]
	fn test_header_injection_detected(#[case] value: &str) {
		assert!(matches!(
			check_header_injection(value),
			Err(EmailError::HeaderInjection(_))
		));
	}
}
