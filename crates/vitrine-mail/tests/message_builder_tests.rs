//! EmailMessage builder and backend integration tests

use rstest::rstest;
use vitrine_conf::EmailSettings;
use vitrine_mail::{
	EmailBackend, EmailError, EmailMessage, MemoryBackend, backend_from_settings, send_mail,
};

/// Test: Builder pattern basic construction
#[rstest]
fn test_builder_basic_construction() {
	// Arrange
	let builder = EmailMessage::builder()
		.from("noreply@monsite.com")
		.to(vec!["contact@exemple.com".to_string()])
		.subject("Nouveau message depuis votre site vitrine")
		.body("Nom: Alice");

	// Act
	let message = builder.build().unwrap();

	// Assert
	assert_eq!(message.from_email(), "noreply@monsite.com");
	assert_eq!(message.to(), vec!["contact@exemple.com"]);
	assert_eq!(message.subject(), "Nouveau message depuis votre site vitrine");
	assert_eq!(message.body(), "Nom: Alice");
}

/// Test: Missing sender or recipients
#[rstest]
#[case("", vec!["contact@exemple.com".to_string()], "from")]
#[case("noreply@monsite.com", vec![], "to")]
fn test_builder_missing_fields(
	#[case] from: &str,
	#[case] to: Vec<String>,
	#[case] missing: &str,
) {
	// Act
	let result = EmailMessage::builder().from(from).to(to).subject("s").build();

	// Assert
	match result {
		Err(EmailError::MissingField(field)) => assert_eq!(field, missing),
		other => panic!("expected MissingField, got {:?}", other),
	}
}

/// Test: Invalid recipient is rejected
#[rstest]
fn test_builder_rejects_invalid_recipient() {
	// Act
	let result = EmailMessage::builder()
		.from("noreply@monsite.com")
		.to(vec!["contact@exemple.com".to_string(), "oops".to_string()])
		.build();

	// Assert
	assert!(matches!(result, Err(EmailError::InvalidAddress(addr)) if addr == "oops"));
}

/// Test: Subject with CRLF is rejected
#[rstest]
fn test_builder_rejects_subject_injection() {
	// Act
	let result = EmailMessage::builder()
		.from("noreply@monsite.com")
		.to(vec!["contact@exemple.com".to_string()])
		.subject("Hello\r\nBcc: someone@exemple.com")
		.build();

	// Assert
	assert!(matches!(result, Err(EmailError::HeaderInjection(_))));
}

/// Test: Memory backend keeps what it was given, shared across clones
#[rstest]
#[tokio::test]
async fn test_memory_backend_shared_outbox() {
	// Arrange
	let backend = MemoryBackend::new();
	let handle = backend.clone();

	// Act
	let sent = send_mail(
		&backend,
		"Sujet",
		"Corps",
		"noreply@monsite.com",
		vec!["a@exemple.com".to_string(), "b@exemple.com".to_string()],
	)
	.await
	.unwrap();

	// Assert
	assert_eq!(sent, 1);
	assert_eq!(handle.count(), 1);
	let message = &handle.messages()[0];
	assert_eq!(message.to(), vec!["a@exemple.com", "b@exemple.com"]);
	assert_eq!(message.body(), "Corps");
}

/// Test: send_mail surfaces validation errors before reaching the backend
#[rstest]
#[tokio::test]
async fn test_send_mail_invalid_from_never_reaches_backend() {
	// Arrange
	let backend = MemoryBackend::new();

	// Act
	let result = send_mail(
		&backend,
		"Sujet",
		"Corps",
		"not an address",
		vec!["a@exemple.com".to_string()],
	)
	.await;

	// Assert
	assert!(result.is_err());
	assert_eq!(backend.count(), 0);
}

/// Test: Backend selection by settings name
#[rstest]
#[case("console", true)]
#[case("memory", true)]
#[case("smtp", false)]
#[tokio::test]
async fn test_backend_from_settings(#[case] name: &str, #[case] known: bool) {
	// Arrange
	let settings = EmailSettings {
		backend: name.to_string(),
		..EmailSettings::default()
	};

	// Act
	let backend = backend_from_settings(&settings);

	// Assert
	assert_eq!(backend.is_ok(), known);
	if let Ok(backend) = backend {
		let message = EmailMessage::builder()
			.from("noreply@monsite.com")
			.to(vec!["contact@exemple.com".to_string()])
			.subject("Test")
			.body("Body")
			.build()
			.unwrap();
		assert_eq!(backend.send_messages(&[message]).await.unwrap(), 1);
	}
}
