use crate::backends::EmailBackend;
use crate::message::EmailMessage;
use crate::EmailResult;

/// Build and send a single plain-text message
///
/// This is the `send(to, from, subject, body)` capability the content model
/// relies on.
pub async fn send_mail(
	backend: &dyn EmailBackend,
	subject: impl Into<String>,
	body: impl Into<String>,
	from_email: impl Into<String>,
	recipient_list: Vec<String>,
) -> EmailResult<usize> {
	let message = EmailMessage::builder()
		.from(from_email)
		.to(recipient_list)
		.subject(subject)
		.body(body)
		.build()?;
	backend.send_messages(&[message]).await
}
