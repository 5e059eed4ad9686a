//! Delivery backends
//!
//! The transport itself lives outside this crate; backends here either hand
//! messages to a development sink or keep them for inspection.

use crate::message::EmailMessage;
use crate::{EmailError, EmailResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use vitrine_conf::EmailSettings;

/// Capability to deliver messages
#[async_trait]
pub trait EmailBackend: Send + Sync {
	/// Deliver `messages`, returning how many were accepted
	async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize>;
}

/// Prints each message to stdout and logs a summary
#[cfg(feature = "console")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

#[cfg(feature = "console")]
#[async_trait]
impl EmailBackend for ConsoleBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize> {
		for message in messages {
			tracing::info!(
				from = message.from_email(),
				to = ?message.to(),
				subject = message.subject(),
				"console email backend"
			);
			println!("From: {}", message.from_email());
			println!("To: {}", message.to().join(", "));
			println!("Subject: {}", message.subject());
			println!();
			println!("{}", message.body());
			println!("{}", "-".repeat(79));
		}
		Ok(messages.len())
	}
}

/// Keeps sent messages in memory
///
/// Clones share the same outbox, so a test can hand one clone to the code
/// under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
	outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Messages sent so far
	pub fn messages(&self) -> Vec<EmailMessage> {
		self.outbox.lock().clone()
	}

	/// Number of messages sent so far
	pub fn count(&self) -> usize {
		self.outbox.lock().len()
	}

	pub fn clear(&self) {
		self.outbox.lock().clear();
	}
}

#[async_trait]
impl EmailBackend for MemoryBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize> {
		self.outbox.lock().extend_from_slice(messages);
		Ok(messages.len())
	}
}

/// Select a backend by its settings name
pub fn backend_from_settings(settings: &EmailSettings) -> EmailResult<Arc<dyn EmailBackend>> {
	match settings.backend.as_str() {
		#[cfg(feature = "console")]
		"console" => Ok(Arc::new(ConsoleBackend)),
		"memory" => Ok(Arc::new(MemoryBackend::new())),
		other => Err(EmailError::UnknownBackend(other.to_string())),
	}
}
