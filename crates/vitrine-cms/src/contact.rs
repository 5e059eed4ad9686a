//! Contact form flow
//!
//! A contact page owns an ordered list of [`FormFieldRecord`]s. At request
//! time they become a [`Form`]; a valid submission is stored as a
//! [`FormSubmission`] and then emailed to the page's recipients. Delivery
//! happens after the submission is stored and its failure never undoes the
//! submission.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use vitrine_conf::DispatchMode;
use vitrine_forms::{Form, FormBuilder, FormFieldDefinition, display_value, help_text_as_placeholder};
use vitrine_mail::{EmailBackend, EmailMessage, EmailResult};

use crate::error::{CmsError, CmsResult};
use crate::pages::ContactPage;
use crate::references::{FormFieldId, PageId, SubmissionId};
use crate::rich_text::RichText;
use crate::store::ContentStore;

/// A form field owned by a contact page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFieldRecord {
	pub id: FormFieldId,
	pub page: PageId,
	pub sort_order: usize,
	#[serde(flatten)]
	pub definition: FormFieldDefinition,
}

impl FormFieldRecord {
	pub fn new(page: PageId, sort_order: usize, definition: FormFieldDefinition) -> Self {
		Self {
			id: FormFieldId::new(),
			page,
			sort_order,
			definition,
		}
	}
}

/// Stored result of a valid form post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
	pub id: SubmissionId,
	pub page: PageId,
	/// Cleaned values keyed by field name, in field order
	pub form_data: IndexMap<String, JsonValue>,
	pub submit_time: DateTime<Utc>,
}

impl FormSubmission {
	pub fn new(page: PageId, form_data: IndexMap<String, JsonValue>, submit_time: DateTime<Utc>) -> Self {
		Self {
			id: SubmissionId::new(),
			page,
			form_data,
			submit_time,
		}
	}
}

/// What happened to the notification email of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReport {
	/// The backend accepted the message
	Sent,
	/// Building or sending the message failed; the submission is kept
	Failed(String),
	/// Handed to a background task
	Queued,
	/// The page lists no recipient
	Skipped,
}

impl DispatchReport {
	pub fn is_failure(&self) -> bool {
		matches!(self, DispatchReport::Failed(_))
	}
}

/// Result of posting a contact form
#[derive(Debug)]
pub enum SubmissionOutcome {
	/// Validation failed; nothing was stored or sent
	Invalid { form: Form },
	/// The submission was stored
	Accepted {
		submission: FormSubmission,
		thank_you: RichText,
		dispatch: DispatchReport,
	},
}

impl SubmissionOutcome {
	pub fn is_accepted(&self) -> bool {
		matches!(self, SubmissionOutcome::Accepted { .. })
	}
}

/// Serves contact forms and processes their submissions
#[derive(Clone)]
pub struct ContactFormService {
	store: Arc<ContentStore>,
	mailer: Arc<dyn EmailBackend>,
	dispatch: DispatchMode,
}

impl ContactFormService {
	/// Service sending notifications inline
	pub fn new(store: Arc<ContentStore>, mailer: Arc<dyn EmailBackend>) -> Self {
		Self {
			store,
			mailer,
			dispatch: DispatchMode::Inline,
		}
	}

	pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
		self.dispatch = dispatch;
		self
	}

	/// Unbound form of a contact page, help texts shown as placeholders
	pub fn get_form(&self, page: PageId) -> CmsResult<Form> {
		self.store.page::<ContactPage>(page)?;
		let definitions = self.store.form_definitions(page);
		Ok(FormBuilder::new(&definitions)
			.with_transform(help_text_as_placeholder)
			.build())
	}

	/// Validate a post, store it and notify the page's recipients
	///
	/// Only live pages accept submissions. An invalid post comes back as
	/// [`SubmissionOutcome::Invalid`] with the bound form and its errors.
	pub async fn serve_submission(
		&self,
		page_id: PageId,
		data: HashMap<String, JsonValue>,
	) -> CmsResult<SubmissionOutcome> {
		let page: ContactPage = self.store.page(page_id)?;
		if !page.meta.is_live() {
			return Err(CmsError::PageNotLive(page_id.to_string()));
		}

		let mut form = self.get_form(page_id)?;
		form.bind(data);
		if !form.is_valid() {
			tracing::debug!(page = %page_id, errors = form.errors().len(), "contact form rejected");
			return Ok(SubmissionOutcome::Invalid { form });
		}

		let submission = self
			.store
			.record_submission(page_id, form.cleaned_data().clone())?;
		tracing::info!(page = %page_id, submission = %submission.id, "contact form submitted");

		let dispatch = self.dispatch_notification(&page, &form).await;
		Ok(SubmissionOutcome::Accepted {
			submission,
			thank_you: page.thank_you_text,
			dispatch,
		})
	}

	async fn dispatch_notification(&self, page: &ContactPage, form: &Form) -> DispatchReport {
		if page.recipients().is_empty() {
			return DispatchReport::Skipped;
		}
		let message = match build_notification(page, form) {
			Ok(message) => message,
			Err(e) => {
				tracing::warn!(page = %page.meta.id, error = %e, "could not build contact notification");
				return DispatchReport::Failed(e.to_string());
			}
		};

		if self.dispatch == DispatchMode::Background
			&& let Ok(handle) = tokio::runtime::Handle::try_current()
		{
			let mailer = Arc::clone(&self.mailer);
			let page_id = page.meta.id;
			handle.spawn(async move {
				if let Err(e) = mailer.send_messages(&[message]).await {
					tracing::warn!(page = %page_id, error = %e, "contact notification failed");
				}
			});
			return DispatchReport::Queued;
		}

		match self.mailer.send_messages(&[message]).await {
			Ok(_) => DispatchReport::Sent,
			Err(e) => {
				tracing::warn!(page = %page.meta.id, error = %e, "contact notification failed");
				DispatchReport::Failed(e.to_string())
			}
		}
	}
}

/// `label: value` lines of a validated form, in field order
pub fn render_email(form: &Form) -> String {
	form.fields()
		.iter()
		.map(|field| {
			let value = form
				.cleaned_data()
				.get(&field.name)
				.map(display_value)
				.unwrap_or_default();
			format!("{}: {}", field.label, value)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// Notification for a validated form, routed by the page's settings
pub fn build_notification(page: &ContactPage, form: &Form) -> EmailResult<EmailMessage> {
	EmailMessage::builder()
		.subject(page.subject.clone())
		.body(render_email(form))
		.from(page.from_address.clone())
		.to(page.recipients())
		.build()
}
