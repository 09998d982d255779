//! Contact form submission flow.
//!
//! The form posts a [`ContactSubmission`] through a [`ContactTransport`] and
//! walks a small state machine:
//!
//! ```text
//! Idle ──submit──▶ Loading ──2xx──▶ Success   (terminal)
//!                     │
//!                     └──other/failure──▶ Error(text) ──submit──▶ Loading
//! ```
//!
//! The mail relay behind the transport is out of scope here; tests drive the
//! flow with an in-memory transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the relay rejects a submission without saying why.
pub const GENERIC_FAILURE: &str = "Something went wrong";
/// Shown when the request never produced a reply.
pub const CONNECTION_FAILURE: &str = "Connection failed. Try again.";
/// Shown when a field is left blank.
pub const MISSING_FIELDS: &str = "Name, email, and message are required.";

pub const SUCCESS_TITLE: &str = "Transmission received.";
pub const SUCCESS_SUBTITLE: &str = "Standing by for your signal.";

pub const SEND_LABEL: &str = "SEND TRANSMISSION";
pub const SENDING_LABEL: &str = "Transmitting…";

/// The three fields of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// All three fields carry non-whitespace text.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .all(|f| !f.trim().is_empty())
    }
}

/// Raw reply from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: u16,
    pub body: String,
}

impl RelayReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of a JSON body, if present and non-empty.
    pub fn error_message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: Option<String>,
        }
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.trim().is_empty())
    }
}

/// The request failed before any reply arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Failed(String),
    #[error("connection failed")]
    Disconnected,
}

impl TransportError {
    /// Text shown to the visitor.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Failed(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => CONNECTION_FAILURE.to_string(),
        }
    }
}

/// Anything that can deliver a submission to the relay.
///
/// Futures are not required to be `Send`: the form is driven from the UI
/// thread.
#[async_trait(?Send)]
pub trait ContactTransport {
    async fn send(&self, submission: &ContactSubmission) -> Result<RelayReply, TransportError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Form state machine.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    status: FormStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Error text, when in the error state.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// The form fields are shown in every state but success.
    pub fn shows_form(&self) -> bool {
        self.status != FormStatus::Success
    }

    pub fn button_label(&self) -> &'static str {
        if self.status == FormStatus::Loading {
            SENDING_LABEL
        } else {
            SEND_LABEL
        }
    }

    /// Success copy, once the transmission has gone through.
    pub fn success_copy(&self) -> Option<(&'static str, &'static str)> {
        (self.status == FormStatus::Success).then_some((SUCCESS_TITLE, SUCCESS_SUBTITLE))
    }

    /// Enter the loading state. Returns false (and changes nothing) if a
    /// submission is already in flight or has succeeded.
    pub fn begin(&mut self) -> bool {
        match self.status {
            FormStatus::Idle | FormStatus::Error(_) => {
                self.status = FormStatus::Loading;
                true
            }
            FormStatus::Loading | FormStatus::Success => false,
        }
    }

    /// Settle an in-flight submission. Ignored unless loading.
    pub fn finish(&mut self, outcome: Result<RelayReply, TransportError>) {
        if self.status != FormStatus::Loading {
            return;
        }
        self.status = match outcome {
            Ok(reply) if reply.is_success() => FormStatus::Success,
            Ok(reply) => {
                tracing::warn!(status = reply.status, "contact relay rejected submission");
                FormStatus::Error(
                    reply
                        .error_message()
                        .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                )
            }
            Err(err) => {
                tracing::warn!(error = %err, "contact relay unreachable");
                FormStatus::Error(err.user_message())
            }
        };
    }

    /// Run a whole submission through `transport`.
    pub async fn submit<T: ContactTransport>(
        &mut self,
        transport: &T,
        submission: &ContactSubmission,
    ) -> &FormStatus {
        if !self.begin() {
            return &self.status;
        }
        if !submission.is_complete() {
            self.status = FormStatus::Error(MISSING_FIELDS.to_string());
            return &self.status;
        }
        let outcome = transport.send(submission).await;
        self.finish(outcome);
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct Canned {
        reply: RefCell<Vec<Result<RelayReply, TransportError>>>,
        calls: Cell<usize>,
    }

    impl Canned {
        fn new(replies: Vec<Result<RelayReply, TransportError>>) -> Self {
            Self {
                reply: RefCell::new(replies),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl ContactTransport for Canned {
        async fn send(&self, _: &ContactSubmission) -> Result<RelayReply, TransportError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.borrow_mut().remove(0)
        }
    }

    fn filled() -> ContactSubmission {
        ContactSubmission::new("Ada", "ada@example.com", "Hello there")
    }

    #[test]
    fn test_error_body_parsing() {
        assert_eq!(
            RelayReply::new(400, r#"{"error":"Bad email"}"#).error_message().as_deref(),
            Some("Bad email")
        );
        assert_eq!(RelayReply::new(500, "").error_message(), None);
        assert_eq!(RelayReply::new(500, "{}").error_message(), None);
        assert_eq!(RelayReply::new(500, r#"{"error":""}"#).error_message(), None);
        assert_eq!(RelayReply::new(502, "<html>").error_message(), None);
    }

    #[test]
    fn test_begin_guards_transitions() {
        let mut form = ContactForm::new();
        assert!(form.begin());
        assert_eq!(form.button_label(), SENDING_LABEL);
        assert!(!form.begin());

        form.finish(Err(TransportError::Disconnected));
        assert_eq!(form.error_message(), Some(CONNECTION_FAILURE));
        assert!(form.begin());

        form.finish(Ok(RelayReply::new(200, "{}")));
        assert!(!form.begin());
        assert!(!form.shows_form());
    }

    #[test]
    fn test_finish_outside_loading_is_ignored() {
        let mut form = ContactForm::new();
        form.finish(Ok(RelayReply::new(200, "")));
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn test_transport_message_is_shown() {
        let mut form = ContactForm::new();
        form.begin();
        form.finish(Err(TransportError::Failed("dns lookup failed".into())));
        assert_eq!(form.error_message(), Some("dns lookup failed"));
    }

    #[test]
    fn test_incomplete_submission_skips_transport() {
        let transport = Canned::new(vec![]);
        let mut form = ContactForm::new();
        let blank = ContactSubmission::new("Ada", "  ", "hi");
        pollster::block_on(form.submit(&transport, &blank));
        assert_eq!(form.error_message(), Some(MISSING_FIELDS));
        assert_eq!(transport.calls.get(), 0);
    }

    #[test]
    fn test_retry_after_error() {
        let transport = Canned::new(vec![
            Ok(RelayReply::new(500, r#"{"error":"Failed to send message. Please try again."}"#)),
            Ok(RelayReply::new(200, r#"{"success":true}"#)),
        ]);
        let mut form = ContactForm::new();

        pollster::block_on(form.submit(&transport, &filled()));
        assert_eq!(form.error_message(), Some("Failed to send message. Please try again."));
        assert!(form.shows_form());

        pollster::block_on(form.submit(&transport, &filled()));
        assert_eq!(form.status(), &FormStatus::Success);
        assert_eq!(form.success_copy(), Some((SUCCESS_TITLE, SUCCESS_SUBTITLE)));

        // Terminal: a further submit does not reach the transport
        pollster::block_on(form.submit(&transport, &filled()));
        assert_eq!(transport.calls.get(), 2);
    }

    #[test]
    fn test_submission_serializes_as_flat_json() {
        let json = serde_json::to_value(filled()).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    }
}
