//! End-to-end contact form flow.
//!
//! Validates the fields, announces the submission, runs the retrying
//! submitter, and turns its result into a user-facing message plus the
//! matching analytics events.

use std::sync::Arc;

use crate::config::FormConfig;
use crate::feedback::{events, AnalyticsEvent, AnalyticsSink, Severity};
use crate::form::validation::{validate_fields, FieldError};
use crate::resilience::retries::RetryPolicy;
use crate::submission::{
    FailureKind, RetryCause, SubmissionFailure, SubmissionRequest, SubmissionResponse,
    SubmissionResult, Submitter, Transport,
};

pub const MSG_INVALID_FIELDS: &str = "Please fill in all required fields correctly.";
pub const MSG_SENDING: &str = "Sending your message...";
pub const MSG_SUCCESS: &str = "Thank you for your message! We will contact you soon.";
pub const MSG_CHECK_INPUT: &str =
    "Failed to send message. Please check your information and try again.";
pub const MSG_TIMED_OUT: &str = "Request timed out. Please check your connection and try again.";
pub const MSG_UNREACHABLE: &str =
    "Unable to reach the server. Please check your connection and try again.";
pub const MSG_UNEXPECTED: &str = "An error occurred. Please try again later.";

/// What happened to a contact form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// Validation failed; nothing was sent.
    Invalid(Vec<FieldError>),
    Delivered(SubmissionResponse),
    Failed {
        failure: SubmissionFailure,
        user_message: String,
    },
}

impl FlowOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, FlowOutcome::Delivered(_))
    }
}

/// Contact form front door around a [`Submitter`].
pub struct ContactFlow<T> {
    submitter: Submitter<T>,
    policy: RetryPolicy,
    form: FormConfig,
}

impl<T: Transport> ContactFlow<T> {
    /// The flow reports through the submitter's notifier and analytics sink.
    pub fn new(submitter: Submitter<T>, policy: RetryPolicy, form: FormConfig) -> Self {
        Self {
            submitter,
            policy,
            form,
        }
    }

    pub fn submitter(&self) -> &Submitter<T> {
        &self.submitter
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn submit(&self, fields: &SubmissionRequest) -> FlowOutcome {
        let notifier = self.submitter.notifier();
        let analytics = self.submitter.analytics();
        let form_name = self.form.form_name.as_str();

        if let Err(errors) = validate_fields(fields, &self.form) {
            tracing::debug!(form_name, invalid = errors.len(), "Form validation failed");
            notifier.notify(MSG_INVALID_FIELDS, Severity::Error);
            analytics.track(
                AnalyticsEvent::new(events::FORM_VALIDATION_ERROR).with("form_name", form_name),
            );
            return FlowOutcome::Invalid(errors);
        }

        let service_interest = fields.non_blank("service").unwrap_or("not_specified");
        analytics.track(
            AnalyticsEvent::new(events::FORM_SUBMIT_ATTEMPT)
                .with("form_name", form_name)
                .with("service_interest", service_interest)
                .with("has_phone", fields.non_blank("phone").is_some()),
        );
        notifier.notify(MSG_SENDING, Severity::Info);

        match self.submitter.submit(fields, &self.policy).await {
            SubmissionResult::Success(response) => {
                notifier.notify(MSG_SUCCESS, Severity::Success);
                analytics.track(
                    AnalyticsEvent::new(events::FORM_SUBMIT_SUCCESS)
                        .with("form_name", form_name)
                        .with("service_interest", service_interest),
                );
                analytics.track(
                    AnalyticsEvent::new(events::LEAD_GENERATED)
                        .with("source", form_name)
                        .with("service_interest", service_interest),
                );
                FlowOutcome::Delivered(response)
            }
            SubmissionResult::Failure(failure) => {
                let user_message = user_message(&failure, &self.form.contact_email);
                notifier.notify(&user_message, Severity::Error);
                report_failure(analytics, form_name, &failure);
                FlowOutcome::Failed {
                    failure,
                    user_message,
                }
            }
        }
    }
}

/// Exhausted transport failures are exceptions; everything else is a
/// `form_submit_error` split into client and server classes.
fn report_failure(analytics: &Arc<dyn AnalyticsSink>, form_name: &str, failure: &SubmissionFailure) {
    let exception_type = match failure.kind {
        FailureKind::Exhausted {
            cause: RetryCause::Timeout,
            ..
        } => Some("TimeoutError"),
        FailureKind::Exhausted {
            cause: RetryCause::Connection,
            ..
        } => Some("NetworkError"),
        _ => None,
    };

    if let Some(error_type) = exception_type {
        analytics.track(
            AnalyticsEvent::new(events::FORM_SUBMIT_EXCEPTION)
                .with("form_name", form_name)
                .with("error_type", error_type)
                .with("error_message", failure.message.as_str()),
        );
        return;
    }

    let error_type = match failure.kind {
        FailureKind::Client { .. } => "client_error",
        FailureKind::Exhausted { .. } | FailureKind::Rejected | FailureKind::InvalidResponse => {
            "server_error"
        }
    };
    analytics.track(
        AnalyticsEvent::new(events::FORM_SUBMIT_ERROR)
            .with("form_name", form_name)
            .with("error_type", error_type)
            .with("error_message", failure.message.as_str()),
    );
}

/// Message shown to the user for a failed submission.
pub fn user_message(failure: &SubmissionFailure, contact_email: &str) -> String {
    match failure.kind {
        FailureKind::Client { .. } => MSG_CHECK_INPUT.to_string(),
        FailureKind::Exhausted { cause, .. } => match cause {
            RetryCause::Timeout => MSG_TIMED_OUT.to_string(),
            RetryCause::Connection => MSG_UNREACHABLE.to_string(),
            RetryCause::Server { .. } => format!(
                "Failed to send message after multiple attempts. Please try again later or contact us directly at {}.",
                contact_email
            ),
        },
        FailureKind::Rejected | FailureKind::InvalidResponse => MSG_UNEXPECTED.to_string(),
    }
}
