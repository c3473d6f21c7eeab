//! Contact form route handlers.
//!
//! The form posts to the shop service's contact endpoint. Validation
//! failures and delivery failures both re-render the page with the
//! submitted values so the customer can correct and retry; only a
//! confirmed delivery clears the form.

use amara_core::types::Email;
use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::shop_api::ContactRequest;
use crate::state::AppState;

/// Flash message shown above the form.
#[derive(Clone)]
pub struct FlashView {
    pub success: bool,
    pub message: String,
}

/// Submitted form values, echoed back on failure.
#[derive(Debug, Clone, Default)]
pub struct ContactFormView {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub flash: Option<FlashView>,
    pub form: ContactFormView,
}

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    fn to_view(&self) -> ContactFormView {
        ContactFormView {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }

    fn validate(&self) -> Result<Email, String> {
        if self.name.trim().is_empty()
            || self.subject.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err("Please fill in all fields.".to_string());
        }

        Email::parse(self.email.trim())
            .map_err(|_| "Please enter a valid email address.".to_string())
    }
}

/// Display the contact page.
#[instrument]
pub async fn page() -> impl IntoResponse {
    ContactTemplate {
        flash: None,
        form: ContactFormView::default(),
    }
}

/// Submit a contact message.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let email = match form.validate() {
        Ok(email) => email,
        Err(message) => {
            return ContactTemplate {
                flash: Some(FlashView {
                    success: false,
                    message,
                }),
                form: form.to_view(),
            };
        }
    };

    let request = ContactRequest {
        name: form.name.trim().to_string(),
        email: email.into_inner(),
        subject: form.subject.trim().to_string(),
        message: form.message.trim().to_string(),
    };

    match state.shop_api().send_contact_message(&request).await {
        Ok(()) => ContactTemplate {
            flash: Some(FlashView {
                success: true,
                message: "Your message has been sent. We will get back to you soon.".to_string(),
            }),
            form: ContactFormView::default(),
        },
        Err(e) => {
            tracing::warn!("contact message failed: {e}");
            let message = e.server_message().map_or_else(
                || "Could not send your message. Please try again.".to_string(),
                ToString::to_string,
            );

            ContactTemplate {
                flash: Some(FlashView {
                    success: false,
                    message,
                }),
                form: form.to_view(),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Mona".to_string(),
            email: "mona@example.com".to_string(),
            subject: "Sizing".to_string(),
            message: "Does the linen dress run large?".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut form = valid_form();
        form.email = "a@b".to_string();
        assert!(form.validate().is_err());

        form.email = "a.com".to_string();
        assert!(form.validate().is_err());

        form.email = "a@b.co".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut form = valid_form();
        form.message = "   ".to_string();
        assert!(form.validate().is_err());
    }
}
