//! Email notifications for account lifecycle events.
//!
//! Supports three modes:
//! 1. Send via Resend API (default when API key available)
//! 2. POST to webhook URL (for DIY email delivery)
//! 3. Disabled (no email sent, log only)
//!
//! Delivery is fire-and-forget from the caller's point of view: a failed
//! notification never rolls back the state change that triggered it.

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Result of attempting to send a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailSendResult {
    /// Email was sent successfully via Resend
    Sent,
    /// Data was POSTed to the configured webhook URL
    WebhookCalled,
    /// Notifications are disabled
    Disabled,
    /// No API key configured
    NoApiKey,
}

/// Webhook payload sent when a webhook URL is configured.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    email: &'a str,
    name: &'a str,
    occurred_at: i64,
}

/// Resend API request body.
#[derive(Debug, Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    text: String,
    html: String,
}

/// Resend API response.
#[derive(Debug, Deserialize)]
struct ResendEmailResponse {
    #[allow(dead_code)]
    id: String,
}

#[derive(Clone)]
pub struct EmailService {
    api_key: Option<String>,
    from_email: String,
    webhook_url: Option<String>,
    enabled: bool,
    http_client: Client,
}

impl EmailService {
    pub fn new(
        api_key: Option<String>,
        from_email: String,
        webhook_url: Option<String>,
        enabled: bool,
    ) -> Self {
        Self {
            api_key,
            from_email,
            webhook_url,
            enabled,
            http_client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
            config.email_webhook_url.clone(),
            config.email_enabled,
        )
    }

    /// Notify a user that their account has been deactivated.
    pub async fn send_account_deactivated(
        &self,
        to_email: &str,
        name: &str,
    ) -> Result<EmailSendResult> {
        if !self.enabled {
            tracing::debug!(to = %to_email, "Email disabled, skipping deactivation notification");
            return Ok(EmailSendResult::Disabled);
        }

        if let Some(webhook_url) = self.webhook_url.clone() {
            return self.call_webhook(&webhook_url, to_email, name).await;
        }

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(
                to = %to_email,
                "No Resend API key configured, cannot send deactivation notification"
            );
            return Ok(EmailSendResult::NoApiKey);
        };

        self.send_via_resend(api_key, to_email, name).await
    }

    async fn send_via_resend(
        &self,
        api_key: &str,
        to_email: &str,
        name: &str,
    ) -> Result<EmailSendResult> {
        let subject = "Account Deactivated".to_string();
        let text = format!(
            "Hi {},\n\nYour account has been deactivated. If this was a mistake, please contact support.",
            name
        );
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h2 style="color: #333;">Account Deactivated</h2>
<p>Hi <strong>{}</strong>,</p>
<p>Your account has been deactivated. If this was a mistake, please contact support.</p>
<hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">
<p style="color: #999; font-size: 12px;">You are receiving this because of a change to your account.</p>
</body>
</html>"#,
            name
        );

        let request = ResendEmailRequest {
            from: &self.from_email,
            to: vec![to_email],
            subject,
            text,
            html,
        };

        let response = self
            .http_client
            .post(RESEND_API_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to send request to Resend API");
                AppError::Internal(format!("Email service error: {}", e))
            })?;

        if response.status().is_success() {
            let _result: ResendEmailResponse = response.json().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to parse Resend API response");
                AppError::Internal("Email service response error".into())
            })?;

            tracing::info!(to = %to_email, "Deactivation notification sent via Resend");
            Ok(EmailSendResult::Sent)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Resend API returned error");
            Err(AppError::Internal(format!(
                "Email service error: {} - {}",
                status, body
            )))
        }
    }

    async fn call_webhook(
        &self,
        webhook_url: &str,
        to_email: &str,
        name: &str,
    ) -> Result<EmailSendResult> {
        let payload = WebhookPayload {
            event: "account_deactivated",
            email: to_email,
            name,
            occurred_at: Utc::now().timestamp(),
        };

        let response = self
            .http_client
            .post(webhook_url)
            .header("Content-Type", "application/json")
            .header("X-Tableside-Event", "account_deactivated")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    webhook_url = %webhook_url,
                    "Failed to call notification webhook"
                );
                AppError::Internal(format!("Webhook call failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                webhook_url = %webhook_url,
                "Notification webhook returned error"
            );
            // Webhook errors are the receiver's problem to debug; the
            // account state change already happened.
        }
        Ok(EmailSendResult::WebhookCalled)
    }
}
