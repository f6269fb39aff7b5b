use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

#[async_trait]
impl<M> Mailer for std::sync::Arc<M>
where
    M: Mailer + ?Sized,
{
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        (**self).send(email).await
    }
}

fn check_recipient(email: &Email) -> Result<(), MailError> {
    if !email.to.contains('@') {
        return Err(MailError::InvalidRecipient(email.to.clone()));
    }
    Ok(())
}

/// Writes outgoing mail to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        check_recipient(email)?;
        tracing::info!(to = %email.to, from = %email.from, subject = %email.subject, "email sent");
        tracing::debug!(body = %email.body, "email body");
        Ok(())
    }
}

/// Keeps every sent email in memory.
///
/// A failing recorder rejects every send, which is how tests exercise the
/// mail-failure path.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    fail_with: Option<MailError>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: MailError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        check_recipient(email)?;

        self.sent
            .lock()
            .map_err(|_| MailError::Transport("recorder lock poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}
