use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    config::MailConfig,
    models::{Message, NotificationStatus},
};

/// NotifyError
///
/// Failure to deliver an owner notification. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("email build error: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("notification timed out after {0:?}")]
    Timeout(Duration),
    #[error("simulated failure")]
    Simulated,
}

/// Notifier Trait
///
/// Tells the site owner that a contact message arrived. Swappable between the
/// SMTP implementation and `MockNotifier` in tests.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_new_message(&self, message: &Message) -> Result<(), NotifyError>;
}

/// NotifierState
///
/// Shared handle stored in `AppState`. `None` there means mail is disabled.
pub type NotifierState = Arc<dyn Notifier>;

/// SmtpNotifier
///
/// Sends a plain-text email over STARTTLS with `Reply-To` set to the sender,
/// so the owner can answer straight from their inbox.
pub struct SmtpNotifier {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Result<Self, NotifyError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }
}

fn render_body(message: &Message) -> String {
    format!(
        "You received a new message through your portfolio.\n\n\
         Name: {}\nEmail: {}\nReceived: {}\n\n{}\n",
        message.name,
        message.email,
        message.created_at.to_rfc3339(),
        message.message
    )
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify_new_message(&self, message: &Message) -> Result<(), NotifyError> {
        let reply_to = Mailbox::new(Some(message.name.clone()), message.email.parse()?);

        let email = lettre::Message::builder()
            .from(self.config.from.parse()?)
            .to(self.config.notify_to.parse()?)
            .reply_to(reply_to)
            .subject(format!("New portfolio message from {}", message.name))
            .header(ContentType::TEXT_PLAIN)
            .body(render_body(message))?;

        self.transport.send(email).await?;
        Ok(())
    }
}

/// MockNotifier
///
/// Records every message it is asked to send. Can be told to fail or to stall.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Message>>,
    pub should_fail: bool,
    pub delay: Option<Duration>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn new_slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Messages recorded so far, including ones whose delivery "failed".
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Polls until at least `count` calls were recorded or `within` elapses.
    pub async fn wait_for_calls(&self, count: usize, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            if self.sent().len() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify_new_message(&self, message: &Message) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(NotifyError::Simulated);
        }
        Ok(())
    }
}

/// dispatch
///
/// Fire-and-forget: spawns the notification on its own task bounded by
/// `timeout` and returns immediately. The outcome is only logged.
pub fn dispatch(
    notifier: Option<&NotifierState>,
    timeout: Duration,
    message: Message,
) -> NotificationStatus {
    let Some(notifier) = notifier.cloned() else {
        return NotificationStatus::Disabled;
    };

    tokio::spawn(async move {
        let outcome = tokio::time::timeout(timeout, notifier.notify_new_message(&message))
            .await
            .unwrap_or(Err(NotifyError::Timeout(timeout)));

        match outcome {
            Ok(()) => tracing::info!(message_id = %message.id, "owner notified of new message"),
            Err(e) => tracing::warn!(message_id = %message.id, error = %e, "owner notification failed"),
        }
    });

    NotificationStatus::Queued
}
