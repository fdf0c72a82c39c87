use super::{IMailer, OutgoingEmail};
use std::sync::Mutex;

/// Mailer that records the emails instead of delivering them
pub struct InMemoryMailer {
    configured: bool,
    sent: Mutex<Vec<OutgoingEmail>>,
    failing_recipients: Mutex<Vec<String>>,
    hanging_recipients: Mutex<Vec<String>>,
    panicking_recipients: Mutex<Vec<String>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            configured: true,
            sent: Mutex::new(Vec::new()),
            failing_recipients: Mutex::new(Vec::new()),
            hanging_recipients: Mutex::new(Vec::new()),
            panicking_recipients: Mutex::new(Vec::new()),
        }
    }

    /// A mailer that reports that it is missing its settings
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Makes every following send to `recipient` fail
    pub fn fail_for(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .push(recipient.to_string());
    }

    /// Makes every following send to `recipient` never complete
    pub fn hang_for(&self, recipient: &str) {
        self.hanging_recipients
            .lock()
            .unwrap()
            .push(recipient.to_string());
    }

    /// Makes every following send to `recipient` panic
    pub fn panic_for(&self, recipient: &str) {
        self.panicking_recipients
            .lock()
            .unwrap()
            .push(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        if !self.configured {
            anyhow::bail!("In memory mailer is not configured");
        }
        if self
            .failing_recipients
            .lock()
            .unwrap()
            .contains(&email.to)
        {
            anyhow::bail!("Mailbox unavailable: {}", email.to);
        }
        let panics = self.panicking_recipients.lock().unwrap().contains(&email.to);
        if panics {
            panic!("Mail transport crashed while sending to: {}", email.to);
        }
        let hangs = self.hanging_recipients.lock().unwrap().contains(&email.to);
        if hangs {
            std::future::pending::<()>().await;
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
