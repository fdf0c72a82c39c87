mod inmemory;
mod smtp;

pub use inmemory::InMemoryMailer;
pub use smtp::SmtpMailer;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Transport used to deliver emails to customers
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    /// Whether the transport has the settings it needs to deliver emails.
    /// Callers should not attempt to send when this is false.
    fn is_configured(&self) -> bool;
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()>;
}
