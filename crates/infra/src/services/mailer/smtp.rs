use super::{IMailer, OutgoingEmail};
use crate::config::SmtpConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

/// Port where the SMTP server expects TLS from the start instead of STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

/// Sends emails through an SMTP relay
pub struct SmtpMailer {
    inner: Option<SmtpTransport>,
}

impl SmtpMailer {
    /// Creates a mailer from the given settings. A mailer without settings,
    /// or with settings that cannot be used, reports itself as not configured.
    pub fn new(config: Option<&SmtpConfig>) -> Self {
        let inner = match config {
            Some(config) => match Self::create_transport(config) {
                Ok(transport) => {
                    info!("SMTP mailer configured with relay: {}", config.host);
                    Some(transport)
                }
                Err(e) => {
                    warn!(
                        "Unable to create SMTP transport for relay: {}. Emails are disabled. Error: {:?}",
                        config.host, e
                    );
                    None
                }
            },
            None => None,
        };
        Self { inner }
    }

    fn create_transport(config: &SmtpConfig) -> anyhow::Result<SmtpTransport> {
        let address = config.user.parse::<Address>()?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };
        let transport = builder.port(config.port).credentials(creds).build();

        Ok(SmtpTransport { transport, from })
    }
}

#[async_trait::async_trait]
impl IMailer for SmtpMailer {
    fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        let smtp = match &self.inner {
            Some(smtp) => smtp,
            None => anyhow::bail!("SMTP mailer is not configured"),
        };

        let message = Message::builder()
            .from(smtp.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())?;

        smtp.transport.send(message).await?;
        Ok(())
    }
}
