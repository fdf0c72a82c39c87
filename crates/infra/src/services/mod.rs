mod mailer;

pub use mailer::{IMailer, InMemoryMailer, OutgoingEmail, SmtpMailer};
