use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::config::MailConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// SMTP relay over TLS, authenticated with the account it sends from.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .with_context(|| format!("smtp relay {}", cfg.smtp_host))?
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        let from = cfg
            .username
            .parse::<Mailbox>()
            .context("EMAIL_USER is not a valid address")?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>().context("parse recipient")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .context("build message")?;
        self.transport
            .send(message)
            .await
            .context("smtp send")?;
        debug!(to = %to, subject = %subject, "mail sent");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(username: &str) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".into(),
            username: username.into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn smtp_mailer_builds_from_config() {
        assert!(SmtpMailer::new(&cfg("noreply@example.com")).is_ok());
    }

    #[tokio::test]
    async fn smtp_mailer_rejects_bad_sender() {
        let err = SmtpMailer::new(&cfg("not an address")).err().expect("should fail");
        assert!(err.to_string().contains("EMAIL_USER"));
    }
}
