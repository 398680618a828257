use anyhow::Context as _;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::AuthConfig;
use crate::domain::repository::MailSender;
use crate::error::AuthServiceError;

const CHALLENGE_TEMPLATE: &str = include_str!("../../assets/templates/challenge_email.html");
const CHALLENGE_SUBJECT: &str = "Your sign-in link";

/// SMTP implementation of the mail port. The verification link is rendered
/// into an embedded HTML template; the send is a single synchronous
/// collaborator call from the request's point of view.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.smtp_url)
            .context("parse SMTP url")?
            .build();
        Ok(Self {
            transport,
            sender: config.mail_sender.clone(),
        })
    }
}

impl MailSender for SmtpMailer {
    async fn send_challenge(&self, to: &str, link: &str) -> Result<(), AuthServiceError> {
        let body = CHALLENGE_TEMPLATE.replace("{{link}}", link);
        let message = Message::builder()
            .from(self.sender.parse().context("parse sender address")?)
            .to(to.parse().context("parse recipient address")?)
            .subject(CHALLENGE_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .context("build challenge mail")?;
        self.transport
            .send(message)
            .await
            .context("send challenge mail")?;
        Ok(())
    }
}
