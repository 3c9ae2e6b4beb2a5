//! Outbound email
//!
//! Verification OTPs and welcome mail go out through an SMTP relay. When
//! no relay is configured the service degrades to logging the message
//! contents, so development setups work without mail credentials while
//! the OTP stays readable in the server log.

use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use shared::{AppError, AppResult, ErrorCode};

/// SMTP relay settings, read from the environment by `Config::from_env`.
/// A missing `SMTP_HOST` leaves the service in logging mode.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// From header, e.g. `Employee Management System <no-reply@ems.local>`
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from: "Employee Management System <no-reply@ems.local>".to_string(),
        }
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            smtp_host: std::env::var("SMTP_HOST").ok(),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.smtp_port),
            smtp_username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from: std::env::var("SMTP_FROM").unwrap_or(defaults.from),
        }
    }
}

/// Email sender with a logging fallback for unconfigured environments
pub enum MailService {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: String,
    },
    Disabled,
}

impl MailService {
    pub fn from_config(config: &MailConfig) -> AppResult<Self> {
        let Some(host) = config.smtp_host.as_deref() else {
            tracing::warn!("SMTP_HOST not set, outbound email disabled (codes logged instead)");
            return Ok(Self::Disabled);
        };

        let credentials =
            Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
        let tls = TlsParameters::new(host.to_string())
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, format!("TLS setup failed: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| {
                AppError::with_message(ErrorCode::ConfigError, format!("SMTP relay error: {}", e))
            })?
            .port(config.smtp_port)
            .credentials(credentials)
            .tls(Tls::Required(tls))
            .build();

        Ok(Self::Smtp {
            transport,
            from: config.from.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Smtp { .. })
    }

    /// Send the signup verification OTP
    pub async fn send_verification_code(&self, to: &str, name: &str, code: &str) -> AppResult<()> {
        let (text, html) = verification_body(name, code);
        match self {
            Self::Smtp { transport, from } => {
                let email = build_message(
                    from,
                    to,
                    "Email Verification OTP - Employee Management System",
                    text,
                    html,
                )?;
                transport.send(email).await.map_err(|e| {
                    tracing::error!(to = to, error = %e, "Failed to send verification email");
                    AppError::with_message(
                        ErrorCode::EmailSendFailed,
                        format!("Failed to send email: {}", e),
                    )
                })?;
                tracing::info!(to = to, "Verification email sent");
                Ok(())
            }
            Self::Disabled => {
                tracing::info!(
                    target: "mailer",
                    to = to,
                    code = code,
                    "SMTP disabled, verification code logged"
                );
                Ok(())
            }
        }
    }

    /// Send the post-verification welcome mail
    pub async fn send_welcome(&self, to: &str, name: &str) -> AppResult<()> {
        let (text, html) = welcome_body(name);
        match self {
            Self::Smtp { transport, from } => {
                let email = build_message(
                    from,
                    to,
                    "Welcome to Employee Management System",
                    text,
                    html,
                )?;
                transport.send(email).await.map_err(|e| {
                    tracing::error!(to = to, error = %e, "Failed to send welcome email");
                    AppError::with_message(
                        ErrorCode::EmailSendFailed,
                        format!("Failed to send email: {}", e),
                    )
                })?;
                tracing::info!(to = to, "Welcome email sent");
                Ok(())
            }
            Self::Disabled => {
                tracing::info!(target: "mailer", to = to, "SMTP disabled, welcome email skipped");
                Ok(())
            }
        }
    }
}

fn build_message(
    from: &str,
    to: &str,
    subject: &str,
    text: String,
    html: String,
) -> AppResult<Message> {
    Message::builder()
        .from(from.parse().map_err(|e| {
            AppError::with_message(ErrorCode::ConfigError, format!("Invalid from address: {}", e))
        })?)
        .to(to.parse().map_err(|e| {
            AppError::with_message(
                ErrorCode::EmailSendFailed,
                format!("Invalid email address: {}", e),
            )
        })?)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html),
                ),
        )
        .map_err(|e| {
            AppError::with_message(
                ErrorCode::EmailSendFailed,
                format!("Failed to build email: {}", e),
            )
        })
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() { "User" } else { name }
}

fn verification_body(name: &str, code: &str) -> (String, String) {
    let name = display_name(name);
    let text = format!(
        "Hello {name}!\n\n\
         Thank you for registering with our Employee Management System.\n\
         Your One-Time Password (OTP) for email verification is: {code}\n\n\
         This OTP will expire in 10 minutes. Do not share it with anyone.\n\
         If you didn't request this verification, please ignore this email.\n\n\
         Best regards,\nEmployee Management Team"
    );
    let html = format!(
        "<h2>Hello {name}!</h2>\
         <p>Thank you for registering with our Employee Management System.</p>\
         <p>Your One-Time Password (OTP) for email verification is:</p>\
         <p style=\"font-size:32px;font-weight:bold;letter-spacing:8px\">{code}</p>\
         <p>This OTP will expire in <strong>10 minutes</strong>. Do not share it with anyone.</p>\
         <p>If you didn't request this verification, please ignore this email.</p>\
         <p>Best regards,<br>Employee Management Team</p>"
    );
    (text, html)
}

fn welcome_body(name: &str) -> (String, String) {
    let name = display_name(name);
    let text = format!(
        "Hello {name}!\n\n\
         Your email has been successfully verified.\n\
         You can now log in to your account and start using our Employee\n\
         Management System: profile management, attendance tracking, leave\n\
         management and salary information.\n\n\
         Welcome aboard!"
    );
    let html = format!(
        "<h1>Welcome Aboard!</h1>\
         <h2>Hello {name}!</h2>\
         <p>Your email has been successfully verified.</p>\
         <p>You can now log in to your account and start using our Employee Management System.</p>\
         <ul><li>Profile Management</li><li>Attendance Tracking</li>\
         <li>Leave Management</li><li>Salary Information</li></ul>"
    );
    (text, html)
}
