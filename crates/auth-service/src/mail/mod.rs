//! Outgoing mail
//!
//! Sending is best-effort from the caller's point of view: a failed send is
//! logged and never undoes the work that triggered it.

mod mailer;
mod template;

pub use mailer::{build_mailer, HttpMailer, LogMailer, MailError, MailMessage, Mailer};
pub use template::otp_email_template;
