//! Service layer
//!
//! # Services
//!
//! - [`HttpService`] - HTTP server and router assembly
//! - [`MailService`] - outbound email (OTP and welcome mail)
//! - [`FileStorage`] - local storage for uploaded files

pub mod http;
pub mod mailer;
pub mod storage;

pub use http::HttpService;
pub use mailer::{MailConfig, MailService};
pub use storage::{FileStorage, StoredFile};
