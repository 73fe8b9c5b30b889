//! Axum extractors for request handling
//!
//! Custom extractors for scoped sessions, token lookup, path parameters and
//! validated JSON bodies.

mod path;
mod session;
mod tokens;
mod validated;

pub use path::UserIdPath;
pub use session::{
    AppScope, AppSession, OtpScope, OtpSession, PasswordScope, PasswordSession, Session,
    SessionScope,
};
pub use tokens::{extract_tokens, REFRESH_TOKEN_HEADER};
pub use validated::ValidatedJson;
