//! Session Management Module
//!
//! Stateless sessions carried entirely in the `sessionId` cookie.
//!
//! # Modules
//!
//! - [`codec`] - Issue and verify encrypted, signed session values
//! - [`cookie`] - Cookie construction and extraction
//! - [`guard`] - Sign-in state and route guards

pub mod codec;
pub mod cookie;
pub mod guard;

// Re-export commonly used items for convenience
pub use codec::{
    InvalidReason, SessionClaims, SessionCodec, SessionError, SessionVerdict,
    DEFAULT_SESSION_TTL_SECONDS,
};
pub use cookie::{CookieOptions, SESSION_COOKIE_NAME};
pub use guard::{anonymous_required, login_required, SessionState};
