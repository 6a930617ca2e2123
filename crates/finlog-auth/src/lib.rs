//! # finlog-auth
//!
//! Authentication for the single admin actor.
//!
//! Sessions are stateless: [`SessionSigner`] issues HMAC-signed tokens that
//! are carried in the `admin_session` cookie and re-verified on every
//! request by [`AdminGuard`]. Passwords are stored as Argon2id hashes and
//! checked by the [`Authenticator`].
//!
//! Logout only overwrites the cookie; a copied token stays valid until it
//! expires.

pub mod authenticator;
pub mod guard;
pub mod hasher;
pub mod session;
pub mod token;

pub use authenticator::{Authenticator, CredentialStore, INVALID_CREDENTIALS};
pub use guard::AdminGuard;
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use session::{SESSION_COOKIE, clear_session_cookie, current_session, session_cookie};
pub use token::{SESSION_TTL_DAYS, SessionPayload, SessionSigner, TokenError, session_ttl};
