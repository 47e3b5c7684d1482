//! Waitlist sign-up backend.
//!
//! Accepts registrations over HTTP, canonicalizes contact details so
//! surface variants of the same email or phone collide, rejects duplicates
//! through the storage layer's unique indexes, and sends a best-effort
//! welcome email capped by a daily counter. An admin endpoint exports the
//! collected records as CSV behind a shared secret.

pub mod api;
pub mod config;
pub mod contact;
pub mod error;
pub mod export;
pub mod notify;
pub mod signup;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use notify::{Notifier, Outcome};
pub use signup::{NewSignup, SignupRecord};
pub use store::{MemoryStore, PgStore, SignupStore};
