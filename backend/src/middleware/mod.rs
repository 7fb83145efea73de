//! Request middleware shared by every route.
//!
//! Only request tracing lives here; session cookies are configured in
//! [`crate::inbound::http::session_config`].

pub mod trace;

pub use trace::Trace;
