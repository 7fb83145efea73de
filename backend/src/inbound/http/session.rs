//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only persist, read, or purge
//! the signed-in account. Each session stores its own deadline: remember-me
//! sessions last 30 days, others 2 hours. A session past
//! its deadline, or one carrying a malformed account id, reads as absent.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{AccountId, Error};

pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";
pub(crate) const EXPIRES_AT_KEY: &str = "expires_at";

/// Lifetime of a remember-me session, in seconds (30 days).
pub const REMEMBER_ME_TTL_SECS: i64 = 30 * 24 * 60 * 60;
/// Lifetime of an ordinary session, in seconds (2 hours).
pub const SESSION_TTL_SECS: i64 = 2 * 60 * 60;

/// Session lifetime for the remember-me choice.
#[must_use]
pub fn session_lifetime(remember_me: bool) -> Duration {
    Duration::seconds(if remember_me {
        REMEMBER_ME_TTL_SECS
    } else {
        SESSION_TTL_SECS
    })
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `account`.
    ///
    /// The session id is renewed so a pre-login cookie cannot be reused.
    pub fn persist_account(
        &self,
        account: &AccountId,
        remember_me: bool,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let expires_at = now + session_lifetime(remember_me);
        self.0.renew();
        self.0
            .insert(ACCOUNT_ID_KEY, account.as_ref())
            .and_then(|()| self.0.insert(EXPIRES_AT_KEY, expires_at.timestamp()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in account, if the session is present and still live.
    pub fn account_id(&self, now: DateTime<Utc>) -> Result<Option<AccountId>, Error> {
        let raw = self
            .0
            .get::<String>(ACCOUNT_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let id = match AccountId::new(&raw) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid account id in session cookie");
                self.clear();
                return Ok(None);
            }
        };
        // A missing or unreadable deadline counts as expired.
        let expires_at = self.0.get::<i64>(EXPIRES_AT_KEY).ok().flatten();
        match expires_at {
            Some(deadline) if now.timestamp() < deadline => Ok(Some(id)),
            _ => {
                debug!(account_id = %id, "session expired");
                self.clear();
                Ok(None)
            }
        }
    }

    /// Require a live session or return `401 Unauthorized`.
    pub fn require_account_id(&self, now: DateTime<Utc>) -> Result<AccountId, Error> {
        self.account_id(now)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
