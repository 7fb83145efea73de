//! Toggle parsing for session configuration.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const FLAG_VALUES: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_VALUES: &str = "Strict|Lax|None";

/// Reads session toggles for one build mode.
///
/// Release builds surface every problem as an error. Debug builds log it and
/// carry on with a fallback.
pub(super) struct ToggleReader<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<'a, E: Env> ToggleReader<'a, E> {
    pub(super) const fn new(env: &'a E, mode: BuildMode) -> Self {
        Self { env, mode }
    }

    fn tolerate<T>(&self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        if self.mode.is_debug() {
            warn!(%error, "ignoring session setting in debug build");
            Ok(fallback)
        } else {
            Err(error)
        }
    }

    /// Boolean toggle; `debug_default` applies only when tolerated.
    pub(super) fn flag(
        &self,
        name: &'static str,
        debug_default: bool,
    ) -> Result<bool, SessionConfigError> {
        let Some(raw) = self.env.string(name) else {
            return self.tolerate(debug_default, SessionConfigError::MissingEnv { name });
        };
        match parse_flag(&raw) {
            Some(flag) => Ok(flag),
            None => self.tolerate(
                debug_default,
                SessionConfigError::InvalidEnv {
                    name,
                    value: raw,
                    expected: FLAG_VALUES,
                },
            ),
        }
    }

    /// `SameSite` policy; `None` is only accepted alongside secure cookies.
    pub(super) fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let Some(raw) = self.env.string(SAMESITE_ENV) else {
            return self.tolerate(
                SameSite::Lax,
                SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            );
        };
        match parse_same_site(&raw) {
            Some(SameSite::None) if !cookie_secure => {
                self.tolerate(SameSite::None, SessionConfigError::InsecureSameSiteNone)
            }
            Some(policy) => Ok(policy),
            None => self.tolerate(
                SameSite::Lax,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value: raw,
                    expected: SAME_SITE_VALUES,
                },
            ),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
