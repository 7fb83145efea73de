//! Authentication primitives: login credentials and signup requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Both constructors report every failing field at once so clients can
//! highlight the whole form.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

use crate::domain::account::{AccountValidationError, EmailAddress, FirstName};

/// Minimum password length accepted at signup and login.
pub const PASSWORD_MIN_LEN: usize = 8;

const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";

/// Field-keyed validation failures for an auth form.
///
/// Keys are the camelCase request field names (`email`, `password`,
/// `confirmPassword`, `firstName`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormErrors(BTreeMap<&'static str, String>);

impl AuthFormErrors {
    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn record(&mut self, error: &AccountValidationError) {
        self.insert(error.field(), error.to_string());
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for AuthFormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&joined.join(" "))
    }
}

impl std::error::Error for AuthFormErrors {}

fn check_password(password: &str, errors: &mut AuthFormErrors) {
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.insert("password", PASSWORD_TOO_SHORT);
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is a normalised [`EmailAddress`].
/// - `password` has at least [`PASSWORD_MIN_LEN`] characters and keeps the
///   caller's whitespace.
///
/// # Examples
/// ```
/// use muncho_crm::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Owner@Example.com", "password1", true).unwrap();
/// assert_eq!(creds.email().as_ref(), "owner@example.com");
/// assert!(creds.remember_me());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
    remember_me: bool,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<Self, AuthFormErrors> {
        let mut errors = AuthFormErrors::default();
        let email = EmailAddress::new(email).map_err(|err| errors.record(&err)).ok();
        check_password(password, &mut errors);

        match email {
            Some(email) if errors.is_empty() => Ok(Self {
                email,
                password: Zeroizing::new(password.to_owned()),
                remember_me,
            }),
            _ => Err(errors),
        }
    }

    /// Normalised email used for account lookups.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether the caller asked for a long-lived session.
    #[must_use]
    pub fn remember_me(&self) -> bool {
        self.remember_me
    }
}

/// Validated signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    email: EmailAddress,
    password: Zeroizing<String>,
    first_name: FirstName,
}

/// Raw signup form fields as submitted by the client.
#[derive(Debug, Clone, Copy)]
pub struct SignupForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub first_name: &'a str,
}

impl SignupRequest {
    /// Validate every field of a signup form.
    pub fn try_from_form(form: SignupForm<'_>) -> Result<Self, AuthFormErrors> {
        let mut errors = AuthFormErrors::default();
        let email = EmailAddress::new(form.email)
            .map_err(|err| errors.record(&err))
            .ok();
        check_password(form.password, &mut errors);
        let first_name = FirstName::new(form.first_name)
            .map_err(|err| errors.record(&err))
            .ok();
        if form.password != form.confirm_password {
            errors.insert("confirmPassword", PASSWORDS_DO_NOT_MATCH);
        }

        match (email, first_name) {
            (Some(email), Some(first_name)) if errors.is_empty() => Ok(Self {
                email,
                password: Zeroizing::new(form.password.to_owned()),
                first_name,
            }),
            _ => Err(errors),
        }
    }

    /// Normalised email for the new account.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Chosen password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Owner's first name.
    #[must_use]
    pub fn first_name(&self) -> &FirstName {
        &self.first_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form<'a>(email: &'a str, password: &'a str, confirm: &'a str, name: &'a str) -> SignupForm<'a> {
        SignupForm {
            email,
            password,
            confirm_password: confirm,
            first_name: name,
        }
    }

    #[rstest]
    #[case("bad", "password1", Some("Enter a valid email."), None)]
    #[case("a@b.co", "short", None, Some("Password must be at least 8 characters."))]
    #[case("bad", "", Some("Enter a valid email."), Some("Password must be at least 8 characters."))]
    fn invalid_login_inputs_report_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] email_error: Option<&str>,
        #[case] password_error: Option<&str>,
    ) {
        let errors = LoginCredentials::try_from_parts(email, password, false)
            .expect_err("invalid inputs must fail");
        assert_eq!(errors.get("email"), email_error);
        assert_eq!(errors.get("password"), password_error);
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("a@b.co", " padded pw ", false)
            .expect("valid inputs");
        assert_eq!(creds.password(), " padded pw ");
        assert!(!creds.remember_me());
    }

    #[rstest]
    fn signup_collects_every_failure() {
        let errors = SignupRequest::try_from_form(form("nope", "short", "other", " "))
            .expect_err("all fields invalid");
        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["confirmPassword", "email", "firstName", "password"]);
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match."));
    }

    #[rstest]
    fn signup_accepts_valid_form() {
        let request = SignupRequest::try_from_form(form(
            "Chef@Bistro.in",
            "longenough",
            "longenough",
            " Asha ",
        ))
        .expect("valid form");
        assert_eq!(request.email().as_ref(), "chef@bistro.in");
        assert_eq!(request.first_name().as_ref(), "Asha");
    }
}
