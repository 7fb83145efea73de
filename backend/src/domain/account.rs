//! Restaurant owner accounts.
//!
//! Accounts are the identities that sign in to the CRM. Each account owns at
//! most one restaurant; the profile exposed to clients is derived from the
//! stored account with fallbacks for the greeting name.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised while building account primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyId,
    InvalidId,
    InvalidEmail,
    EmptyFirstName,
    FirstNameTooLong { max: usize },
}

impl AccountValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::InvalidEmail => "email",
            Self::EmptyFirstName | Self::FirstNameTooLong { .. } => "firstName",
        }
    }

    /// Machine-readable validation code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::InvalidId => "invalid_id",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyFirstName => "missing_first_name",
            Self::FirstNameTooLong { .. } => "first_name_too_long",
        }
    }
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "account id must not be empty"),
            Self::InvalidId => write!(f, "account id must be a valid UUID"),
            Self::InvalidEmail => write!(f, "Enter a valid email."),
            Self::EmptyFirstName => write!(f, "First name is required."),
            Self::FirstNameTooLong { max } => {
                write!(f, "First name must be at most {max} characters.")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid, String);

impl AccountId {
    /// Validate and construct an [`AccountId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`AccountId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already validated UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, AccountValidationError> {
        if id.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(AccountValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| AccountValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        let AccountId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login email, trimmed and lower-cased so lookups are case-insensitive.
///
/// # Examples
/// ```
/// use muncho_crm::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Owner@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "owner@example.com");
/// assert_eq!(email.local_part(), "owner");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Portion before the `@`, used as a greeting fallback.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum accepted first-name length.
pub const FIRST_NAME_MAX: usize = 50;

/// Owner's first name as entered at signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FirstName(String);

impl FirstName {
    /// Validate and construct a [`FirstName`], trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyFirstName);
        }
        if trimmed.chars().count() > FIRST_NAME_MAX {
            return Err(AccountValidationError::FirstNameTooLong { max: FIRST_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FirstName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<FirstName> for String {
    fn from(value: FirstName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FirstName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored account without credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub first_name: Option<FirstName>,
    pub created_at: DateTime<Utc>,
}

/// Role reported for every CRM account.
pub const ACCOUNT_ROLE: &str = "admin";

/// Greeting used when neither a first name nor an email local part exists.
pub const DEFAULT_FIRST_NAME: &str = "User";

/// Profile returned to the signed-in client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: AccountId,
    #[schema(value_type = String, example = "owner@example.com")]
    pub email: EmailAddress,
    #[schema(example = "Asha")]
    pub first_name: String,
    #[schema(example = "admin")]
    pub role: String,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        let first_name = account
            .first_name
            .as_ref()
            .map(|name| name.as_ref().to_owned())
            .or_else(|| {
                let local = account.email.local_part();
                (!local.is_empty()).then(|| local.to_owned())
            })
            .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_owned());

        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            first_name,
            role: ACCOUNT_ROLE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(first_name: Option<&str>) -> Account {
        Account {
            id: AccountId::random(),
            email: EmailAddress::new("chef@bistro.in").expect("valid email"),
            first_name: first_name.map(|name| FirstName::new(name).expect("valid name")),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("owner@example.com")]
    #[case("a.b+c@sub.domain.co")]
    fn accepts_plausible_emails(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("two@@example.com")]
    #[case("space in@example.com")]
    #[case("missing@tld")]
    fn rejects_malformed_emails(#[case] raw: &str) {
        assert_eq!(EmailAddress::new(raw), Err(AccountValidationError::InvalidEmail));
    }

    #[rstest]
    fn email_is_normalised() {
        let email = EmailAddress::new(" Chef@Bistro.IN ").expect("valid email");
        assert_eq!(email.as_ref(), "chef@bistro.in");
    }

    #[rstest]
    #[case("", AccountValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", AccountValidationError::InvalidId)]
    #[case("not-a-uuid", AccountValidationError::InvalidId)]
    fn rejects_invalid_account_ids(#[case] raw: &str, #[case] expected: AccountValidationError) {
        assert_eq!(AccountId::new(raw), Err(expected));
    }

    #[rstest]
    fn first_name_rejects_blank_and_long_values() {
        assert_eq!(FirstName::new("   "), Err(AccountValidationError::EmptyFirstName));
        let long = "a".repeat(FIRST_NAME_MAX + 1);
        assert_eq!(
            FirstName::new(long),
            Err(AccountValidationError::FirstNameTooLong { max: FIRST_NAME_MAX })
        );
    }

    #[rstest]
    fn profile_prefers_first_name() {
        let profile = AccountProfile::from(&account(Some("Asha")));
        assert_eq!(profile.first_name, "Asha");
        assert_eq!(profile.role, "admin");
    }

    #[rstest]
    fn profile_falls_back_to_email_local_part() {
        let profile = AccountProfile::from(&account(None));
        assert_eq!(profile.first_name, "chef");
    }

    #[rstest]
    fn validation_errors_name_their_field() {
        assert_eq!(AccountValidationError::InvalidEmail.field(), "email");
        assert_eq!(AccountValidationError::EmptyFirstName.field(), "firstName");
        assert_eq!(
            AccountValidationError::EmptyFirstName.to_string(),
            "First name is required."
        );
    }
}
