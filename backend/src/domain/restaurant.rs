//! Restaurant profile and onboarding progress.
//!
//! Onboarding collects the restaurant profile across several screens. Partial
//! input is saved as an [`OnboardingDraft`] so the owner can leave and resume;
//! completing onboarding validates the whole draft into a
//! [`RestaurantProfile`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::account::AccountId;
use crate::domain::records::RestaurantId;

/// Number of onboarding screens.
pub const ONBOARDING_STEPS: u8 = 4;
/// Maximum restaurant name length.
pub const RESTAURANT_NAME_MAX: usize = 100;
/// POS identifier that requires a custom name.
pub const POS_OTHER: &str = "other";

/// Partially completed onboarding form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingDraft {
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub gstin: Option<String>,
    pub restaurant_type: Option<String>,
    pub pos_system: Option<String>,
    pub custom_pos_name: Option<String>,
    pub number_of_outlets: Option<u32>,
    pub goals: Vec<String>,
}

/// Saved onboarding position for an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    #[schema(minimum = 1, maximum = 4)]
    pub step: u8,
    pub draft: OnboardingDraft,
    pub updated_at: DateTime<Utc>,
}

/// Field-keyed onboarding validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingErrors(BTreeMap<&'static str, &'static str>);

impl OnboardingErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    /// Message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    /// Whether validation passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

impl fmt::Display for OnboardingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.values().copied().collect();
        f.write_str(&joined.join("; "))
    }
}

impl std::error::Error for OnboardingErrors {}

/// Validated restaurant profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantProfile {
    pub name: String,
    pub street_address: Option<String>,
    pub city: String,
    pub pincode: String,
    pub gstin: Option<String>,
    pub restaurant_type: String,
    pub pos_system: Option<String>,
    pub custom_pos_name: Option<String>,
    pub number_of_outlets: u32,
    pub goals: Vec<String>,
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn is_pincode(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_gstin(value: &str) -> bool {
    value.len() == 15 && value.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

impl RestaurantProfile {
    /// Validate a complete onboarding draft.
    ///
    /// # Examples
    /// ```
    /// use muncho_crm::domain::{OnboardingDraft, RestaurantProfile};
    ///
    /// let draft = OnboardingDraft {
    ///     name: Some("Spice Route".into()),
    ///     city: Some("Pune".into()),
    ///     pincode: Some("411001".into()),
    ///     restaurant_type: Some("casual-dining".into()),
    ///     number_of_outlets: Some(1),
    ///     ..OnboardingDraft::default()
    /// };
    /// let profile = RestaurantProfile::try_from_draft(&draft).unwrap();
    /// assert_eq!(profile.city, "Pune");
    /// ```
    pub fn try_from_draft(draft: &OnboardingDraft) -> Result<Self, OnboardingErrors> {
        let mut errors = OnboardingErrors::default();

        let name = trimmed(draft.name.as_ref());
        match &name {
            None => errors.push("name", "Restaurant name is required"),
            Some(n) if n.chars().count() > RESTAURANT_NAME_MAX => {
                errors.push("name", "Restaurant name must be 100 characters or less");
            }
            Some(_) => {}
        }

        let city = trimmed(draft.city.as_ref());
        if city.is_none() {
            errors.push("city", "City is required");
        }

        let pincode = trimmed(draft.pincode.as_ref());
        if !pincode.as_deref().is_some_and(is_pincode) {
            errors.push("pincode", "Pincode must be 6 digits");
        }

        let gstin = trimmed(draft.gstin.as_ref()).map(|g| g.to_uppercase());
        if gstin.as_deref().is_some_and(|g| !is_gstin(g)) {
            errors.push("gstin", "GSTIN must be 15 letters or digits");
        }

        let restaurant_type = trimmed(draft.restaurant_type.as_ref());
        if restaurant_type.is_none() {
            errors.push("restaurantType", "Restaurant type is required");
        }

        let pos_system = trimmed(draft.pos_system.as_ref());
        let custom_pos_name = trimmed(draft.custom_pos_name.as_ref());
        if pos_system.as_deref() == Some(POS_OTHER) && custom_pos_name.is_none() {
            errors.push("customPosName", "Enter the name of your POS system");
        }

        let number_of_outlets = draft.number_of_outlets.unwrap_or(0);
        if number_of_outlets < 1 {
            errors.push("numberOfOutlets", "Number of outlets must be at least 1");
        }

        match (name, city, pincode, restaurant_type) {
            (Some(name), Some(city), Some(pincode), Some(restaurant_type)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    street_address: trimmed(draft.street_address.as_ref()),
                    city,
                    pincode,
                    gstin,
                    restaurant_type,
                    custom_pos_name: custom_pos_name
                        .filter(|_| pos_system.as_deref() == Some(POS_OTHER)),
                    pos_system,
                    number_of_outlets,
                    goals: draft.goals.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Stored restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub owner_id: AccountId,
    pub profile: RestaurantProfile,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> OnboardingDraft {
        OnboardingDraft {
            name: Some(" Spice Route ".to_owned()),
            street_address: Some("  ".to_owned()),
            city: Some("Pune".to_owned()),
            pincode: Some("411001".to_owned()),
            gstin: Some("27aapfu0939f1zv".to_owned()),
            restaurant_type: Some("qsr".to_owned()),
            pos_system: Some("petpooja".to_owned()),
            custom_pos_name: Some("ignored".to_owned()),
            number_of_outlets: Some(2),
            goals: vec!["repeat-visits".to_owned()],
        }
    }

    #[rstest]
    fn valid_draft_normalises_fields(draft: OnboardingDraft) {
        let profile = RestaurantProfile::try_from_draft(&draft).expect("valid draft");
        assert_eq!(profile.name, "Spice Route");
        assert_eq!(profile.street_address, None);
        assert_eq!(profile.gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(profile.custom_pos_name, None);
    }

    #[rstest]
    #[case("41100", false)]
    #[case("4110011", false)]
    #[case("41100a", false)]
    #[case("411001", true)]
    fn pincode_must_be_six_digits(
        mut draft: OnboardingDraft,
        #[case] pincode: &str,
        #[case] ok: bool,
    ) {
        draft.pincode = Some(pincode.to_owned());
        let result = RestaurantProfile::try_from_draft(&draft);
        assert_eq!(result.is_ok(), ok);
    }

    #[rstest]
    fn other_pos_requires_custom_name(mut draft: OnboardingDraft) {
        draft.pos_system = Some(POS_OTHER.to_owned());
        draft.custom_pos_name = None;
        let errors = RestaurantProfile::try_from_draft(&draft).expect_err("missing name");
        assert_eq!(errors.get("customPosName"), Some("Enter the name of your POS system"));
    }

    #[rstest]
    fn empty_draft_reports_required_fields() {
        let errors =
            RestaurantProfile::try_from_draft(&OnboardingDraft::default()).expect_err("empty");
        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec!["city", "name", "numberOfOutlets", "pincode", "restaurantType"]
        );
    }

    #[rstest]
    fn overlong_name_is_rejected(mut draft: OnboardingDraft) {
        draft.name = Some("x".repeat(RESTAURANT_NAME_MAX + 1));
        let errors = RestaurantProfile::try_from_draft(&draft).expect_err("too long");
        assert_eq!(
            errors.get("name"),
            Some("Restaurant name must be 100 characters or less")
        );
    }
}
