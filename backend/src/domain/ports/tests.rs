//! Regression coverage for fixture adapters and port payloads.

use super::*;
use crate::domain::{
    AccountId, AppView, BootstrapEvent, BootstrapState, EmailAddress, RestaurantId,
    RestaurantLookup,
};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn fixture_repositories_report_nothing_stored() {
    let owner = AccountId::random();
    let restaurant = RestaurantId::random();
    let email = EmailAddress::new("owner@example.com").expect("valid email");

    assert!(
        FixtureAccountRepository
            .find_by_email(&email)
            .await
            .expect("lookup")
            .is_none()
    );
    assert!(
        FixtureRestaurantRepository
            .find_by_owner(&owner)
            .await
            .expect("lookup")
            .is_none()
    );
    assert!(
        FixtureCrmRecordsRepository
            .customers(&restaurant)
            .await
            .expect("customers")
            .is_empty()
    );
    assert_eq!(
        FixtureCampaignRepository
            .delete(&restaurant, &[uuid::Uuid::new_v4()])
            .await
            .expect("delete"),
        0
    );
}

#[rstest]
fn session_view_hides_profile_when_signed_out() {
    let profile = crate::domain::AccountProfile {
        id: AccountId::random(),
        email: EmailAddress::new("owner@example.com").expect("valid email"),
        first_name: "Asha".to_owned(),
        role: "admin".to_owned(),
    };
    let signed_out = BootstrapState::replay([BootstrapEvent::SignedOut]);
    let view = SessionView::from_state(&signed_out, Some(profile.clone()));
    assert_eq!(view.view, AppView::Login);
    assert_eq!(
        view.notice.as_deref(),
        Some("You have been logged out successfully.")
    );
    assert!(view.user.is_none());

    let signed_in =
        BootstrapState::replay([BootstrapEvent::SignedIn(RestaurantLookup::Complete)]);
    let view = SessionView::from_state(&signed_in, Some(profile));
    assert_eq!(view.view, AppView::Dashboard);
    assert!(view.user.is_some());
}

#[rstest]
fn port_errors_render_context() {
    let err = CrmRecordsError::query("orders", "timeout");
    assert_eq!(err.to_string(), "crm records query on orders failed: timeout");
    let err = AccountRepositoryError::duplicate_email("a@b.in");
    assert_eq!(err.to_string(), "account email already registered: a@b.in");
}
