mod common;

use std::time::Duration;

use amalsas::{
    AuthService, CallbackListener, ClientError, DonationOutcome, DonationService,
    MemoryTokenStore, Navigation, PaymentGatewayConfig, PaymentOutcome, SessionState,
    SessionStore, ValidationError,
};
use common::{MockBackend, PASSWORD};

async fn signed_in(backend: &MockBackend) -> (DonationService, SessionStore) {
    let api = backend.client();
    let auth = AuthService::new(api.clone());
    let mut session = SessionStore::new(Box::new(MemoryTokenStore::new()));
    auth.sign_in(&mut session, "budi", PASSWORD).await.unwrap();
    (DonationService::new(api, PaymentGatewayConfig::default()), session)
}

#[actix_web::test]
async fn test_anonymous_donation_asks_for_sign_in() {
    let backend = MockBackend::start().await;
    let donations = DonationService::new(backend.client(), PaymentGatewayConfig::default());

    let outcome = donations
        .initiate(&SessionState::default(), 1, "50000")
        .await
        .unwrap();
    assert!(matches!(outcome, DonationOutcome::SignInRequired));

    // even a malformed amount is not looked at before the session check
    let outcome = donations
        .initiate(&SessionState::default(), 1, "abc")
        .await
        .unwrap();
    assert!(matches!(outcome, DonationOutcome::SignInRequired));

    assert_eq!(backend.state.hits(), 0);
    backend.stop().await;
}

#[actix_web::test]
async fn test_non_positive_amount_rejected_before_network() {
    let backend = MockBackend::start().await;
    let (donations, session) = signed_in(&backend).await;
    let before = backend.state.hits();

    for amount in ["0", "-5000", "", "lima puluh"] {
        let err = donations.initiate(session.state(), 1, amount).await.unwrap_err();
        assert!(
            matches!(err, ClientError::Validation(ValidationError::InvalidDonationAmount)),
            "amount {amount:?} gave {err:?}"
        );
    }

    assert_eq!(backend.state.hits(), before);
    backend.stop().await;
}

#[actix_web::test]
async fn test_donation_hands_off_to_checkout() {
    let backend = MockBackend::start().await;
    let (donations, session) = signed_in(&backend).await;

    let DonationOutcome::Checkout(checkout) =
        donations.initiate(session.state(), 3, "50.000").await.unwrap()
    else {
        panic!("expected a checkout");
    };
    assert_eq!(checkout.donation.order_id, "ORDER-99");
    assert_eq!(checkout.donation.amount, 50_000.0);
    assert_eq!(
        checkout.checkout_url.as_str(),
        "https://app.sandbox.midtrans.com/snap/v4/redirection/snap-token-1"
    );

    let body = backend.state.last_body().unwrap();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["user_id"], 7);
    assert_eq!(body["campaign_id"], 3);
    assert_eq!(body["amount"], 50_000.0);

    backend.stop().await;
}

#[actix_web::test]
async fn test_my_donations_uses_session_user() {
    let backend = MockBackend::start().await;
    let (donations, session) = signed_in(&backend).await;

    let mine = donations.my_donations(session.state()).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, "paid");
    assert_eq!(mine[0].owner_id(), 7);

    let anonymous = donations.my_donations(&SessionState::default()).await;
    assert!(matches!(anonymous, Err(ClientError::NotSignedIn)));

    backend.stop().await;
}

#[actix_web::test]
async fn test_callback_listener_reports_gateway_result() {
    let listener = CallbackListener::start("127.0.0.1:0").unwrap();
    let url = format!(
        "{}?order_id=ORDER-99&status_code=201&transaction_status=pending",
        listener.finish_url()
    );

    let response = reqwest::get(&url).await.unwrap();
    assert!(response.status().is_success());

    let result = listener.wait(Duration::from_secs(5)).await.unwrap();
    assert_eq!(result.outcome, PaymentOutcome::Pending);
    assert_eq!(result.outcome.navigation(), Navigation::Navigate("/donation-pending"));
    assert_eq!(result.redirect.order_id.as_deref(), Some("ORDER-99"));
}

#[actix_web::test]
async fn test_callback_listener_times_out() {
    let listener = CallbackListener::start("127.0.0.1:0").unwrap();
    let err = listener.wait(Duration::from_millis(50)).await.unwrap_err();
    assert!(matches!(err, ClientError::Callback(_)));
}
