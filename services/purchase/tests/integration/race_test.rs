use showroom_domain::id::{PurchaseRequestId, UserId, VehicleId};
use showroom_domain::otp::OtpPurpose;
use showroom_domain::purchase::PurchaseStatus;
use showroom_purchase::error::PurchaseServiceError;
use showroom_purchase::usecase::otp::ValidateOtpInput;
use showroom_purchase::usecase::purchase::{
    ApprovePurchaseRequestUseCase, CreatePurchaseRequestInput, CreatePurchaseRequestUseCase,
};

use crate::helpers::{
    CUSTOMER_EMAIL, CUSTOMER_ID, InterleavedStore, OTHER_CUSTOMER_EMAIL, OTHER_CUSTOMER_ID,
    ledger, purchase_code, test_accounts, test_vehicle,
};

fn interleaved_store() -> InterleavedStore {
    InterleavedStore::new(test_accounts(), vec![test_vehicle(7, 80_000)])
}

fn create_input(customer_id: UserId, otp_code: String) -> CreatePurchaseRequestInput {
    CreatePurchaseRequestInput {
        customer_id,
        vehicle_id: VehicleId(7),
        otp_code,
    }
}

async fn open_request(
    store: &InterleavedStore,
    customer_id: UserId,
    email: &str,
) -> PurchaseRequestId {
    let code = purchase_code(store.clone(), email, 7).await;
    CreatePurchaseRequestUseCase {
        store: store.clone(),
    }
    .execute(create_input(customer_id, code))
    .await
    .unwrap()
    .request_id
}

#[tokio::test]
async fn should_sell_vehicle_once_when_approvals_interleave() {
    let store = interleaved_store();
    let first = open_request(&store, CUSTOMER_ID, CUSTOMER_EMAIL).await;
    let second = open_request(&store, OTHER_CUSTOMER_ID, OTHER_CUSTOMER_EMAIL).await;
    let approve = ApprovePurchaseRequestUseCase {
        store: store.clone(),
    };

    // Both approvals read the request and the vehicle before either one flips it.
    let (a, b) = futures::join!(approve.execute(first), approve.execute(second));

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "got {a:?} and {b:?}");
    let (winner_id, loser_id, loser) = if a.is_ok() {
        (first, second, b)
    } else {
        (second, first, a)
    };
    assert!(
        matches!(loser, Err(PurchaseServiceError::VehicleUnavailable)),
        "expected VehicleUnavailable, got {loser:?}"
    );

    let state = store.snapshot();
    assert_eq!(state.sales.len(), 1, "vehicle sold more than once");
    assert!(!state.vehicles[0].is_available);
    let status = |id: PurchaseRequestId| {
        state.requests.iter().find(|r| r.id == id).unwrap().status
    };
    assert_eq!(status(winner_id), PurchaseStatus::Approved);
    assert_eq!(
        status(loser_id),
        PurchaseStatus::Pending,
        "the losing approval must roll back its status change"
    );
}

#[tokio::test]
async fn should_keep_one_request_when_duplicate_creates_interleave() {
    let store = interleaved_store();
    let first = purchase_code(store.clone(), CUSTOMER_EMAIL, 7).await;
    let mut second = purchase_code(store.clone(), CUSTOMER_EMAIL, 7).await;
    while second == first {
        second = purchase_code(store.clone(), CUSTOMER_EMAIL, 7).await;
    }
    let create = CreatePurchaseRequestUseCase {
        store: store.clone(),
    };

    // Both pass the pending pre-check; the pending index decides.
    let (a, b) = futures::join!(
        create.execute(create_input(CUSTOMER_ID, first)),
        create.execute(create_input(CUSTOMER_ID, second)),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "got {a:?} and {b:?}");
    let loser = if a.is_ok() { b } else { a };
    assert!(
        matches!(loser, Err(PurchaseServiceError::Conflict)),
        "expected Conflict, got {loser:?}"
    );

    let state = store.snapshot();
    assert_eq!(state.requests.len(), 1);
    assert_eq!(
        state.otps.iter().filter(|t| t.consumed).count(),
        1,
        "the losing create must roll back its code consumption"
    );
}

#[tokio::test]
async fn should_consume_shared_code_once_when_validations_interleave() {
    let store = interleaved_store();
    let code = purchase_code(store.clone(), CUSTOMER_EMAIL, 7).await;
    let otp = ledger(store.clone());
    let validate = || ValidateOtpInput {
        subject: CUSTOMER_EMAIL.to_owned(),
        purpose: OtpPurpose::Purchase,
        code: code.clone(),
        resource_id: Some(7),
        consume: true,
    };

    let (a, b) = futures::join!(otp.validate(validate()), otp.validate(validate()));

    let accepted = [a.unwrap(), b.unwrap()].iter().filter(|v| **v).count();
    assert_eq!(accepted, 1, "a code must be accepted exactly once");
}
