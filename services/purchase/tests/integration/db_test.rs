use chrono::{Duration, Utc};

use showroom_domain::id::{UserId, VehicleId};
use showroom_domain::otp::OtpPurpose;
use showroom_domain::purchase::PurchaseStatus;
use showroom_domain::user::UserRole;
use showroom_purchase::domain::repository::{
    InventoryStore, PurchaseRequestStore, SaleStore, UserDirectory,
};
use showroom_purchase::domain::types::{NewPurchaseRequest, NewSale};
use showroom_purchase::error::PurchaseServiceError;
use showroom_purchase::usecase::otp::{IssueOtpInput, OtpLedger, ValidateOtpInput};
use showroom_purchase::usecase::purchase::{
    ApprovePurchaseRequestUseCase, CreatePurchaseRequestInput, CreatePurchaseRequestUseCase,
    RejectPurchaseRequestUseCase,
};
use showroom_purchase::usecase::sale::{
    GetPendingRequestsUseCase, GetPurchaseHistoryUseCase, ListCustomersUseCase,
};

use crate::helpers::{db_repo, insert_customer, insert_vehicle, ledger, purchase_code, sqlite_db};

fn purchase_validation(
    email: &str,
    code: &str,
    vehicle_id: i32,
    consume: bool,
) -> ValidateOtpInput {
    ValidateOtpInput {
        subject: email.to_owned(),
        purpose: OtpPurpose::Purchase,
        code: code.to_owned(),
        resource_id: Some(vehicle_id),
        consume,
    }
}

#[tokio::test]
async fn should_seed_admin_and_inventory() {
    let db = sqlite_db().await;
    let repo = db_repo(&db);

    let admin = repo.find_account(UserId(1)).await.unwrap().unwrap();
    assert_eq!(admin.email, "admin@dealer.com");
    assert_eq!(admin.role, UserRole::Admin);

    for id in 1..=10 {
        let vehicle = repo.find_vehicle(VehicleId(id)).await.unwrap().unwrap();
        assert!(vehicle.is_available, "seeded vehicle {id} should be for sale");
        assert!(vehicle.price > 0);
    }
    assert!(repo.find_vehicle(VehicleId(11)).await.unwrap().is_none());
    assert!(repo.list_customers().await.unwrap().is_empty());
}

#[tokio::test]
async fn should_consume_stored_code_once() {
    let db = sqlite_db().await;
    let otp = ledger(db_repo(&db));
    let code = purchase_code(db_repo(&db), "buyer@example.com", 42).await;

    assert!(
        !otp.validate(purchase_validation("buyer@example.com", &code, 43, true))
            .await
            .unwrap(),
        "code bound to vehicle 42 must not validate for 43"
    );
    assert!(
        otp.validate(purchase_validation("buyer@example.com", &code, 42, false))
            .await
            .unwrap()
    );
    assert!(
        otp.validate(purchase_validation("Buyer@Example.com", &code, 42, true))
            .await
            .unwrap()
    );
    assert!(
        !otp.validate(purchase_validation("buyer@example.com", &code, 42, true))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn should_not_validate_expired_stored_code() {
    let db = sqlite_db().await;
    let expired = OtpLedger {
        store: db_repo(&db),
        ttl: Duration::seconds(-5),
    };
    let code = expired
        .issue(IssueOtpInput {
            subject: "buyer@example.com".to_owned(),
            purpose: OtpPurpose::Login,
            resource_id: None,
        })
        .await
        .unwrap()
        .code;

    let valid = ledger(db_repo(&db))
        .validate(ValidateOtpInput {
            subject: "buyer@example.com".to_owned(),
            purpose: OtpPurpose::Login,
            code,
            resource_id: None,
            consume: true,
        })
        .await
        .unwrap();
    assert!(!valid);
}

#[tokio::test]
async fn should_complete_purchase_end_to_end() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let vehicle = insert_vehicle(&db, 80_000).await;
    let code = purchase_code(db_repo(&db), "buyer@example.com", vehicle.0).await;

    let created = CreatePurchaseRequestUseCase {
        store: db_repo(&db),
    }
    .execute(CreatePurchaseRequestInput {
        customer_id: customer,
        vehicle_id: vehicle,
        otp_code: code.clone(),
    })
    .await
    .unwrap();

    let pending = GetPendingRequestsUseCase {
        requests: db_repo(&db),
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].request_id, created.request_id);
    assert_eq!(pending[0].customer.id, customer);
    assert_eq!(pending[0].vehicle.price, 80_000);

    let approve = ApprovePurchaseRequestUseCase {
        store: db_repo(&db),
    };
    let sale = approve.execute(created.request_id).await.unwrap();
    assert_eq!(sale.price, 80_000);
    assert_eq!(sale.customer_id, customer);

    let second = approve.execute(created.request_id).await;
    assert!(
        matches!(second, Err(PurchaseServiceError::AlreadyDecided)),
        "expected AlreadyDecided, got {second:?}"
    );

    let repo = db_repo(&db);
    assert!(!repo.find_vehicle(vehicle).await.unwrap().unwrap().is_available);
    let request = repo.find_request(created.request_id).await.unwrap().unwrap();
    assert_eq!(request.status, PurchaseStatus::Approved);

    let history = GetPurchaseHistoryUseCase {
        users: db_repo(&db),
        sales: db_repo(&db),
    }
    .execute(customer)
    .await
    .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sale_id, sale.sale_id);
    assert_eq!(history[0].price, 80_000);
    assert_eq!(history[0].vehicle.make, "Hyundai");

    assert!(
        GetPendingRequestsUseCase { requests: repo }
            .execute()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn should_reject_duplicate_request_in_database() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let vehicle = insert_vehicle(&db, 50_000).await;
    let usecase = CreatePurchaseRequestUseCase {
        store: db_repo(&db),
    };

    let first = purchase_code(db_repo(&db), "buyer@example.com", vehicle.0).await;
    usecase
        .execute(CreatePurchaseRequestInput {
            customer_id: customer,
            vehicle_id: vehicle,
            otp_code: first,
        })
        .await
        .unwrap();

    let second = purchase_code(db_repo(&db), "buyer@example.com", vehicle.0).await;
    let result = usecase
        .execute(CreatePurchaseRequestInput {
            customer_id: customer,
            vehicle_id: vehicle,
            otp_code: second.clone(),
        })
        .await;
    assert!(
        matches!(result, Err(PurchaseServiceError::Conflict)),
        "expected Conflict, got {result:?}"
    );

    let still_live = ledger(db_repo(&db))
        .validate(purchase_validation("buyer@example.com", &second, vehicle.0, false))
        .await
        .unwrap();
    assert!(still_live, "a rejected request must not consume its code");
}

#[tokio::test]
async fn should_enforce_single_pending_request_index() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let vehicle = insert_vehicle(&db, 50_000).await;
    let repo = db_repo(&db);
    let request = NewPurchaseRequest {
        vehicle_id: vehicle,
        customer_id: customer,
        requested_at: Utc::now(),
    };

    let stored = repo.insert_request(&request).await.unwrap();
    let duplicate = repo.insert_request(&request).await;
    assert!(
        matches!(duplicate, Err(PurchaseServiceError::Conflict)),
        "expected Conflict, got {duplicate:?}"
    );

    assert!(repo.decide_request(stored.id, PurchaseStatus::Rejected).await.unwrap());
    assert!(
        !repo.decide_request(stored.id, PurchaseStatus::Approved).await.unwrap(),
        "a decided request must not change again"
    );
    repo.insert_request(&request).await.unwrap();
}

#[tokio::test]
async fn should_enforce_one_sale_per_vehicle() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let vehicle = insert_vehicle(&db, 50_000).await;
    let repo = db_repo(&db);
    let sale = NewSale {
        vehicle_id: vehicle,
        customer_id: customer,
        price: 50_000,
        sold_at: Utc::now(),
    };

    repo.insert_sale(&sale).await.unwrap();
    let duplicate = repo.insert_sale(&sale).await;
    assert!(
        matches!(duplicate, Err(PurchaseServiceError::VehicleUnavailable)),
        "expected VehicleUnavailable, got {duplicate:?}"
    );
}

#[tokio::test]
async fn should_flip_vehicle_availability_once() {
    let db = sqlite_db().await;
    let vehicle = insert_vehicle(&db, 50_000).await;
    let repo = db_repo(&db);

    assert!(repo.mark_vehicle_sold(vehicle).await.unwrap());
    assert!(!repo.mark_vehicle_sold(vehicle).await.unwrap());
    assert!(!repo.mark_vehicle_sold(VehicleId(999)).await.unwrap());
}

// The single pooled connection queues the second transaction behind the first; the
// interleaved case is covered in `race_test`.
#[tokio::test]
async fn should_sell_vehicle_once_across_queued_approvals() {
    let db = sqlite_db().await;
    let first_customer = insert_customer(&db, "first@example.com").await;
    let second_customer = insert_customer(&db, "second@example.com").await;
    let vehicle = insert_vehicle(&db, 80_000).await;
    let create = CreatePurchaseRequestUseCase {
        store: db_repo(&db),
    };

    let mut request_ids = Vec::new();
    for (customer, email) in [
        (first_customer, "first@example.com"),
        (second_customer, "second@example.com"),
    ] {
        let code = purchase_code(db_repo(&db), email, vehicle.0).await;
        let created = create
            .execute(CreatePurchaseRequestInput {
                customer_id: customer,
                vehicle_id: vehicle,
                otp_code: code,
            })
            .await
            .unwrap();
        request_ids.push(created.request_id);
    }

    let approve = ApprovePurchaseRequestUseCase {
        store: db_repo(&db),
    };
    let (a, b) = futures::join!(
        approve.execute(request_ids[0]),
        approve.execute(request_ids[1])
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "got {a:?} and {b:?}");
    let loser = if a.is_ok() { b } else { a };
    assert!(
        matches!(loser, Err(PurchaseServiceError::VehicleUnavailable)),
        "expected VehicleUnavailable, got {loser:?}"
    );

    let mut statuses = Vec::new();
    for id in &request_ids {
        let request = db_repo(&db).find_request(*id).await.unwrap().unwrap();
        statuses.push(request.status);
    }
    statuses.sort_by_key(|s| s.as_u8());
    assert_eq!(statuses, vec![PurchaseStatus::Pending, PurchaseStatus::Approved]);

    let mut total_sales = 0;
    for customer in [first_customer, second_customer] {
        total_sales += db_repo(&db).history_for(customer).await.unwrap().len();
    }
    assert_eq!(total_sales, 1, "the vehicle must be sold exactly once");
}

#[tokio::test]
async fn should_roll_back_request_when_vehicle_is_sold() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let vehicle = insert_vehicle(&db, 50_000).await;
    db_repo(&db).mark_vehicle_sold(vehicle).await.unwrap();
    let code = purchase_code(db_repo(&db), "buyer@example.com", vehicle.0).await;

    let result = CreatePurchaseRequestUseCase {
        store: db_repo(&db),
    }
    .execute(CreatePurchaseRequestInput {
        customer_id: customer,
        vehicle_id: vehicle,
        otp_code: code.clone(),
    })
    .await;
    assert!(
        matches!(result, Err(PurchaseServiceError::VehicleUnavailable)),
        "expected VehicleUnavailable, got {result:?}"
    );

    assert!(!db_repo(&db).has_pending_request(customer, vehicle).await.unwrap());
    let still_live = ledger(db_repo(&db))
        .validate(purchase_validation("buyer@example.com", &code, vehicle.0, false))
        .await
        .unwrap();
    assert!(still_live, "code consumption must roll back with the request");
}

#[tokio::test]
async fn should_reject_request_and_keep_vehicle_listed() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let vehicle = insert_vehicle(&db, 50_000).await;
    let code = purchase_code(db_repo(&db), "buyer@example.com", vehicle.0).await;
    let created = CreatePurchaseRequestUseCase {
        store: db_repo(&db),
    }
    .execute(CreatePurchaseRequestInput {
        customer_id: customer,
        vehicle_id: vehicle,
        otp_code: code,
    })
    .await
    .unwrap();

    RejectPurchaseRequestUseCase {
        store: db_repo(&db),
    }
    .execute(created.request_id)
    .await
    .unwrap();

    let repo = db_repo(&db);
    let request = repo.find_request(created.request_id).await.unwrap().unwrap();
    assert_eq!(request.status, PurchaseStatus::Rejected);
    assert!(repo.find_vehicle(vehicle).await.unwrap().unwrap().is_available);
}

#[tokio::test]
async fn should_list_only_customers() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;

    let customers = ListCustomersUseCase { users: db_repo(&db) }
        .execute()
        .await
        .unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].id, customer);
    assert_eq!(customers[0].email, "buyer@example.com");
}

#[tokio::test]
async fn should_return_history_newest_first() {
    let db = sqlite_db().await;
    let customer = insert_customer(&db, "buyer@example.com").await;
    let older = insert_vehicle(&db, 40_000).await;
    let newer = insert_vehicle(&db, 60_000).await;
    let repo = db_repo(&db);
    let now = Utc::now();
    for (vehicle, price, sold_at) in [
        (older, 40_000, now - Duration::days(2)),
        (newer, 60_000, now),
    ] {
        repo.insert_sale(&NewSale {
            vehicle_id: vehicle,
            customer_id: customer,
            price,
            sold_at,
        })
        .await
        .unwrap();
    }

    let history = repo.history_for(customer).await.unwrap();
    let prices: Vec<i64> = history.iter().map(|h| h.price).collect();
    assert_eq!(prices, vec![60_000, 40_000]);
}
