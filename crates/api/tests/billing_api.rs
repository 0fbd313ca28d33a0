//! Integration tests for invoices and payment recording over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use bureau_core::status::{InvoiceStatus, QuoteStatus};

/// Submit and approve a quote, returning (invoice_id, customer_id).
async fn approved_invoice(
    app: &axum::Router,
    admin_token: &str,
    email: &str,
    cost: &str,
) -> (i64, i64) {
    let response = common::post_json(
        app.clone(),
        "/api/v1/quotes",
        None,
        json!({
            "contact_name": "Billing Test",
            "contact_email": email,
            "description": "Billable work",
            "estimated_cost": cost,
        }),
    )
    .await;
    let body = common::expect_status(response, StatusCode::CREATED).await;
    let quote_id = body["quote"]["id"].as_i64().unwrap();

    let response = common::patch_json(
        app.clone(),
        &format!("/api/v1/admin/quotes/{quote_id}"),
        Some(admin_token),
        json!({ "status_id": QuoteStatus::Approved.id() }),
    )
    .await;
    let body = common::expect_status(response, StatusCode::OK).await;
    (
        body["invoice"]["id"].as_i64().unwrap(),
        body["invoice"]["customer_id"].as_i64().unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Test: deposit then remaining, with flags visible to the client
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_flow_updates_invoice_flags(pool: PgPool) {
    let admin_token = common::seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let (invoice_id, customer_id) =
        approved_invoice(&app, &admin_token, "payer@example.com", "1000.00").await;

    // Record the deposit.
    let response = common::post_json(
        app.clone(),
        "/api/v1/admin/payments",
        Some(&admin_token),
        json!({
            "invoice_id": invoice_id,
            "customer_id": customer_id,
            "amount": "200.00",
            "payment_type": "deposit",
        }),
    )
    .await;
    let body = common::expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["invoice"]["deposit_paid"], true);
    assert_eq!(body["invoice"]["status_id"], InvoiceStatus::Pending.id());
    assert_eq!(body["payment"]["payment_method"], "simulated");

    // Record the remaining balance.
    let response = common::post_json(
        app.clone(),
        "/api/v1/admin/payments",
        Some(&admin_token),
        json!({
            "invoice_id": invoice_id,
            "customer_id": customer_id,
            "amount": "800.00",
            "payment_type": "remaining",
        }),
    )
    .await;
    let body = common::expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["invoice"]["status_id"], InvoiceStatus::Paid.id());

    // Payment history shows both rows in order.
    let response = common::get_auth(
        app,
        &format!("/api/v1/admin/invoices/{invoice_id}/payments"),
        &admin_token,
    )
    .await;
    let body = common::expect_status(response, StatusCode::OK).await;
    let payments = body.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["payment_type"], "deposit");
    assert_eq!(payments[1]["payment_type"], "remaining");
}

// ---------------------------------------------------------------------------
// Test: payment ordering and amount rules surface as 409/400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_rules_are_enforced(pool: PgPool) {
    let admin_token = common::seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let (invoice_id, customer_id) =
        approved_invoice(&app, &admin_token, "rules@example.com", "1000.00").await;

    // Remaining before deposit: 409.
    let response = common::post_json(
        app.clone(),
        "/api/v1/admin/payments",
        Some(&admin_token),
        json!({
            "invoice_id": invoice_id,
            "customer_id": customer_id,
            "amount": "800.00",
            "payment_type": "remaining",
        }),
    )
    .await;
    common::expect_status(response, StatusCode::CONFLICT).await;

    // Wrong amount: 400.
    let response = common::post_json(
        app.clone(),
        "/api/v1/admin/payments",
        Some(&admin_token),
        json!({
            "invoice_id": invoice_id,
            "customer_id": customer_id,
            "amount": "123.45",
            "payment_type": "deposit",
        }),
    )
    .await;
    common::expect_status(response, StatusCode::BAD_REQUEST).await;

    // Unknown payment type: 400.
    let response = common::post_json(
        app,
        "/api/v1/admin/payments",
        Some(&admin_token),
        json!({
            "invoice_id": invoice_id,
            "customer_id": customer_id,
            "amount": "200.00",
            "payment_type": "cheque",
        }),
    )
    .await;
    common::expect_status(response, StatusCode::BAD_REQUEST).await;
}

// ---------------------------------------------------------------------------
// Test: manual invoices derive their amount from line items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_invoice_amount_comes_from_line_items(pool: PgPool) {
    let admin_token = common::seed_admin(&pool).await;
    let (customer_id, _) = common::seed_client(&pool, "lineitems@example.com").await;
    let app = common::build_test_app(pool);

    // Inconsistent item totals are rejected.
    let response = common::post_json(
        app.clone(),
        "/api/v1/admin/invoices",
        Some(&admin_token),
        json!({
            "customer_id": customer_id,
            "line_items": [
                {"description": "Audit", "quantity": "2", "rate": "300.00", "total": "700.00"}
            ],
        }),
    )
    .await;
    common::expect_status(response, StatusCode::BAD_REQUEST).await;

    // Consistent items produce a derived amount and deposit split.
    let response = common::post_json(
        app,
        "/api/v1/admin/invoices",
        Some(&admin_token),
        json!({
            "customer_id": customer_id,
            "line_items": [
                {"description": "Audit", "quantity": "2", "rate": "300.00", "total": "600.00"},
                {"description": "Report", "quantity": "1", "rate": "150.00", "total": "150.00"}
            ],
        }),
    )
    .await;
    let body = common::expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["amount"], "750.00");
    assert_eq!(body["deposit_amount"], "150.00");
    assert_eq!(body["remaining_amount"], "600.00");
    assert!(body["invoice_number"].as_str().unwrap().starts_with("INV-"));
}

// ---------------------------------------------------------------------------
// Test: the client sees the next payable invoice, FIFO
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_next_payable_is_oldest(pool: PgPool) {
    let admin_token = common::seed_admin(&pool).await;
    let (customer_id, client_token) = common::seed_client(&pool, "queue@example.com").await;
    let app = common::build_test_app(pool);

    // No invoices yet: 204.
    let response = common::get_auth(
        app.clone(),
        "/api/v1/client/invoices/next-payable",
        &client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Two invoices, created in order.
    let mut ids = Vec::new();
    for label in ["First milestone", "Second milestone"] {
        let response = common::post_json(
            app.clone(),
            "/api/v1/admin/invoices",
            Some(&admin_token),
            json!({
                "customer_id": customer_id,
                "line_items": [
                    {"description": label, "quantity": "1", "rate": "500.00", "total": "500.00"}
                ],
            }),
        )
        .await;
        let body = common::expect_status(response, StatusCode::CREATED).await;
        ids.push(body["id"].as_i64().unwrap());
    }

    let response = common::get_auth(
        app,
        "/api/v1/client/invoices/next-payable",
        &client_token,
    )
    .await;
    let body = common::expect_status(response, StatusCode::OK).await;
    assert_eq!(body["id"].as_i64().unwrap(), ids[0]);
}
