//! Integration tests for the quote -> project -> invoice billing lifecycle.
//!
//! Exercises the repository layer against a real database:
//! - Approval fan-out (quote update + project + invoice + notification, atomic)
//! - Deposit/remaining split invariants
//! - Payment recording and its invoice flag updates
//! - Candidate (next payable) invoice resolution
//! - Folder number uniqueness under concurrent project creation

use std::str::FromStr;

use assert_matches::assert_matches;
use rust_decimal::Decimal;
use sqlx::PgPool;

use bureau_core::billing::LineItem;
use bureau_core::status::{InvoiceStatus, ProjectStatus, QuoteStatus};
use bureau_db::models::customer::CreateCustomer;
use bureau_db::models::invoice::CreateInvoice;
use bureau_db::models::payment::RecordPayment;
use bureau_db::models::project::CreateProject;
use bureau_db::models::quote::CreateQuote;
use bureau_db::repositories::{
    CustomerRepo, InvoiceRepo, NotificationRepo, PaymentRepo, PaymentRejection, ProjectRepo,
    QuoteRepo, RecordOutcome,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn money(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn new_customer(email: &str) -> CreateCustomer {
    CreateCustomer {
        first_name: "Avery".to_string(),
        last_name: "Quinn".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        company: Some("Quinn Studio".to_string()),
        phone: None,
    }
}

fn new_quote(customer_id: i64, cost: &str) -> CreateQuote {
    CreateQuote {
        customer_id: Some(customer_id),
        contact_name: "Avery Quinn".to_string(),
        contact_email: "avery@example.com".to_string(),
        company: None,
        description: "Marketing site redesign".to_string(),
        estimated_cost: money(cost),
        estimated_timeline: Some("6 weeks".to_string()),
        selected_package: Some(serde_json::json!({
            "name": "Site Redesign",
            "features": ["responsive", "cms"],
            "complexity": "standard"
        })),
        rush_delivery: None,
    }
}

fn new_project(customer_id: i64, name: &str) -> CreateProject {
    CreateProject {
        customer_id,
        quote_id: None,
        name: name.to_string(),
        client: "Avery Quinn".to_string(),
        status_id: None,
        budget: None,
        start_date: None,
        end_date: None,
    }
}

async fn seed_customer(pool: &PgPool, email: &str) -> i64 {
    CustomerRepo::create(pool, &new_customer(email))
        .await
        .unwrap()
        .id
}

async fn record(
    pool: &PgPool,
    invoice_id: i64,
    customer_id: i64,
    amount: &str,
    payment_type: &str,
) -> RecordOutcome {
    PaymentRepo::record(
        pool,
        &RecordPayment {
            invoice_id,
            customer_id,
            amount: money(amount),
            payment_type: payment_type.to_string(),
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: approval fan-out creates project + invoice + notification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_fans_out(pool: PgPool) {
    let customer_id = seed_customer(&pool, "fanout@example.com").await;
    let (quote, _) = QuoteRepo::submit(&pool, None, &new_quote(customer_id, "1000.00"))
        .await
        .unwrap();

    assert_eq!(quote.status_id, QuoteStatus::Pending.id());
    let reference = quote.reference.clone().unwrap();
    assert!(reference.starts_with("QT-"), "reference: {reference}");

    let outcome = QuoteRepo::approve(&pool, quote.id, None, Some("looks good"))
        .await
        .unwrap()
        .expect("approval should apply");

    assert_eq!(outcome.quote.status_id, QuoteStatus::Approved.id());
    assert_eq!(outcome.project.customer_id, customer_id);
    assert_eq!(outcome.project.quote_id, Some(quote.id));
    assert_eq!(outcome.project.status_id, ProjectStatus::Pending.id());
    assert_eq!(outcome.project.name, "Site Redesign"); // from selected_package

    let invoice = &outcome.invoice;
    assert_eq!(invoice.amount, money("1000.00"));
    assert_eq!(invoice.deposit_amount, money("200.00"));
    assert_eq!(invoice.remaining_amount, money("800.00"));
    assert!(invoice.deposit_required);
    assert!(!invoice.deposit_paid);
    assert_eq!(invoice.status_id, InvoiceStatus::Pending.id());
    assert!(invoice.invoice_number.clone().unwrap().starts_with("INV-"));

    // The customer was notified inside the same transaction.
    let notifications = NotificationRepo::list_for_customer(&pool, customer_id, false, 10, 0)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "quote_status");
}

// ---------------------------------------------------------------------------
// Test: approve is guarded against repeat/concurrent application
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_applies_only_once(pool: PgPool) {
    let customer_id = seed_customer(&pool, "once@example.com").await;
    let (quote, _) = QuoteRepo::submit(&pool, None, &new_quote(customer_id, "500.00"))
        .await
        .unwrap();

    assert!(QuoteRepo::approve(&pool, quote.id, None, None)
        .await
        .unwrap()
        .is_some());
    // Second approval finds the quote no longer pending/quoted.
    assert!(QuoteRepo::approve(&pool, quote.id, None, None)
        .await
        .unwrap()
        .is_none());

    // Exactly one project and one invoice exist.
    let projects = ProjectRepo::list_for_customer(&pool, customer_id).await.unwrap();
    assert_eq!(projects.len(), 1);
    let invoices = InvoiceRepo::list_for_customer(&pool, customer_id).await.unwrap();
    assert_eq!(invoices.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: the documented billing scenario, end to end
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_then_remaining_pays_invoice(pool: PgPool) {
    let customer_id = seed_customer(&pool, "scenario@example.com").await;
    let (quote, _) = QuoteRepo::submit(&pool, None, &new_quote(customer_id, "1000.00"))
        .await
        .unwrap();
    let outcome = QuoteRepo::approve(&pool, quote.id, None, None)
        .await
        .unwrap()
        .unwrap();
    let invoice_id = outcome.invoice.id;

    // Pay the deposit: deposit_paid flips, status stays pending.
    let RecordOutcome::Recorded { payment, invoice } =
        record(&pool, invoice_id, customer_id, "200.00", "deposit").await
    else {
        panic!("deposit payment should be recorded");
    };
    assert_eq!(payment.payment_type, "deposit");
    assert_eq!(payment.payment_method, "simulated");
    assert!(invoice.deposit_paid);
    assert_eq!(invoice.status_id, InvoiceStatus::Pending.id());
    assert_eq!(invoice.deposit_amount + invoice.remaining_amount, invoice.amount);

    // Pay the remaining balance: status flips to paid.
    let RecordOutcome::Recorded { invoice, .. } =
        record(&pool, invoice_id, customer_id, "800.00", "remaining").await
    else {
        panic!("remaining payment should be recorded");
    };
    assert_eq!(invoice.status_id, InvoiceStatus::Paid.id());

    // Two payment rows, deposit first.
    let payments = PaymentRepo::list_for_invoice(&pool, invoice_id).await.unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].payment_type, "deposit");
    assert_eq!(payments[1].payment_type, "remaining");
}

// ---------------------------------------------------------------------------
// Test: payment rejections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_rejections(pool: PgPool) {
    let customer_id = seed_customer(&pool, "reject@example.com").await;
    let (quote, _) = QuoteRepo::submit(&pool, None, &new_quote(customer_id, "1000.00"))
        .await
        .unwrap();
    let outcome = QuoteRepo::approve(&pool, quote.id, None, None)
        .await
        .unwrap()
        .unwrap();
    let invoice_id = outcome.invoice.id;

    // Remaining before deposit is rejected.
    let RecordOutcome::Rejected(rejection) =
        record(&pool, invoice_id, customer_id, "800.00", "remaining").await
    else {
        panic!("expected rejection");
    };
    assert_eq!(rejection, PaymentRejection::DepositOutstanding);

    // Wrong amount is rejected with the expected portion.
    let RecordOutcome::Rejected(rejection) =
        record(&pool, invoice_id, customer_id, "150.00", "deposit").await
    else {
        panic!("expected rejection");
    };
    assert_eq!(
        rejection,
        PaymentRejection::AmountMismatch {
            expected: money("200.00")
        }
    );

    // Unknown type is rejected.
    let RecordOutcome::Rejected(rejection) =
        record(&pool, invoice_id, customer_id, "200.00", "gift-card").await
    else {
        panic!("expected rejection");
    };
    assert_eq!(rejection, PaymentRejection::InvalidType);

    // Double deposit is rejected, and no extra payment row appears.
    record(&pool, invoice_id, customer_id, "200.00", "deposit").await;
    let RecordOutcome::Rejected(rejection) =
        record(&pool, invoice_id, customer_id, "200.00", "deposit").await
    else {
        panic!("expected rejection");
    };
    assert_eq!(rejection, PaymentRejection::DepositAlreadyPaid);

    let payments = PaymentRepo::list_for_invoice(&pool, invoice_id).await.unwrap();
    assert_eq!(payments.len(), 1, "rejected attempts must not append rows");

    // Paying a missing invoice reports not-found.
    let outcome = record(&pool, 999_999, customer_id, "200.00", "deposit").await;
    assert_matches!(outcome, RecordOutcome::InvoiceNotFound);
}

// ---------------------------------------------------------------------------
// Test: candidate resolution picks the oldest unpaid invoice
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn next_payable_is_fifo(pool: PgPool) {
    let customer_id = seed_customer(&pool, "fifo@example.com").await;

    let first = InvoiceRepo::create(
        &pool,
        &CreateInvoice {
            customer_id,
            quote_id: None,
            project_id: None,
            line_items: vec![LineItem::single("Phase one", money("400.00"))],
            deposit_required: Some(true),
            due_date: None,
        },
    )
    .await
    .unwrap();

    let second = InvoiceRepo::create(
        &pool,
        &CreateInvoice {
            customer_id,
            quote_id: None,
            project_id: None,
            line_items: vec![LineItem::single("Phase two", money("600.00"))],
            deposit_required: Some(true),
            due_date: None,
        },
    )
    .await
    .unwrap();

    // Both unpaid: the earlier invoice wins.
    let candidate = InvoiceRepo::next_payable_for_customer(&pool, customer_id)
        .await
        .unwrap()
        .expect("a payable invoice exists");
    assert_eq!(candidate.id, first.id);

    // Once the first deposit is paid, resolution moves to the second.
    record(&pool, first.id, customer_id, "80.00", "deposit").await;
    let candidate = InvoiceRepo::next_payable_for_customer(&pool, customer_id)
        .await
        .unwrap()
        .expect("a payable invoice exists");
    assert_eq!(candidate.id, second.id);
}

// ---------------------------------------------------------------------------
// Test: invoice amounts always equal the line item sum
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn invoice_amount_is_line_item_sum(pool: PgPool) {
    let customer_id = seed_customer(&pool, "items@example.com").await;

    let items = vec![
        LineItem {
            description: "Design sprints".to_string(),
            quantity: money("3"),
            rate: money("450.00"),
            total: money("1350.00"),
        },
        LineItem::single("Hosting setup", money("150.00")),
    ];
    let invoice = InvoiceRepo::create(
        &pool,
        &CreateInvoice {
            customer_id,
            quote_id: None,
            project_id: None,
            line_items: items,
            deposit_required: Some(true),
            due_date: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(invoice.amount, money("1500.00"));
    assert_eq!(invoice.deposit_amount, money("300.00"));
    assert_eq!(invoice.remaining_amount, money("1200.00"));

    let stored: Vec<LineItem> = serde_json::from_value(invoice.line_items.clone()).unwrap();
    let sum: Decimal = stored.iter().map(|item| item.total).sum();
    assert_eq!(invoice.amount, sum);
}

// ---------------------------------------------------------------------------
// Test: waived deposit bills everything as remaining
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn waived_deposit_bills_in_full(pool: PgPool) {
    let customer_id = seed_customer(&pool, "waived@example.com").await;

    let invoice = InvoiceRepo::create(
        &pool,
        &CreateInvoice {
            customer_id,
            quote_id: None,
            project_id: None,
            line_items: vec![LineItem::single("Retainer", money("250.00"))],
            deposit_required: Some(false),
            due_date: None,
        },
    )
    .await
    .unwrap();

    assert!(!invoice.deposit_required);
    assert_eq!(invoice.deposit_amount, money("0.00"));
    assert_eq!(invoice.remaining_amount, money("250.00"));

    // A deposit payment makes no sense here.
    let RecordOutcome::Rejected(rejection) =
        record(&pool, invoice.id, customer_id, "50.00", "deposit").await
    else {
        panic!("expected rejection");
    };
    assert_eq!(rejection, PaymentRejection::DepositNotRequired);

    // The full amount settles it.
    let RecordOutcome::Recorded { invoice, .. } =
        record(&pool, invoice.id, customer_id, "250.00", "remaining").await
    else {
        panic!("remaining payment should be recorded");
    };
    assert_eq!(invoice.status_id, InvoiceStatus::Paid.id());
}

// ---------------------------------------------------------------------------
// Test: folder numbers are unique under concurrent creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_projects_get_distinct_folder_numbers(pool: PgPool) {
    let customer_id = seed_customer(&pool, "folders@example.com").await;

    let p_one = new_project(customer_id, "One");
    let p_two = new_project(customer_id, "Two");
    let p_three = new_project(customer_id, "Three");
    let p_four = new_project(customer_id, "Four");
    let (a, b, c, d) = tokio::join!(
        ProjectRepo::create(&pool, &p_one),
        ProjectRepo::create(&pool, &p_two),
        ProjectRepo::create(&pool, &p_three),
        ProjectRepo::create(&pool, &p_four),
    );

    let projects = [a.unwrap(), b.unwrap(), c.unwrap(), d.unwrap()];
    let mut folders: Vec<String> = projects.iter().map(|p| p.folder_number.clone()).collect();
    folders.sort();
    folders.dedup();
    assert_eq!(folders.len(), 4, "folder numbers must not collide");

    for project in &projects {
        assert_eq!(project.folder_number, format!("{:03}", project.id));
    }
}

// ---------------------------------------------------------------------------
// Test: overdue sweep
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn overdue_sweep_marks_past_due_invoices(pool: PgPool) {
    let customer_id = seed_customer(&pool, "overdue@example.com").await;

    let past_due = InvoiceRepo::create(
        &pool,
        &CreateInvoice {
            customer_id,
            quote_id: None,
            project_id: None,
            line_items: vec![LineItem::single("Old work", money("100.00"))],
            deposit_required: Some(false),
            due_date: Some(chrono::NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()),
        },
    )
    .await
    .unwrap();

    let future_due = InvoiceRepo::create(
        &pool,
        &CreateInvoice {
            customer_id,
            quote_id: None,
            project_id: None,
            line_items: vec![LineItem::single("New work", money("100.00"))],
            deposit_required: Some(false),
            due_date: Some(chrono::NaiveDate::from_ymd_opt(2099, 1, 31).unwrap()),
        },
    )
    .await
    .unwrap();

    let swept = InvoiceRepo::sweep_overdue(&pool).await.unwrap();
    assert_eq!(swept, 1);

    let past_due = InvoiceRepo::find_by_id(&pool, past_due.id).await.unwrap().unwrap();
    assert_eq!(past_due.status_id, InvoiceStatus::Overdue.id());
    let future_due = InvoiceRepo::find_by_id(&pool, future_due.id).await.unwrap().unwrap();
    assert_eq!(future_due.status_id, InvoiceStatus::Pending.id());

    // Repeat sweep is a no-op.
    assert_eq!(InvoiceRepo::sweep_overdue(&pool).await.unwrap(), 0);
}
