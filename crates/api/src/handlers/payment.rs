//! Handlers for recording simulated payments.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_db::models::payment::RecordPayment;
use bureau_db::repositories::{PaymentRejection, PaymentRepo, RecordOutcome};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/admin/payments
///
/// Inserts the payment row and updates the invoice's billing flags in one
/// transaction: a `deposit` payment marks the deposit paid, a `remaining`
/// payment marks the invoice paid.
pub async fn record(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<RecordPayment>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if !input.amount.is_sign_positive() {
        return Err(AppError::Core(CoreError::Validation(
            "amount must be positive".into(),
        )));
    }

    match PaymentRepo::record(&state.pool, &input).await? {
        RecordOutcome::Recorded { payment, invoice } => Ok((
            StatusCode::CREATED,
            Json(json!({ "payment": payment, "invoice": invoice })),
        )),
        RecordOutcome::InvoiceNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Invoice",
            id: input.invoice_id,
        })),
        RecordOutcome::Rejected(rejection) => Err(map_rejection(rejection)),
    }
}

/// Map a payment rejection to the API error taxonomy: bad input is 400,
/// state conflicts are 409.
fn map_rejection(rejection: PaymentRejection) -> AppError {
    match rejection {
        PaymentRejection::InvalidType => AppError::Core(CoreError::Validation(
            "payment_type must be 'deposit' or 'remaining'".into(),
        )),
        PaymentRejection::AmountMismatch { expected } => AppError::Core(CoreError::Validation(
            format!("amount does not match the expected portion ({expected})"),
        )),
        PaymentRejection::CustomerMismatch => AppError::Core(CoreError::Validation(
            "customer_id does not match the invoice".into(),
        )),
        PaymentRejection::AlreadyPaid => {
            AppError::Core(CoreError::Conflict("Invoice is already paid".into()))
        }
        PaymentRejection::Cancelled => {
            AppError::Core(CoreError::Conflict("Invoice was cancelled".into()))
        }
        PaymentRejection::DepositNotRequired => AppError::Core(CoreError::Conflict(
            "Invoice does not require a deposit".into(),
        )),
        PaymentRejection::DepositAlreadyPaid => AppError::Core(CoreError::Conflict(
            "Deposit has already been recorded for this invoice".into(),
        )),
        PaymentRejection::DepositOutstanding => AppError::Core(CoreError::Conflict(
            "The required deposit must be paid before the remaining balance".into(),
        )),
    }
}
