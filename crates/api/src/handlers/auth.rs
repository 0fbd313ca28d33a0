//! Handlers for `/auth` and the client profile.

use axum::extract::State;
use axum::Json;
use bureau_core::error::CoreError;
use bureau_core::types::DbId;
use bureau_db::models::customer::{Customer, UpdateCustomer};
use bureau_db::repositories::CustomerRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_stored, PasswordMatch};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub customer: CustomerInfo,
}

/// Public customer info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct CustomerInfo {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl From<&Customer> for CustomerInfo {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            role: customer.role.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a Bearer access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let customer = CustomerRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let matched = verify_stored(
        &input.password,
        &customer.password_hash,
        state.config.legacy_plaintext_login,
    )
    .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    match matched {
        PasswordMatch::NoMatch => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid email or password".into(),
            )));
        }
        PasswordMatch::Legacy => {
            // Migration-on-login: replace the plaintext record with a real
            // hash before completing the request.
            let rehashed = hash_password(&input.password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
            CustomerRepo::update_password(&state.pool, customer.id, &rehashed).await?;
            tracing::warn!(
                customer_id = customer.id,
                "re-hashed legacy plaintext password on login"
            );
        }
        PasswordMatch::Hash => {}
    }

    let access_token = generate_access_token(customer.id, &customer.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        customer: CustomerInfo::from(&customer),
    }))
}

/// GET /api/v1/client/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerRepo::find_by_id(&state.pool, auth.customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: auth.customer_id,
        }))?;
    Ok(Json(customer))
}

/// PUT /api/v1/client/profile
///
/// Partial update: absent fields leave the stored value unchanged.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateCustomer>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerRepo::update(&state.pool, auth.customer_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: auth.customer_id,
        }))?;
    Ok(Json(customer))
}
