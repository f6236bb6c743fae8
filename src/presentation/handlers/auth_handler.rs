use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        repositories::credential_repository::CredentialRepository,
        services::{password_service::PasswordHasher, token_service::TokenGenerator},
        validation::validate_login,
    },
    presentation::error::ApiError,
    usecase::login_usecase::LoginUsecase,
};

// Request

/// json for login request
#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// Response

/// json for login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/* Router Function and Handler Function */

/// function return Router object
/// Suppose to be nested by main router
pub fn create_auth_router<
    C: CredentialRepository + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    T: TokenGenerator + Send + Sync + 'static,
>(
    login_service: LoginUsecase<C, P, T>,
) -> Router {
    let state = AppState {
        login_service: Arc::new(login_service),
    };

    Router::new()
        .route("/login", post(login::<C, P, T>))
        .with_state(state)
}

pub struct AppState<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> {
    pub login_service: Arc<LoginUsecase<C, P, T>>,
}

// derive(Clone) would demand C, P and T be Clone too
impl<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> Clone for AppState<C, P, T> {
    fn clone(&self) -> Self {
        Self {
            login_service: Arc::clone(&self.login_service),
        }
    }
}

/// handler function for login
async fn login<
    C: CredentialRepository + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    T: TokenGenerator + Send + Sync + 'static,
>(
    State(state): State<AppState<C, P, T>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = validate_login(&payload.email, &payload.password)?;

    let result = state.login_service.login(&email, payload.password).await?;

    Ok(Json(LoginResponse {
        token: result.token,
    }))
}
