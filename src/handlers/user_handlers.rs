//! HTTP handlers for user accounts: create, delete, get and login.

use crate::{
    errors::AppError,
    handlers::respond::{decode, no_content, respond_json, unexpected},
    models::user::{User, UserResponse},
    services::{
        credential_service::{CredentialError, MAX_PASSWORD_BYTES},
        store_service::StoreError,
    },
    state::AppState,
};
use axum::{extract::State, http::StatusCode, response::Response};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

/// Body of `create` and `login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsParams {
    pub name: String,
    pub password: String,
}

/// Body of `get` and `delete`.
#[derive(Debug, Deserialize)]
pub struct UserNameParams {
    pub name: String,
}

/// Same message for unknown users and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// POST `/api/v1/users/create`: register a user, issuing an API token.
///
/// Responds 201 with `{id, name}`; neither the password nor the token is echoed.
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    const OP: &str = "create_user";
    let params: CredentialsParams = decode(&body).map_err(|err| err.for_op(OP))?;
    let name = params.name;
    let tag = |err: AppError| err.for_op(OP).with_key(name.as_str());

    if name.trim().is_empty() {
        return Err(tag(AppError::bad_request("Name is required")));
    }
    if params.password.is_empty() {
        return Err(tag(AppError::bad_request("Password is required")));
    }
    if params.password.len() > MAX_PASSWORD_BYTES {
        return Err(tag(AppError::bad_request(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ))));
    }

    let api_key = state
        .credentials
        .generate_token()
        .map_err(|err| tag(AppError::internal().with_cause(err)))?;

    // bcrypt blocks; run it on the blocking pool.
    let credentials = state.credentials.clone();
    let password = params.password;
    let password_hash = tokio::task::spawn_blocking(move || credentials.hash_password(&password))
        .await
        .map_err(|err| tag(AppError::internal().with_cause(err)))?
        .map_err(|err| {
            tag(match err {
                CredentialError::PasswordTooLong => {
                    AppError::bad_request("Password is too long").with_cause(err)
                }
                other => AppError::internal().with_cause(other),
            })
        })?;

    let user = User::new(name.as_str(), password_hash, api_key);
    let created = state.store.create_user(&user).await.map_err(|err| {
        tag(match err {
            err @ StoreError::DuplicateKey(_) => {
                AppError::conflict("User already exists").with_cause(err)
            }
            other => unexpected(other),
        })
    })?;

    info!(operation = OP, name = %created.name, "User created");
    Ok(respond_json(StatusCode::CREATED, UserResponse::from(&created)))
}

/// DELETE `/api/v1/users/delete`
pub async fn delete_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    const OP: &str = "delete_user";
    let params: UserNameParams = decode(&body).map_err(|err| err.for_op(OP))?;

    state
        .store
        .delete_user(&params.name)
        .await
        .map_err(|err| match err {
            err @ StoreError::NotFound(_) => AppError::not_found("User not found").with_cause(err),
            other => unexpected(other),
        })
        .map_err(|err| err.for_op(OP).with_key(params.name.as_str()))?;

    info!(operation = OP, name = %params.name, "User deleted");
    Ok(no_content())
}

/// GET `/api/v1/users/get`
pub async fn get_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    const OP: &str = "get_user";
    let params: UserNameParams = decode(&body).map_err(|err| err.for_op(OP))?;

    let user = state
        .store
        .get_user_by_name(&params.name)
        .await
        .map_err(|err| match err {
            err @ StoreError::NotFound(_) => AppError::not_found("User not found").with_cause(err),
            other => unexpected(other),
        })
        .map_err(|err| err.for_op(OP).with_key(params.name.as_str()))?;

    info!(operation = OP, name = %user.name, "User retrieved");
    Ok(respond_json(StatusCode::OK, UserResponse::from(&user)))
}

/// POST `/api/v1/users/login`: check a name/password pair.
///
/// Unknown names and wrong passwords both answer 401 with the same body, and
/// both pay for one bcrypt verification.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    const OP: &str = "login";
    let params: CredentialsParams = decode(&body).map_err(|err| err.for_op(OP))?;
    let name = params.name;
    let tag = |err: AppError| err.for_op(OP).with_key(name.as_str());

    let user = match state.store.get_user_by_name(&name).await {
        Ok(user) => Some(user),
        Err(StoreError::NotFound(_)) => None,
        Err(other) => return Err(tag(unexpected(other))),
    };

    let credentials = state.credentials.clone();
    let hash = user.as_ref().map(|user| user.password_hash.clone());
    let password = params.password;
    let matches = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => credentials.verify_password(&hash, &password),
        None => credentials.verify_unknown_user(&password),
    })
    .await
    .map_err(|err| tag(AppError::internal().with_cause(err)))?;

    match user {
        Some(user) if matches => {
            info!(operation = OP, name = %user.name, "User logged in");
            Ok(respond_json(StatusCode::OK, UserResponse::from(&user)))
        }
        Some(_) => Err(tag(
            AppError::unauthorized(INVALID_CREDENTIALS).with_cause("password mismatch"),
        )),
        None => Err(tag(
            AppError::unauthorized(INVALID_CREDENTIALS).with_cause("no such user"),
        )),
    }
}
