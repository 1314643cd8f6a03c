use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::author::models::RegisterAuthorCommand;
use crate::inbound::http::router::AppState;
use crate::inbound::messages::AuthorData;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthorData>, ApiError> {
    let Json(body) = body?;

    state
        .author_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref author| ApiSuccess::new(StatusCode::CREATED, author.into()))
}

/// HTTP request body for registration (raw JSON).
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation failures rather than malformed JSON. An `id` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    firstname: String,
    #[serde(default)]
    lastname: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterAuthorCommand, ApiError> {
        RegisterAuthorCommand::new(self.firstname, self.lastname, self.username, self.password)
            .map_err(ApiError::from)
    }
}
