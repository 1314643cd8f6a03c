use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Extension;
use axum::Json;

use super::ApiError;
use crate::inbound::graphql::GraphQLRequest;
use crate::inbound::graphql::GraphQLResponse;
use crate::inbound::graphql::RequestContext;
use crate::inbound::http::router::AppState;

/// Always answers 200 once the body parses; failures travel in `errors`.
pub async fn graphql(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    body: Result<Json<GraphQLRequest>, JsonRejection>,
) -> Result<Json<GraphQLResponse>, ApiError> {
    let Json(request) = body?;

    Ok(Json(state.schema.execute(&context, request).await))
}
