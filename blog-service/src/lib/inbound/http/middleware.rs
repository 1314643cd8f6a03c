use axum::extract::Query;
use axum::extract::Request;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;

use crate::inbound::graphql::RequestContext;

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Attach a [`RequestContext`] carrying the caller's token, if any.
///
/// The token is read from the `token` query parameter, falling back to an
/// `Authorization: Bearer` header. Nothing is verified here; protected
/// resolvers do that through the gate, so anonymous reads keep working.
pub async fn attach_request_context(mut req: Request, next: Next) -> Response {
    let token = Query::<TokenQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(req.headers()));

    req.extensions_mut().insert(RequestContext::new(token));

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));
    }
}
