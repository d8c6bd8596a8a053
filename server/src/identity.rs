use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::headers::{self, Header};
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::error::ErrorBody;

static X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// `X-User-Id`: the caller's id, set by the authenticating gateway in front of us.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XUserId(Uuid);

impl Header for XUserId {
    fn name() -> &'static HeaderName {
        &X_USER_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let value = value.to_str().map_err(|_| headers::Error::invalid())?;
        Uuid::parse_str(value.trim())
            .map(XUserId)
            .map_err(|_| headers::Error::invalid())
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0.to_string()) {
            values.extend(std::iter::once(value));
        }
    }
}

/// Authenticated caller of an endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(XUserId(id)) = TypedHeader::<XUserId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| Unauthenticated(rejection.to_string()))?;
        Ok(Caller(id))
    }
}

#[derive(Debug)]
pub struct Unauthenticated(String);

impl Unauthenticated {
    pub fn invalid_credentials() -> Self {
        Self("invalid email or password".to_string())
    }
}

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            reason: "unauthenticated",
            message: self.0,
            rejections: Vec::new(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::{HeaderValue, Request, StatusCode};
    use axum::extract::FromRequestParts;
    use axum::response::IntoResponse;
    use axum_extra::headers::Header;
    use uuid::Uuid;

    use crate::identity::{Caller, Unauthenticated, XUserId};

    #[test]
    fn decodes_uuid_header() {
        let id = Uuid::new_v4();
        let value = HeaderValue::from_str(&id.to_string()).unwrap();
        let decoded = XUserId::decode(&mut std::iter::once(&value)).unwrap();
        assert_eq!(decoded, XUserId(id));

        let bad = HeaderValue::from_static("someone");
        assert!(XUserId::decode(&mut std::iter::once(&bad)).is_err());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let rejection = Caller::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);

        let id = Uuid::new_v4();
        let (mut parts, _) = Request::builder()
            .header("x-user-id", id.to_string())
            .body(())
            .unwrap()
            .into_parts();
        let Caller(caller) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller, id);
    }

    #[test]
    fn bad_credentials_are_unauthorized() {
        let response = Unauthenticated::invalid_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
