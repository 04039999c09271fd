use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::{
    adapters::inbound::http::dto::ErrorResponseDto, domain::errors::AuthError,
    services::JwtAuthenticator,
};

/// Convert AuthError to HTTP status codes for API responses
impl From<&AuthError> for StatusCode {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Tower layer requiring a valid `Authorization: Bearer <token>` header.
///
/// Verified claims are stored in the request extensions.
#[derive(Clone)]
pub struct BearerAuthLayer {
    authenticator: Arc<JwtAuthenticator>,
}

impl BearerAuthLayer {
    pub fn new(authenticator: Arc<JwtAuthenticator>) -> Self {
        BearerAuthLayer { authenticator }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuth {
            inner,
            authenticator: self.authenticator.clone(),
        }
    }
}

/// Middleware rejecting unauthenticated requests with 401
#[derive(Clone)]
pub struct BearerAuth<S> {
    inner: S,
    authenticator: Arc<JwtAuthenticator>,
}

impl<S> Service<Request<Body>> for BearerAuth<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match self.authenticator.verify_authorization_header(header) {
            Ok(claims) => {
                debug!(user = %claims.name, path = %req.uri().path(), "Authenticated request");
                req.extensions_mut().insert(claims);

                // The ready service is the one that must handle the request
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                warn!(error = %err, path = %req.uri().path(), "Rejected unauthenticated request");
                let response = (
                    StatusCode::from(&err),
                    Json(ErrorResponseDto::from_auth_error(&err)),
                )
                    .into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
