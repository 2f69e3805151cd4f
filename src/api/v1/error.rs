use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        debug!("rejected query string: {}", e);
        ApiErrorCode::InvalidParams
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        debug!("rejected request body: {}", e);
        ApiErrorCode::InvalidRequest
    } else if err.find::<reject::UnsupportedMediaType>().is_some()
        || err.find::<reject::LengthRequired>().is_some()
        || err.find::<reject::PayloadTooLarge>().is_some()
    {
        ApiErrorCode::InvalidRequest
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        ApiErrorCode::internal(format!("unhandled rejection: {:?}", err))
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
pub enum ApiErrorCode {
    #[error("Malformed request")]
    InvalidRequest,
    #[error("Invalid pagination or post parameters")]
    InvalidParams,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Email or username already registered")]
    AlreadyRegistered,
    #[error("Unauthorized user")]
    Unauthenticated,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token is missing required claims")]
    MalformedClaims,
    #[error("You have logged out")]
    SessionRevoked,
    #[error("Not your post")]
    Forbidden,
    #[error("No user with such email or username")]
    UserNotFound,
    #[error("Post not found")]
    PostNotFound,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidRequest
            | ApiErrorCode::InvalidParams
            | ApiErrorCode::InvalidPassword
            | ApiErrorCode::AlreadyRegistered => StatusCode::BAD_REQUEST,
            ApiErrorCode::Unauthenticated
            | ApiErrorCode::InvalidToken
            | ApiErrorCode::TokenExpired
            | ApiErrorCode::MalformedClaims
            | ApiErrorCode::SessionRevoked => StatusCode::UNAUTHORIZED,
            ApiErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ApiErrorCode::UserNotFound | ApiErrorCode::PostNotFound | ApiErrorCode::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Unauthenticated => ApiErrorCode::Unauthenticated,
            AuthError::TokenInvalid => ApiErrorCode::InvalidToken,
            AuthError::TokenExpired => ApiErrorCode::TokenExpired,
            AuthError::MalformedClaims(field) => {
                debug!("token claim missing or malformed: {}", field);
                ApiErrorCode::MalformedClaims
            }
            AuthError::SessionRevoked => ApiErrorCode::SessionRevoked,
            AuthError::InvalidRequest(_) => ApiErrorCode::InvalidRequest,
            AuthError::InvalidPassword => ApiErrorCode::InvalidPassword,
            AuthError::UserNotFound => ApiErrorCode::UserNotFound,
            AuthError::UserExists => ApiErrorCode::AlreadyRegistered,
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<PostError> for ApiErrorCode {
    fn from(error: PostError) -> Self {
        match error {
            PostError::InvalidParams(_) => ApiErrorCode::InvalidParams,
            PostError::NotFound => ApiErrorCode::PostNotFound,
            PostError::Forbidden => ApiErrorCode::Forbidden,
            PostError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_401_and_outages_500() {
        for e in [
            AuthError::Unauthenticated,
            AuthError::TokenInvalid,
            AuthError::TokenExpired,
            AuthError::MalformedClaims("jti"),
            AuthError::SessionRevoked,
        ] {
            assert_eq!(ApiErrorCode::from(e).status(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            ApiErrorCode::from(AuthError::Store("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiErrorCode::from(PostError::Store("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn post_failures_map_to_client_statuses() {
        assert_eq!(
            ApiErrorCode::from(PostError::InvalidParams("limit")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiErrorCode::from(PostError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiErrorCode::from(PostError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }
}
