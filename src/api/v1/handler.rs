use super::cookie::SessionCookie;
use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::header::SET_COOKIE;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// A request that passed token verification, with the token it presented.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub identity: Identity,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

pub async fn register(
    body: RegisterRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let input = RegisterInput {
        email: body.email,
        username: body.username,
        password: body.password,
    };
    let user_id = auth_service
        .register(input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(RegisterResponse {
        user_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
    cookie: SessionCookie,
) -> Result<impl warp::Reply, warp::Rejection> {
    let input = LoginInput {
        email: body.email,
        username: body.username,
        password: body.password,
    };
    let result = auth_service
        .login(input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response = LoginResponse {
        user_id: result.user_id,
        expires_at: result.expires_at,
    };
    Ok(warp::reply::with_header(
        warp::reply::json(&ApiResponse::ok(response)),
        SET_COOKIE,
        cookie.set(&result.token.0),
    ))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn logout(
    session: VerifiedSession,
    auth_service: Arc<dyn AuthService>,
    cookie: SessionCookie,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(&session.identity, &session.token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_header(
        warp::reply::json(&ApiResponse::ok(MessageResponse {
            message: "logged out successfully",
        })),
        SET_COOKIE,
        cookie.clear(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SavePostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn save_post(
    session: VerifiedSession,
    body: SavePostRequest,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let post = post_service
        .save_post(
            session.identity.user_id,
            NewPost {
                title: body.title,
                content: body.content,
            },
        )
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(post)))
}

#[derive(Debug, Deserialize)]
pub struct NextPostsQuery {
    pub limit: Option<i64>,
    pub cursor: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reverse: bool,
}

pub async fn next_posts(
    session: VerifiedSession,
    query: NextPostsQuery,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let params = PaginationParams {
        limit: query.limit,
        cursor: query.cursor,
        reverse: query.reverse,
    };
    let posts = post_service
        .next_posts(session.identity.user_id, params)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    trace!(count = posts.len(), "next posts page");
    Ok(warp::reply::json(&ApiResponse::ok(posts)))
}

#[derive(Debug, Deserialize)]
pub struct DeletePostRequest {
    pub post_id: PostId,
}

pub async fn delete_post(
    session: VerifiedSession,
    body: DeletePostRequest,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    post_service
        .delete_post(session.identity.user_id, body.post_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(MessageResponse {
        message: "deleted post successfully",
    })))
}
