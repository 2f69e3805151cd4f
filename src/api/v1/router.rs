use super::cookie::SESSION_COOKIE_NAME;
use super::error::*;
use super::handler::{self, VerifiedSession};
use crate::application_port::*;
use crate::logger::*;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let registration = warp::path("registration")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::register);

    let login = warp::path("auth")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and(with_value(server.session_cookie))
        .and_then(handler::login);

    let save_post = warp::path("protected")
        .and(warp::path("save_post"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_verification(server.auth_service.clone()))
        .and(warp::body::json())
        .and(with(server.post_service.clone()))
        .and_then(handler::save_post);

    let next_posts = warp::path("protected")
        .and(warp::path("next_posts"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_verification(server.auth_service.clone()))
        .and(warp::query::<handler::NextPostsQuery>())
        .and(with(server.post_service.clone()))
        .and_then(handler::next_posts);

    let delete_post = warp::path("protected")
        .and(warp::path("delete_post"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_verification(server.auth_service.clone()))
        .and(warp::body::json())
        .and(with(server.post_service.clone()))
        .and_then(handler::delete_post);

    let logout = warp::path("protected")
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.auth_service.clone()))
        .and(with_value(server.session_cookie))
        .and_then(handler::logout);

    registration
        .or(login)
        .or(save_post)
        .or(next_posts)
        .or(delete_post)
        .or(logout)
        .with(warp::trace::request())
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_value<T>(value: T) -> impl Filter<Extract = (T,), Error = Infallible> + Clone
where
    T: Clone + Send + Sync,
{
    warp::any().map(move || value.clone())
}

/// The `jwt_token` cookie wins; `Authorization: Bearer` is the fallback.
fn presented_token(cookie: Option<String>, authorization: Option<String>) -> Option<String> {
    cookie.filter(|c| !c.is_empty()).or_else(|| {
        authorization
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    })
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (VerifiedSession,), Error = warp::Rejection> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE_NAME)
        .and(warp::header::optional::<String>("authorization"))
        .and_then(move |cookie: Option<String>, authorization: Option<String>| {
            let auth_service = auth_service.clone();
            async move {
                let token = presented_token(cookie, authorization);
                match auth_service.verify_token(token.as_deref()).await {
                    Ok(identity) => Ok(VerifiedSession {
                        identity,
                        // verify_token refuses a missing token
                        token: token.unwrap_or_default(),
                    }),
                    Err(e) => {
                        debug!("request rejected: {}", e);
                        Err(reject::custom(ApiErrorCode::from(e)))
                    }
                }
            }
        })
}
