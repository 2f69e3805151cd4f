mod auth_service;
mod post_service;

pub use auth_service::*;
pub use post_service::*;
