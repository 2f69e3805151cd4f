mod auth_service_impl;
mod deadline;
mod post_service_impl;

pub use auth_service_impl::*;
pub use post_service_impl::*;
