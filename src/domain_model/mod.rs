mod post;
mod session;
mod unit;
mod user;

pub use post::*;
pub use session::*;
pub use unit::*;
pub use user::*;
