//! In-process implementations of the storage ports, used by the `memory`
//! backends and as test doubles.

mod post_repo_memory;
mod revocation_store_memory;
mod user_repo_memory;

pub use post_repo_memory::*;
pub use revocation_store_memory::*;
pub use user_repo_memory::*;
