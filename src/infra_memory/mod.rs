mod family_invite_store_memory;
mod family_store_memory;
mod notify_memory;
mod profile_repo_memory;
mod relationship_store_memory;

pub use family_invite_store_memory::*;
pub use family_store_memory::*;
pub use notify_memory::*;
pub use profile_repo_memory::*;
pub use relationship_store_memory::*;
