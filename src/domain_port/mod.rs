// stores

mod family_invite_store;
mod family_store;
mod relationship_store;

pub use family_invite_store::*;
pub use family_store::*;
pub use relationship_store::*;

// collaborators

mod notification_sender;
mod profile_repo;
mod push_gateway;

pub use notification_sender::*;
pub use profile_repo::*;
pub use push_gateway::*;
