mod family_service;
mod relationship_service;

pub use family_service::*;
pub use relationship_service::*;
