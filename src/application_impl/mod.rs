mod family_service_impl;
mod relationship_service_impl;

pub use family_service_impl::*;
pub use relationship_service_impl::*;
