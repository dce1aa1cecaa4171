mod clock;
mod ttl_cache;

pub use clock::*;
pub use ttl_cache::*;
