mod family;
mod notification;
mod profile;
mod relationship;
mod user;

pub use family::*;
pub use notification::*;
pub use profile::*;
pub use relationship::*;
pub use user::*;
