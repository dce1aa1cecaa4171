mod family_invite_store_mysql;
mod family_store_mysql;
mod profile_repo_mysql;
mod relationship_store_mysql;

pub use family_invite_store_mysql::*;
pub use family_store_mysql::*;
pub use profile_repo_mysql::*;
pub use relationship_store_mysql::*;
