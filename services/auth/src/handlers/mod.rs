pub mod auth;
pub mod grants;
pub mod users;
