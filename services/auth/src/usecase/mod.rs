pub mod challenge;
pub mod credential;
pub mod directory;
pub mod grant;
pub mod verify;
