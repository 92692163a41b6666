pub mod auth;
pub mod flash;
pub mod json;
