pub mod auth;
pub mod code_review;
pub mod comment;
pub mod home;
pub mod like;
pub mod post;
