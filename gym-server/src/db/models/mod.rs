//! Server-side database models

mod user;

pub use user::User;
