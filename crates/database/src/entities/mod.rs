//! Entity definitions for the accounts store

pub mod user;

pub use user::{NewUser, User};
