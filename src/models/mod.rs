//! Data models for the Community Hub application.
//!
//! These models match the frontend TypeScript interfaces for seamless interoperability.

mod community;
mod datastore;
mod member;
mod quiz;
mod session;

pub use community::*;
pub use datastore::*;
pub use member::*;
pub use quiz::*;
pub use session::*;
