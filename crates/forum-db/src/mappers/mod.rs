//! Model to entity mappers
//!
//! - `TryFrom<UserModel> for User` re-runs the entity rules on stored data
//! - `From<Model> for Entity` for the remaining tables
//! - `From<*Row> for ReadModel` for joined query rows

mod conversation;
mod message;
mod session;
mod user;
mod verification;

pub use conversation::thread_from_rows;
