// app/src/services/mod.rs

//! Collaborators used by the actions and read handlers: the persistence
//! gateway, session resolution, and the view cache.

pub mod seed;
pub mod session;
pub mod store;
pub mod view_cache;
