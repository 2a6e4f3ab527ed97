//! Management server library surface, exposed for integration tests.

pub mod api;
pub mod state;
