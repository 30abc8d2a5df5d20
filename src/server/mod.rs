//! Accept loop and the state shared by every connection.

pub mod listener;
pub mod state;

pub use state::ServerState;
