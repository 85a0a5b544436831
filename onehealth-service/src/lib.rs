pub mod models;
pub mod service;
pub mod state;

pub use service::{AppState, create_app};
pub use state::{ChatSession, InMemorySessionStore, SessionStore};
