//! API layer - HTTP endpoints and middleware

pub mod client_address;
pub mod forward_auth;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
