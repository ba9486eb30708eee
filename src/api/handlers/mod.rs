//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one endpoint.

pub mod health;
pub mod register;
pub mod results;
pub mod visit;

pub use health::health_handler;
pub use register::register_handler;
pub use results::results_handler;
pub use visit::visit_handler;
