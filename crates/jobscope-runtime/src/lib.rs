pub mod client;
pub mod dashboard;
pub mod observability;
pub mod server;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use dashboard::{create_api_router, create_dashboard_router, create_router, DashboardState};
pub use observability::init_logging;
pub use server::DashboardServer;
