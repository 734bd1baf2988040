pub mod config;
pub mod blockchain;
pub mod relay;
pub mod api;
pub mod auth;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use utils::errors::Result;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: relay::engine::RelayEngine,
    pub metrics: metrics::RelayMetrics,
}
