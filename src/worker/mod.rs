pub mod behaviour;
pub mod config;
pub mod error;
pub mod rolling_metric;
pub mod tick_worker;
