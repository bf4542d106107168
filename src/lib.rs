pub mod analytics;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod labels;
pub mod models;
pub mod price;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;
pub mod whatsapp;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use store::AnalyticsStore;
