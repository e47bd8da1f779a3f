pub mod api;
pub mod app;
pub mod config;
pub mod demo;
pub mod errors;
pub mod io;
pub mod logging;
pub mod model;
pub mod outbox;
pub mod reorder;
pub mod state;
pub mod tree;
pub mod ui;
pub mod view;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use api::{ApiError, GlDefinitionApi, InMemoryApi, JsonFileApi};
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use model::{AccountId, AccountRef, GroupingId, GroupingNode, GroupingRecord};
pub use tree::GlTree;
