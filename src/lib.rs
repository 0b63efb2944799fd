pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod model;
pub mod remote;
pub mod state;
pub mod sync;
pub mod ui;
