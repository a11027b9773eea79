pub mod arena;
pub mod collision;
pub mod config;
pub mod effects;
pub mod entities;
pub mod input;
pub mod progress;
pub mod save;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod types;
