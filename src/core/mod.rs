pub mod admin;
pub mod borehole;
pub mod config;
pub mod context;
pub mod layer;
pub mod lock;
pub mod log;
pub mod patch;
pub mod permission;
pub mod profile;
pub mod workflow;
