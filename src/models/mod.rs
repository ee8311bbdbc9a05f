pub mod borehole;
pub mod layer;
pub mod profile;
pub mod role;
pub mod user;
pub mod workflow;
