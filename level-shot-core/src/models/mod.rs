pub mod config;
pub mod error;
pub mod photo;
pub mod state;
pub mod tilt;
