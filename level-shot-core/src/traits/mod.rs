pub mod capture_sink;
pub mod haptic_sink;
pub mod orientation_source;
pub mod persistence_sink;
pub mod trigger_delegate;
