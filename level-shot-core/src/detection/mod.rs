pub mod capture_lock;
pub mod level_detector;
