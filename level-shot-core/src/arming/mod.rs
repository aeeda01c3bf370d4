pub mod delay_timer;
pub mod machine;
