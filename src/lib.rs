pub mod audio;
pub mod config;
pub mod grading;
pub mod ui;
