// Command handlers module
pub mod history;
pub mod sample;
pub mod watch;

// Re-exports for cleaner imports
pub use history::execute as history;
pub use sample::execute as sample;
pub use watch::execute as watch;
