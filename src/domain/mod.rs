// Domain layer - Plain data types for the timeline pipeline
pub mod dashboard;
pub mod error;
pub mod event;
pub mod telemetry;
pub mod timestamp;
pub mod window;
