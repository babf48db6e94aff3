// Application layer - Reshaping pipeline, session state and use cases
pub mod alarm_service;
pub mod daily;
pub mod dashboard_service;
pub mod filter;
pub mod normalizer;
pub mod request_gate;
pub mod session;
pub mod telemetry_repository;
pub mod ticks;
pub mod time_domain;
pub mod view_state;
