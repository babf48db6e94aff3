// Infrastructure layer - External dependencies and adapters
pub mod alarm_webhook;
pub mod config;
pub mod graphql_repository;
pub mod http_response;
