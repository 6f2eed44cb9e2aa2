//! Integration tests with a mock Speech Cloud HTTP server

pub mod listing;
pub mod mock_server;
pub mod speech;
