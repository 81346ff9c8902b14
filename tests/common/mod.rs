//! Shared test utilities

pub mod mock_provider;
