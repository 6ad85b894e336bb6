//! Host-side integration test entry point.
//!
//! Single binary so the mock adapters are shared across test modules.

mod mock_ports;
mod station_service_tests;
