//! Application layer: port traits, domain events, and the orchestrating
//! [`StationService`](service::StationService).

pub mod events;
pub mod ports;
pub mod service;
