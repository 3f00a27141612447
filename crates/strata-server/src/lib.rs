//! REST API server — routes, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
