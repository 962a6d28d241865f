//! REST surface: `/countries` and `/countries/{id}`.

pub mod dto;
mod handlers;
pub mod routes;
