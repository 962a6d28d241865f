//! # Domain Models
//!
//! Pure data shared by every crate: configuration structures and constants.
//! Keep it lean: no I/O, networking, or logic beyond defaults.

pub mod config;
pub mod constants;
