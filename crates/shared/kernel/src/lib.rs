//! Kernel utilities shared across slices.
//! Keep this crate lightweight: layered config loading and, behind the `server`
//! feature, the HTTP plumbing every slice plugs into.
//!
//! ## Config loading
//! ```rust,no_run
//! use atlas_kernel::config::load_config;
//! use atlas_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(None::<&str>).unwrap();
//! assert!(cfg.server.port > 0);
//! ```
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use atlas_domain as domain;
