//! HTTP plumbing shared by every slice: state, error mapping and system routes.

mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiErrorExt, ErrorBody, INTERNAL_ERROR_MESSAGE, INVALID_BODY_MESSAGE};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
