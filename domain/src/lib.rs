//! Greeting domain: the request/response value types, the pure greeting
//! computation and the injectable clock it is stamped with.
//!
//! Nothing in this crate knows about HTTP or streams. The `sse` crate drives
//! [`greeting::compute`] from a timer and `web` exposes both delivery modes.

pub use greeting::{GreetingRequest, GreetingResponse};

pub mod clock;
pub mod error;
pub mod greeting;
