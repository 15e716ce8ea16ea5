//! Periodic greeting streams delivered as Server-Sent Events (SSE).
//!
//! This crate turns a [`domain::GreetingRequest`] into a lazily evaluated,
//! unbounded, time-paced sequence of greetings and frames each one as an SSE
//! event for the web layer to write to the open connection.
//!
//! # Architecture
//!
//! - **One producer per stream**: every continuous stream spawns its own tokio
//!   task with its own timer, cancellation token and channel. Streams share
//!   nothing but the read-only clock.
//! - **No buffering**: the producer hands greetings over through a channel
//!   with room for one value. A tick that finds it still full is an overrun
//!   and is dropped (or held, see [`config::OverrunPolicy`]).
//! - **Cancellation from the consumer side**: dropping a [`GreetingStream`]
//!   cancels it. axum drops the response body when the client disconnects,
//!   so the producer stops within one tick of the connection closing.
//! - **Explicit lifecycle**: `Idle -> Running -> Cancelled | Completed | Failed`,
//!   observable through [`GreetingStream::state`].
//! - **Ephemeral**: no event ids, no replay. A client that reconnects simply
//!   starts a fresh stream.
//!
//! # Example
//!
//! ```rust,ignore
//! use sse::{config::StreamConfig, message, Manager};
//!
//! let stream = app_state
//!     .sse_manager
//!     .open_stream(app_state.clock.clone(), request, StreamConfig::default());
//! let events = stream.filter_map(|greeting| async move { message::to_event(&greeting) });
//! ```
//!
//! # Modules
//!
//! - `config`: tick period and overrun policy
//! - `connection`: registry of open streams and the guard that unregisters them
//! - `manager`: opens registered streams and shuts them all down
//! - `message`: JSON payload and SSE event framing
//! - `state`: stream lifecycle state machine
//! - `stream`: the single-shot and periodic greeting streams

pub mod config;
pub mod connection;
pub mod manager;
pub mod message;
pub mod state;
pub mod stream;

pub use manager::Manager;
pub use state::StreamState;
pub use stream::GreetingStream;
