//! SSE HTTP handlers for the web layer.
//!
//! This module contains only the Axum handlers for the streaming endpoints.
//! The stream engine (GreetingStream, Manager, event framing) lives in the
//! `sse` crate.

pub mod handler;
