//! Forager turns natural-language research queries into GitHub issues:
//! a research API produces findings, the findings become an issue, and
//! every step is streamed to the browser over SSE.

pub mod api;
pub mod config;
pub mod error;
pub mod platform;
pub mod research;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod workflow;
