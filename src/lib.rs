//! A single JSON endpoint that answers one of five questions per request:
//! a Fibonacci prefix, the primes in a list, an LCM, an HCF, or a short
//! natural-language answer from an AI provider.
//!
//! Flow: [`request::validate`] gates the body shape, [`dispatch::Dispatcher`]
//! enforces per-operation limits and runs the work, and [`envelope::Envelope`]
//! wraps the outcome. [`api::router`] wires it to HTTP.

pub mod api;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod math;
pub mod provider;
pub mod request;
