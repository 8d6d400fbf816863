//! EPC-style RPC over TCP: named methods, positional arguments, one JSON
//! message per line in each direction.
//!
//! Binary payloads (PNG images) cross this boundary as standard base64.

pub mod client;
pub mod protocol;
pub mod server;

pub use client::Client;
pub use server::Server;
