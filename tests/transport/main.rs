//! Transport integration tests.
//!
//! Each test binds its listeners on port 0 and talks to them over TCP.

#[cfg(feature = "http")]
mod http;


#[cfg(feature = "gateway")]
mod gateway;

#[cfg(feature = "gateway")]
mod server;
