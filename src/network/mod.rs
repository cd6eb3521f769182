//! Network Module
//!
//! HTTP/1.1 server and request routing.
//!
//! ## Architecture
//! - Single acceptor thread polling the listener
//! - Worker thread pool fed by a bounded channel
//! - Commands routed through Engine

mod handler;
mod server;

pub use handler::{route, HttpReply};
pub use server::{Server, ShutdownHandle};
