//! # HTTP Gateway
//!
//! The local HTTP surface: four JSON endpoints over the query compiler and
//! the access layer, plus liveness probes. Every expected failure is a
//! soft KO reply with HTTP 200; the consuming scripting layer branches on
//! the `respuesta` field, not on status codes.

pub mod envelope;
pub mod load_table;
pub mod run_query;
pub mod server;
pub mod update_record;
pub mod write_record;

pub use envelope::{QueryReply, WriteReply};
pub use server::{BoundGateway, Gateway, GatewayError, GatewayService, GatewayState};
