//! AWS-facing client for the optimize-source function.
//!
//! This crate owns runtime integration details (the Lambda invocation
//! adapter and the fetch pipeline) on top of the wire contract in
//! `itemfetch_core`. The binary in `src/bin/itemfetch.rs` wires the AWS SDK
//! into the `FunctionInvoker` seam.

pub mod adapters;
pub mod handlers;
