//! Wire contract for the optimize-source item fetcher.
//!
//! This crate owns the request/response types exchanged with the remote
//! function and the compiled-in defaults of the client configuration. It has
//! no AWS or runtime dependencies; integration lives in `itemfetch_cli`.

pub mod contract;
