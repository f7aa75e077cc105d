//! Media collaborators around the arrangement core: source probing,
//! thumbnail strips for layer previews, a local Range-capable media server,
//! and a fetch cache for remote URLs. Everything here is blocking I/O; the
//! core itself never touches any of it.

pub mod error;
pub mod fetch;
pub mod probe;
pub mod server;
pub mod thumbnails;
