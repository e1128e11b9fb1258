//! `cdp_link`: a per-target Chrome DevTools Protocol client engine —
//! WebSocket connection, request/response correlation, event dispatch,
//! JS/host callback and promise bridges, execution-context tracking,
//! target discovery, fetch interception, DOM node handles, input
//! synthesis, and page lifecycle watching.

pub mod cdp_types;
pub mod connection;
pub mod context;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod ids;
pub mod input;
pub mod listeners;
pub mod message;
pub mod page;
pub mod promise;
pub mod target;
pub mod types;
pub mod ws;

pub use connection::{Connection, ConnectionConfig, ConnectionParams};
pub use error::{CdpError, Result};
pub use target::{DiscoveryConfig, TargetRegistry};
