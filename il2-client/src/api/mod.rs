//! Typed wrappers over the node's REST endpoints, grouped as the node groups
//! them. Obtain them from [`crate::IL2Client`].

mod chain;
mod json;
mod node;
mod opaque;
mod record;

pub use chain::ChainApi;
pub use json::JsonApi;
pub use node::NodeApi;
pub use opaque::OpaqueApi;
pub use record::RecordApi;
