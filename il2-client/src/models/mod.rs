//! Request and response models of the IL2 REST API.
//!
//! Field names follow the node's camelCase JSON. Timestamps are kept as the
//! ISO-8601 strings the node sends.

pub mod apps;
pub mod chain;
pub mod errors;
pub mod json;
pub mod keys;
pub mod node;
pub mod opaque;
pub mod page;
pub mod record;

pub use apps::{
    AppPermissions, Apps, DataField, DataFieldEnumeration, DataIndex, DataIndexElement, DataModel,
    InterlockApp, LimitedRange,
};
pub use chain::{
    CertificatePermit, ChainCreated, ChainCreation, ChainId, ChainSummary, ExportedKeyFile,
};
pub use errors::ErrorDetails;
pub use json::{AllowedReaders, AllowedReadersDetails, JsonDocument, ReaderKey};
pub use keys::KeyDetails;
pub use node::{NodeDetails, NodeInfo, PeerNode, SoftwareVersions};
pub use opaque::{NewOpaqueRecord, OpaqueQuery, OpaqueRecord};
pub use page::{Page, PageRequest};
pub use record::{
    ForceInterlock, InterlockingRecord, NewRecord, Record, RecordAsJson, RecordFilter, RecordInfo,
    RecordQuery,
};
