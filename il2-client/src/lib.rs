//! IL2 Client
//!
//! Async REST client for InterlockLedger IL2 nodes. Authenticates with a
//! PKCS#12 client certificate and decodes the encrypted JSON documents the
//! node returns for that certificate.
//!
//! ```rust,no_run
//! use il2_client::{ClientConfig, IL2Client, PageRequest};
//!
//! # async fn run() -> il2_client::Result<()> {
//! let client = IL2Client::new(ClientConfig::from_env()?)?;
//! let chains = client.chain().list_chains().await?;
//! for chain in &chains {
//!     let page = client
//!         .json_documents()
//!         .list_allowed_readers(&chain.id, None, PageRequest::default())
//!         .await?;
//!     println!("{}: {} allow lists", chain.id, page.items.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::IL2Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use models::{ErrorDetails, JsonDocument, Page, PageRequest};

// Keys types callers need alongside the client
pub use il2_keys::{CertificateIdentity, DecodeError, EncryptedText, Pkcs12Certificate};
