use il2_common::logging::{Component, Logger};
use il2_common::{log_debug, log_info};
use serde::Serialize;
use serde_json::Value;

use crate::client::IL2Client;
use crate::error::Result;
use crate::models::{AllowedReaders, AllowedReadersDetails, JsonDocument, Page, PageRequest};

pub const HEADER_PUB_KEY: &str = "X-PubKey";
pub const HEADER_PUB_KEY_ID: &str = "X-PubKeyId";
pub const HEADER_PUB_KEY_REFERENCES: &str = "X-PubKeyReferences";
pub const HEADER_PUB_KEY_CHAINS: &str = "X-PubKeyChains";

/// JSON document requests, `jsonDocuments@<chainId>`.
///
/// The node encrypts every document it stores. Who can read it back depends on
/// the variant used to add it: the calling certificate, an explicit key, the
/// readers in referenced allow lists, or the allow lists of whole chains.
pub struct JsonApi<'a> {
    client: &'a IL2Client,
    logger: Logger,
    keys_logger: Logger,
}

impl<'a> JsonApi<'a> {
    pub const BASE_URL: &'static str = "jsonDocuments@";

    pub(crate) fn new(client: &'a IL2Client) -> Self {
        let logger = client.logger().with_component(Component::JsonApi);
        Self {
            client,
            keys_logger: logger.with_component(Component::Keys),
            logger,
        }
    }

    /// JSON document record by serial number, still encrypted
    pub async fn get_json_document(&self, chain_id: &str, serial: u64) -> Result<JsonDocument> {
        self.client
            .get(&self.logger, &document_path(chain_id, serial), &[])
            .await
    }

    /// Fetch a document and decode it with the client certificate
    pub async fn read_json_document(&self, chain_id: &str, serial: u64) -> Result<Value> {
        let document = self.get_json_document(chain_id, serial).await?;
        let value = document.decode_with_logger(self.client.certificate(), &self.keys_logger)?;
        log_debug!(self.logger, "Decoded JSON document {}@{}", chain_id, serial);
        Ok(value)
    }

    /// Store a document readable by the calling certificate
    pub async fn add_json_document<P: Serialize + ?Sized>(
        &self,
        chain_id: &str,
        payload: &P,
    ) -> Result<JsonDocument> {
        self.add(chain_id, "", payload, Vec::new()).await
    }

    /// Store a document readable by the given key.
    ///
    /// `public_key` and `public_key_id` are IL2 text representations, as
    /// returned by `Pkcs12Certificate::pub_key` and `key_id`.
    pub async fn add_json_document_with_key<P: Serialize + ?Sized>(
        &self,
        chain_id: &str,
        payload: &P,
        public_key: &str,
        public_key_id: &str,
    ) -> Result<JsonDocument> {
        let headers = vec![
            (HEADER_PUB_KEY, public_key.to_string()),
            (HEADER_PUB_KEY_ID, public_key_id.to_string()),
        ];
        self.add(chain_id, "/withKey", payload, headers).await
    }

    /// Store a document readable by the readers of allow lists referenced as
    /// `chainId@serial`
    pub async fn add_json_document_with_indirect_keys<P: Serialize + ?Sized>(
        &self,
        chain_id: &str,
        payload: &P,
        key_references: &[String],
    ) -> Result<JsonDocument> {
        let headers = vec![(HEADER_PUB_KEY_REFERENCES, key_references.join(","))];
        self.add(chain_id, "/withIndirectKeys", payload, headers)
            .await
    }

    /// Store a document readable by the allowed readers of local chains
    pub async fn add_json_document_with_chain_keys<P: Serialize + ?Sized>(
        &self,
        chain_id: &str,
        payload: &P,
        keys_chain_ids: &[String],
    ) -> Result<JsonDocument> {
        let headers = vec![(HEADER_PUB_KEY_CHAINS, keys_chain_ids.join(","))];
        self.add(chain_id, "/withChainKeys", payload, headers).await
    }

    /// Allow lists stored in the chain, optionally filtered by context id
    pub async fn list_allowed_readers(
        &self,
        chain_id: &str,
        context_id: Option<&str>,
        paging: PageRequest,
    ) -> Result<Page<AllowedReadersDetails>> {
        let mut query = paging.query();
        if let Some(context_id) = context_id {
            query.push(("contextId", context_id.to_string()));
        }
        self.client
            .get(&self.logger, &allow_path(chain_id), &query)
            .await
    }

    /// Store a new allow list; returns the `chainId@serial` reference of the
    /// record holding it
    pub async fn allow_readers(&self, chain_id: &str, readers: &AllowedReaders) -> Result<String> {
        let reference: String = self
            .client
            .post(&self.logger, &allow_path(chain_id), readers, &[])
            .await?;
        log_info!(
            self.logger,
            "Allowed {} readers as {:?} in {}",
            readers.readers.len(),
            readers.context_id,
            reference
        );
        Ok(reference)
    }

    async fn add<P: Serialize + ?Sized>(
        &self,
        chain_id: &str,
        suffix: &str,
        payload: &P,
        headers: Vec<(&'static str, String)>,
    ) -> Result<JsonDocument> {
        let path = format!("{}{}{}", Self::BASE_URL, chain_id, suffix);
        self.client
            .post(&self.logger, &path, payload, &headers)
            .await
    }
}

fn document_path(chain_id: &str, serial: u64) -> String {
    format!("{}{}/{}", JsonApi::BASE_URL, chain_id, serial)
}

fn allow_path(chain_id: &str) -> String {
    format!("{}{}/allow", JsonApi::BASE_URL, chain_id)
}
