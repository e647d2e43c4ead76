use il2_common::logging::{Component, Logger};

use crate::client::IL2Client;
use crate::error::Result;
use crate::models::{Apps, ChainId, InterlockingRecord, NodeDetails, Page, PageRequest, PeerNode};

/// Node-wide requests
pub struct NodeApi<'a> {
    client: &'a IL2Client,
    logger: Logger,
}

impl<'a> NodeApi<'a> {
    pub(crate) fn new(client: &'a IL2Client) -> Self {
        Self {
            client,
            logger: client.logger().with_component(Component::NodeApi),
        }
    }

    /// Details about the node
    pub async fn details(&self) -> Result<NodeDetails> {
        self.client.get(&self.logger, "", &[]).await
    }

    /// Version of the REST API
    pub async fn api_version(&self) -> Result<String> {
        self.client.get(&self.logger, "apiVersion", &[]).await
    }

    /// Apps valid in the node's network
    pub async fn list_apps(&self) -> Result<Apps> {
        self.client.get(&self.logger, "apps", &[]).await
    }

    /// Known peer nodes
    pub async fn list_peers(&self) -> Result<Vec<PeerNode>> {
        self.client.get(&self.logger, "peers", &[]).await
    }

    /// Chains mirrored from other nodes
    pub async fn list_mirrors(&self) -> Result<Vec<ChainId>> {
        self.client.get(&self.logger, "mirrors", &[]).await
    }

    /// Start mirroring the given chains
    pub async fn add_mirrors(&self, chain_ids: &[String]) -> Result<()> {
        self.client
            .post_no_content(&self.logger, "mirrors", chain_ids)
            .await
    }

    /// Interlocking records that point at `chain_id`
    pub async fn list_interlockings_to_chain(
        &self,
        chain_id: &str,
        last_known_block: Option<u64>,
        paging: PageRequest,
    ) -> Result<Page<InterlockingRecord>> {
        let mut query = paging.query();
        if let Some(block) = last_known_block {
            query.push(("lastKnownBlock", block.to_string()));
        }
        self.client
            .get(&self.logger, &format!("interlockings/{}", chain_id), &query)
            .await
    }
}
