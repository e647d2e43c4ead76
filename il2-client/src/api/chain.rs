use il2_common::log_info;
use il2_common::logging::{Component, Logger};

use crate::client::IL2Client;
use crate::error::{ClientError, Result};
use crate::models::{
    ChainCreated, ChainCreation, ChainId, ChainSummary, ForceInterlock, InterlockingRecord,
    KeyDetails, Page, PageRequest,
};

const BASE_URL: &str = "chain";

/// Chain management requests
pub struct ChainApi<'a> {
    client: &'a IL2Client,
    logger: Logger,
}

impl<'a> ChainApi<'a> {
    pub(crate) fn new(client: &'a IL2Client) -> Self {
        Self {
            client,
            logger: client.logger().with_component(Component::ChainApi),
        }
    }

    /// Chains hosted by the node
    pub async fn list_chains(&self) -> Result<Vec<ChainId>> {
        self.client.get(&self.logger, BASE_URL, &[]).await
    }

    pub async fn create_chain(&self, new_chain: &ChainCreation) -> Result<ChainCreated> {
        new_chain.validate().map_err(ClientError::Configuration)?;
        let created: ChainCreated = self
            .client
            .post(&self.logger, BASE_URL, new_chain, &[])
            .await?;
        log_info!(self.logger, "Created chain {}", created.chain.id);
        Ok(created)
    }

    pub async fn summary(&self, chain_id: &str) -> Result<ChainSummary> {
        self.client
            .get(&self.logger, &format!("{}/{}", BASE_URL, chain_id), &[])
            .await
    }

    /// Numeric ids of the apps permitted on the chain
    pub async fn list_active_apps(&self, chain_id: &str) -> Result<Vec<u64>> {
        self.client
            .get(&self.logger, &active_apps_path(chain_id), &[])
            .await
    }

    /// Permit more apps; returns the resulting active apps
    pub async fn add_active_apps(&self, chain_id: &str, apps: &[u64]) -> Result<Vec<u64>> {
        self.client
            .post(&self.logger, &active_apps_path(chain_id), apps, &[])
            .await
    }

    /// Keys currently permitted on the chain
    pub async fn list_keys(&self, chain_id: &str) -> Result<Vec<KeyDetails>> {
        self.client.get(&self.logger, &keys_path(chain_id), &[]).await
    }

    /// Permit more keys; returns the resulting permitted keys
    pub async fn add_keys(&self, chain_id: &str, keys: &[KeyDetails]) -> Result<Vec<KeyDetails>> {
        let permitted: Vec<KeyDetails> = self
            .client
            .post(&self.logger, &keys_path(chain_id), keys, &[])
            .await?;
        log_info!(
            self.logger,
            "Permitted {} keys on {}, {} in total",
            keys.len(),
            chain_id,
            permitted.len()
        );
        Ok(permitted)
    }

    /// Interlocks registered in the chain. `how_many_from_last` of 0 lists all.
    pub async fn list_interlockings(
        &self,
        chain_id: &str,
        how_many_from_last: u64,
        paging: PageRequest,
    ) -> Result<Page<InterlockingRecord>> {
        let mut query = paging.query();
        query.push(("howManyFromLast", how_many_from_last.to_string()));
        self.client
            .get(&self.logger, &interlockings_path(chain_id), &query)
            .await
    }

    pub async fn force_interlocking(
        &self,
        chain_id: &str,
        interlock: &ForceInterlock,
    ) -> Result<InterlockingRecord> {
        self.client
            .post(&self.logger, &interlockings_path(chain_id), interlock, &[])
            .await
    }
}

fn keys_path(chain_id: &str) -> String {
    format!("{}/{}/key", BASE_URL, chain_id)
}

fn active_apps_path(chain_id: &str) -> String {
    format!("{}/{}/activeApps", BASE_URL, chain_id)
}

fn interlockings_path(chain_id: &str) -> String {
    format!("{}/{}/interlockings", BASE_URL, chain_id)
}
