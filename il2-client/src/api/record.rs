use il2_common::logging::{Component, Logger};

use crate::client::IL2Client;
use crate::error::Result;
use crate::models::{
    NewRecord, Page, PageRequest, Record, RecordAsJson, RecordFilter, RecordQuery,
};

/// Raw record requests, `records@<chainId>`
pub struct RecordApi<'a> {
    client: &'a IL2Client,
    logger: Logger,
}

impl<'a> RecordApi<'a> {
    pub const BASE_URL: &'static str = "records@";

    pub(crate) fn new(client: &'a IL2Client) -> Self {
        Self {
            client,
            logger: client.logger().with_component(Component::RecordApi),
        }
    }

    pub async fn list_records(
        &self,
        chain_id: &str,
        filter: RecordFilter,
        paging: PageRequest,
    ) -> Result<Page<Record>> {
        let mut query = paging.query();
        query.extend(filter.query());
        self.client
            .get(&self.logger, &chain_path(chain_id, ""), &query)
            .await
    }

    /// Record by serial number
    pub async fn get_record(&self, chain_id: &str, serial: u64) -> Result<Record> {
        self.client
            .get(&self.logger, &chain_path(chain_id, &format!("/{}", serial)), &[])
            .await
    }

    /// Records matching an InterlockQL query
    pub async fn query_records(
        &self,
        chain_id: &str,
        query: &RecordQuery,
        paging: PageRequest,
    ) -> Result<Page<Record>> {
        let mut params = paging.query();
        params.extend(query.query());
        params.push(("ommitPayload", query.omit_payload.to_string()));
        self.client
            .get(&self.logger, &chain_path(chain_id, "/query"), &params)
            .await
    }

    /// Append a raw record. Prefer the application APIs unless the payload
    /// format is known.
    pub async fn add_record(&self, chain_id: &str, record: &NewRecord) -> Result<Record> {
        self.client
            .post(&self.logger, &chain_path(chain_id, ""), record, &[])
            .await
    }

    /// Records with the payload mapped to JSON. The payload is always
    /// included, so `filter.omit_payload` is ignored.
    pub async fn list_records_as_json(
        &self,
        chain_id: &str,
        filter: RecordFilter,
        paging: PageRequest,
    ) -> Result<Page<RecordAsJson>> {
        let mut query = paging.query();
        query.extend(filter.serial_query());
        self.client
            .get(&self.logger, &chain_path(chain_id, "/asJson"), &query)
            .await
    }

    pub async fn get_record_as_json(&self, chain_id: &str, serial: u64) -> Result<RecordAsJson> {
        self.client
            .get(
                &self.logger,
                &chain_path(chain_id, &format!("/asJson/{}", serial)),
                &[],
            )
            .await
    }

    /// InterlockQL query returning payloads as JSON
    pub async fn query_records_as_json(
        &self,
        chain_id: &str,
        query: &RecordQuery,
        paging: PageRequest,
    ) -> Result<Page<RecordAsJson>> {
        let mut params = paging.query();
        params.extend(query.query());
        self.client
            .get(&self.logger, &chain_path(chain_id, "/asJson/query"), &params)
            .await
    }
}

fn chain_path(chain_id: &str, suffix: &str) -> String {
    format!("{}{}{}", RecordApi::BASE_URL, chain_id, suffix)
}
