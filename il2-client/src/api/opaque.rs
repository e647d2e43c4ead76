use il2_common::logging::{Component, Logger};
use il2_common::{log_debug, log_info};
use reqwest::header::HeaderMap;

use crate::client::{IL2Client, OCTET_STREAM};
use crate::error::Result;
use crate::models::{NewOpaqueRecord, OpaqueQuery, OpaqueRecord, Page, PageRequest};

const HEADER_APP_ID: &str = "x-app-id";
const HEADER_PAYLOAD_TYPE_ID: &str = "x-payload-type-id";
const HEADER_CREATED_AT: &str = "x-created-at";

/// Opaque record requests, `opaque/<chainId>`.
///
/// Payloads travel as `application/octet-stream`; the node stores them
/// without interpreting them.
pub struct OpaqueApi<'a> {
    client: &'a IL2Client,
    logger: Logger,
}

impl<'a> OpaqueApi<'a> {
    pub const BASE_URL: &'static str = "opaque/";

    pub(crate) fn new(client: &'a IL2Client) -> Self {
        Self {
            client,
            logger: client.logger().with_component(Component::OpaqueApi),
        }
    }

    pub async fn add_opaque(&self, chain_id: &str, record: &NewOpaqueRecord) -> Result<OpaqueRecord> {
        let path = format!("{}{}", Self::BASE_URL, chain_id);
        let added: OpaqueRecord = self
            .client
            .post_bytes(&self.logger, &path, &record.query(), record.payload.clone())
            .await?;
        log_info!(
            self.logger,
            "Added opaque record {}@{} ({} bytes)",
            chain_id,
            added.serial,
            record.payload.len()
        );
        Ok(added)
    }

    /// Opaque record by serial number. Metadata comes from the response
    /// headers, the body is the payload.
    pub async fn get_opaque(&self, chain_id: &str, serial: u64) -> Result<OpaqueRecord> {
        let path = format!("{}{}@{}", Self::BASE_URL, chain_id, serial);
        let response = self.client.get_raw(&self.logger, &path, OCTET_STREAM).await?;

        let headers = response.headers().clone();
        let payload = response.bytes().await?.to_vec();
        log_debug!(self.logger, "Read {} opaque bytes from {}", payload.len(), path);

        Ok(OpaqueRecord {
            network: None,
            chain_id: Some(chain_id.to_string()),
            serial,
            application_id: header_u64(&headers, HEADER_APP_ID),
            payload_type_id: header_u64(&headers, HEADER_PAYLOAD_TYPE_ID),
            payload_length: payload.len() as u64,
            created_at: header_str(&headers, HEADER_CREATED_AT),
            payload: Some(payload),
        })
    }

    pub async fn query_opaque(
        &self,
        chain_id: &str,
        query: &OpaqueQuery,
        paging: PageRequest,
    ) -> Result<Page<OpaqueRecord>> {
        let mut params = query.query();
        params.extend(paging.query());
        self.client
            .get(
                &self.logger,
                &format!("{}{}/asJson/query", Self::BASE_URL, chain_id),
                &params,
            )
            .await
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Missing or malformed numeric headers read as zero
fn header_u64(headers: &HeaderMap, name: &str) -> u64 {
    header_str(headers, name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}
