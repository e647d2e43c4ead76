use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Versions of the software running a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareVersions {
    #[serde(default)]
    pub core_libs: String,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub peer2peer: String,
    #[serde(default)]
    pub tags: String,
}

/// Fields shared by the node itself and its peers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub owner_name: String,
    /// Roles active on the node
    #[serde(default)]
    pub roles: Vec<String>,
    /// Mapping color
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub software_versions: SoftwareVersions,
    #[serde(default)]
    pub extensions: HashMap<String, String>,
}

/// Response of the node root endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    #[serde(flatten)]
    pub node: NodeInfo,
    /// Ids of the chains hosted by the node
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub peer_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerNode {
    #[serde(flatten)]
    pub node: NodeInfo,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub port: u16,
}
