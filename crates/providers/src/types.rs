//! Reduced response types of the CometBFT JSON-RPC.

use crate::ProviderError;
use alloy_primitives::B256;
use chrono::{DateTime, Utc};
use serde::{de::Error, Deserialize, Deserializer};
use std::str::FromStr;

/// A JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
    pub(crate) result: Option<T>,
    pub(crate) error: Option<RpcErrorObject>,
}

impl<T> RpcResponse<T> {
    /// Returns the result of the response, or its error.
    pub(crate) fn into_result(self, method: &'static str) -> Result<T, ProviderError> {
        if let Some(err) = self.error {
            return Err(ProviderError::Rpc { code: err.code, message: err.message, data: err.data })
        }
        self.result.ok_or(ProviderError::EmptyResponse(method))
    }
}

/// A JSON-RPC error.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub(crate) code: i64,
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) data: Option<String>,
}

/// The `/status` result.
#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    pub(crate) sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncInfo {
    #[serde(deserialize_with = "from_str")]
    pub(crate) latest_block_height: u64,
}

/// The `/blockchain` result.
#[derive(Debug, Deserialize)]
pub(crate) struct Blockchain {
    #[serde(default)]
    pub(crate) block_metas: Vec<BlockMetaResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockMetaResponse {
    pub(crate) header: HeaderResponse,
    #[serde(deserialize_with = "from_str")]
    pub(crate) num_txs: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeaderResponse {
    #[serde(deserialize_with = "from_str")]
    pub(crate) height: u64,
    #[serde(default)]
    pub(crate) time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) app_hash: Option<String>,
}

/// The `/block` result.
#[derive(Debug, Deserialize)]
pub(crate) struct BlockResponse {
    pub(crate) block_id: BlockId,
    pub(crate) block: Block,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockId {
    pub(crate) hash: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Block {
    pub(crate) header: HeaderResponse,
}

/// The `/block_results` result.
#[derive(Debug, Deserialize)]
pub(crate) struct BlockResults {
    #[serde(default)]
    pub(crate) txs_results: Option<Vec<TxResult>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TxResult {
    #[serde(default)]
    pub(crate) events: Vec<AbciEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AbciEvent {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) attributes: Vec<EventAttribute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventAttribute {
    pub(crate) key: String,
    #[serde(default)]
    pub(crate) value: Option<String>,
}

/// Decodes a hash from its hex representation, with or without prefix.
pub(crate) fn parse_hash(field: &'static str, value: &str) -> Result<B256, ProviderError> {
    B256::from_str(value)
        .map_err(|_| ProviderError::InvalidField { field, value: value.to_owned() })
}

/// Deserializes a value from its string representation, as CometBFT encodes 64-bit integers.
fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(D::Error::custom)
}
