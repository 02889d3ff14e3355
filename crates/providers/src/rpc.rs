use crate::{
    types::{parse_hash, BlockResponse, BlockResults, Blockchain, RpcResponse, Status},
    LatestHeightProvider, ProviderError,
};
use opbridge_monitor::ChainDataSource;
use opbridge_primitives::{BlockInfo, BlockMeta, ChainEvent};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// The attribute of a bridge event carrying its type tag.
const TYPE_TAG_ATTRIBUTE: &str = "type_tag";

/// The attribute of a bridge event carrying its JSON encoded payload.
const DATA_ATTRIBUTE: &str = "data";

/// A [`ChainDataSource`] backed by the HTTP JSON-RPC of a CometBFT node.
#[derive(Debug, Clone)]
pub struct CometRpcClient {
    /// The base URL of the RPC.
    base: String,
    /// The inner reqwest client.
    inner: Client,
}

impl CometRpcClient {
    /// The node status method.
    const STATUS_METHOD: &'static str = "status";

    /// The block metadata range method.
    const BLOCKCHAIN_METHOD: &'static str = "blockchain";

    /// The block method.
    const BLOCK_METHOD: &'static str = "block";

    /// The block results method.
    const BLOCK_RESULTS_METHOD: &'static str = "block_results";

    /// Creates a new [`CometRpcClient`] from the provided base url.
    pub fn new_http(base: reqwest::Url) -> Self {
        Self::new(base, Client::new())
    }

    /// Creates a new [`CometRpcClient`] from the provided base url and client.
    pub fn new(base: reqwest::Url, inner: Client) -> Self {
        // If base ends with a slash, remove it
        let mut base = base.to_string();
        if base.ends_with('/') {
            base.remove(base.len() - 1);
        }
        Self { base, inner }
    }

    /// Calls the provided method with the query parameters and returns its result.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        query: &[(&str, u64)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base, method);
        tracing::trace!(target: "opbridge::providers", %url, ?query, "RPC call");
        let response = self.inner.get(&url).query(query).send().await?;
        response.json::<RpcResponse<T>>().await?.into_result(method)
    }
}

#[async_trait::async_trait]
impl LatestHeightProvider for CometRpcClient {
    async fn latest_height(&self) -> Result<u64, ProviderError> {
        let status: Status = self.call(Self::STATUS_METHOD, &[]).await?;
        Ok(status.sync_info.latest_block_height)
    }
}

#[async_trait::async_trait]
impl ChainDataSource for CometRpcClient {
    type Error = ProviderError;

    async fn block_range(&self, from: u64, to: u64) -> Result<Vec<BlockMeta>, Self::Error> {
        let blockchain: Blockchain = self
            .call(Self::BLOCKCHAIN_METHOD, &[("minHeight", from), ("maxHeight", to)])
            .await?;
        Ok(block_metas(blockchain))
    }

    async fn events(
        &self,
        height: u64,
        category: &str,
    ) -> Result<Option<Vec<ChainEvent>>, Self::Error> {
        match self.call::<BlockResults>(Self::BLOCK_RESULTS_METHOD, &[("height", height)]).await {
            Ok(results) => Ok(Some(chain_events(results, category)?)),
            Err(err) if err.is_height_unavailable() => {
                tracing::debug!(target: "opbridge::providers", height, %err, "Block results not available");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn block_info(&self, height: u64) -> Result<BlockInfo, Self::Error> {
        let block: BlockResponse = self.call(Self::BLOCK_METHOD, &[("height", height)]).await?;
        block_info(block)
    }
}

/// Returns the block metadata of the response in ascending height order.
fn block_metas(blockchain: Blockchain) -> Vec<BlockMeta> {
    let mut metas: Vec<_> = blockchain
        .block_metas
        .into_iter()
        .map(|meta| BlockMeta::new(meta.header.height, meta.num_txs))
        .collect();
    // the node returns the metadata from the highest block.
    metas.sort_unstable_by_key(|meta| meta.height);
    metas
}

fn block_info(block: BlockResponse) -> Result<BlockInfo, ProviderError> {
    let header = block.block.header;
    let app_hash = header.app_hash.unwrap_or_default();
    let timestamp: u64 = header
        .time
        .ok_or(ProviderError::EmptyResponse("block time"))?
        .timestamp()
        .try_into()
        .map_err(|_| ProviderError::InvalidField { field: "time", value: "negative".into() })?;

    Ok(BlockInfo {
        height: header.height,
        hash: parse_hash("block hash", &block.block_id.hash)?,
        state_root: parse_hash("app hash", &app_hash)?,
        timestamp,
    })
}

/// Collects the events of the provided category emitted by the transactions of a block.
///
/// The type tag attribute becomes the type tag of the event, and the JSON object carried by the
/// data attribute is flattened into the event attributes.
fn chain_events(results: BlockResults, category: &str) -> Result<Vec<ChainEvent>, ProviderError> {
    results
        .txs_results
        .unwrap_or_default()
        .into_iter()
        .flat_map(|tx| tx.events)
        .filter(|event| event.kind == category)
        .map(|event| {
            let mut attributes: BTreeMap<_, _> = event
                .attributes
                .into_iter()
                .map(|attribute| (attribute.key, attribute.value.unwrap_or_default()))
                .collect();
            let type_tag = attributes.remove(TYPE_TAG_ATTRIBUTE).unwrap_or_default();

            if let Some(data) = attributes.remove(DATA_ATTRIBUTE) {
                let value = serde_json::from_str::<serde_json::Value>(&data).map_err(|_| {
                    ProviderError::InvalidField { field: DATA_ATTRIBUTE, value: data.clone() }
                })?;
                let serde_json::Value::Object(fields) = value else {
                    return Err(ProviderError::InvalidField { field: DATA_ATTRIBUTE, value: data })
                };
                for (key, value) in fields {
                    let value = match value {
                        serde_json::Value::String(value) => value,
                        other => other.to_string(),
                    };
                    attributes.insert(key, value);
                }
            }

            Ok(ChainEvent { type_tag, attributes })
        })
        .collect()
}
