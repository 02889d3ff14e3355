/// An error occurring at the L2 RPC provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Error at the HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Error returned by the RPC node.
    #[error("rpc error {code}: {message} {data:?}")]
    Rpc {
        /// The JSON-RPC error code.
        code: i64,
        /// The error message.
        message: String,
        /// The additional error data.
        data: Option<String>,
    },
    /// The response of the RPC node is empty.
    #[error("empty rpc response for {0}")]
    EmptyResponse(&'static str),
    /// A field of the response could not be decoded.
    #[error("invalid {field} in rpc response: {value}")]
    InvalidField {
        /// The decoded field.
        field: &'static str,
        /// The raw value.
        value: String,
    },
}

impl ProviderError {
    /// Returns true if the error signals that the requested height is not available on the node
    /// yet.
    pub fn is_height_unavailable(&self) -> bool {
        let Self::Rpc { message, data, .. } = self else { return false };
        [Some(message), data.as_ref()].into_iter().flatten().any(|text| {
            text.contains("must be less than or equal to the current blockchain height") ||
                text.contains("could not find results for height")
        })
    }
}
