use alloy_primitives::{Address, B256};
use std::{collections::BTreeMap, str::FromStr};

/// The category of chain events emitted by the bridge module.
pub const BRIDGE_EVENT_CATEGORY: &str = "move";

/// The type tag of the event emitted when a withdrawal is initiated on the L2.
pub const TOKEN_BRIDGE_INITIATED_EVENT_TAG: &str = "0x1::op_bridge::TokenBridgeInitiatedEvent";

/// The type tag of the event emitted when a token is registered on the L2.
pub const TOKEN_REGISTERED_EVENT_TAG: &str = "0x1::op_bridge::TokenRegisteredEvent";

/// The highest withdrawal sequence the executor can persist.
pub const MAX_WITHDRAWAL_SEQUENCE: u64 = i64::MAX as u64;

/// A raw event emitted by the L2, as returned by the chain data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainEvent {
    /// The type tag of the event.
    pub type_tag: String,
    /// The flattened event attributes.
    pub attributes: BTreeMap<String, String>,
}

impl ChainEvent {
    /// Returns a new [`ChainEvent`] from its type tag and attributes.
    pub fn new<K, V>(type_tag: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            type_tag: type_tag.into(),
            attributes: attributes.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    fn attribute(&self, key: &'static str) -> Result<&str, EventDecodeError> {
        self.attributes.get(key).map(String::as_str).ok_or(EventDecodeError::MissingAttribute(key))
    }

    fn parse_sequence(&self, key: &'static str) -> Result<u64, EventDecodeError> {
        let sequence: u64 = self.parse(key)?;
        if sequence > MAX_WITHDRAWAL_SEQUENCE {
            return Err(EventDecodeError::InvalidAttribute { key, value: sequence.to_string() })
        }
        Ok(sequence)
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<T, EventDecodeError> {
        let value = self.attribute(key)?;
        value
            .parse()
            .map_err(|_| EventDecodeError::InvalidAttribute { key, value: value.to_owned() })
    }
}

/// A withdrawal initiated on the L2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalInitiated {
    /// The L2 sequence of the withdrawal.
    pub sequence: u64,
    /// The L2 sender.
    pub sender: Address,
    /// The L1 receiver.
    pub receiver: Address,
    /// The withdrawn amount.
    pub amount: u64,
    /// The L1 metadata of the withdrawn token.
    pub metadata: B256,
}

/// A token registered on the L2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistered {
    /// The L1 metadata of the token, when the event carries it.
    pub l1_metadata: Option<B256>,
    /// The L2 denomination of the token.
    pub l2_denom: String,
}

/// The bridge events the executor reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A withdrawal was initiated.
    WithdrawalInitiated(WithdrawalInitiated),
    /// A token was registered.
    TokenRegistered(TokenRegistered),
    /// An event with an unrecognized type tag.
    Unknown(String),
}

impl TryFrom<&ChainEvent> for BridgeEvent {
    type Error = EventDecodeError;

    fn try_from(event: &ChainEvent) -> Result<Self, Self::Error> {
        match event.type_tag.as_str() {
            TOKEN_BRIDGE_INITIATED_EVENT_TAG => Ok(Self::WithdrawalInitiated(WithdrawalInitiated {
                sequence: event.parse_sequence("l2_sequence")?,
                sender: event.parse("from")?,
                receiver: event.parse("to")?,
                amount: event.parse("amount")?,
                metadata: event.parse("metadata")?,
            })),
            TOKEN_REGISTERED_EVENT_TAG => {
                let l2_denom = event
                    .attribute("l2_denom")
                    .or_else(|_| event.attribute("symbol"))?
                    .to_owned();
                let l1_metadata = match event
                    .attributes
                    .get("l1_metadata")
                    .or_else(|| event.attributes.get("metadata"))
                {
                    Some(value) => Some(value.parse().map_err(|_| {
                        EventDecodeError::InvalidAttribute {
                            key: "l1_metadata",
                            value: value.clone(),
                        }
                    })?),
                    None => None,
                };
                Ok(Self::TokenRegistered(TokenRegistered { l1_metadata, l2_denom }))
            }
            other => Ok(Self::Unknown(other.to_owned())),
        }
    }
}

/// An error decoding a recognized bridge event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventDecodeError {
    /// A required attribute is missing.
    #[error("missing event attribute {0}")]
    MissingAttribute(&'static str),
    /// An attribute failed to parse.
    #[error("invalid event attribute {key}: {value}")]
    InvalidAttribute {
        /// The attribute key.
        key: &'static str,
        /// The raw attribute value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    fn withdrawal_event() -> ChainEvent {
        ChainEvent::new(
            TOKEN_BRIDGE_INITIATED_EVENT_TAG,
            [
                ("l2_sequence", "7"),
                ("from", "0x00000000000000000000000000000000000000aa"),
                ("to", "0x00000000000000000000000000000000000000bb"),
                ("amount", "1000"),
                ("metadata", "0x0101010101010101010101010101010101010101010101010101010101010101"),
            ],
        )
    }

    #[test]
    fn test_should_decode_withdrawal_initiated() {
        let event = BridgeEvent::try_from(&withdrawal_event()).unwrap();
        assert_eq!(
            event,
            BridgeEvent::WithdrawalInitiated(WithdrawalInitiated {
                sequence: 7,
                sender: address!("0x00000000000000000000000000000000000000aa"),
                receiver: address!("0x00000000000000000000000000000000000000bb"),
                amount: 1000,
                metadata: b256!(
                    "0x0101010101010101010101010101010101010101010101010101010101010101"
                ),
            })
        );
    }

    #[test]
    fn test_should_fail_on_malformed_withdrawal() {
        let mut event = withdrawal_event();
        event.attributes.remove("amount");
        assert_eq!(
            BridgeEvent::try_from(&event),
            Err(EventDecodeError::MissingAttribute("amount"))
        );

        let mut event = withdrawal_event();
        event.attributes.insert("l2_sequence".into(), u64::MAX.to_string());
        assert_eq!(
            BridgeEvent::try_from(&event),
            Err(EventDecodeError::InvalidAttribute {
                key: "l2_sequence",
                value: u64::MAX.to_string()
            })
        );

        let mut event = withdrawal_event();
        event.attributes.insert("l2_sequence".into(), "seven".into());
        assert_eq!(
            BridgeEvent::try_from(&event),
            Err(EventDecodeError::InvalidAttribute { key: "l2_sequence", value: "seven".into() })
        );
    }

    #[test]
    fn test_should_decode_token_registered() {
        let legacy = ChainEvent::new(TOKEN_REGISTERED_EVENT_TAG, [("symbol", "uusdc")]);
        assert_eq!(
            BridgeEvent::try_from(&legacy).unwrap(),
            BridgeEvent::TokenRegistered(TokenRegistered {
                l1_metadata: None,
                l2_denom: "uusdc".into()
            })
        );

        let with_metadata = ChainEvent::new(
            TOKEN_REGISTERED_EVENT_TAG,
            [
                ("l2_denom", "l2/abcd"),
                (
                    "l1_metadata",
                    "0x0202020202020202020202020202020202020202020202020202020202020202",
                ),
            ],
        );
        assert_eq!(
            BridgeEvent::try_from(&with_metadata).unwrap(),
            BridgeEvent::TokenRegistered(TokenRegistered {
                l1_metadata: Some(b256!(
                    "0x0202020202020202020202020202020202020202020202020202020202020202"
                )),
                l2_denom: "l2/abcd".into(),
            })
        );
    }

    #[test]
    fn test_should_ignore_unknown_events() {
        let event = ChainEvent::new("0x1::coin::DepositEvent", [("amount", "1")]);
        assert_eq!(
            BridgeEvent::try_from(&event).unwrap(),
            BridgeEvent::Unknown("0x1::coin::DepositEvent".into())
        );
    }
}
