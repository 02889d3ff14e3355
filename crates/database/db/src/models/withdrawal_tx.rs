use crate::DatabaseError;
use alloy_primitives::{Address, B256};
use opbridge_primitives::{ProofStep, WithdrawalTx};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a withdrawal transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "withdrawal_tx")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    sequence: i64,
    sender: Vec<u8>,
    receiver: Vec<u8>,
    amount: String,
    bridge_id: String,
    metadata: Vec<u8>,
    output_index: i64,
    merkle_root: Option<Vec<u8>>,
    merkle_proof: Vec<u8>,
}

/// The relation for the withdrawal transaction model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the withdrawal transaction model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<WithdrawalTx> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(tx: WithdrawalTx) -> Result<Self, Self::Error> {
        let sequence: i64 = tx.sequence.try_into().map_err(|_| {
            DatabaseError::InvalidData(format!("withdrawal sequence {} out of range", tx.sequence))
        })?;
        let output_index: i64 = tx.output_index.try_into().map_err(|_| {
            DatabaseError::InvalidData(format!("output index {} out of range", tx.output_index))
        })?;

        Ok(Self {
            sequence: ActiveValue::Set(sequence),
            sender: ActiveValue::Set(tx.sender.to_vec()),
            receiver: ActiveValue::Set(tx.receiver.to_vec()),
            amount: ActiveValue::Set(tx.amount.to_string()),
            bridge_id: ActiveValue::Set(tx.bridge_id),
            metadata: ActiveValue::Set(tx.metadata.to_vec()),
            output_index: ActiveValue::Set(output_index),
            merkle_root: ActiveValue::Set(tx.merkle_root.map(|root| root.to_vec())),
            merkle_proof: ActiveValue::Set(ProofStep::encode_proof(&tx.merkle_proof)),
        })
    }
}

impl TryFrom<Model> for WithdrawalTx {
    type Error = DatabaseError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            sequence: value.sequence as u64,
            sender: Address::from_slice(&value.sender),
            receiver: Address::from_slice(&value.receiver),
            amount: value.amount.parse().map_err(|_| {
                DatabaseError::InvalidData(format!("withdrawal amount {}", value.amount))
            })?,
            bridge_id: value.bridge_id,
            metadata: B256::from_slice(&value.metadata),
            output_index: value.output_index as u64,
            merkle_root: value.merkle_root.map(|root| B256::from_slice(&root)),
            merkle_proof: ProofStep::decode_proof(&value.merkle_proof)?,
        })
    }
}
