use alloy_primitives::B256;
use opbridge_primitives::Output;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents an output.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "output")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    index: i64,
    output_root: Vec<u8>,
    state_root: Vec<u8>,
    storage_root: Vec<u8>,
    l2_block_hash: Vec<u8>,
    l2_block_height: i64,
    timestamp: i64,
    start_height: i64,
    end_height: i64,
}

/// The relation for the output model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the output model.
impl ActiveModelBehavior for ActiveModel {}

impl From<Output> for ActiveModel {
    fn from(output: Output) -> Self {
        Self {
            index: ActiveValue::Set(output.index.try_into().expect("index should fit in i64")),
            output_root: ActiveValue::Set(output.output_root.to_vec()),
            state_root: ActiveValue::Set(output.state_root.to_vec()),
            storage_root: ActiveValue::Set(output.storage_root.to_vec()),
            l2_block_hash: ActiveValue::Set(output.l2_block_hash.to_vec()),
            l2_block_height: ActiveValue::Set(
                output.l2_block_height.try_into().expect("block height should fit in i64"),
            ),
            timestamp: ActiveValue::Set(
                output.timestamp.try_into().expect("timestamp should fit in i64"),
            ),
            start_height: ActiveValue::Set(
                output.start_height.try_into().expect("block height should fit in i64"),
            ),
            end_height: ActiveValue::Set(
                output.end_height.try_into().expect("block height should fit in i64"),
            ),
        }
    }
}

impl From<Model> for Output {
    fn from(value: Model) -> Self {
        Self {
            index: value.index as u64,
            output_root: B256::from_slice(&value.output_root),
            state_root: B256::from_slice(&value.state_root),
            storage_root: B256::from_slice(&value.storage_root),
            l2_block_hash: B256::from_slice(&value.l2_block_hash),
            l2_block_height: value.l2_block_height as u64,
            timestamp: value.timestamp as u64,
            start_height: value.start_height as u64,
            end_height: value.end_height as u64,
        }
    }
}
