use alloy_primitives::B256;
use opbridge_primitives::Coin;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a bridged token.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coin")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    l1_metadata: Vec<u8>,
    l2_denom: Option<String>,
    is_checked: bool,
}

/// The relation for the coin model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the coin model.
impl ActiveModelBehavior for ActiveModel {}

impl From<Coin> for ActiveModel {
    fn from(coin: Coin) -> Self {
        Self {
            l1_metadata: ActiveValue::Set(coin.l1_metadata.to_vec()),
            l2_denom: ActiveValue::Set(coin.l2_denom),
            is_checked: ActiveValue::Set(coin.is_checked),
        }
    }
}

impl From<Model> for Coin {
    fn from(value: Model) -> Self {
        Self {
            l1_metadata: B256::from_slice(&value.l1_metadata),
            l2_denom: value.l2_denom,
            is_checked: value.is_checked,
        }
    }
}
