use opbridge_primitives::SyncState;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents the synced height of a monitor.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    name: String,
    height: i64,
}

/// The relation for the sync state model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the sync state model.
impl ActiveModelBehavior for ActiveModel {}

impl From<SyncState> for ActiveModel {
    fn from(state: SyncState) -> Self {
        Self {
            name: ActiveValue::Set(state.name),
            height: ActiveValue::Set(state.height.try_into().expect("height should fit in i64")),
        }
    }
}

impl From<Model> for SyncState {
    fn from(value: Model) -> Self {
        Self { name: value.name, height: value.height as u64 }
    }
}
