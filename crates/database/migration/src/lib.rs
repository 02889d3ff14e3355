pub use sea_orm_migration::prelude::*;

mod m20250612_091204_add_sync_state_table;
mod m20250612_091517_add_coin_table;
mod m20250612_092033_add_withdrawal_tx_table;
mod m20250612_093341_add_output_table;
mod m20250703_140522_add_withdrawal_output_index;

/// The migrator for the bridge executor database.
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250612_091204_add_sync_state_table::Migration),
            Box::new(m20250612_091517_add_coin_table::Migration),
            Box::new(m20250612_092033_add_withdrawal_tx_table::Migration),
            Box::new(m20250612_093341_add_output_table::Migration),
            Box::new(m20250703_140522_add_withdrawal_output_index::Migration),
        ]
    }
}
