use super::m20250612_092033_add_withdrawal_tx_table::WithdrawalTx;
use sea_orm_migration::prelude::*;

const INDEX_NAME: &str = "idx_withdrawal_tx_output_index";

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        tracing::info!(target: "opbridge::migration", "Creating index on withdrawal_tx.output_index.");
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(WithdrawalTx::Table)
                    .col(WithdrawalTx::OutputIndex)
                    .col(WithdrawalTx::Sequence)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEX_NAME).table(WithdrawalTx::Table).to_owned())
            .await
    }
}
