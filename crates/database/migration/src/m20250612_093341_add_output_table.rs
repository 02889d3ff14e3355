use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Output::Table)
                    .if_not_exists()
                    .col(big_integer(Output::Index).primary_key())
                    .col(binary_len(Output::OutputRoot, HASH_LENGTH))
                    .col(binary_len(Output::StateRoot, HASH_LENGTH))
                    .col(binary_len(Output::StorageRoot, HASH_LENGTH))
                    .col(binary_len(Output::L2BlockHash, HASH_LENGTH))
                    .col(big_integer(Output::L2BlockHeight))
                    .col(big_integer(Output::Timestamp))
                    .col(big_integer(Output::StartHeight))
                    .col(big_integer(Output::EndHeight))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Output::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Output {
    Table,
    Index,
    OutputRoot,
    StateRoot,
    StorageRoot,
    L2BlockHash,
    L2BlockHeight,
    Timestamp,
    StartHeight,
    EndHeight,
}
