use sea_orm_migration::{prelude::*, schema::*};

const ADDRESS_LENGTH: u32 = 20;
const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WithdrawalTx::Table)
                    .if_not_exists()
                    .col(big_integer(WithdrawalTx::Sequence).primary_key())
                    .col(binary_len(WithdrawalTx::Sender, ADDRESS_LENGTH))
                    .col(binary_len(WithdrawalTx::Receiver, ADDRESS_LENGTH))
                    .col(text(WithdrawalTx::Amount))
                    .col(string(WithdrawalTx::BridgeId))
                    .col(binary_len(WithdrawalTx::Metadata, HASH_LENGTH))
                    .col(big_integer(WithdrawalTx::OutputIndex))
                    .col(binary_len_null(WithdrawalTx::MerkleRoot, HASH_LENGTH))
                    .col(binary(WithdrawalTx::MerkleProof))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WithdrawalTx::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum WithdrawalTx {
    Table,
    Sequence,
    Sender,
    Receiver,
    Amount,
    BridgeId,
    Metadata,
    OutputIndex,
    MerkleRoot,
    MerkleProof,
}
