use sea_orm_migration::{prelude::*, schema::*};

const METADATA_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coin::Table)
                    .if_not_exists()
                    .col(binary_len(Coin::L1Metadata, METADATA_LENGTH).primary_key())
                    .col(string_null(Coin::L2Denom))
                    .col(boolean(Coin::IsChecked).default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Coin::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Coin {
    Table,
    L1Metadata,
    L2Denom,
    IsChecked,
}
