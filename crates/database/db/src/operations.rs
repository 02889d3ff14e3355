use super::{models, DatabaseError};
use crate::DatabaseConnectionProvider;

use alloy_primitives::B256;
use opbridge_primitives::{Coin, Output, SyncState, WithdrawalTx};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// The [`DatabaseOperations`] trait provides methods for interacting with the database.
///
/// All operations run against the connection returned by
/// [`DatabaseConnectionProvider::get_connection`], so calling them on a
/// [`crate::DatabaseTransaction`] makes them part of that transaction.
#[async_trait::async_trait]
pub trait DatabaseOperations: DatabaseConnectionProvider {
    /// Returns the synced height of the monitor with the provided name, creating its state at
    /// height 0 if absent.
    async fn get_synced_height(&self, name: &str) -> Result<u64, DatabaseError> {
        if let Some(state) =
            models::sync_state::Entity::find_by_id(name).one(self.get_connection()).await?
        {
            return Ok(SyncState::from(state).height)
        }

        tracing::trace!(target: "opbridge::db", monitor = name, "Initializing sync state.");
        let state: models::sync_state::ActiveModel =
            SyncState { name: name.to_owned(), height: 0 }.into();
        models::sync_state::Entity::insert(state)
            .on_conflict(OnConflict::column(models::sync_state::Column::Name).do_nothing().to_owned())
            .exec_without_returning(self.get_connection())
            .await?;
        Ok(self.get_sync_state(name).await?.map(|state| state.height).unwrap_or_default())
    }

    /// Returns the [`SyncState`] of the monitor with the provided name, if any.
    async fn get_sync_state(&self, name: &str) -> Result<Option<SyncState>, DatabaseError> {
        Ok(models::sync_state::Entity::find_by_id(name)
            .one(self.get_connection())
            .await
            .map(|x| x.map(Into::into))?)
    }

    /// Sets the synced height of the monitor with the provided name.
    async fn set_synced_height(&self, name: &str, height: u64) -> Result<(), DatabaseError> {
        tracing::trace!(target: "opbridge::db", monitor = name, height, "Updating synced height.");
        let state: models::sync_state::ActiveModel =
            SyncState { name: name.to_owned(), height }.into();
        Ok(models::sync_state::Entity::insert(state)
            .on_conflict(
                OnConflict::column(models::sync_state::Column::Name)
                    .update_column(models::sync_state::Column::Height)
                    .to_owned(),
            )
            .exec(self.get_connection())
            .await
            .map(|_| ())?)
    }

    /// Returns the index of the last output, or 0 if no output exists.
    async fn last_output_index(&self) -> Result<u64, DatabaseError> {
        Ok(models::output::Entity::find()
            .order_by_desc(models::output::Column::Index)
            .select_only()
            .column(models::output::Column::Index)
            .into_tuple::<i64>()
            .one(self.get_connection())
            .await?
            .map(|index| index as u64)
            .unwrap_or_default())
    }

    /// Returns the checkpoint height of the last output, i.e. the first L2 height it covers, or
    /// [`None`] if no output exists.
    async fn last_checkpoint_height(&self) -> Result<Option<u64>, DatabaseError> {
        Ok(models::output::Entity::find()
            .order_by_desc(models::output::Column::Index)
            .select_only()
            .column(models::output::Column::StartHeight)
            .into_tuple::<i64>()
            .one(self.get_connection())
            .await?
            .map(|height| height as u64))
    }

    /// Insert or update an [`Output`], keyed by its index.
    async fn upsert_output(&self, output: Output) -> Result<(), DatabaseError> {
        tracing::trace!(target: "opbridge::db", index = output.index, storage_root = ?output.storage_root, "Upserting output.");
        let output: models::output::ActiveModel = output.into();
        Ok(models::output::Entity::insert(output)
            .on_conflict(
                OnConflict::column(models::output::Column::Index)
                    .update_columns([
                        models::output::Column::OutputRoot,
                        models::output::Column::StateRoot,
                        models::output::Column::StorageRoot,
                        models::output::Column::L2BlockHash,
                        models::output::Column::L2BlockHeight,
                        models::output::Column::Timestamp,
                        models::output::Column::StartHeight,
                        models::output::Column::EndHeight,
                    ])
                    .to_owned(),
            )
            .exec(self.get_connection())
            .await
            .map(|_| ())?)
    }

    /// Get an [`Output`] by its index.
    async fn get_output(&self, index: u64) -> Result<Option<Output>, DatabaseError> {
        Ok(models::output::Entity::find_by_id(index as i64)
            .one(self.get_connection())
            .await
            .map(|x| x.map(Into::into))?)
    }

    /// Returns all [`Output`]s with an index greater or equal to the provided one, in index
    /// order.
    async fn get_outputs_from(&self, index: u64) -> Result<Vec<Output>, DatabaseError> {
        Ok(models::output::Entity::find()
            .filter(models::output::Column::Index.gte(index as i64))
            .order_by_asc(models::output::Column::Index)
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Insert or update a [`Coin`], keyed by its L1 metadata.
    async fn upsert_coin(&self, coin: Coin) -> Result<(), DatabaseError> {
        tracing::trace!(target: "opbridge::db", metadata = ?coin.l1_metadata, "Upserting coin.");
        let coin: models::coin::ActiveModel = coin.into();
        Ok(models::coin::Entity::insert(coin)
            .on_conflict(
                OnConflict::column(models::coin::Column::L1Metadata)
                    .update_columns([models::coin::Column::L2Denom, models::coin::Column::IsChecked])
                    .to_owned(),
            )
            .exec(self.get_connection())
            .await
            .map(|_| ())?)
    }

    /// Get a [`Coin`] by its L1 metadata.
    async fn find_coin(&self, metadata: B256) -> Result<Option<Coin>, DatabaseError> {
        Ok(models::coin::Entity::find_by_id(metadata.to_vec())
            .one(self.get_connection())
            .await
            .map(|x| x.map(Into::into))?)
    }

    /// Marks the coins with the provided L2 denomination as checked. Returns the number of
    /// updated coins.
    async fn mark_coin_checked(&self, l2_denom: &str) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "opbridge::db", l2_denom, "Marking coin as checked.");
        Ok(models::coin::Entity::update_many()
            .col_expr(models::coin::Column::IsChecked, Expr::value(true))
            .filter(models::coin::Column::L2Denom.eq(l2_denom))
            .exec(self.get_connection())
            .await?
            .rows_affected)
    }

    /// Sets the L2 denomination of the coin with the provided L1 metadata and marks it as
    /// checked. Returns the number of updated coins.
    async fn register_coin_denom(
        &self,
        metadata: B256,
        l2_denom: &str,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "opbridge::db", ?metadata, l2_denom, "Registering coin denomination.");
        Ok(models::coin::Entity::update_many()
            .col_expr(models::coin::Column::L2Denom, Expr::value(l2_denom.to_owned()))
            .col_expr(models::coin::Column::IsChecked, Expr::value(true))
            .filter(models::coin::Column::L1Metadata.eq(metadata.to_vec()))
            .exec(self.get_connection())
            .await?
            .rows_affected)
    }

    /// Insert or update a [`WithdrawalTx`], keyed by its sequence.
    async fn upsert_withdrawal(&self, tx: WithdrawalTx) -> Result<(), DatabaseError> {
        tracing::trace!(target: "opbridge::db", sequence = tx.sequence, output_index = tx.output_index, "Upserting withdrawal.");
        let tx: models::withdrawal_tx::ActiveModel = tx.try_into()?;
        Ok(models::withdrawal_tx::Entity::insert(tx)
            .on_conflict(
                OnConflict::column(models::withdrawal_tx::Column::Sequence)
                    .update_columns([
                        models::withdrawal_tx::Column::Sender,
                        models::withdrawal_tx::Column::Receiver,
                        models::withdrawal_tx::Column::Amount,
                        models::withdrawal_tx::Column::BridgeId,
                        models::withdrawal_tx::Column::Metadata,
                        models::withdrawal_tx::Column::OutputIndex,
                        models::withdrawal_tx::Column::MerkleRoot,
                        models::withdrawal_tx::Column::MerkleProof,
                    ])
                    .to_owned(),
            )
            .exec(self.get_connection())
            .await
            .map(|_| ())?)
    }

    /// Get a [`WithdrawalTx`] by its sequence.
    async fn get_withdrawal(&self, sequence: u64) -> Result<Option<WithdrawalTx>, DatabaseError> {
        models::withdrawal_tx::Entity::find_by_id(sequence as i64)
            .one(self.get_connection())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Returns the withdrawals pending in the output following `since_output_index`, in
    /// sequence order.
    async fn pending_withdrawals(
        &self,
        since_output_index: u64,
    ) -> Result<Vec<WithdrawalTx>, DatabaseError> {
        let output_index = since_output_index.saturating_add(1) as i64;
        models::withdrawal_tx::Entity::find()
            .filter(models::withdrawal_tx::Column::OutputIndex.eq(output_index))
            .order_by_asc(models::withdrawal_tx::Column::Sequence)
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    /// Deletes every row of the database. Only meant for bridge bootstrap or reset.
    async fn clear_all(&self) -> Result<(), DatabaseError> {
        tracing::warn!(target: "opbridge::db", "Clearing all executor data.");
        models::withdrawal_tx::Entity::delete_many().exec(self.get_connection()).await?;
        models::output::Entity::delete_many().exec(self.get_connection()).await?;
        models::coin::Entity::delete_many().exec(self.get_connection()).await?;
        models::sync_state::Entity::delete_many().exec(self.get_connection()).await?;
        Ok(())
    }
}

impl<T> DatabaseOperations for T where T: DatabaseConnectionProvider {}
