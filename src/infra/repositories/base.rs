//! Generic CRUD base shared by all repositories.
//!
//! `BaseRepository<E, A>` covers the operations every table needs. The
//! create and update slots are supplied per call: anything that converts
//! into the active model can be inserted, and anything implementing
//! [`ApplyChanges`] can be applied as a partial update.

use std::fmt::Debug;
use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, Order, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr,
};

use crate::errors::{AppError, AppResult};

/// Partial update schema: writes only the fields it carries.
pub trait ApplyChanges<A> {
    fn apply_to(self, active: &mut A);
}

/// CRUD operations over entity `E` with active model `A`
pub struct BaseRepository<E, A> {
    db: DatabaseConnection,
    label: &'static str,
    _marker: PhantomData<fn() -> (E, A)>,
}

impl<E, A> Clone for BaseRepository<E, A> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            label: self.label,
            _marker: PhantomData,
        }
    }
}

impl<E, A> BaseRepository<E, A>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A> + Send + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    /// `label` names the entity in logs and conflict errors.
    pub fn new(db: DatabaseConnection, label: &'static str) -> Self {
        Self {
            db,
            label,
            _marker: PhantomData,
        }
    }

    /// Get database connection reference
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<E::Model>> {
        tracing::debug!(entity = self.label, id, "Fetching by id");
        let row = E::find_by_id(id).one(&self.db).await?;
        if row.is_none() {
            tracing::debug!(entity = self.label, id, "Not found");
        }
        Ok(row)
    }

    /// First row matching every filter in `condition`
    pub async fn get_first_by(&self, condition: Condition) -> AppResult<Option<E::Model>> {
        tracing::debug!(entity = self.label, ?condition, "Fetching first by filter");
        Ok(E::find().filter(condition).one(&self.db).await?)
    }

    pub async fn get_multi(&self, skip: u64, limit: u64) -> AppResult<Vec<E::Model>> {
        tracing::debug!(entity = self.label, skip, limit, "Fetching page");
        let rows = E::find().offset(skip).limit(limit).all(&self.db).await?;
        tracing::debug!(entity = self.label, found = rows.len(), "Page fetched");
        Ok(rows)
    }

    /// Filtered page, ordered by `order_by` in the given sequence
    pub async fn get_multi_by(
        &self,
        condition: Condition,
        skip: u64,
        limit: u64,
        order_by: &[(E::Column, Order)],
    ) -> AppResult<Vec<E::Model>> {
        tracing::debug!(
            entity = self.label,
            ?condition,
            skip,
            limit,
            ?order_by,
            "Fetching filtered page"
        );

        let mut query = E::find().filter(condition);
        for (column, order) in order_by {
            query = query.order_by(*column, order.clone());
        }

        let rows = query.offset(skip).limit(limit).all(&self.db).await?;
        tracing::debug!(entity = self.label, found = rows.len(), "Filtered page fetched");
        Ok(rows)
    }

    pub async fn count_by(&self, condition: Condition) -> AppResult<u64> {
        tracing::debug!(entity = self.label, ?condition, "Counting");
        Ok(E::find().filter(condition).count(&self.db).await?)
    }

    pub async fn create<C>(&self, data: C) -> AppResult<E::Model>
    where
        C: IntoActiveModel<A> + Debug,
    {
        tracing::debug!(entity = self.label, ?data, "Creating");
        let model = data
            .into_active_model()
            .insert(&self.db)
            .await
            .map_err(|e| self.map_write_error(e))?;
        tracing::info!(entity = self.label, "Created");
        Ok(model)
    }

    /// Apply a partial update to a loaded row
    pub async fn update<U>(&self, row: E::Model, changes: U) -> AppResult<E::Model>
    where
        U: ApplyChanges<A> + Debug,
    {
        tracing::debug!(entity = self.label, ?changes, "Updating");
        let mut active: A = row.into_active_model();
        changes.apply_to(&mut active);
        let model = active
            .update(&self.db)
            .await
            .map_err(|e| self.map_write_error(e))?;
        tracing::info!(entity = self.label, "Updated");
        Ok(model)
    }

    pub async fn delete(&self, row: E::Model) -> AppResult<()> {
        tracing::debug!(entity = self.label, "Deleting");
        let active: A = row.into_active_model();
        active.delete(&self.db).await?;
        Ok(())
    }

    /// Load by id and delete; `None` when there was nothing to delete
    pub async fn remove(&self, id: i32) -> AppResult<Option<E::Model>> {
        tracing::debug!(entity = self.label, id, "Removing");
        match self.get_by_id(id).await? {
            Some(row) => {
                self.delete(row.clone()).await?;
                tracing::debug!(entity = self.label, id, "Removed");
                Ok(Some(row))
            }
            None => {
                tracing::warn!(entity = self.label, id, "Nothing to remove");
                Ok(None)
            }
        }
    }

    fn map_write_error(&self, err: DbErr) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(self.label),
            _ => AppError::from(err),
        }
    }
}
