use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    IntoActiveModel, PrimaryKeyTrait, QueryOrder,
};

use super::base_traits::{HasIdColumn, TimestampedActiveModel};
use super::error::{StoreError, StoreResult};

type ModelOf<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
type ActiveModelOf<D> = <<D as DaoBase>::Entity as EntityTrait>::ActiveModel;

/// Single-table CRUD over an entity with an integer primary key and
/// `created_at`/`updated_at` columns maintained here rather than by callers.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TimestampedActiveModel
        + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i32> + Send + Sync,
    Self::Entity: HasIdColumn,
{
    type Entity: EntityTrait + Send + Sync;
    /// Entity name used in not-found errors.
    const NAME: &'static str;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    async fn create(
        &self,
        data: impl IntoActiveModel<ActiveModelOf<Self>> + Send,
    ) -> StoreResult<ModelOf<Self>> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_created_at(now);
        active.set_updated_at(now);
        Ok(active.insert(self.db()).await?)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<ModelOf<Self>> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| StoreError::not_found(Self::NAME, id))
    }

    async fn find_all(&self) -> StoreResult<Vec<ModelOf<Self>>> {
        Ok(Self::Entity::find()
            .order_by_asc(Self::Entity::id_column())
            .all(self.db())
            .await?)
    }

    async fn update<F>(&self, id: i32, apply: F) -> StoreResult<ModelOf<Self>>
    where
        F: for<'a> FnOnce(&'a mut ActiveModelOf<Self>) + Send,
    {
        let model = self.find_by_id(id).await?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        // the row can vanish between the read and the write
        active.update(self.db()).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => StoreError::not_found(Self::NAME, id),
            other => StoreError::Db(other),
        })
    }

    async fn delete(&self, id: i32) -> StoreResult<i32> {
        let result = Self::Entity::delete_by_id(id).exec(self.db()).await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(Self::NAME, id));
        }

        Ok(id)
    }
}
