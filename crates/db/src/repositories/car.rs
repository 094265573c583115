//! Car repository backing the core resource service.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use carlot_core::attachment::AttachmentList;
use carlot_core::resource::{Car, NewCar, Resource, ResourceError, ResourceRepository};

use super::{repository_error, stored_images};
use crate::entities::cars;

/// Car repository implementation.
#[derive(Debug, Clone)]
pub struct CarRepository {
    db: DatabaseConnection,
}

impl CarRepository {
    /// Create a new car repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ResourceRepository for CarRepository {
    type Resource = Car;
    type Draft = NewCar;

    async fn insert(
        &self,
        owner: Option<Uuid>,
        draft: NewCar,
        images: AttachmentList,
    ) -> Result<Car, ResourceError> {
        let owner_id = owner.ok_or_else(|| ResourceError::repository("car requires an owner"))?;
        let now = Utc::now().into();

        let model = cars::ActiveModel {
            id: Set(Uuid::now_v7()),
            owner_id: Set(owner_id),
            title: Set(draft.title),
            description: Set(draft.description),
            tags: Set(draft.tags),
            images: Set(images.to_strings()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(repository_error)?;

        to_domain(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, ResourceError> {
        cars::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repository_error)?
            .map(to_domain)
            .transpose()
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<Car>, ResourceError> {
        let mut query = cars::Entity::find();
        if let Some(owner_id) = owner {
            query = query.filter(cars::Column::OwnerId.eq(owner_id));
        }

        query
            .order_by_desc(cars::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repository_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn update(&self, car: &Car) -> Result<Car, ResourceError> {
        let model = cars::ActiveModel {
            id: Set(car.id),
            title: Set(car.title.clone()),
            description: Set(car.description.clone()),
            tags: Set(car.tags.clone()),
            images: Set(car.images.to_strings()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => ResourceError::not_found(Car::NAME, car.id),
            other => repository_error(other),
        })?;

        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ResourceError> {
        let result = cars::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repository_error)?;

        Ok(result.rows_affected > 0)
    }
}

fn to_domain(model: cars::Model) -> Result<Car, ResourceError> {
    Ok(Car {
        id: model.id,
        owner_id: model.owner_id,
        title: model.title,
        description: model.description,
        tags: model.tags,
        images: stored_images(model.images)?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
