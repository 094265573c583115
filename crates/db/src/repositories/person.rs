//! People repository backing the core resource service.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use carlot_core::attachment::AttachmentList;
use carlot_core::resource::{NewPerson, Person, Resource, ResourceError, ResourceRepository};

use super::{repository_error, stored_images};
use crate::entities::people;

/// People repository implementation. Records have no owner.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    db: DatabaseConnection,
}

impl PersonRepository {
    /// Create a new people repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ResourceRepository for PersonRepository {
    type Resource = Person;
    type Draft = NewPerson;

    async fn insert(
        &self,
        _owner: Option<Uuid>,
        draft: NewPerson,
        images: AttachmentList,
    ) -> Result<Person, ResourceError> {
        let now = Utc::now().into();

        let model = people::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(draft.name),
            phone: Set(draft.phone),
            email: Set(draft.email),
            images: Set(images.to_strings()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(repository_error)?;

        to_domain(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, ResourceError> {
        people::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repository_error)?
            .map(to_domain)
            .transpose()
    }

    async fn list(&self, _owner: Option<Uuid>) -> Result<Vec<Person>, ResourceError> {
        people::Entity::find()
            .order_by_desc(people::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repository_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn update(&self, person: &Person) -> Result<Person, ResourceError> {
        let model = people::ActiveModel {
            id: Set(person.id),
            name: Set(person.name.clone()),
            phone: Set(person.phone.clone()),
            email: Set(person.email.clone()),
            images: Set(person.images.to_strings()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => ResourceError::not_found(Person::NAME, person.id),
            other => repository_error(other),
        })?;

        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ResourceError> {
        let result = people::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repository_error)?;

        Ok(result.rows_affected > 0)
    }
}

fn to_domain(model: people::Model) -> Result<Person, ResourceError> {
    Ok(Person {
        id: model.id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        images: stored_images(model.images)?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
