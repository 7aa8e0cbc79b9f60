//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::{DomainError, User, UserRepository};
use crate::models::user::{self, ActiveModel, Entity as UserEntity};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn ensure(&self, username: &str) -> Result<User, DomainError> {
        if let Some(existing) = self.find_by_username(username).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let new_user = ActiveModel {
            username: Set(username.to_string()),
            display_name: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match new_user.insert(&self.db).await {
            Ok(model) => {
                tracing::info!("Created user '{}' (id {})", model.username, model.id);
                Ok(model.into())
            }
            // Another request inserted the same username first
            Err(e) => match self.find_by_username(username).await? {
                Some(existing) => {
                    tracing::debug!("User '{}' created concurrently: {}", username, e);
                    Ok(existing)
                }
                None => Err(e.into()),
            },
        }
    }
}
