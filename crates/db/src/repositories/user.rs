//! User repository for seller and administrator records.
//!
//! Users are administered outside the accrual engine; this repository
//! exists because deals and ledger entries reference them.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};
use incentiva_shared::types::PageRequest;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email already registered.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Full display name.
    pub full_name: String,
    /// Unique email address.
    pub email: String,
    /// Platform role.
    pub role: UserRole,
    /// Geographic region.
    pub region: String,
    /// Partner category, if any.
    pub category: Option<String>,
    /// Subregion, if any.
    pub subregion: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the
    /// database operation fails.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(input.email.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            role: Set(input.role),
            region: Set(input.region),
            category: Set(input.category),
            subregion: Set(input.subregion),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Gets a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the query fails.
    pub async fn get_user(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    /// Lists users, newest first, with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_users(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<users::Model>, u64), UserError> {
        let total = users::Entity::find().count(&self.db).await?;

        let items = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }
}
