use sqlx::PgPool;
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::user::model::{NewUser, User, UserChanges};
use crate::user::{password, validate};

/// Credential store backed by the `"user"` table.
#[derive(Clone, Debug)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate, hash and insert a new user.
    #[instrument(name = "Saving new user", skip(self, new_user))]
    pub async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let NewUser {
            username,
            email,
            password: plain,
        } = new_user;

        validate::check_username(&username)?;
        let email = validate::normalize_email(&email);
        validate::check_email(&email)?;
        validate::check_password(&plain)?;

        let hash = password::hash_blocking(plain).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password AS password_hash
            "#,
        )
        .bind(&username)
        .bind(&email)
        .bind(&hash)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_email_taken)?;

        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Apply a partial update. Only supplied fields are validated and
    /// written; the password is rehashed only when a new plaintext is
    /// supplied.
    #[instrument(name = "Updating user", skip(self, changes))]
    pub async fn update(&self, id: i64, changes: UserChanges) -> Result<User, StoreError> {
        let UserChanges {
            username,
            email,
            password: plain,
        } = changes;

        if let Some(ref username) = username {
            validate::check_username(username)?;
        }
        let email = email.map(|e| validate::normalize_email(&e));
        if let Some(ref email) = email {
            validate::check_email(email)?;
        }
        let hash = match plain {
            Some(plain) => {
                validate::check_password(&plain)?;
                Some(password::hash_blocking(plain).await?)
            }
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE "user"
            SET username = COALESCE($2, username),
                email    = COALESCE($3, email),
                password = COALESCE($4, password)
            WHERE id = $1
            RETURNING id, username, email, password AS password_hash
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(unique_email_taken)?
        .ok_or(StoreError::NotFound(id))?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    #[instrument(name = "Fetching user by id", skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password AS password_hash
            FROM "user"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[instrument(name = "Fetching user by email", skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password AS password_hash
            FROM "user"
            WHERE email = $1
            "#,
        )
        .bind(validate::normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// The unique index on email is the only duplicate check; a violation
/// coming back from an insert or update is the taken-email case.
fn unique_email_taken(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::EmailTaken,
        _ => StoreError::Database(e),
    }
}
