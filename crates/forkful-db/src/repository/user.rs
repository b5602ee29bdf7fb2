//! # User Repository
//!
//! Accounts, role-keyed profiles and courier availability.
//!
//! ## Storage
//! ```text
//! users
//! ├── role     TEXT   'Customer' | 'RestaurantOwner' | 'DeliveryPersonnel' | 'Administrator'
//! └── profile  TEXT   JSON object whose shape is picked by `role`
//!
//! Read:  row ──► Profile::from_json(role, profile) ──► User
//! Write: Profile (untagged) ──► JSON text; role column = profile.role()
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forkful_core::{NewUser, Profile, Role, User, UserUpdate};

/// Raw `users` row.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    role: Role,
    is_active: bool,
    profile: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let value: serde_json::Value =
            serde_json::from_str(&row.profile).map_err(|e| DbError::corrupt("user", &row.id, e))?;
        let profile =
            Profile::from_json(row.role, value).map_err(|e| DbError::corrupt("user", &row.id, e))?;

        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            is_active: row.is_active,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, email, password_hash, role, is_active, profile, created_at, updated_at
    FROM users
"#;

fn profile_json(profile: &Profile) -> DbResult<String> {
    serde_json::to_string(profile).map_err(|e| DbError::Internal(e.to_string()))
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new active user.
    ///
    /// ## Errors
    /// `UniqueViolation { field: "email" }` if the email is taken.
    pub async fn insert(&self, new_user: &NewUser) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let role = new_user.profile.role();

        debug!(id = %id, role = %role, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, is_active, profile, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(role)
        .bind(profile_json(&new_user.profile)?)
        .bind(now)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            return Err(match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("email", &new_user.email),
                other => other,
            });
        }

        info!(id = %id, role = %role, "User created");

        Ok(User {
            id,
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role,
            is_active: true,
            profile: new_user.profile.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Gets a user by (normalized) email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE email = ?1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Applies a partial update. Last writer wins.
    ///
    /// A new profile also sets the role column, so role and profile shape
    /// never disagree.
    pub async fn update(&self, id: &str, update: &UserUpdate) -> DbResult<User> {
        let mut user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(profile) = &update.profile {
            user.role = profile.role();
            user.profile = profile.clone();
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        debug!(id = %id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?2, role = ?3, profile = ?4, is_active = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(user.role)
        .bind(profile_json(&user.profile)?)
        .bind(user.is_active)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            return Err(match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("email", &user.email),
                other => other,
            });
        }

        Ok(user)
    }

    /// Soft-deletes a user (`is_active = false`). Users are never removed.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(id = %id, "User deactivated");
        Ok(())
    }

    /// Sets a courier's `available` flag inside the profile JSON.
    ///
    /// One statement: concurrent profile edits never lose the flag.
    pub async fn set_courier_availability(&self, id: &str, available: bool) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET profile = json_set(profile, '$.available', json(?2)), updated_at = ?3
            WHERE id = ?1 AND role = 'DeliveryPersonnel'
            "#,
        )
        .bind(id)
        .bind(if available { "true" } else { "false" })
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Delivery personnel", id));
        }

        info!(id = %id, available, "Courier availability updated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{courier, customer, test_db};
    use forkful_core::AdminProfile;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = test_db().await;
        let user = customer(&db, "khyati@example.com").await;

        let by_id = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "khyati@example.com");
        assert_eq!(by_id.role, Role::Customer);
        assert!(by_id.is_active);
        assert_eq!(by_id.profile, user.profile);

        let by_email = db.users().get_by_email("khyati@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);
        assert!(db.users().get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_db().await;
        customer(&db, "dup@example.com").await;

        let err = db
            .users()
            .insert(&NewUser {
                email: "dup@example.com".to_string(),
                password_hash: "hash".to_string(),
                profile: Profile::Administrator(AdminProfile {
                    name: "Ada".to_string(),
                    contact_details: None,
                }),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn test_update_role_with_profile() {
        let db = test_db().await;
        let user = customer(&db, "switch@example.com").await;

        let updated = db
            .users()
            .update(
                &user.id,
                &UserUpdate {
                    email: None,
                    profile: Some(Profile::Administrator(AdminProfile {
                        name: "Ada".to_string(),
                        contact_details: None,
                    })),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Administrator);

        let stored = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Administrator);
        assert_eq!(stored.profile.name(), "Ada");
    }

    #[tokio::test]
    async fn test_deactivate_is_soft() {
        let db = test_db().await;
        let user = customer(&db, "gone@example.com").await;

        db.users().deactivate(&user.id).await.unwrap();
        let stored = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        let missing = db.users().deactivate("missing").await.unwrap_err();
        assert!(matches!(missing, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_courier_availability_round_trips_through_profile() {
        let db = test_db().await;
        let dana = courier(&db, "dana@example.com").await;
        let khyati = customer(&db, "k@example.com").await;

        db.users().set_courier_availability(&dana.id, false).await.unwrap();
        let stored = db.users().get_by_id(&dana.id).await.unwrap().unwrap();
        assert_eq!(stored.profile.courier_available(), Some(false));
        assert_eq!(stored.profile.name(), "Dana");

        let err = db
            .users()
            .set_courier_availability(&khyati.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
