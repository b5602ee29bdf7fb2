//! Identity service: registration, login and admin user management.
//!
//! ## Login Flow
//! ```text
//! login(email, password)
//!      │
//!      ├── unknown email ──────┐
//!      ├── wrong password ─────┼──► Unauthorized "Invalid email or password"
//!      ├── deactivated ────────┘
//!      │
//!      ▼
//! JWT { sub: user id, role } ──► { token, expiresIn, role }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use forkful_core::validation::{validate_email, validate_id, validate_password};
use forkful_core::{CoreError, NewUser, Profile, Role, User, UserUpdate, ValidationError};
use forkful_db::Database;

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::{ApiError, ApiResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Body of `POST /auth/register` and `POST /admin/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub profile: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub role: Role,
    pub user_id: String,
}

/// Body of `PUT /admin/users/:id`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<Value>,
    pub is_active: Option<bool>,
}

pub struct IdentityService {
    db: Database,
    jwt: Arc<JwtManager>,
}

impl IdentityService {
    pub fn new(db: Database, jwt: Arc<JwtManager>) -> Self {
        IdentityService { db, jwt }
    }

    /// Self-registration. Administrators cannot register themselves.
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<User> {
        if request.role == Some(Role::Administrator) {
            warn!(email = %request.email, "Administrator self-registration refused");
            return Err(CoreError::Forbidden(
                "administrators are created by an administrator".to_string(),
            )
            .into());
        }
        self.create(request).await
    }

    /// Admin user creation, any role.
    pub async fn create_user(&self, request: RegisterRequest) -> ApiResult<User> {
        self.create(request).await
    }

    async fn create(&self, request: RegisterRequest) -> ApiResult<User> {
        let email = validate_email(&request.email)?;
        validate_password(&request.password)?;
        let role = request.role.ok_or_else(|| ValidationError::required("role"))?;
        let profile = Profile::from_json(role, request.profile)?;

        let user = self
            .db
            .users()
            .insert(&NewUser {
                email,
                password_hash: hash_password(&request.password)?,
                profile,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> ApiResult<LoginResponse> {
        let invalid = || ApiError::unauthorized(INVALID_CREDENTIALS);

        let email = validate_email(&request.email).map_err(|_| invalid())?;
        let user = self.db.users().get_by_email(&email).await?.ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash) {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid());
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login failed: account deactivated");
            return Err(invalid());
        }

        let token = self.jwt.generate_token(&user.id, user.role)?;
        info!(user_id = %user.id, role = %user.role, "Login succeeded");

        Ok(LoginResponse {
            token,
            expires_in: self.jwt.lifetime_secs(),
            role: user.role,
            user_id: user.id,
        })
    }

    /// Applies an admin update.
    ///
    /// A role change without a new profile re-reads the current profile as
    /// the new role's variant, so fields the new role cannot carry fail.
    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> ApiResult<User> {
        validate_id(id)?;
        let current = self
            .db
            .users()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))?;

        let role = request.role.unwrap_or(current.role);
        let profile = match request.profile {
            Some(value) => Some(Profile::from_json(role, value)?),
            None if role != current.role => {
                let value = serde_json::to_value(&current.profile).map_err(ApiError::internal)?;
                Some(Profile::from_json(role, value)?)
            }
            None => None,
        };

        let email = request.email.as_deref().map(validate_email).transpose()?;

        let user = self
            .db
            .users()
            .update(
                id,
                &UserUpdate {
                    email,
                    profile,
                    is_active: request.is_active,
                },
            )
            .await?;

        info!(user_id = %user.id, role = %user.role, "User updated");
        Ok(user)
    }

    /// Soft delete: the account stays, `isActive` becomes false.
    pub async fn deactivate_user(&self, id: &str) -> ApiResult<()> {
        validate_id(id)?;
        self.db.users().deactivate(id).await?;
        info!(user_id = %id, "User deactivated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
