//! Authentication and staff user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{CreateUser, UpdateUser, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and return a JWT token with the user
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is deactivated".to_string()));
        }

        if !self.verify_password(&user.password_hash, password) {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let now = Utc::now();
        self.repository.users.touch_last_login(user.id, now).await?;

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp: now.timestamp() + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now.timestamp(),
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// List all staff users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Create a staff user
    pub async fn create(&self, request: CreateUser) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let hash = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(
                &request.email,
                &hash,
                request.full_name.as_deref(),
                request.phone.as_deref(),
                request.role.unwrap_or(UserRole::Receptionist),
                Utc::now(),
            )
            .await
    }

    /// Partial update of a staff user
    pub async fn update(&self, user_id: i64, update: UpdateUser) -> AppResult<User> {
        let password_hash = match &update.password {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };
        self.repository
            .users
            .update(user_id, &update, password_hash.as_deref(), Utc::now())
            .await
    }

    /// Create the bootstrap admin account when the users table is empty
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = self.hash_password(&self.config.default_admin_password)?;
        self.repository
            .users
            .create(
                "admin@localhost",
                &hash,
                Some("Administrator"),
                None,
                UserRole::Admin,
                Utc::now(),
            )
            .await?;

        tracing::warn!("created default admin account (admin@localhost); change its password");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, hash: &str, password: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
