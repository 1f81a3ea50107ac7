use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, PublicUser,
            ResetPasswordRequest, SignupRequest,
        },
        password::{generate_reset_token, spawn_hash, spawn_verify},
        repo::UserStore,
        repo_types::NewUser,
        validation::{is_strong_password, is_valid_email, WEAK_PASSWORD},
    },
    error::AppError,
    mailer::Mailer,
};

pub const RESET_LINK_SENT: &str = "A reset link has been sent.";
const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// Signup, login and password recovery over an injected user store and mailer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    reset_url_base: String,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Case only; surrounding whitespace is left for `is_valid_email` to reject.
fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>, reset_url_base: &str) -> Self {
        Self {
            users,
            mailer,
            reset_url_base: reset_url_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.reset_url_base, token)
    }

    #[instrument(skip_all)]
    pub async fn signup(&self, req: SignupRequest) -> Result<MessageResponse, AppError> {
        let (Some(name), Some(email), Some(password)) =
            (present(req.name), present(req.email), present(req.password))
        else {
            return Err(AppError::validation("All fields are required."));
        };
        let email = normalize_email(&email);

        if !is_valid_email(&email) {
            warn!(email = %email, "signup with invalid email");
            return Err(AppError::validation("Invalid email format."));
        }
        if !is_strong_password(&password) {
            warn!(email = %email, "signup with weak password");
            return Err(AppError::validation(WEAK_PASSWORD));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::Conflict("Email already in use.".into()));
        }

        let password_hash = spawn_hash(password).await?;
        let created = self
            .users
            .create(NewUser {
                name,
                email: email.clone(),
                password_hash,
            })
            .await?;

        // Lost a race with a concurrent signup for the same email.
        let Some(user) = created else {
            warn!(email = %email, "email registered concurrently");
            return Err(AppError::Conflict("Email already in use.".into()));
        };

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(MessageResponse::new("User registered successfully."))
    }

    #[instrument(skip_all)]
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
            return Err(AppError::validation("Email and password are required."));
        };
        let email = normalize_email(&email);

        if !is_valid_email(&email) {
            warn!(email = %email, "login with invalid email");
            return Err(AppError::validation("Invalid email format."));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(email = %email, "login unknown email");
            return Err(AppError::NotFound("User not found.".into()));
        };

        if !spawn_verify(password, user.password_hash.clone()).await? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials("Invalid credentials.".into()));
        }

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(LoginResponse {
            message: "Login successful".into(),
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        })
    }

    /// Answers with the same message whether or not the email is registered.
    #[instrument(skip_all)]
    pub async fn forgot_password(
        &self,
        req: ForgotPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
        if !is_valid_email(&email) {
            warn!(email = %email, "forgot-password with invalid email");
            return Err(AppError::validation("Enter a valid email address."));
        }

        let Some(mut user) = self.users.find_by_email(&email).await? else {
            info!(email = %email, "forgot-password for unknown email");
            return Ok(MessageResponse::new(RESET_LINK_SENT));
        };

        // Overwrites any token issued earlier.
        let token = generate_reset_token();
        user.reset_token = Some(token.clone());
        user.reset_token_expiry = Some(OffsetDateTime::now_utc() + RESET_TOKEN_TTL);
        self.users.save(&user).await?;

        let html = format!(
            r#"<p>Click <a href="{}">here</a> to reset your password. This link will expire in 1 hour.</p>"#,
            self.reset_link(&token)
        );
        self.mailer
            .send_html(&user.email, "Password Reset", &html)
            .await?;

        info!(user_id = %user.id, "reset link sent");
        Ok(MessageResponse::new(RESET_LINK_SENT))
    }

    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        req: ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let password = req.password.unwrap_or_default();
        if !is_strong_password(&password) {
            warn!("reset-password with weak password");
            return Err(AppError::validation(WEAK_PASSWORD));
        }

        let invalid = || AppError::InvalidToken("Token invalid or expired".into());
        let Some(token) = present(req.token) else {
            warn!("reset-password without token");
            return Err(invalid());
        };
        if self
            .users
            .find_by_reset_token(&token, OffsetDateTime::now_utc())
            .await?
            .is_none()
        {
            warn!("reset-password with invalid or expired token");
            return Err(invalid());
        }

        let password_hash = spawn_hash(password).await?;
        // The token may have been spent by a concurrent reset while hashing.
        let Some(user_id) = self
            .users
            .consume_reset_token(&token, &password_hash, OffsetDateTime::now_utc())
            .await?
        else {
            warn!("reset token spent concurrently");
            return Err(invalid());
        };

        info!(user_id = %user_id, "password reset");
        Ok(MessageResponse::new("Password updated successfully"))
    }
}
