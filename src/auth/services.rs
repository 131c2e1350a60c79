use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UpdateUserRequest},
        jwt::JwtKeys,
        password::PasswordHasher,
        repo::{UserStore, WriteError},
        repo_types::{NewUser, User, UserChanges},
    },
    error::AppError,
};

pub const MIN_PASSWORD_LEN: usize = 6;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const SIGNUP_FAILED: &str = "Failed to register user";
const LOGIN_FAILED: &str = "Failed to log in";
const PROFILE_FAILED: &str = "Failed to fetch user info";
const UPDATE_FAILED: &str = "Failed to update user";

/// One `@` with something on both sides. Dotless domains such as
/// `localhost` are accepted.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@]+@[^@]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trimmed value, or `None` when absent or blank.
fn required(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Passwords are taken verbatim; only the empty string counts as missing.
fn required_password(field: Option<String>) -> Option<String> {
    field.filter(|p| !p.is_empty())
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn write_error(context: &'static str) -> impl Fn(WriteError) -> AppError {
    move |e| match e {
        WriteError::DuplicateEmail => AppError::DuplicateEmail,
        WriteError::Other(e) => AppError::persistence(context, e),
    }
}

/// A freshly authenticated user and the token issued for them.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Credential verification and token issuance.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, keys: JwtKeys) -> Self {
        Self {
            users,
            hasher,
            keys,
        }
    }

    #[instrument(skip(self, req))]
    pub async fn signup(&self, req: SignupRequest) -> Result<Session, AppError> {
        let (Some(username), Some(password), Some(email), Some(country)) = (
            required(req.username),
            required_password(req.password),
            required(req.email),
            required(req.country_code),
        ) else {
            warn!("signup with missing fields");
            return Err(AppError::validation(ALL_FIELDS_REQUIRED));
        };

        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::validation("Invalid email"));
        }
        check_password(&password)?;

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AppError::persistence(SIGNUP_FAILED, e))?;
        if existing.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(|e| AppError::persistence(SIGNUP_FAILED, e))?;

        let user = self
            .users
            .create(&NewUser {
                username,
                email,
                password_hash,
                id_country: country.to_uppercase(),
            })
            .await
            .map_err(write_error(SIGNUP_FAILED))?;

        let token = self
            .keys
            .issue(user.id)
            .map_err(|e| AppError::persistence(SIGNUP_FAILED, e))?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(Session { user, token })
    }

    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, req))]
    pub async fn login(&self, req: LoginRequest) -> Result<Session, AppError> {
        let (Some(email), Some(password)) = (required(req.email), required_password(req.password))
        else {
            return Err(AppError::validation(ALL_FIELDS_REQUIRED));
        };
        let email = normalize_email(&email);

        let user = match self.users.find_by_email(&email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                self.hasher.verify_absent(&password);
                warn!(email = %email, "login unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(AppError::persistence(LOGIN_FAILED, e)),
        };

        let ok = self
            .hasher
            .verify(&password, &user.password_hash)
            .map_err(|e| AppError::persistence(LOGIN_FAILED, e))?;
        if !ok {
            warn!(user_id = user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(user.id)
            .map_err(|e| AppError::persistence(LOGIN_FAILED, e))?;

        info!(user_id = user.id, "user logged in");
        Ok(Session { user, token })
    }

    pub async fn profile(&self, user_id: i32) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(|e| AppError::persistence(PROFILE_FAILED, e))?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    #[instrument(skip(self, req))]
    pub async fn update_profile(
        &self,
        user_id: i32,
        req: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let mut changes = UserChanges {
            username: required(req.username),
            id_country: required(req.id_country).map(|c| c.to_uppercase()),
            ..UserChanges::default()
        };

        if let Some(email) = required(req.email) {
            let email = normalize_email(&email);
            if !is_valid_email(&email) {
                return Err(AppError::validation("Invalid email"));
            }
            changes.email = Some(email);
        }

        if let Some(password) = required_password(req.password) {
            check_password(&password)?;
            let hash = self
                .hasher
                .hash(&password)
                .map_err(|e| AppError::persistence(UPDATE_FAILED, e))?;
            changes.password_hash = Some(hash);
        }

        let user = self
            .users
            .update(user_id, &changes)
            .await
            .map_err(write_error(UPDATE_FAILED))?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        info!(user_id, "user updated");
        Ok(user)
    }
}
