//! Credential and identity service: registration, login, token resolution, role checks.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use crate::db::retry_on_contention;
use crate::entities::{user, Role};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::schemas::{ProfileUpdate, RegisterRequest};
use crate::security::password::{hash_password_blocking, verify_password_blocking};
use crate::security::TokenService;

/// Minimal shape check: `local@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> AppResult<()> {
    let invalid = || AppError::validation("value is not a valid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Missing role defaults to `candidate`; anything outside the closed set is rejected.
pub fn parse_role(raw: Option<&str>) -> AppResult<Role> {
    match raw {
        None => Ok(Role::Candidate),
        Some(value) => value.parse::<Role>().map_err(|_| AppError::validation("Invalid role")),
    }
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?)
}

/// Duplicate email is reported before role or password problems.
#[tracing::instrument(skip(db, request), fields(email = %request.email))]
pub async fn register(db: &DatabaseConnection, request: RegisterRequest) -> AppResult<user::Model> {
    validate_email(&request.email)?;
    if find_by_email(db, &request.email).await?.is_some() {
        return Err(email_taken());
    }
    let role = parse_role(request.role.as_deref())?;
    if request.password.is_empty() {
        return Err(AppError::validation("password must not be empty"));
    }
    let hashed_password = hash_password_blocking(request.password.clone()).await?;

    let user = retry_on_contention(|| insert_user(db, &request, role, &hashed_password)).await?;
    info!(user_id = user.id, role = %user.role, "Registered user");
    Ok(user)
}

fn email_taken() -> AppError {
    AppError::conflict("Email already registered")
}

async fn insert_user(
    db: &DatabaseConnection,
    request: &RegisterRequest,
    role: Role,
    hashed_password: &str,
) -> AppResult<user::Model> {
    let txn = db.begin().await?;
    if find_by_email(&txn, &request.email).await?.is_some() {
        return Err(email_taken());
    }

    let user = user::ActiveModel {
        email: Set(request.email.clone()),
        hashed_password: Set(hashed_password.to_owned()),
        full_name: Set(request.full_name.clone()),
        role: Set(role),
        phone: Set(request.phone.clone()),
        location: Set(request.location.clone()),
        bio: Set(request.bio.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| if is_unique_violation(&e) { email_taken() } else { e.into() })?;
    txn.commit().await?;
    Ok(user)
}

/// Unknown email and wrong password produce the same error.
#[tracing::instrument(skip(db, tokens, password))]
pub async fn login<C: ConnectionTrait>(
    db: &C,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> AppResult<(String, user::Model)> {
    let Some(user) = find_by_email(db, email).await? else {
        debug!("Login rejected: unknown email");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password_blocking(password.to_owned(), user.hashed_password.clone()).await? {
        debug!(user_id = user.id, "Login rejected: password mismatch");
        return Err(AppError::invalid_credentials());
    }

    let token = tokens.issue(&user)?;
    info!(user_id = user.id, "Issued access token");
    Ok((token, user))
}

/// Verifies the token and loads its subject.
pub async fn resolve<C: ConnectionTrait>(db: &C, tokens: &TokenService, token: &str) -> AppResult<user::Model> {
    let claims = tokens.verify(token)?;
    let user_id = claims.subject_id()?;

    user::Entity::find_by_id(user_id).one(db).await?.ok_or_else(|| {
        debug!(user_id, "Token subject no longer exists");
        AppError::invalid_token()
    })
}

pub fn authorize(user: &user::Model, allowed: &[Role]) -> AppResult<()> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        debug!(user_id = user.id, role = %user.role, "Role not permitted");
        Err(AppError::Authorization)
    }
}

#[tracing::instrument(skip(db, user, update), fields(user_id = user.id))]
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    user: user::Model,
    update: ProfileUpdate,
) -> AppResult<user::Model> {
    let mut active: user::ActiveModel = user.clone().into();
    if let Some(full_name) = update.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(phone) = update.phone {
        active.phone = Set(phone);
    }
    if let Some(location) = update.location {
        active.location = Set(location);
    }
    if let Some(bio) = update.bio {
        active.bio = Set(bio);
    }

    if !active.is_changed() {
        return Ok(user);
    }
    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "ada", "ada@", "@example.com", "ada@example", "ada@@example.com", "a da@example.com", "ada@example..com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn role_defaults_to_candidate() {
        assert_eq!(parse_role(None).unwrap(), Role::Candidate);
        assert_eq!(parse_role(Some("admin")).unwrap(), Role::Admin);
        assert!(matches!(parse_role(Some("owner")), Err(AppError::Validation(_))));
    }

    fn user_with(role: Role) -> user::Model {
        user::Model {
            id: 1,
            email: "x@example.com".into(),
            hashed_password: String::new(),
            full_name: None,
            role,
            phone: None,
            location: None,
            bio: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn authorize_checks_membership() {
        let recruiter = user_with(Role::Recruiter);
        assert!(authorize(&recruiter, &[Role::Recruiter, Role::Admin]).is_ok());
        assert!(matches!(authorize(&recruiter, &[Role::Candidate]), Err(AppError::Authorization)));
    }
}
