use std::sync::Arc;

use crate::auth::{self, hash_password, verify_dummy, verify_password};
use crate::database::{DatabaseError, HabitStore};
use crate::services::ServiceError;

/// Emails are compared case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AuthService {
    store: Arc<dyn HabitStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }

    /// Create an account with default habits and goals, returning an identity token
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::validation("email and password required"));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("user exists".to_string()));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let user = match self.store.create_user(&email, &password_hash).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration for the same email
            Err(DatabaseError::Conflict(_)) => return Err(ServiceError::Conflict("user exists".to_string())),
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(auth::issue_token(user.id)?)
    }

    /// Check credentials and return an identity token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let email = normalize_email(email);
        let password = password.to_string();
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            tokio::task::spawn_blocking(move || verify_dummy(&password)).await?;
            tracing::warn!("Login failed: unknown email '{}'", email);
            return Err(ServiceError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
        if !valid {
            tracing::warn!("Login failed: bad password for user {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        self.store.ensure_habits(user.id).await?;
        self.store.ensure_goals(user.id).await?;

        Ok(auth::issue_token(user.id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[tokio::test]
    async fn register_then_login_issues_tokens_for_same_user() {
        let ctx = TestContext::new();
        let service = AuthService::new(ctx.store());

        let registered = service.register("a@x.com", "pw1").await.unwrap();
        let logged_in = service.login(" A@x.com", "pw1").await.unwrap();

        let first = auth::validate_jwt(&registered).unwrap().user_id().unwrap();
        let second = auth::validate_jwt(&logged_in).unwrap().user_id().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let ctx = TestContext::new();
        let service = AuthService::new(ctx.store());
        service.register("hash@x.com", "pw1").await.unwrap();

        let user = ctx.store().find_user_by_email("hash@x.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "pw1");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let ctx = TestContext::new();
        let service = AuthService::new(ctx.store());
        service.register("a@x.com", "pw1").await.unwrap();

        let err = service.register("A@X.COM ", "other").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_requires_both_fields() {
        let ctx = TestContext::new();
        let service = AuthService::new(ctx.store());

        assert!(matches!(
            service.register("   ", "pw").await,
            Err(ServiceError::Validation { .. })
        ));
        assert!(matches!(
            service.register("a@x.com", "").await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_rejected() {
        let ctx = TestContext::new();
        let service = AuthService::new(ctx.store());
        service.register("a@x.com", "pw1").await.unwrap();

        assert!(matches!(
            service.login("a@x.com", "nope").await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("b@x.com", "pw1").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn unknown_email_never_matches_the_placeholder_hash() {
        let ctx = TestContext::new();
        let service = AuthService::new(ctx.store());

        assert!(matches!(
            service.login("ghost@x.com", "wellfit-no-such-user").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }
}
