use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use validator::ValidationErrors;

use crate::{
    application::{
        errors::{AppError, AppResult},
        interfaces::security::{PasswordService, TokenKind, TokenService},
    },
    domain::{
        entities::users::UserEntity,
        repositories::{
            errors::UniqueViolation,
            users::{EMAIL_UNIQUE, UserRepository},
        },
        value_objects::{
            iam::{
                AccessTokenModel, AuthUser, LoginModel, RefreshTokenModel, RegisterUserModel,
                TokenPairModel, normalize_email,
            },
            users::UserModel,
            validation::validation_error,
        },
    },
};

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";
const INVALID_TOKEN: &str = "Token is invalid or expired";

pub struct IamUseCase<U, P, T>
where
    U: UserRepository + Send + Sync,
    P: PasswordService + Send + Sync,
    T: TokenService + Send + Sync,
{
    user_repository: Arc<U>,
    password_service: Arc<P>,
    token_service: Arc<T>,
}

impl<U, P, T> IamUseCase<U, P, T>
where
    U: UserRepository + Send + Sync,
    P: PasswordService + Send + Sync,
    T: TokenService + Send + Sync,
{
    pub fn new(user_repository: Arc<U>, password_service: Arc<P>, token_service: Arc<T>) -> Self {
        Self {
            user_repository,
            password_service,
            token_service,
        }
    }

    pub async fn register(&self, register_user_model: RegisterUserModel) -> AppResult<UserModel> {
        register_user_model.check()?;

        let email = normalize_email(&register_user_model.email);
        if self.user_repository.find_by_email(&email).await?.is_some() {
            warn!("iam: registration with an existing email rejected");
            return Err(email_taken());
        }

        let password_hash = self
            .password_service
            .hash_password(&register_user_model.password)?;

        let user = self
            .user_repository
            .register(register_user_model.to_entity(password_hash, Utc::now()))
            .await
            .map_err(|err| match UniqueViolation::constraint_of(&err) {
                Some(EMAIL_UNIQUE) => {
                    warn!("iam: concurrent registration with the same email rejected");
                    email_taken()
                }
                _ => AppError::from(err),
            })?;

        info!(user_id = user.id, "iam: user registered");
        Ok(user.into())
    }

    pub async fn login(&self, login_model: LoginModel) -> AppResult<TokenPairModel> {
        let email = normalize_email(&login_model.email);

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                warn!("iam: login for unknown or inactive account");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !self
            .password_service
            .verify_password(&login_model.password, &user.password_hash)?
        {
            warn!(user_id = user.id, "iam: login with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.user_repository
            .touch_last_active(user.id, Utc::now())
            .await?;

        let tokens = TokenPairModel {
            access: self.token_service.issue(user.id, TokenKind::Access)?,
            refresh: self.token_service.issue(user.id, TokenKind::Refresh)?,
        };

        info!(user_id = user.id, "iam: token pair issued");
        Ok(tokens)
    }

    pub async fn refresh(&self, refresh_token_model: RefreshTokenModel) -> AppResult<AccessTokenModel> {
        let user_id = self
            .token_service
            .verify(&refresh_token_model.refresh, TokenKind::Refresh)
            .map_err(|err| {
                warn!(error = %err, "iam: refresh token rejected");
                AppError::Unauthorized(INVALID_TOKEN.to_string())
            })?;

        let user = self.active_user(user_id).await?;

        Ok(AccessTokenModel {
            access: self.token_service.issue(user.id, TokenKind::Access)?,
        })
    }

    /// Resolves a bearer access token into the calling user.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<AuthUser> {
        let user_id = self
            .token_service
            .verify(access_token, TokenKind::Access)
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN.to_string()))?;

        let user = self.active_user(user_id).await?;

        Ok(AuthUser {
            user_id: user.id,
            is_staff: user.is_staff,
        })
    }

    async fn active_user(&self, user_id: i64) -> AppResult<UserEntity> {
        match self.user_repository.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::Unauthorized(
                "User not found or inactive".to_string(),
            )),
        }
    }
}

fn email_taken() -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(
        "email",
        validation_error("email_taken", "A user with this email already exists."),
    );
    AppError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::security::{MockPasswordService, MockTokenService},
        domain::repositories::users::MockUserRepository,
    };
    use anyhow::anyhow;
    use mockall::predicate::eq;

    fn user(id: i64, is_active: bool) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            email: "user@example.com".to_string(),
            password_hash: "hashed".to_string(),
            avatar: None,
            phone_number: None,
            city: None,
            motivation: None,
            timezone: "UTC".to_string(),
            last_active: now,
            is_active,
            is_staff: false,
            date_joined: now,
        }
    }

    fn register_model(password2: &str) -> RegisterUserModel {
        RegisterUserModel {
            email: "user@Example.com".to_string(),
            password: "s3cret-pass".to_string(),
            password2: password2.to_string(),
            avatar: None,
            phone_number: None,
            city: None,
        }
    }

    fn usecase(
        users: MockUserRepository,
        passwords: MockPasswordService,
        tokens: MockTokenService,
    ) -> IamUseCase<MockUserRepository, MockPasswordService, MockTokenService> {
        IamUseCase::new(Arc::new(users), Arc::new(passwords), Arc::new(tokens))
    }

    #[tokio::test]
    async fn register_creates_exactly_one_user() {
        let mut users = MockUserRepository::new();
        let mut passwords = MockPasswordService::new();

        users
            .expect_find_by_email()
            .withf(|email| email == "user@example.com")
            .times(1)
            .returning(|_| Ok(None));
        passwords
            .expect_hash_password()
            .with(eq("s3cret-pass"))
            .returning(|_| Ok("hashed".to_string()));
        users
            .expect_register()
            .withf(|entity| entity.email == "user@example.com" && entity.password_hash == "hashed")
            .times(1)
            .returning(|_| Ok(user(1, true)));

        let created = usecase(users, passwords, MockTokenService::new())
            .register(register_model("s3cret-pass"))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords_without_touching_storage() {
        let mut users = MockUserRepository::new();
        users.expect_register().never();
        users.expect_find_by_email().never();

        let err = usecase(users, MockPasswordService::new(), MockTokenService::new())
            .register(register_model("different-pass"))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("password"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(1, true))));
        users.expect_register().never();

        let err = usecase(users, MockPasswordService::new(), MockTokenService::new())
            .register(register_model("s3cret-pass"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_answers_email_error_when_insert_loses_the_race() {
        let mut users = MockUserRepository::new();
        let mut passwords = MockPasswordService::new();

        users.expect_find_by_email().returning(|_| Ok(None));
        passwords
            .expect_hash_password()
            .returning(|_| Ok("hashed".to_string()));
        users
            .expect_register()
            .times(1)
            .returning(|_| Err(UniqueViolation::new(EMAIL_UNIQUE).into()));

        let err = usecase(users, passwords, MockTokenService::new())
            .register(register_model("s3cret-pass"))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => assert!(errors.field_errors().contains_key("email")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_issues_token_pair_and_touches_last_active() {
        let mut users = MockUserRepository::new();
        let mut passwords = MockPasswordService::new();
        let mut tokens = MockTokenService::new();

        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(4, true))));
        passwords
            .expect_verify_password()
            .with(eq("s3cret-pass"), eq("hashed"))
            .returning(|_, _| Ok(true));
        users
            .expect_touch_last_active()
            .withf(|user_id, _| *user_id == 4)
            .times(1)
            .returning(|_, _| Ok(()));
        tokens
            .expect_issue()
            .with(eq(4), eq(TokenKind::Access))
            .returning(|_, _| Ok("access-token".to_string()));
        tokens
            .expect_issue()
            .with(eq(4), eq(TokenKind::Refresh))
            .returning(|_, _| Ok("refresh-token".to_string()));

        let pair = usecase(users, passwords, tokens)
            .login(LoginModel {
                email: "user@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(pair.access, "access-token");
        assert_eq!(pair.refresh, "refresh-token");
    }

    #[tokio::test]
    async fn login_rejects_inactive_users_and_wrong_passwords() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(user(4, false))));

        let err = usecase(users, MockPasswordService::new(), MockTokenService::new())
            .login(LoginModel {
                email: "user@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let mut users = MockUserRepository::new();
        let mut passwords = MockPasswordService::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(4, true))));
        passwords
            .expect_verify_password()
            .returning(|_, _| Ok(false));
        users.expect_touch_last_active().never();

        let err = usecase(users, passwords, MockTokenService::new())
            .login(LoginModel {
                email: "user@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn refresh_rejects_invalid_token() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .with(eq("bad"), eq(TokenKind::Refresh))
            .returning(|_, _| Err(anyhow!("invalid signature")));

        let err = usecase(MockUserRepository::new(), MockPasswordService::new(), tokens)
            .refresh(RefreshTokenModel {
                refresh: "bad".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn refresh_issues_new_access_token() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .with(eq("refresh-token"), eq(TokenKind::Refresh))
            .returning(|_, _| Ok(9));
        users
            .expect_find_by_id()
            .with(eq(9))
            .returning(|id| Ok(Some(user(id, true))));
        tokens
            .expect_issue()
            .with(eq(9), eq(TokenKind::Access))
            .returning(|_, _| Ok("fresh-access".to_string()));

        let access = usecase(users, MockPasswordService::new(), tokens)
            .refresh(RefreshTokenModel {
                refresh: "refresh-token".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(access.access, "fresh-access");
    }

    #[tokio::test]
    async fn authenticate_rejects_deactivated_user() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().returning(|_, _| Ok(2));
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, false))));

        let err = usecase(users, MockPasswordService::new(), tokens)
            .authenticate("access-token")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
