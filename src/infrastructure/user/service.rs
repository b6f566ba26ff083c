//! User service for sign-up, authentication and account removal

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::team::{Team, TeamRepository, TeamResourceCleaner};
use crate::domain::user::{
    validate_required_fields, validate_username, Email, User, UserRepository,
};
use crate::domain::DomainError;

use super::cascade::TeamCascade;
use super::password::PasswordHasher;

pub const DUPLICATE_EMAIL: &str = "Someone already has that email. Could you try another?";
pub const DUPLICATE_USERNAME: &str = "Someone already has that username. Could you try another?";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const INVALID_CREDENTIALS: &str = "Invalid Username or Password.";
pub const PASSWORD_FIELDS_REQUIRED: &str = "Current, new and confirmation passwords are required.";
pub const PASSWORD_MISMATCH: &str = "Your new password and confirmation password do not match.";
pub const WRONG_PASSWORD: &str = "Your current password is incorrect.";

/// Request for signing up a new user
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request for changing the password of a signed-in user
#[derive(Debug, Clone, Default)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirmation_password: String,
}

/// User operations exposed to the HTTP layer
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync + std::fmt::Debug {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, login: &str, password: &str) -> Result<User, DomainError>;
    async fn find_user_by_email(&self, email: &Email) -> Result<User, DomainError>;
    async fn user_exists(&self, email: &Email) -> bool;
    async fn update_password(
        &self,
        email: &Email,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError>;
    async fn delete_user(&self, email: &Email) -> Result<User, DomainError>;
    async fn list_teams_for_user(&self, email: &Email) -> Result<Vec<Team>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// User service
///
/// Deleting a user also removes the teams it alone occupies, so the service
/// reaches into the team collection and the team resource cleaner.
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    teams: Arc<dyn TeamRepository>,
    cleaner: Arc<dyn TeamResourceCleaner>,
}

impl<R: UserRepository, H: PasswordHasher> std::fmt::Debug for UserService<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("repository", &self.repository)
            .field("hasher", &self.hasher)
            .field("teams", &self.teams)
            .finish()
    }
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<H>,
        teams: Arc<dyn TeamRepository>,
        cleaner: Arc<dyn TeamResourceCleaner>,
    ) -> Self {
        Self {
            repository,
            hasher,
            teams,
            cleaner,
        }
    }

    /// Create a user, hashing the password before it is stored
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_required_fields(
            &request.name,
            &request.email,
            &request.username,
            &request.password,
        )
        .map_err(|e| DomainError::missing_required_field(e.to_string()))?;

        let email = Email::new(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        let username = request.username.trim().to_string();
        validate_username(&username).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.exists(&email).await? {
            return Err(DomainError::duplicate(DUPLICATE_EMAIL));
        }

        if self.repository.username_exists(&username).await? {
            return Err(DomainError::duplicate(DUPLICATE_USERNAME));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(request.name.trim(), email, username, password_hash);

        info!(email = %user.email(), username = %user.username(), "Creating user");

        match self.repository.create(user.clone()).await {
            Ok(created) => Ok(created),
            // Lost a race with a concurrent sign-up; report which field collided
            Err(DomainError::Duplicate { .. }) => {
                if self.repository.exists(user.email()).await? {
                    Err(DomainError::duplicate(DUPLICATE_EMAIL))
                } else {
                    Err(DomainError::duplicate(DUPLICATE_USERNAME))
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a login (email or username) and check the password
    ///
    /// Every failure looks the same to the caller.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User, DomainError> {
        let login = login.trim();

        if login.is_empty() || password.is_empty() {
            return Err(DomainError::validation(INVALID_CREDENTIALS));
        }

        let user = match Email::new(login) {
            Ok(email) => self.repository.get(&email).await?,
            Err(_) => self.repository.get_by_username(login).await?,
        };

        let Some(user) = user else {
            debug!(login = %login, "Sign-in for unknown user");
            return Err(DomainError::validation(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(password, user.password_hash()) {
            warn!(email = %user.email(), "Sign-in with wrong password");
            return Err(DomainError::validation(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &Email) -> Result<User, DomainError> {
        debug!(email = %email, "Looking up user");

        self.repository
            .get(email)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    /// Lookup errors count as "does not exist"
    pub async fn exists(&self, email: &Email) -> bool {
        match self.repository.exists(email).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(email = %email, error = %e, "User lookup failed");
                false
            }
        }
    }

    /// Re-hash and persist a new password for an existing user
    pub async fn change_password(&self, email: &Email, new_password: &str) -> Result<User, DomainError> {
        let mut user = self.find_by_email(email).await?;

        user.set_password_hash(self.hasher.hash(new_password)?);

        info!(email = %email, "Changing password");
        self.repository.update(user).await
    }

    /// Check the current password and confirmation, then change the password
    pub async fn update_password(
        &self,
        email: &Email,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError> {
        if request.current_password.is_empty()
            || request.new_password.is_empty()
            || request.confirmation_password.is_empty()
        {
            return Err(DomainError::missing_required_field(PASSWORD_FIELDS_REQUIRED));
        }

        if request.new_password != request.confirmation_password {
            return Err(DomainError::validation(PASSWORD_MISMATCH));
        }

        let user = self.find_by_email(email).await?;

        if !self.hasher.verify(&request.current_password, user.password_hash()) {
            return Err(DomainError::validation(WRONG_PASSWORD));
        }

        self.change_password(email, &request.new_password).await
    }

    /// Delete a user after removing every team it alone owns and occupies
    ///
    /// The user record stays when any team could not be removed.
    pub async fn delete(&self, email: &Email) -> Result<User, DomainError> {
        let user = self.find_by_email(email).await?;

        let cascade = TeamCascade::plan(self.teams.clone(), self.cleaner.clone(), email).await?;
        info!(email = %email, teams = cascade.planned().len(), "Deleting user");

        let outcome = cascade.execute().await;
        if !outcome.is_complete() {
            warn!(email = %email, failures = outcome.failures.len(), "Keeping user after failed cascade");
        }
        outcome.into_result()?;

        self.repository.delete(email).await?;
        Ok(user)
    }

    pub async fn list_teams(&self, email: &Email) -> Result<Vec<Team>, DomainError> {
        self.teams.list_by_member(email).await
    }
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait for UserService<R, H> {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        self.create(request).await
    }

    async fn authenticate(&self, login: &str, password: &str) -> Result<User, DomainError> {
        UserService::authenticate(self, login, password).await
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<User, DomainError> {
        self.find_by_email(email).await
    }

    async fn user_exists(&self, email: &Email) -> bool {
        self.exists(email).await
    }

    async fn update_password(
        &self,
        email: &Email,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError> {
        UserService::update_password(self, email, request).await
    }

    async fn delete_user(&self, email: &Email) -> Result<User, DomainError> {
        self.delete(email).await
    }

    async fn list_teams_for_user(&self, email: &Email) -> Result<Vec<Team>, DomainError> {
        self.list_teams(email).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::{MockTeamResourceCleaner, TeamAlias};
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::team::StorageTeamRepository;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::{StorageUserRepository, USER_UNIQUE_FIELDS};

    struct Fixture {
        service: UserService<StorageUserRepository, Argon2Hasher>,
        users: Arc<StorageUserRepository>,
        teams: Arc<dyn TeamRepository>,
    }

    fn fixture_with(cleaner: MockTeamResourceCleaner) -> Fixture {
        let users = Arc::new(StorageUserRepository::new(Arc::new(
            InMemoryStorage::<User>::new().with_unique_fields(USER_UNIQUE_FIELDS),
        )));
        let teams: Arc<dyn TeamRepository> = Arc::new(StorageTeamRepository::new(Arc::new(
            InMemoryStorage::<Team>::new(),
        )));

        let service = UserService::new(
            users.clone(),
            Arc::new(Argon2Hasher::new()),
            teams.clone(),
            Arc::new(cleaner),
        );

        Fixture {
            service,
            users,
            teams,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockTeamResourceCleaner::new())
    }

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    fn bob_request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Bob".to_string(),
            email: "bob@bar.example.org".to_string(),
            username: "bob".to_string(),
            password: "123456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let f = fixture();

        let user = f.service.create(bob_request()).await.unwrap();

        assert_eq!(user.name(), "Bob");
        assert_ne!(user.password_hash(), "123456");
        assert!(Argon2Hasher::new().verify("123456", user.password_hash()));
        assert!(user.redacted().password_hash().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_missing_fields() {
        let f = fixture();

        for request in [
            CreateUserRequest { name: String::new(), ..bob_request() },
            CreateUserRequest { email: String::new(), ..bob_request() },
            CreateUserRequest { username: " ".to_string(), ..bob_request() },
            CreateUserRequest { password: String::new(), ..bob_request() },
        ] {
            let err = f.service.create(request).await.unwrap_err();
            assert!(matches!(err, DomainError::MissingRequiredField { .. }));
        }

        assert_eq!(f.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let f = fixture();

        let request = CreateUserRequest {
            email: "not-an-email".to_string(),
            ..bob_request()
        };

        let err = f.service.create(request).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_user_duplicates() {
        let f = fixture();
        f.service.create(bob_request()).await.unwrap();

        let err = f.service.create(bob_request()).await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { ref message } if message == DUPLICATE_EMAIL));

        let same_username = CreateUserRequest {
            email: "robert@bar.example.org".to_string(),
            ..bob_request()
        };
        let err = f.service.create(same_username).await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { ref message } if message == DUPLICATE_USERNAME));
    }

    #[tokio::test]
    async fn test_authenticate_by_email_or_username() {
        let f = fixture();
        f.service.create(bob_request()).await.unwrap();

        let by_email = f.service.authenticate("bob@bar.example.org", "123456").await.unwrap();
        let by_username = f.service.authenticate("bob", "123456").await.unwrap();

        assert_eq!(by_email.email(), by_username.email());
    }

    #[tokio::test]
    async fn test_authenticate_failures_look_alike() {
        let f = fixture();
        f.service.create(bob_request()).await.unwrap();

        for (login, password) in [("bob", "wrong"), ("alice", "123456"), ("", "123456"), ("bob", "")] {
            let err = f.service.authenticate(login, password).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation { ref message } if message == INVALID_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn test_find_and_exists() {
        let f = fixture();
        f.service.create(bob_request()).await.unwrap();

        assert!(f.service.exists(&email("bob@bar.example.org")).await);
        assert!(!f.service.exists(&email("alice@bar.example.org")).await);

        let err = f.service.find_by_email(&email("alice@bar.example.org")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { ref message } if message == USER_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_password() {
        let f = fixture();
        f.service.create(bob_request()).await.unwrap();
        let bob = email("bob@bar.example.org");

        let request = UpdatePasswordRequest {
            current_password: "123456".to_string(),
            new_password: "654321".to_string(),
            confirmation_password: "654321".to_string(),
        };
        f.service.update_password(&bob, request).await.unwrap();

        assert!(f.service.authenticate("bob", "654321").await.is_ok());
        assert!(f.service.authenticate("bob", "123456").await.is_err());
    }

    #[tokio::test]
    async fn test_update_password_rejections() {
        let f = fixture();
        f.service.create(bob_request()).await.unwrap();
        let bob = email("bob@bar.example.org");

        let missing = UpdatePasswordRequest {
            current_password: "123456".to_string(),
            ..Default::default()
        };
        let err = f.service.update_password(&bob, missing).await.unwrap_err();
        assert!(matches!(err, DomainError::MissingRequiredField { .. }));

        let mismatch = UpdatePasswordRequest {
            current_password: "123456".to_string(),
            new_password: "a".to_string(),
            confirmation_password: "b".to_string(),
        };
        let err = f.service.update_password(&bob, mismatch).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref message } if message == PASSWORD_MISMATCH));

        let wrong = UpdatePasswordRequest {
            current_password: "nope".to_string(),
            new_password: "a".to_string(),
            confirmation_password: "a".to_string(),
        };
        let err = f.service.update_password(&bob, wrong).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref message } if message == WRONG_PASSWORD));
    }

    #[tokio::test]
    async fn test_change_password_unknown_user() {
        let f = fixture();

        let err = f
            .service
            .change_password(&email("ghost@bar.example.org"), "secret")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    async fn seed_teams(teams: &Arc<dyn TeamRepository>) {
        let bob = email("bob@bar.example.org");
        teams
            .create(Team::new("Solo", TeamAlias::new("solo").unwrap(), bob.clone()).unwrap())
            .await
            .unwrap();

        let mut shared = Team::new("Shared", TeamAlias::new("shared").unwrap(), bob).unwrap();
        shared.add_users(vec![email("alice@bar.example.org")]);
        teams.create(shared).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_sole_member_teams() {
        let mut cleaner = MockTeamResourceCleaner::new();
        cleaner.expect_delete_services().times(1).returning(|_| Ok(3));
        cleaner.expect_delete_clients().times(1).returning(|_| Ok(1));

        let f = fixture_with(cleaner);
        f.service.create(bob_request()).await.unwrap();
        seed_teams(&f.teams).await;
        let bob = email("bob@bar.example.org");

        let deleted = f.service.delete(&bob).await.unwrap();

        assert_eq!(deleted.email(), &bob);
        assert!(!f.service.exists(&bob).await);
        assert!(f.teams.get(&TeamAlias::new("solo").unwrap()).await.unwrap().is_none());

        // Shared teams survive and keep the deleted user listed
        let shared = f.teams.get(&TeamAlias::new("shared").unwrap()).await.unwrap().unwrap();
        assert!(shared.is_member(&bob));
    }

    #[tokio::test]
    async fn test_delete_user_kept_when_cascade_fails() {
        let mut cleaner = MockTeamResourceCleaner::new();
        cleaner
            .expect_delete_services()
            .returning(|_| Err(DomainError::storage("services unavailable")));
        cleaner.expect_delete_clients().never();

        let f = fixture_with(cleaner);
        f.service.create(bob_request()).await.unwrap();
        seed_teams(&f.teams).await;
        let bob = email("bob@bar.example.org");

        let err = f.service.delete(&bob).await.unwrap_err();

        assert!(matches!(err, DomainError::Cascade { .. }));
        assert!(f.service.exists(&bob).await);
        assert!(f.teams.get(&TeamAlias::new("solo").unwrap()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let f = fixture();
        let err = f.service.delete(&email("ghost@bar.example.org")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_teams_for_user() {
        let f = fixture();
        seed_teams(&f.teams).await;

        let alice_teams = f.service.list_teams(&email("alice@bar.example.org")).await.unwrap();
        assert_eq!(alice_teams.len(), 1);
        assert_eq!(alice_teams[0].alias().as_str(), "shared");

        let bob_teams = f.service.list_teams(&email("bob@bar.example.org")).await.unwrap();
        assert_eq!(bob_teams.len(), 2);
    }
}
