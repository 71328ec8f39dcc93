//! Registration service - Creates user accounts.
//!
//! A registration is one transaction: username check, email check,
//! hash, insert. The unique indexes behind [`UserStore::insert`] have
//! the final word when two registrations race past the checks.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MSG_REQUEST_REQUIRED;
use crate::domain::{NewUser, PasswordHasher, RegistrationRequest, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new user.
    ///
    /// # Errors
    /// - [`AppError::InvalidInput`] when the request is absent
    /// - [`AppError::DuplicateUsername`] / [`AppError::DuplicateEmail`] on collisions,
    ///   whether caught by the pre-checks or by the store
    /// - [`AppError::Storage`] when the store fails otherwise
    async fn register(&self, request: Option<RegistrationRequest>) -> AppResult<User>;

    /// Number of registered users (diagnostics)
    async fn count_users(&self) -> AppResult<u64>;
}

/// Concrete implementation of RegistrationService using Unit of Work.
pub struct RegistrationWorkflow<U: UnitOfWork> {
    uow: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U: UnitOfWork> RegistrationWorkflow<U> {
    /// Create new registration service with its store and hasher
    pub fn new(uow: Arc<U>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { uow, hasher }
    }

    /// Checks, hash and insert against a transaction-bound store.
    async fn create_user(
        &self,
        users: &dyn UserStore,
        request: RegistrationRequest,
    ) -> AppResult<User> {
        if users.exists_by_username(&request.username).await? {
            tracing::warn!(username = %request.username, "Registration rejected: username taken");
            return Err(AppError::DuplicateUsername);
        }

        if users.exists_by_email(&request.email).await? {
            tracing::warn!(username = %request.username, "Registration rejected: email taken");
            return Err(AppError::DuplicateEmail);
        }

        let RegistrationRequest {
            username,
            email,
            password,
        } = request;

        let password_hash = self.hasher.hash(&password)?;
        drop(password);

        users
            .insert(NewUser::new(username, email, password_hash))
            .await
    }
}

#[async_trait]
impl<U: UnitOfWork> RegistrationService for RegistrationWorkflow<U> {
    async fn register(&self, request: Option<RegistrationRequest>) -> AppResult<User> {
        let request = request.ok_or_else(|| AppError::invalid_input(MSG_REQUEST_REQUIRED))?;
        tracing::info!(username = %request.username, "Registering user");

        let txn = self.uow.begin().await?;
        let result = self.create_user(txn.users(), request).await;

        match result {
            Ok(user) => {
                txn.commit().await?;
                tracing::info!(user_id = user.id, username = %user.username, "User registered");
                Ok(user)
            }
            Err(e) => {
                if !e.is_duplicate() {
                    tracing::error!(error = %e, "Registration failed");
                }
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.uow.users().count().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use sea_orm::DbErr;

    use super::*;
    use crate::domain::{HashedPassword, MockPasswordHasher};
    use crate::infra::{MockUserStore, StoreTransaction};

    /// Counts commits and rollbacks of transactions handed out.
    #[derive(Default)]
    struct Outcomes {
        begun: AtomicUsize,
        commits: AtomicUsize,
        rollbacks: AtomicUsize,
    }

    /// Unit of Work whose transactions all share one mocked store.
    struct TestUnitOfWork {
        store: Arc<MockUserStore>,
        outcomes: Arc<Outcomes>,
    }

    impl TestUnitOfWork {
        fn new(store: MockUserStore) -> Self {
            Self {
                store: Arc::new(store),
                outcomes: Arc::new(Outcomes::default()),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserStore> {
            self.store.clone()
        }

        async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
            self.outcomes.begun.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(TestTransaction {
                store: self.store.clone(),
                outcomes: self.outcomes.clone(),
            }))
        }
    }

    struct TestTransaction {
        store: Arc<MockUserStore>,
        outcomes: Arc<Outcomes>,
    }

    #[async_trait]
    impl StoreTransaction for TestTransaction {
        fn users(&self) -> &dyn UserStore {
            self.store.as_ref()
        }

        async fn commit(self: Box<Self>) -> AppResult<()> {
            self.outcomes.commits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> AppResult<()> {
            self.outcomes.rollbacks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_request() -> RegistrationRequest {
        RegistrationRequest::new("testuser", "test@example.com", "password123")
    }

    fn encoding_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|plain| plain == "password123")
            .times(1)
            .returning(|_| Ok(HashedPassword::from_hash("encodedPassword".to_string())));
        hasher
    }

    fn untouched_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        hasher
    }

    fn workflow(
        store: MockUserStore,
        hasher: MockPasswordHasher,
    ) -> (RegistrationWorkflow<TestUnitOfWork>, Arc<Outcomes>) {
        let uow = TestUnitOfWork::new(store);
        let outcomes = uow.outcomes.clone();
        (RegistrationWorkflow::new(Arc::new(uow), Arc::new(hasher)), outcomes)
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .withf(|name| name == "testuser")
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_exists_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_insert()
            .withf(|user| {
                user.username == "testuser"
                    && user.email == "test@example.com"
                    && user.password_hash.as_str() == "encodedPassword"
                    && user.enabled
                    && user.role == "USER"
            })
            .times(1)
            .returning(|user| Ok(user.into_user(1, Utc::now())));

        let (service, outcomes) = workflow(store, encoding_hasher());
        let user = service.register(Some(test_request())).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.password_hash.as_str(), "encodedPassword");
        assert_ne!(user.password_hash.as_str(), "password123");
        assert!(user.enabled);
        assert_eq!(user.role, "USER");

        assert_eq!(outcomes.commits.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.rollbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .withf(|name| name == "existinguser")
            .times(1)
            .returning(|_| Ok(true));
        store.expect_exists_by_email().never();
        store.expect_insert().never();

        let (service, outcomes) = workflow(store, untouched_hasher());
        let request = RegistrationRequest::new("existinguser", "test@example.com", "password123");
        let err = service.register(Some(request)).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateUsername));
        assert_eq!(err.to_string(), "Username already exists");
        assert_eq!(outcomes.commits.load(Ordering::SeqCst), 0);
        assert_eq!(outcomes.rollbacks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().returning(|_| Ok(false));
        store
            .expect_exists_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(|_| Ok(true));
        store.expect_insert().never();

        let (service, outcomes) = workflow(store, untouched_hasher());
        let err = service.register(Some(test_request())).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(err.to_string(), "Email already exists");
        assert_eq!(outcomes.commits.load(Ordering::SeqCst), 0);
        assert_eq!(outcomes.rollbacks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_absent_request() {
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().never();
        store.expect_insert().never();

        let (service, outcomes) = workflow(store, untouched_hasher());
        let err = service.register(None).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(outcomes.begun.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_lost_race_on_insert() {
        // Pre-checks pass, but another registration commits first
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().returning(|_| Ok(false));
        store.expect_exists_by_email().returning(|_| Ok(false));
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::DuplicateUsername));

        let (service, outcomes) = workflow(store, encoding_hasher());
        let err = service.register(Some(test_request())).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateUsername));
        assert_eq!(outcomes.commits.load(Ordering::SeqCst), 0);
        assert_eq!(outcomes.rollbacks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_storage_failure() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .returning(|_| Err(AppError::Storage(DbErr::Custom("connection reset".into()))));
        store.expect_insert().never();

        let (service, outcomes) = workflow(store, untouched_hasher());
        let err = service.register(Some(test_request())).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(outcomes.rollbacks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_hash_failure_skips_insert() {
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().returning(|_| Ok(false));
        store.expect_exists_by_email().returning(|_| Ok(false));
        store.expect_insert().never();

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(AppError::internal("Password hash failed")));

        let (service, outcomes) = workflow(store, hasher);
        let err = service.register(Some(test_request())).await.unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(outcomes.rollbacks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_username_reaches_store() {
        // Content rules belong to the transport validator
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .withf(|name| name.is_empty())
            .returning(|_| Ok(false));
        store.expect_exists_by_email().returning(|_| Ok(false));
        store
            .expect_insert()
            .returning(|user| Ok(user.into_user(2, Utc::now())));

        let (service, _) = workflow(store, encoding_hasher());
        let request = RegistrationRequest::new("", "test@example.com", "password123");
        let user = service.register(Some(request)).await.unwrap();

        assert_eq!(user.username, "");
    }

    #[tokio::test]
    async fn test_count_users_passthrough() {
        let mut store = MockUserStore::new();
        store.expect_count().times(1).returning(|| Ok(42));

        let (service, outcomes) = workflow(store, untouched_hasher());

        assert_eq!(service.count_users().await.unwrap(), 42);
        assert_eq!(outcomes.begun.load(Ordering::SeqCst), 0);
    }
}
