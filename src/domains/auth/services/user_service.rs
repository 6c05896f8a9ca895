use crate::shared::database::{unique_violation, Database, UnitOfWork, UserRepository, USERS_EMAIL_KEY};
use crate::shared::errors::AccountError;
use crate::shared::utils::{Page, PageRequest};
use crate::domains::auth::models::{NewUser, RegisterUserRequest, UpdateUserRequest, User, UserQuery};
use crate::domains::auth::services::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

// 유니크 위반 → AlreadyExists, 그 외 → DatabaseError
fn user_write_error(action: &str, err: anyhow::Error) -> AccountError {
    match unique_violation(&err) {
        Some(v) if v.constraint == USERS_EMAIL_KEY => AccountError::AlreadyExists { field: "Email" },
        Some(_) => AccountError::AlreadyExists { field: "Username" },
        None => AccountError::DatabaseError(format!("Failed to {}: {}", action, err)),
    }
}

/// 사용자 계정 서비스
/// UserService: registration, authentication and profile management
#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AccountError> {
        self.db
            .begin()
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to begin transaction: {}", e)))
    }

    async fn load(uow: &mut Box<dyn UnitOfWork>, id: u64) -> Result<User, AccountError> {
        uow.find_user_by_id(id)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or_else(AccountError::user_not_found)
    }

    async fn save(uow: &mut Box<dyn UnitOfWork>, user: &User) -> Result<User, AccountError> {
        uow.update_user(user)
            .await
            .map_err(|e| user_write_error("update user", e))
    }

    async fn commit(uow: Box<dyn UnitOfWork>, action: &str) -> Result<(), AccountError> {
        uow.commit().await.map_err(|e| user_write_error(action, e))
    }

    /// 회원가입
    /// 1. username 중복 → 2. email 중복 → 3. 해싱 → 4. 저장 (active=true)
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;

        let existing = uow
            .find_user_by_username(&request.username)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to check username existence: {}", e)))?;
        if existing.is_some() {
            return Err(AccountError::AlreadyExists { field: "Username" });
        }

        let existing = uow
            .find_user_by_email(&request.email)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to check email existence: {}", e)))?;
        if existing.is_some() {
            return Err(AccountError::AlreadyExists { field: "Email" });
        }

        let password_hash = hash_password(&request.password)?;

        let user = uow
            .insert_user(&NewUser {
                username: request.username,
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
            })
            .await
            .map_err(|e| user_write_error("create user", e))?;
        Self::commit(uow, "create user").await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// 로그인 검증 (알 수 없는 사용자, 잘못된 비밀번호, 비활성 계정 → InvalidCredentials)
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;
        let user = uow
            .find_user_by_username(username)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch user: {}", e)))?;

        let Some(user) = user else {
            tracing::warn!(username, "Login failed: unknown user");
            return Err(AccountError::InvalidCredentials(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(username, "Login failed: wrong password");
            return Err(AccountError::InvalidCredentials(INVALID_CREDENTIALS));
        }

        if !user.active {
            tracing::warn!(username, "Login failed: inactive account");
            return Err(AccountError::InvalidCredentials(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: u64) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;
        Self::load(&mut uow, id).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;
        uow.find_user_by_username(username)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or_else(AccountError::user_not_found)
    }

    /// 전체 사용자 (최신순)
    pub async fn find_all(&self) -> Result<Vec<User>, AccountError> {
        let mut uow = self.begin().await?;
        uow.find_users(&UserQuery::default())
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch users: {}", e)))
    }

    pub async fn list_paged(&self, active: Option<bool>, page: &PageRequest) -> Result<Page<User>, AccountError> {
        let query = UserQuery {
            active,
            ..Default::default()
        };
        self.page(&query, page).await
    }

    /// username, email, first name, last name 부분 일치 (대소문자 무시)
    pub async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<User>, AccountError> {
        let query = UserQuery {
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.page(&query, page).await
    }

    async fn page(&self, query: &UserQuery, page: &PageRequest) -> Result<Page<User>, AccountError> {
        let mut uow = self.begin().await?;
        let users = uow
            .find_user_page(query, page)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch users: {}", e)))?;
        let total = uow
            .count_users(query)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to count users: {}", e)))?;

        Ok(Page::new(users, total, page))
    }

    /// 프로필 수정 (None 필드 유지). 다른 사용자의 email이면 AlreadyExists
    pub async fn update(&self, id: u64, request: UpdateUserRequest) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;
        let mut user = Self::load(&mut uow, id).await?;

        if let Some(email) = request.email {
            if email != user.email {
                let taken = uow
                    .find_user_by_email(&email)
                    .await
                    .map_err(|e| AccountError::DatabaseError(format!("Failed to check email existence: {}", e)))?
                    .is_some_and(|other| other.id != id);
                if taken {
                    return Err(AccountError::AlreadyExists { field: "Email" });
                }
                user.email = email;
            }
        }
        if let Some(first_name) = request.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = request.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(active) = request.active {
            user.active = active;
        }

        let user = Self::save(&mut uow, &user).await?;
        Self::commit(uow, "update user").await?;

        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    /// 활성 플래그 반전 (관리자 대시보드)
    pub async fn toggle_status(&self, id: u64) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;
        let mut user = Self::load(&mut uow, id).await?;
        user.active = !user.active;

        let user = Self::save(&mut uow, &user).await?;
        Self::commit(uow, "toggle user status").await?;

        tracing::info!(user_id = id, active = user.active, "User status toggled");
        Ok(user)
    }

    /// 비활성화 (멱등)
    pub async fn deactivate(&self, id: u64) -> Result<User, AccountError> {
        let mut uow = self.begin().await?;
        let mut user = Self::load(&mut uow, id).await?;
        user.active = false;

        let user = Self::save(&mut uow, &user).await?;
        Self::commit(uow, "deactivate user").await?;

        tracing::info!(user_id = id, "User deactivated");
        Ok(user)
    }

    /// 삭제 (지갑 / 트랜잭션 cascade)
    pub async fn delete(&self, id: u64) -> Result<(), AccountError> {
        let mut uow = self.begin().await?;
        let deleted = uow
            .delete_user(id)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to delete user: {}", e)))?;
        if !deleted {
            return Err(AccountError::user_not_found());
        }
        Self::commit(uow, "delete user").await?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn change_password(
        &self,
        id: u64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        let mut uow = self.begin().await?;
        let mut user = Self::load(&mut uow, id).await?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(AccountError::InvalidCurrentPassword);
        }
        user.password_hash = hash_password(new_password)?;

        Self::save(&mut uow, &user).await?;
        Self::commit(uow, "change password").await?;

        tracing::info!(user_id = id, "User password changed");
        Ok(())
    }
}
