use chrono::{DateTime, Utc};
use crate::shared::database::{unique_violation, AdminRepository, Database, UnitOfWork, ADMINS_EMAIL_KEY};
use crate::shared::errors::AccountError;
use crate::shared::utils::{Page, PageRequest};
use crate::domains::admin::models::{Admin, AdminQuery, AdminRole, NewAdmin, RegisterAdminRequest, UpdateAdminRequest};
use crate::domains::auth::services::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid credentials or inactive account";

fn admin_write_error(action: &str, err: anyhow::Error) -> AccountError {
    match unique_violation(&err) {
        Some(v) if v.constraint == ADMINS_EMAIL_KEY => AccountError::AlreadyExists { field: "Admin email" },
        Some(_) => AccountError::AlreadyExists { field: "Admin username" },
        None => AccountError::DatabaseError(format!("Failed to {}: {}", action, err)),
    }
}

/// 관리자 계정 서비스
/// AdminService: admin registration, authentication (records last login) and management
#[derive(Clone)]
pub struct AdminService {
    db: Database,
}

impl AdminService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AccountError> {
        self.db
            .begin()
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to begin transaction: {}", e)))
    }

    async fn load(uow: &mut Box<dyn UnitOfWork>, id: u64) -> Result<Admin, AccountError> {
        uow.find_admin_by_id(id)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch admin: {}", e)))?
            .ok_or_else(AccountError::admin_not_found)
    }

    async fn save(uow: &mut Box<dyn UnitOfWork>, admin: &Admin) -> Result<Admin, AccountError> {
        uow.update_admin(admin)
            .await
            .map_err(|e| admin_write_error("update admin", e))
    }

    async fn commit(uow: Box<dyn UnitOfWork>, action: &str) -> Result<(), AccountError> {
        uow.commit().await.map_err(|e| admin_write_error(action, e))
    }

    async fn count(&self, query: &AdminQuery) -> Result<u64, AccountError> {
        let mut uow = self.begin().await?;
        uow.count_admins(query)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to count admins: {}", e)))
    }

    async fn page(&self, query: &AdminQuery, page: &PageRequest) -> Result<Page<Admin>, AccountError> {
        let mut uow = self.begin().await?;
        let admins = uow
            .find_admin_page(query, page)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch admins: {}", e)))?;
        let total = uow
            .count_admins(query)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to count admins: {}", e)))?;

        Ok(Page::new(admins, total, page))
    }

    /// 관리자 등록 (role 생략 시 ADMIN)
    pub async fn register(&self, request: RegisterAdminRequest) -> Result<Admin, AccountError> {
        let mut uow = self.begin().await?;

        let existing = uow
            .find_admin_by_username(&request.username)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to check username existence: {}", e)))?;
        if existing.is_some() {
            return Err(AccountError::AlreadyExists { field: "Admin username" });
        }

        let existing = uow
            .find_admin_by_email(&request.email)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to check email existence: {}", e)))?;
        if existing.is_some() {
            return Err(AccountError::AlreadyExists { field: "Admin email" });
        }

        let password_hash = hash_password(&request.password)?;

        let admin = uow
            .insert_admin(&NewAdmin {
                username: request.username,
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                role: request.role.unwrap_or(AdminRole::Admin),
            })
            .await
            .map_err(|e| admin_write_error("create admin", e))?;
        Self::commit(uow, "create admin").await?;

        tracing::info!(admin_id = admin.id, username = %admin.username, role = %admin.role, "Admin registered");
        Ok(admin)
    }

    /// 로그인 성공 시 last_login 갱신
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Admin, AccountError> {
        let mut uow = self.begin().await?;
        let admin = uow
            .find_admin_by_username(username)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch admin: {}", e)))?;

        let mut admin = match admin {
            Some(admin) if admin.active && verify_password(password, &admin.password_hash)? => admin,
            _ => {
                tracing::warn!(username, "Admin authentication failed");
                return Err(AccountError::InvalidCredentials(INVALID_CREDENTIALS));
            }
        };

        admin.last_login = Some(Utc::now());
        let admin = Self::save(&mut uow, &admin).await?;
        Self::commit(uow, "record admin login").await?;

        tracing::info!(admin_id = admin.id, username, "Admin authenticated");
        Ok(admin)
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Admin, AccountError> {
        let mut uow = self.begin().await?;
        Self::load(&mut uow, id).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Admin, AccountError> {
        let mut uow = self.begin().await?;
        uow.find_admin_by_username(username)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch admin: {}", e)))?
            .ok_or_else(AccountError::admin_not_found)
    }

    /// 활성 관리자만
    pub async fn list_paged(&self, page: &PageRequest) -> Result<Page<Admin>, AccountError> {
        let query = AdminQuery {
            active: Some(true),
            ..Default::default()
        };
        self.page(&query, page).await
    }

    /// 활성 관리자 중 검색
    pub async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Admin>, AccountError> {
        let query = AdminQuery {
            active: Some(true),
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.page(&query, page).await
    }

    pub async fn find_by_role(&self, role: AdminRole) -> Result<Vec<Admin>, AccountError> {
        let mut uow = self.begin().await?;
        uow.find_admins(&AdminQuery {
            role: Some(role),
            ..Default::default()
        })
        .await
        .map_err(|e| AccountError::DatabaseError(format!("Failed to fetch admins by role: {}", e)))
    }

    /// 수정 (None 필드 유지, role / active 포함)
    pub async fn update(&self, id: u64, request: UpdateAdminRequest) -> Result<Admin, AccountError> {
        let mut uow = self.begin().await?;
        let mut admin = Self::load(&mut uow, id).await?;

        if let Some(email) = request.email {
            if email != admin.email {
                let taken = uow
                    .find_admin_by_email(&email)
                    .await
                    .map_err(|e| AccountError::DatabaseError(format!("Failed to check email existence: {}", e)))?
                    .is_some_and(|other| other.id != id);
                if taken {
                    return Err(AccountError::AlreadyExists { field: "Admin email" });
                }
                admin.email = email;
            }
        }
        if let Some(first_name) = request.first_name {
            admin.first_name = Some(first_name);
        }
        if let Some(last_name) = request.last_name {
            admin.last_name = Some(last_name);
        }
        if let Some(role) = request.role {
            admin.role = role;
        }
        if let Some(active) = request.active {
            admin.active = active;
        }

        let admin = Self::save(&mut uow, &admin).await?;
        Self::commit(uow, "update admin").await?;

        tracing::info!(admin_id = id, "Admin updated");
        Ok(admin)
    }

    /// 비활성화 (이미 비활성이어도 성공)
    pub async fn deactivate(&self, id: u64) -> Result<Admin, AccountError> {
        let mut uow = self.begin().await?;
        let mut admin = Self::load(&mut uow, id).await?;
        admin.active = false;

        let admin = Self::save(&mut uow, &admin).await?;
        Self::commit(uow, "deactivate admin").await?;

        tracing::info!(admin_id = id, username = %admin.username, "Admin deactivated");
        Ok(admin)
    }

    pub async fn delete(&self, id: u64) -> Result<(), AccountError> {
        let mut uow = self.begin().await?;
        let deleted = uow
            .delete_admin(id)
            .await
            .map_err(|e| AccountError::DatabaseError(format!("Failed to delete admin: {}", e)))?;
        if !deleted {
            return Err(AccountError::admin_not_found());
        }
        Self::commit(uow, "delete admin").await?;

        tracing::info!(admin_id = id, "Admin deleted");
        Ok(())
    }

    pub async fn change_password(
        &self,
        id: u64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        let mut uow = self.begin().await?;
        let mut admin = Self::load(&mut uow, id).await?;

        if !verify_password(current_password, &admin.password_hash)? {
            tracing::warn!(admin_id = id, "Invalid current password for admin");
            return Err(AccountError::InvalidCurrentPassword);
        }
        admin.password_hash = hash_password(new_password)?;

        Self::save(&mut uow, &admin).await?;
        Self::commit(uow, "change admin password").await?;

        tracing::info!(admin_id = id, "Admin password changed");
        Ok(())
    }

    pub async fn active_admin_count(&self) -> Result<u64, AccountError> {
        self.count(&AdminQuery {
            active: Some(true),
            ..Default::default()
        })
        .await
    }

    /// last_login >= since
    pub async fn recently_active_admin_count(&self, since: DateTime<Utc>) -> Result<u64, AccountError> {
        self.count(&AdminQuery {
            last_login_since: Some(since),
            ..Default::default()
        })
        .await
    }
}
