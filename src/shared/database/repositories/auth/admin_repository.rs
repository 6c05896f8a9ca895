use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use crate::domains::admin::models::{Admin, AdminQuery, AdminRole, NewAdmin};
use crate::shared::database::postgres::{db_error, PgUnitOfWork};
use crate::shared::database::repositories::contains_pattern;
use crate::shared::database::store::AdminRepository;
use crate::shared::utils::PageRequest;

const ADMIN_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, role, \
                             active, last_login, created_at, updated_at";

fn admin_from_row(row: &PgRow) -> Result<Admin> {
    let role: String = row.try_get("role")?;
    Ok(Admin {
        id: row.try_get::<i64, _>("id")? as u64,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role: role.parse::<AdminRole>().context("Invalid admin role in database")?,
        active: row.try_get("active")?,
        last_login: row.try_get("last_login")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn push_admin_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AdminQuery) {
    builder.push(" WHERE 1 = 1");
    if let Some(active) = query.active {
        builder.push(" AND active = ").push_bind(active);
    }
    if let Some(role) = query.role {
        builder.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(since) = query.last_login_since {
        builder.push(" AND last_login >= ").push_bind(since);
    }
    if let Some(search) = &query.search {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR last_name ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl AdminRepository for PgUnitOfWork {
    async fn insert_admin(&mut self, admin: &NewAdmin) -> Result<Admin> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO admins (username, email, password_hash, first_name, last_name, role, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8)
            RETURNING {}
            "#,
            ADMIN_COLUMNS
        ))
        .bind(&admin.username)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(admin.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to create admin"))?;

        admin_from_row(&row)
    }

    async fn find_admin_by_id(&mut self, id: u64) -> Result<Option<Admin>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS))
            .bind(id as i64)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch admin by id"))?;

        row.as_ref().map(admin_from_row).transpose()
    }

    async fn find_admin_by_username(&mut self, username: &str) -> Result<Option<Admin>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE username = $1", ADMIN_COLUMNS))
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch admin by username"))?;

        row.as_ref().map(admin_from_row).transpose()
    }

    async fn find_admin_by_email(&mut self, email: &str) -> Result<Option<Admin>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE email = $1", ADMIN_COLUMNS))
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch admin by email"))?;

        row.as_ref().map(admin_from_row).transpose()
    }

    async fn find_admins(&mut self, query: &AdminQuery) -> Result<Vec<Admin>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM admins", ADMIN_COLUMNS));
        push_admin_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch admins"))?;

        rows.iter().map(admin_from_row).collect()
    }

    async fn find_admin_page(&mut self, query: &AdminQuery, page: &PageRequest) -> Result<Vec<Admin>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM admins", ADMIN_COLUMNS));
        push_admin_filters(&mut builder, query);
        let direction = page.direction.as_sql();
        builder.push(format!(
            " ORDER BY {} {}, id {}",
            page.sort_column, direction, direction
        ));
        builder.push(" LIMIT ").push_bind(page.size as i64);
        builder.push(" OFFSET ").push_bind(page.offset() as i64);

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch admin page"))?;

        rows.iter().map(admin_from_row).collect()
    }

    async fn count_admins(&mut self, query: &AdminQuery) -> Result<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS count FROM admins");
        push_admin_filters(&mut builder, query);

        let row = builder
            .build()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to count admins"))?;

        Ok(row.try_get::<i64, _>("count")? as u64)
    }

    async fn update_admin(&mut self, admin: &Admin) -> Result<Admin> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE admins
            SET email = $2, password_hash = $3, first_name = $4, last_name = $5,
                role = $6, active = $7, last_login = $8, updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            ADMIN_COLUMNS
        ))
        .bind(admin.id as i64)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(admin.role.as_str())
        .bind(admin.active)
        .bind(admin.last_login)
        .bind(Utc::now())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to update admin"))?;

        admin_from_row(&row)
    }

    async fn delete_admin(&mut self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to delete admin"))?;

        Ok(result.rows_affected() > 0)
    }
}
