use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use crate::domains::auth::models::{NewUser, User, UserQuery};
use crate::shared::database::postgres::{db_error, PgUnitOfWork};
use crate::shared::database::repositories::contains_pattern;
use crate::shared::database::store::UserRepository;
use crate::shared::utils::PageRequest;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, active, created_at, updated_at";

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get::<i64, _>("id")? as u64,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// WHERE 절 (목록 / 검색 / 카운트 공용)
fn push_user_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &UserQuery) {
    builder.push(" WHERE 1 = 1");
    if let Some(active) = query.active {
        builder.push(" AND active = ").push_bind(active);
    }
    if let Some(from) = query.created_from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = query.created_to {
        builder.push(" AND created_at <= ").push_bind(to);
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
impl UserRepository for PgUnitOfWork {
    async fn insert_user(&mut self, user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7)
            RETURNING id, username, email, password_hash, first_name, last_name, active, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to create user"))?;

        user_from_row(&row)
    }

    // ID로 사용자 조회
    // Get user by ID
    async fn find_user_by_id(&mut self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id as i64)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch user by id"))?;

        row.as_ref().map(user_from_row).transpose()
    }

    // 사용자명으로 조회 (로그인용)
    // Get user by username (for login)
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch user by username"))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch user by email"))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_users(&mut self, query: &UserQuery) -> Result<Vec<User>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_user_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch users"))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn find_user_page(&mut self, query: &UserQuery, page: &PageRequest) -> Result<Vec<User>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_user_filters(&mut builder, query);
        // sort_column은 허용 목록에서만 옴
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
            .map_err(|e| db_error(e, "Failed to fetch user page"))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn count_users(&mut self, query: &UserQuery) -> Result<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS count FROM users");
        push_user_filters(&mut builder, query);

        let row = builder
            .build()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to count users"))?;

        Ok(row.try_get::<i64, _>("count")? as u64)
    }

    async fn update_user(&mut self, user: &User) -> Result<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, first_name = $4, last_name = $5, active = $6, updated_at = $7
            WHERE id = $1
            RETURNING id, username, email, password_hash, first_name, last_name, active, created_at, updated_at
            "#,
        )
        .bind(user.id as i64)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.active)
        .bind(Utc::now())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to update user"))?;

        user_from_row(&row)
    }

    // wallets, transactions는 ON DELETE CASCADE
    async fn delete_user(&mut self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
