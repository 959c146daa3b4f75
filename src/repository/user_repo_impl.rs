// ==========================================
// SCIM 用户同步服务 - 用户仓储实现
// ==========================================
// 实现: rusqlite + Arc<Mutex<Connection>>
// 对齐: scim_users 表（emails/schemas 为 JSON 文本列）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::user::{EmailAddress, ScimUser, ScimUserCreate, ScimUserUpdate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::user_repo::ScimUserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const USER_COLUMNS: &str = "user_id, realm_id, schemas, userName, externalId, \
    firstName, surName, displayName, active, emails, created_at, updated_at";

// ==========================================
// ScimUserRepositoryImpl
// ==========================================
pub struct ScimUserRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

// 行数据中间结构（JSON 列延迟解析，避免在 rusqlite 闭包里做 serde 转换）
struct UserRowData {
    user_id: String,
    realm_id: String,
    schemas_json: String,
    user_name: String,
    external_id: Option<String>,
    first_name: String,
    sur_name: String,
    display_name: String,
    active: bool,
    emails_json: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRowData {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            realm_id: row.get(1)?,
            schemas_json: row.get(2)?,
            user_name: row.get(3)?,
            external_id: row.get(4)?,
            first_name: row.get(5)?,
            sur_name: row.get(6)?,
            display_name: row.get(7)?,
            active: row.get(8)?,
            emails_json: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn into_user(self) -> RepositoryResult<ScimUser> {
        Ok(ScimUser {
            user_id: self.user_id,
            realm_id: self.realm_id,
            schemas: serde_json::from_str(&self.schemas_json)?,
            user_name: self.user_name,
            external_id: self.external_id,
            first_name: self.first_name,
            sur_name: self.sur_name,
            display_name: self.display_name,
            active: self.active,
            emails: serde_json::from_str(&self.emails_json)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ScimUserRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 Repository（连接行为需已统一配置）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_one(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepositoryResult<Option<ScimUser>> {
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query_map(params, UserRowData::from_row)?;
        match rows.next() {
            Some(data) => Ok(Some(data?.into_user()?)),
            None => Ok(None),
        }
    }

    fn persist(conn: &Connection, user: &ScimUser) -> RepositoryResult<()> {
        conn.execute(
            "INSERT INTO scim_users (user_id, realm_id, schemas, userName, externalId, \
             firstName, surName, displayName, active, emails, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                user.user_id,
                user.realm_id,
                serde_json::to_string(&user.schemas)?,
                user.user_name,
                user.external_id,
                user.first_name,
                user.sur_name,
                user.display_name,
                user.active,
                serde_json::to_string(&user.emails)?,
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ScimUserRepository for ScimUserRepositoryImpl {
    async fn create_user(
        &self,
        realm_id: &str,
        mut user: ScimUserCreate,
    ) -> RepositoryResult<ScimUser> {
        user.normalize_primary_email();
        let record = user.into_user(realm_id);

        let conn = self.lock()?;
        Self::persist(&conn, &record)?;
        Ok(record)
    }

    async fn get_user_by_id(
        &self,
        realm_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<ScimUser>> {
        let conn = self.lock()?;
        Self::query_one(
            &conn,
            &format!("SELECT {USER_COLUMNS} FROM scim_users WHERE realm_id = ?1 AND user_id = ?2"),
            params![realm_id, user_id],
        )
    }

    async fn get_user_by_username(
        &self,
        realm_id: &str,
        user_name: &str,
    ) -> RepositoryResult<Option<ScimUser>> {
        let conn = self.lock()?;
        Self::query_one(
            &conn,
            &format!("SELECT {USER_COLUMNS} FROM scim_users WHERE realm_id = ?1 AND userName = ?2"),
            params![realm_id, user_name],
        )
    }

    async fn get_user_by_email(
        &self,
        realm_id: &str,
        email: &str,
    ) -> RepositoryResult<Option<ScimUser>> {
        // 邮箱存储于 JSON 列，逐条解析比对（与源系统口径一致）
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM scim_users WHERE realm_id = ?1"
        ))?;
        let rows = stmt.query_map(params![realm_id], UserRowData::from_row)?;

        for data in rows {
            let user = data?.into_user()?;
            if user.emails.iter().any(|e| e.value == email) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    async fn list_users(
        &self,
        realm_id: &str,
        start_index: usize,
        count: usize,
        filter: Option<&str>,
    ) -> RepositoryResult<(Vec<ScimUser>, i64)> {
        let conn = self.lock()?;
        let offset = start_index.saturating_sub(1);
        let pattern = filter.map(|f| format!("%{}%", f));

        let (where_clause, total, rows_sql);
        match &pattern {
            Some(_) => {
                where_clause = "realm_id = ?1 AND (userName LIKE ?2 OR displayName LIKE ?2 \
                                OR firstName LIKE ?2 OR surName LIKE ?2)";
                total = conn.query_row(
                    &format!("SELECT COUNT(*) FROM scim_users WHERE {where_clause}"),
                    params![realm_id, pattern],
                    |row| row.get::<_, i64>(0),
                )?;
                rows_sql = format!(
                    "SELECT {USER_COLUMNS} FROM scim_users WHERE {where_clause} \
                     ORDER BY id LIMIT ?3 OFFSET ?4"
                );
            }
            None => {
                where_clause = "realm_id = ?1";
                total = conn.query_row(
                    &format!("SELECT COUNT(*) FROM scim_users WHERE {where_clause}"),
                    params![realm_id],
                    |row| row.get::<_, i64>(0),
                )?;
                rows_sql = format!(
                    "SELECT {USER_COLUMNS} FROM scim_users WHERE {where_clause} \
                     ORDER BY id LIMIT ?2 OFFSET ?3"
                );
            }
        }

        let mut stmt = conn.prepare(&rows_sql)?;
        let mapped: Vec<UserRowData> = match &pattern {
            Some(p) => stmt
                .query_map(
                    params![realm_id, p, count as i64, offset as i64],
                    UserRowData::from_row,
                )?
                .collect::<Result<_, _>>()?,
            None => stmt
                .query_map(
                    params![realm_id, count as i64, offset as i64],
                    UserRowData::from_row,
                )?
                .collect::<Result<_, _>>()?,
        };

        let mut users = Vec::with_capacity(mapped.len());
        for data in mapped {
            users.push(data.into_user()?);
        }
        Ok((users, total))
    }

    async fn update_user(
        &self,
        realm_id: &str,
        user_id: &str,
        update: ScimUserUpdate,
    ) -> RepositoryResult<Option<ScimUser>> {
        let conn = self.lock()?;
        let existing = Self::query_one(
            &conn,
            &format!("SELECT {USER_COLUMNS} FROM scim_users WHERE realm_id = ?1 AND user_id = ?2"),
            params![realm_id, user_id],
        )?;

        let Some(mut user) = existing else {
            return Ok(None);
        };

        // 仅覆盖提供的字段
        if let Some(schemas) = update.schemas {
            user.schemas = schemas;
        }
        if let Some(user_name) = update.user_name {
            user.user_name = user_name;
        }
        if let Some(external_id) = update.external_id {
            user.external_id = Some(external_id);
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(sur_name) = update.sur_name {
            user.sur_name = sur_name;
        }
        if let Some(display_name) = update.display_name {
            user.display_name = display_name;
        }
        if let Some(active) = update.active {
            user.active = active;
        }
        if let Some(emails) = update.emails {
            user.emails = ensure_primary(emails);
        }
        user.updated_at = Utc::now();

        conn.execute(
            "UPDATE scim_users SET schemas = ?1, userName = ?2, externalId = ?3, \
             firstName = ?4, surName = ?5, displayName = ?6, active = ?7, emails = ?8, \
             updated_at = ?9 WHERE realm_id = ?10 AND user_id = ?11",
            params![
                serde_json::to_string(&user.schemas)?,
                user.user_name,
                user.external_id,
                user.first_name,
                user.sur_name,
                user.display_name,
                user.active,
                serde_json::to_string(&user.emails)?,
                user.updated_at,
                realm_id,
                user_id,
            ],
        )?;

        Ok(Some(user))
    }

    async fn delete_user(&self, realm_id: &str, user_id: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "DELETE FROM scim_users WHERE realm_id = ?1 AND user_id = ?2",
            params![realm_id, user_id],
        )?;
        Ok(affected > 0)
    }

    async fn count_users(&self, realm_id: &str) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM scim_users WHERE realm_id = ?1",
            params![realm_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// 更新邮箱列表时保证至少一个主邮箱
fn ensure_primary(mut emails: Vec<EmailAddress>) -> Vec<EmailAddress> {
    if !emails.is_empty() && !emails.iter().any(|e| e.primary) {
        emails[0].primary = true;
    }
    emails
}
