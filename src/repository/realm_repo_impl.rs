// ==========================================
// SCIM 用户同步服务 - 租户仓储实现
// ==========================================
// 实现: rusqlite + Arc<Mutex<Connection>>
// 对齐: realms 表
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::realm::{generate_realm_id, Realm, RealmCreate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::realm_repo::RealmRepository;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// RealmRepositoryImpl
// ==========================================
pub struct RealmRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

fn map_realm_row(row: &Row<'_>) -> rusqlite::Result<Realm> {
    Ok(Realm {
        id: row.get(0)?,
        realm_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl RealmRepositoryImpl {
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

    /// 从已有连接创建 Repository
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl RealmRepository for RealmRepositoryImpl {
    async fn create_realm(&self, realm: RealmCreate) -> RepositoryResult<Realm> {
        let realm_id = generate_realm_id();
        let created_at = Utc::now();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO realms (realm_id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![realm_id, realm.name, realm.description, created_at],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Realm {
            id,
            realm_id,
            name: realm.name,
            description: realm.description,
            created_at,
        })
    }

    async fn get_realm(&self, realm_id: &str) -> RepositoryResult<Option<Realm>> {
        let conn = self.lock()?;
        let realm = conn
            .query_row(
                "SELECT id, realm_id, name, description, created_at FROM realms WHERE realm_id = ?1",
                params![realm_id],
                map_realm_row,
            )
            .optional()?;
        Ok(realm)
    }

    async fn list_realms(&self) -> RepositoryResult<Vec<Realm>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, realm_id, name, description, created_at FROM realms ORDER BY id")?;
        let realms = stmt
            .query_map([], map_realm_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(realms)
    }

    async fn exists(&self, realm_id: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM realms WHERE realm_id = ?1",
                params![realm_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
