// ==========================================
// SCIM 用户同步服务 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建表入口（realms / scim_users / config_kv）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 Schema（幂等）
///
/// 说明：
/// - `UNIQUE(realm_id, userName)` 是同租户内 userName 唯一性的兜底约束，
///   即便导入策略未开启重复检测，存储层也会拒绝重复创建
/// - emails / schemas 以 JSON 文本列存储
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS realms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            realm_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS scim_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE,
            realm_id TEXT NOT NULL REFERENCES realms(realm_id),
            schemas TEXT NOT NULL,
            userName TEXT NOT NULL,
            externalId TEXT,
            firstName TEXT NOT NULL,
            surName TEXT NOT NULL,
            displayName TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            emails TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(realm_id, userName)
        );

        CREATE INDEX IF NOT EXISTS idx_realm_username ON scim_users(realm_id, userName);
        CREATE INDEX IF NOT EXISTS idx_realm_external ON scim_users(realm_id, externalId);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

/// 打开连接并确保 Schema 就绪
pub fn open_and_initialize(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        // 重复执行不报错
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('realms','scim_users','config_kv')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_username_unique_within_realm() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO realms (realm_id, name, created_at) VALUES ('realm_a', 'A', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO realms (realm_id, name, created_at) VALUES ('realm_b', 'B', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let insert = "INSERT INTO scim_users \
            (user_id, realm_id, schemas, userName, firstName, surName, displayName, active, emails, created_at, updated_at) \
            VALUES (?1, ?2, '[]', ?3, 'J', 'D', 'J D', 1, '[]', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')";

        conn.execute(insert, rusqlite::params!["u1", "realm_a", "jdoe"]).unwrap();
        // 同租户内重复 userName 被唯一约束拒绝
        assert!(conn.execute(insert, rusqlite::params!["u2", "realm_a", "jdoe"]).is_err());
        // 不同租户可以复用同一 userName
        conn.execute(insert, rusqlite::params!["u3", "realm_b", "jdoe"]).unwrap();
    }
}
