// ==========================================
// 测试辅助工具
// ==========================================
// 提供: 临时数据库创建、Schema 初始化、测试租户注入
// ==========================================

#![allow(dead_code)]

use rusqlite::params;
use scim_provision::db::{initialize_schema, open_sqlite_connection};
use tempfile::NamedTempFile;

/// 测试租户标识
pub const TEST_REALM_ID: &str = "realm_test0001";

/// 创建带完整 Schema 的临时测试数据库
///
/// 返回 (临时文件句柄, 数据库路径)；句柄存活期间文件保留
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    initialize_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 注入固定 realm_id 的测试租户
pub fn insert_test_realm(db_path: &str, realm_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_sqlite_connection(db_path)?;
    conn.execute(
        "INSERT INTO realms (realm_id, name, description, created_at) \
         VALUES (?1, ?2, NULL, ?3)",
        params![realm_id, format!("Test Realm {}", realm_id), chrono::Utc::now()],
    )?;
    Ok(())
}

/// 写入 config_kv 配置覆盖（scope_id='global'）
pub fn insert_test_config(
    db_path: &str,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_sqlite_connection(db_path)?;
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// 统计租户内用户数（直查表，用于验证落库/未落库）
pub fn count_users_in_db(db_path: &str, realm_id: &str) -> i64 {
    let conn = open_sqlite_connection(db_path).expect("Failed to open db");
    conn.query_row(
        "SELECT COUNT(*) FROM scim_users WHERE realm_id = ?1",
        params![realm_id],
        |row| row.get(0),
    )
    .expect("Failed to count users")
}
