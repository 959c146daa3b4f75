// ==========================================
// SCIM 用户同步服务 - 租户(Realm)领域模型
// ==========================================
// 用途: 租户为 userName 唯一性的隔离边界
// 对齐: realms 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Realm - 租户
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    pub id: i64,                     // 数据库自增主键
    pub realm_id: String,            // 租户标识（realm_ + 8位hex）
    pub name: String,                // 租户名称
    pub description: Option<String>, // 描述
    pub created_at: DateTime<Utc>,   // 创建时间
}

// ==========================================
// RealmCreate - 租户创建结构
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmCreate {
    pub name: String,
    pub description: Option<String>,
}

/// 生成租户标识（realm_ 前缀 + UUID 前 8 位 hex）
pub fn generate_realm_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("realm_{}", &hex[..8])
}
