// ==========================================
// SCIM 用户同步服务 - 用户领域模型
// ==========================================
// 依据: RFC 7643 - SCIM Core Schema (User)
// 对齐: scim_users 表
// ==========================================
// 用途: 导入层与 API 层写入,仓储层持久化
// ==========================================

use crate::domain::types::SCIM_USER_SCHEMA;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ==========================================
// EmailAddress - SCIM 邮箱条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmailAddress {
    /// 邮箱地址
    #[validate(email)]
    pub value: String,
    /// 是否为主邮箱
    #[serde(default)]
    pub primary: bool,
}

impl EmailAddress {
    pub fn primary(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            primary: true,
        }
    }

    pub fn secondary(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            primary: false,
        }
    }
}

// ==========================================
// ScimUser - 用户主数据
// ==========================================
// 红线: userName 在同一 realm 内唯一（仓储层以唯一约束兜底）
// 对齐: scim_users 表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    // ===== 主键与租户 =====
    pub user_id: String,  // 用户唯一标识（UUID）
    pub realm_id: String, // 所属租户（realm）

    // ===== SCIM 核心字段 =====
    pub schemas: Vec<String>,        // SCIM Schema URN 列表
    pub user_name: String,           // 登录名（租户内唯一）
    pub external_id: Option<String>, // 外部系统标识
    pub first_name: String,          // 名
    pub sur_name: String,            // 姓
    pub display_name: String,        // 显示名
    pub active: bool,                // 激活状态
    pub emails: Vec<EmailAddress>,   // 邮箱列表（至少一个主邮箱）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

// ==========================================
// ScimUserCreate - 用户创建结构
// ==========================================
// 用途: API 直接创建与批量导入共用的入参
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScimUserCreate {
    #[serde(default = "default_schemas")]
    pub schemas: Vec<String>,
    #[validate(length(min = 1, max = 100))]
    pub user_name: String,
    #[validate(length(max = 100))]
    pub external_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub sur_name: String,
    #[validate(length(min = 1, max = 200))]
    pub display_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[validate(length(min = 1), nested)]
    pub emails: Vec<EmailAddress>,
}

impl ScimUserCreate {
    /// 保证至少一个主邮箱（未指定时提升第一个）
    pub fn normalize_primary_email(&mut self) {
        if !self.emails.is_empty() && !self.emails.iter().any(|e| e.primary) {
            self.emails[0].primary = true;
        }
    }

    /// 转为完整用户记录（生成 user_id 与审计时间戳）
    pub fn into_user(self, realm_id: &str) -> ScimUser {
        let now = Utc::now();
        ScimUser {
            user_id: Uuid::new_v4().to_string(),
            realm_id: realm_id.to_string(),
            schemas: self.schemas,
            user_name: self.user_name,
            external_id: self.external_id,
            first_name: self.first_name,
            sur_name: self.sur_name,
            display_name: self.display_name,
            active: self.active,
            emails: self.emails,
            created_at: now,
            updated_at: now,
        }
    }
}

fn default_schemas() -> Vec<String> {
    vec![SCIM_USER_SCHEMA.to_string()]
}

fn default_active() -> bool {
    true
}

// ==========================================
// ScimUserUpdate - 用户更新结构
// ==========================================
// 用途: 部分更新,仅覆盖提供的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScimUserUpdate {
    pub schemas: Option<Vec<String>>,
    #[validate(length(min = 1, max = 100))]
    pub user_name: Option<String>,
    #[validate(length(max = 100))]
    pub external_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub sur_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub display_name: Option<String>,
    pub active: Option<bool>,
    pub emails: Option<Vec<EmailAddress>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(user_name: &str) -> ScimUserCreate {
        ScimUserCreate {
            schemas: default_schemas(),
            user_name: user_name.to_string(),
            external_id: None,
            first_name: "John".to_string(),
            sur_name: "Doe".to_string(),
            display_name: "John Doe".to_string(),
            active: true,
            emails: vec![EmailAddress::primary("john.doe@example.com")],
        }
    }

    #[test]
    fn test_validate_valid_user() {
        let user = create_request("jdoe");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_user_name() {
        let mut user = create_request("jdoe");
        user.user_name = String::new();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_email() {
        let mut user = create_request("jdoe");
        user.emails = vec![EmailAddress::primary("not-an-email")];
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_normalize_primary_email_promotes_first() {
        let mut user = create_request("jdoe");
        user.emails = vec![
            EmailAddress::secondary("a@example.com"),
            EmailAddress::secondary("b@example.com"),
        ];
        user.normalize_primary_email();
        assert!(user.emails[0].primary);
        assert!(!user.emails[1].primary);
    }

    #[test]
    fn test_into_user_generates_id_and_timestamps() {
        let user = create_request("jdoe").into_user("realm_abc12345");
        assert_eq!(user.realm_id, "realm_abc12345");
        assert!(!user.user_id.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_serde_camel_case_wire_names() {
        let user = create_request("jdoe");
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"userName\""));
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"surName\""));
    }
}
