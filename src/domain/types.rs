// ==========================================
// SCIM 用户同步服务 - 领域类型定义
// ==========================================
// 依据: RFC 7643 - SCIM Core Schema
// 序列化格式: snake_case (与批量导入响应一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// SCIM User 核心 Schema URN
pub const SCIM_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// SCIM ListResponse 消息 URN
pub const SCIM_LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

// ==========================================
// 导入整体状态 (Import Status)
// ==========================================
// 红线: 单值汇总,由全部行结果推导,循环结束后计算一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Success,        // 全部行成功且无文件级错误
    PartialSuccess, // 至少一行成功,但存在失败/跳过/文件级错误
    Failed,         // 无任何成功行
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Success => write!(f, "success"),
            ImportStatus::PartialSuccess => write!(f, "partial_success"),
            ImportStatus::Failed => write!(f, "failed"),
        }
    }
}

// ==========================================
// 单行结果状态 (Row Status)
// ==========================================
// 跳过(重复)不是错误,不触发 continue_on_error 短路
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Success, // 校验通过并已创建(或试运行通过)
    Skipped, // 同租户内 userName 已存在且策略为跳过
    Error,   // 校验失败或存储层创建失败
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Success => write!(f, "success"),
            RowStatus::Skipped => write!(f, "skipped"),
            RowStatus::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(ImportStatus::PartialSuccess.to_string(), "partial_success");
        assert_eq!(RowStatus::Skipped.to_string(), "skipped");
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ImportStatus::PartialSuccess).unwrap();
        assert_eq!(json, "\"partial_success\"");

        let status: RowStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(status, RowStatus::Error);
    }
}
