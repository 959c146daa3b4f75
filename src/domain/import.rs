// ==========================================
// SCIM 用户同步服务 - 批量导入领域模型
// ==========================================
// 职责: 导入管道各阶段的中间产物与最终报告
// 生命周期: 全部实体按次创建,导入调用返回即消亡;
//           唯一持久副作用是通过仓储创建的用户记录
// ==========================================

use crate::domain::types::{ImportStatus, RowStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

// ==========================================
// ImportPolicy - 导入策略
// ==========================================
// 用途: 调用方每次导入提供一次,循环内不可变
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportPolicy {
    /// 试运行: 仅校验与分类,不落库
    #[serde(default)]
    pub dry_run: bool,
    /// 跳过重复: userName 已存在时记为 skipped 而非交给唯一约束报错
    #[serde(default)]
    pub skip_duplicates: bool,
    /// 行失败后继续处理后续行; false 时在失败行处终止循环
    #[serde(default)]
    pub continue_on_error: bool,
}

// ==========================================
// RawUserRow - 解析阶段中间结构
// ==========================================
// 用途: 结构解析器输出,行校验器输入
// 说明: 空白单元格视为"未提供",不进入 fields;
//       active 列在解析阶段即归一化为布尔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUserRow {
    /// 源文件行号（1 基,表头为第 1 行,首个数据行为第 2 行）
    pub row_number: usize,
    /// 列名 → 去除首尾空白后的原始值（仅保留非空值）
    pub fields: HashMap<String, String>,
    /// active 列归一化结果（列缺失或单元格为空时为 None）
    pub active: Option<bool>,
}

impl RawUserRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// 该行是否未贡献任何列（完全空白行,解析阶段静默丢弃）
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.active.is_none()
    }
}

// ==========================================
// CsvUserRow - 行校验通过后的结构
// ==========================================
// 对齐: CSV 列集（userName/firstName/surName/email 必填）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CsvUserRow {
    #[validate(length(min = 1, max = 100))]
    pub user_name: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub sur_name: String,
    /// 为空时由 "{firstName} {surName}" 派生
    #[validate(length(min = 1, max = 200))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(email)]
    pub secondary_email: Option<String>,
    #[validate(length(max = 100))]
    pub external_id: Option<String>,
    pub active: bool,
}

// ==========================================
// UserRowResult - 单行处理结果
// ==========================================
// 红线: 每个被处理的行恰好产出一条结果,不得静默丢弃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRowResult {
    /// 源文件行号
    pub row_number: usize,
    /// userName（结构性失败时尽力而为,可能缺失）
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    pub status: RowStatus,
    /// 新建用户 ID（仅 status=success 且非试运行时存在）
    pub user_id: Option<String>,
    pub message: String,
    /// 字段级错误明细（仅 status=error 时非空）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl UserRowResult {
    pub fn success(row_number: usize, user_name: &str, user_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            row_number,
            user_name: Some(user_name.to_string()),
            status: RowStatus::Success,
            user_id,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn skipped(row_number: usize, user_name: &str, message: impl Into<String>) -> Self {
        Self {
            row_number,
            user_name: Some(user_name.to_string()),
            status: RowStatus::Skipped,
            user_id: None,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn error(
        row_number: usize,
        user_name: Option<String>,
        message: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            row_number,
            user_name,
            status: RowStatus::Error,
            user_id: None,
            message: message.into(),
            errors,
        }
    }
}

// ==========================================
// BulkImportReport - 导入报告
// ==========================================
// 用途: 导入接口返回值,单次调用的完整确定性报告
// 说明: continue_on_error=false 提前终止时,total_rows 仍为
//       解析出的全部行数,而 results 止于失败行（保留源行为）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkImportReport {
    pub status: ImportStatus,
    pub total_rows: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub skipped_imports: usize,
    pub processing_time_seconds: f64,
    /// 按源行号有序的行结果
    pub results: Vec<UserRowResult>,
    /// 文件级错误（扩展名/大小/租户不存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_errors: Option<Vec<String>>,
    /// 结构级错误（表头缺失/缺少必需列/截断提示）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_errors: Option<Vec<String>>,
}

impl BulkImportReport {
    /// 构造未处理任何行的失败报告（文件级/结构级拒绝）
    pub fn rejected(
        file_errors: Option<Vec<String>>,
        structural_errors: Option<Vec<String>>,
        processing_time_seconds: f64,
    ) -> Self {
        Self {
            status: ImportStatus::Failed,
            total_rows: 0,
            successful_imports: 0,
            failed_imports: 0,
            skipped_imports: 0,
            processing_time_seconds,
            results: Vec::new(),
            file_errors,
            structural_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_all_off() {
        let policy = ImportPolicy::default();
        assert!(!policy.dry_run);
        assert!(!policy.skip_duplicates);
        assert!(!policy.continue_on_error);
    }

    #[test]
    fn test_raw_row_empty_detection() {
        let row = RawUserRow {
            row_number: 2,
            fields: HashMap::new(),
            active: None,
        };
        assert!(row.is_empty());

        let mut fields = HashMap::new();
        fields.insert("userName".to_string(), "jdoe".to_string());
        let row = RawUserRow {
            row_number: 2,
            fields,
            active: None,
        };
        assert!(!row.is_empty());
        assert_eq!(row.get("userName"), Some("jdoe"));
        assert_eq!(row.get("firstName"), None);
    }

    #[test]
    fn test_rejected_report_shape() {
        let report = BulkImportReport::rejected(
            Some(vec!["文件必须为 .csv 扩展名".to_string()]),
            None,
            0.01,
        );
        assert_eq!(report.status, ImportStatus::Failed);
        assert_eq!(report.total_rows, 0);
        assert!(report.results.is_empty());
        assert!(report.file_errors.is_some());
    }

    #[test]
    fn test_row_result_serde_user_name_wire_format() {
        let result = UserRowResult::success(2, "jdoe", None, "ok");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"userName\":\"jdoe\""));
        assert!(json.contains("\"status\":\"success\""));
    }
}
