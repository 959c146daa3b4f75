// ==========================================
// SCIM 用户同步服务 - 行校验器实现
// ==========================================
// 职责: 单行 Schema 校验 + displayName 派生
// 红线: 纯函数——不做 I/O，不依赖其他行或已存储状态，
//       相同输入必产出相同结果
// ==========================================

use crate::domain::import::{CsvUserRow, RawUserRow};
use crate::importer::file_parser::REQUIRED_COLUMNS;
use crate::importer::user_importer_trait::RowValidator;
use validator::Validate;

// (struct 字段名, CSV 列名) —— 错误消息按 CSV 列名报告，遍历顺序固定以保证确定性
const FIELD_COLUMNS: [(&str, &str); 7] = [
    ("user_name", "userName"),
    ("first_name", "firstName"),
    ("sur_name", "surName"),
    ("display_name", "displayName"),
    ("email", "email"),
    ("secondary_email", "secondaryEmail"),
    ("external_id", "externalId"),
];

pub struct UserRowValidator;

impl UserRowValidator {
    fn describe_code(code: &str) -> &'static str {
        match code {
            "email" => "邮箱格式无效",
            "length" => "长度超出允许范围",
            _ => "校验失败",
        }
    }
}

impl RowValidator for UserRowValidator {
    fn validate_row(&self, row: &RawUserRow) -> Result<CsvUserRow, Vec<String>> {
        let n = row.row_number;

        // 必填字段存在性（空白单元格在解析阶段已归一化为"未提供"）
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| row.get(col).is_none())
            .map(|col| format!("行 {}: {} - 必填字段缺失或为空", n, col))
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let first_name = row.get("firstName").unwrap_or_default().to_string();
        let sur_name = row.get("surName").unwrap_or_default().to_string();

        // displayName 为空时由 "{firstName} {surName}" 派生
        let display_name = match row.get("displayName") {
            Some(v) => v.to_string(),
            None => format!("{} {}", first_name, sur_name),
        };

        let candidate = CsvUserRow {
            user_name: row.get("userName").unwrap_or_default().to_string(),
            first_name,
            sur_name,
            display_name,
            email: row.get("email").unwrap_or_default().to_string(),
            secondary_email: row.get("secondaryEmail").map(str::to_string),
            external_id: row.get("externalId").map(str::to_string),
            active: row.active.unwrap_or(true),
        };

        // 格式与长度约束（邮箱语法、字段长度上限）
        match candidate.validate() {
            Ok(()) => Ok(candidate),
            Err(validation_errors) => {
                let field_errors = validation_errors.field_errors();
                let mut errors = Vec::new();
                for (field, column) in FIELD_COLUMNS {
                    let Some(violations) = field_errors.get(field) else {
                        continue;
                    };
                    for violation in violations.iter() {
                        errors.push(format!(
                            "行 {}: {} - {}",
                            n,
                            column,
                            Self::describe_code(violation.code.as_ref())
                        ));
                    }
                }
                Err(errors)
            }
        }
    }
}
