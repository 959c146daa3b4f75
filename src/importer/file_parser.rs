// ==========================================
// SCIM 用户同步服务 - 结构解析器实现
// ==========================================
// 职责: 原始字节 → 有序 RawUserRow 序列
// 校验: UTF-8(容忍 BOM) / 表头存在 / 必需列齐全 / 行数上限
// 清洗: 单元格去空白、空值省略、active 列归一化为布尔
// ==========================================

use crate::config::ImportLimits;
use crate::domain::import::RawUserRow;
use crate::importer::user_importer_trait::FileParser;
use csv::ReaderBuilder;
use std::collections::HashMap;
use tracing::warn;

/// 必需列集合
pub const REQUIRED_COLUMNS: [&str; 4] = ["userName", "firstName", "surName", "email"];

/// 可选列集合
pub const OPTIONAL_COLUMNS: [&str; 4] = ["displayName", "secondaryEmail", "externalId", "active"];

/// active 列名（解析阶段即归一化为布尔）
pub const ACTIVE_COLUMN: &str = "active";

/// 已知列全集（必需 ∪ 可选）；之外的列被容忍并忽略
pub fn all_columns() -> Vec<&'static str> {
    REQUIRED_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()).copied().collect()
}

/// 归一化 active 取值
///
/// 真值集 {true,1,yes,active}、假值集 {false,0,no,inactive}（大小写不敏感）；
/// 其余非空值按宽容策略取 fallback（默认 true）
pub fn parse_active_flag(value: &str, fallback: bool) -> bool {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "active" => true,
        "false" | "0" | "no" | "inactive" => false,
        _ => fallback,
    }
}

// ==========================================
// CsvParser 实现
// ==========================================
pub struct CsvParser {
    limits: ImportLimits,
}

impl CsvParser {
    pub fn new(limits: ImportLimits) -> Self {
        Self { limits }
    }
}

impl FileParser for CsvParser {
    fn parse(&self, content: &[u8]) -> (Vec<RawUserRow>, Vec<String>) {
        let mut rows: Vec<RawUserRow> = Vec::new();
        let mut errors = Vec::new();

        // 去除 UTF-8 BOM 后解码
        let content = content
            .strip_prefix(&[0xEF_u8, 0xBB, 0xBF][..])
            .unwrap_or(content);
        let text = match std::str::from_utf8(content) {
            Ok(t) => t,
            Err(_) => {
                errors.push("无法解码文件内容，请确认以 UTF-8 编码保存".to_string());
                return (rows, errors);
            }
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(text.as_bytes());

        // 读取并校验表头
        let headers: Vec<String> = match reader.headers() {
            Ok(h) => h.iter().map(|c| c.trim().to_string()).collect(),
            Err(e) => {
                errors.push(format!("CSV 解析错误: {}", e));
                return (rows, errors);
            }
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            errors.push("文件为空或格式异常".to_string());
            return (rows, errors);
        }

        // 必需列必须是表头列集的子集
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .copied()
            .collect();
        if !missing.is_empty() {
            errors.push(format!("缺少必需列: {}", missing.join(", ")));
            return (rows, errors);
        }

        // 未知列容忍并忽略（仅告警）
        let known = all_columns();
        let unexpected: Vec<&String> = headers
            .iter()
            .filter(|h| !h.is_empty() && !known.contains(&h.as_str()))
            .collect();
        if !unexpected.is_empty() {
            warn!(
                columns = %unexpected.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "),
                "发现未知列，将被忽略"
            );
        }

        // 列名 → 下标
        let header_index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.as_str(), idx))
            .collect();

        // 逐行解析（表头为第 1 行，数据行从第 2 行起）
        for (record_idx, result) in reader.records().enumerate() {
            let row_number = record_idx + 2;

            if rows.len() >= self.limits.max_rows_per_import {
                errors.push(format!(
                    "超过单次导入最大行数（{}），多余行未解析",
                    self.limits.max_rows_per_import
                ));
                break;
            }

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(format!("CSV 解析错误 (行 {}): {}", row_number, e));
                    continue;
                }
            };

            let mut fields = HashMap::new();
            let mut active = None;
            for col in known.iter() {
                let Some(&idx) = header_index.get(col) else {
                    continue;
                };
                let Some(raw) = record.get(idx) else {
                    continue;
                };
                let value = raw.trim();
                if value.is_empty() {
                    // 全空白单元格视为"未提供"
                    continue;
                }
                if *col == ACTIVE_COLUMN {
                    active = Some(parse_active_flag(value, self.limits.active_fallback));
                } else {
                    fields.insert((*col).to_string(), value.to_string());
                }
            }

            let row = RawUserRow {
                row_number,
                fields,
                active,
            };

            // 完全空白行静默丢弃，不占行配额、不产出结果
            if row.is_empty() {
                continue;
            }

            rows.push(row);
        }

        if rows.is_empty() && errors.is_empty() {
            errors.push("未在文件中发现有效用户数据".to_string());
        }

        (rows, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CsvParser {
        CsvParser::new(ImportLimits::default())
    }

    fn parse_str(input: &str) -> (Vec<RawUserRow>, Vec<String>) {
        parser().parse(input.as_bytes())
    }

    #[test]
    fn test_parse_basic_rows() {
        let (rows, errors) = parse_str(
            "userName,firstName,surName,email\n\
             jdoe,John,Doe,john@x.com\n\
             asmith,Alice,Smith,alice@x.com\n",
        );
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].get("userName"), Some("jdoe"));
        assert_eq!(rows[1].row_number, 3);
    }

    #[test]
    fn test_tolerates_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"userName,firstName,surName,email\njdoe,John,Doe,john@x.com\n");
        let (rows, errors) = parser().parse(&bytes);
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("userName"), Some("jdoe"));
    }

    #[test]
    fn test_rejects_non_utf8() {
        let (rows, errors) = parser().parse(&[0xFF, 0xFE, 0x00]);
        assert!(rows.is_empty());
        assert!(errors[0].contains("UTF-8"));
    }

    #[test]
    fn test_empty_file_reports_malformed() {
        let (rows, errors) = parse_str("");
        assert!(rows.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("为空或格式异常"));
    }

    #[test]
    fn test_missing_required_columns() {
        let (rows, errors) = parse_str("userName,firstName,email\njdoe,John,john@x.com\n");
        assert!(rows.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("surName"));
    }

    #[test]
    fn test_unknown_columns_tolerated() {
        let (rows, errors) = parse_str(
            "userName,firstName,surName,email,department\n\
             jdoe,John,Doe,john@x.com,Engineering\n",
        );
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        // 未知列不进入 RawUserRow
        assert_eq!(rows[0].get("department"), None);
    }

    #[test]
    fn test_blank_cells_omitted() {
        let (rows, _) = parse_str(
            "userName,firstName,surName,email,displayName\n\
             jdoe,John,Doe,john@x.com,   \n",
        );
        assert_eq!(rows[0].get("displayName"), None);
    }

    #[test]
    fn test_blank_rows_dropped_silently() {
        let (rows, errors) = parse_str(
            "userName,firstName,surName,email\n\
             jdoe,John,Doe,john@x.com\n\
             ,,,\n\
             asmith,Alice,Smith,alice@x.com\n",
        );
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 2);
        // 空白行不产出结果，但行号仍按源文件计
        assert_eq!(rows[1].row_number, 4);
    }

    #[test]
    fn test_no_data_rows_reports_error() {
        let (rows, errors) = parse_str("userName,firstName,surName,email\n,,,\n");
        assert!(rows.is_empty());
        assert!(errors[0].contains("有效用户数据"));
    }

    #[test]
    fn test_row_limit_truncates_with_notice() {
        let limits = ImportLimits {
            max_rows_per_import: 2,
            ..ImportLimits::default()
        };
        let input = "userName,firstName,surName,email\n\
                     u1,A,B,a@x.com\n\
                     u2,C,D,c@x.com\n\
                     u3,E,F,e@x.com\n";
        let (rows, errors) = CsvParser::new(limits).parse(input.as_bytes());
        // 上限前的行正常解析
        assert_eq!(rows.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("最大行数"));
    }

    #[test]
    fn test_active_column_normalized() {
        let (rows, _) = parse_str(
            "userName,firstName,surName,email,active\n\
             u1,A,B,a@x.com,yes\n\
             u2,C,D,c@x.com,INACTIVE\n\
             u3,E,F,e@x.com,whatever\n\
             u4,G,H,g@x.com,\n",
        );
        assert_eq!(rows[0].active, Some(true));
        assert_eq!(rows[1].active, Some(false));
        // 无法识别的非空值按宽容策略取 true
        assert_eq!(rows[2].active, Some(true));
        // 空单元格 = 未提供
        assert_eq!(rows[3].active, None);
    }

    #[test]
    fn test_active_fallback_configurable() {
        assert!(parse_active_flag("garbage", true));
        assert!(!parse_active_flag("garbage", false));
        assert!(parse_active_flag("1", false));
        assert!(!parse_active_flag("No", true));
    }
}
