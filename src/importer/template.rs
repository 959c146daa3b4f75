// ==========================================
// SCIM 用户同步服务 - CSV 模板生成
// ==========================================
// 职责: 生成带固定表头与示例行的导入模板（纯函数，无校验逻辑）
// ==========================================

use crate::importer::file_parser::all_columns;
use csv::WriterBuilder;

/// 生成 CSV 导入模板
///
/// 包含已知列全集作为表头与三条示例数据
/// （第三条演示 displayName 留空时的自动派生、active=false）
pub fn generate_csv_template() -> String {
    let rows: [[&str; 8]; 3] = [
        [
            "jdoe",
            "John",
            "Doe",
            "john.doe@company.com",
            "John Doe",
            "john.doe.alt@company.com",
            "EMP001",
            "true",
        ],
        [
            "asmith",
            "Alice",
            "Smith",
            "alice.smith@company.com",
            "Alice Smith",
            "",
            "EMP002",
            "true",
        ],
        [
            "bjohnson",
            "Bob",
            "Johnson",
            "bob.johnson@company.com",
            "", // displayName 留空，导入时自动派生
            "",
            "",
            "false",
        ],
    ];

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    // 表头顺序: userName, firstName, surName, email, displayName, secondaryEmail, externalId, active
    let header = all_columns();
    // write_record 不会失败（写入内存缓冲且无非法字节）
    writer
        .write_record(&header)
        .and_then(|_| rows.iter().try_for_each(|row| writer.write_record(row)))
        .ok();

    let bytes = writer.into_inner().unwrap_or_default();
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::REQUIRED_COLUMNS;

    #[test]
    fn test_template_has_header_and_rows() {
        let template = generate_csv_template();
        let mut lines = template.lines();
        let header = lines.next().unwrap();
        for col in REQUIRED_COLUMNS {
            assert!(header.contains(col));
        }
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_template_is_deterministic() {
        assert_eq!(generate_csv_template(), generate_csv_template());
    }
}
