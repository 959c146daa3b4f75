// ==========================================
// SCIM 用户同步服务 - 文件级校验器实现
// ==========================================
// 职责: 解析前拦截明显非法的上传（扩展名/声明大小）
// 红线: 不读文件内容
// ==========================================

use crate::config::ImportLimits;
use crate::importer::user_importer_trait::FileValidator;

pub struct CsvFileValidator {
    limits: ImportLimits,
}

impl CsvFileValidator {
    pub fn new(limits: ImportLimits) -> Self {
        Self { limits }
    }
}

impl FileValidator for CsvFileValidator {
    fn validate(&self, file_name: &str, declared_size: u64) -> Vec<String> {
        let mut errors = Vec::new();

        // 扩展名检查（大小写不敏感）
        if !file_name.to_lowercase().ends_with(".csv") {
            errors.push("文件必须为 .csv 扩展名".to_string());
        }

        // 声明大小检查
        if declared_size > self.limits.max_file_size_bytes {
            errors.push(format!(
                "文件大小 {} 字节超过上限 {} 字节",
                declared_size, self.limits.max_file_size_bytes
            ));
        }

        errors
    }
}
