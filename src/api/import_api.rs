// ==========================================
// SCIM 用户同步服务 - 批量导入API
// ==========================================
// 职责: 封装批量导入相关功能（组件装配、文件读取、模板下载）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::import::{BulkImportReport, ImportPolicy};
use crate::i18n;
use crate::importer::{
    generate_csv_template, CsvFileValidator, CsvParser, ScimUserMapper, UserImporter,
    UserImporterImpl, UserRowValidator,
};
use crate::repository::{RealmRepositoryImpl, ScimUserRepositoryImpl};
use std::path::Path;

/// 批量导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// 将内存中的 CSV 内容批量导入指定租户
    ///
    /// # 参数
    /// - realm_id: 目标租户
    /// - file_name: 上传文件名（用于扩展名校验）
    /// - content: 文件原始字节
    /// - policy: 导入策略
    ///
    /// # 返回
    /// - Ok(BulkImportReport): 完整导入报告（含逐行结果）
    /// - Err(ApiError): 仅当无法产出报告时
    pub async fn import_users(
        &self,
        realm_id: &str,
        file_name: &str,
        content: &[u8],
        policy: ImportPolicy,
    ) -> ApiResult<BulkImportReport> {
        let importer = self.create_importer().await?;
        let report = importer
            .import_users(realm_id, file_name, content.len() as u64, content, policy)
            .await?;
        Ok(report)
    }

    /// 从文件路径批量导入
    ///
    /// # 说明
    /// 声明大小取文件元数据大小，在读取内容之前参与文件级校验
    pub async fn import_users_from_file(
        &self,
        realm_id: &str,
        file_path: &str,
        policy: ImportPolicy,
    ) -> ApiResult<BulkImportReport> {
        let path = Path::new(file_path);
        if !path.exists() {
            return Err(ApiError::ImportFailed(i18n::t_with_args(
                "import.file_not_found",
                &[("path", file_path)],
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_path)
            .to_string();
        let declared_size = std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| ApiError::ImportFailed(format!("读取文件元数据失败: {}", e)))?;

        // 超过大小上限的文件不读入内存，直接交由文件级校验拒绝
        let importer = self.create_importer().await?;
        let limits = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?
            .get_import_limits()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let content = if declared_size > limits.max_file_size_bytes {
            Vec::new()
        } else {
            std::fs::read(path)
                .map_err(|e| ApiError::ImportFailed(format!("读取文件失败: {}", e)))?
        };

        let report = importer
            .import_users(realm_id, &file_name, declared_size, &content, policy)
            .await?;
        Ok(report)
    }

    /// 下载 CSV 导入模板
    pub fn csv_template(&self) -> String {
        generate_csv_template()
    }

    /// 创建 UserImporter 实例（装配全部管道组件）
    async fn create_importer(
        &self,
    ) -> ApiResult<UserImporterImpl<ScimUserRepositoryImpl, RealmRepositoryImpl>> {
        let user_repo = ScimUserRepositoryImpl::new(&self.db_path)?;
        let realm_repo = RealmRepositoryImpl::new(&self.db_path)?;

        let config = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let limits = config
            .get_import_limits()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let file_validator = Box::new(CsvFileValidator::new(limits.clone()));
        let file_parser = Box::new(CsvParser::new(limits));
        let row_validator = Box::new(UserRowValidator);
        let user_mapper = Box::new(ScimUserMapper);

        Ok(UserImporterImpl::new(
            user_repo,
            realm_repo,
            file_validator,
            file_parser,
            row_validator,
            user_mapper,
        ))
    }
}
