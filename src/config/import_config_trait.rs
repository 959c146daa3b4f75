// ==========================================
// SCIM 用户同步服务 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 默认最大文件大小（5 MiB）
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// 默认单次导入最大行数
pub const DEFAULT_MAX_ROWS_PER_IMPORT: usize = 1000;

// ==========================================
// ImportLimits - 导入硬限制
// ==========================================
// 用途: 构造管道组件时显式传入,而非组件内部读取全局常量,
//       便于测试覆盖边界值
#[derive(Debug, Clone)]
pub struct ImportLimits {
    /// 声明大小上限（字节）,超出即文件级拒绝
    pub max_file_size_bytes: u64,
    /// 单次导入最大行数,超出部分不解析并追加一条截断提示
    pub max_rows_per_import: usize,
    /// active 列出现无法识别的非空值时的兜底取值（宽容策略）
    pub active_fallback: bool,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_rows_per_import: DEFAULT_MAX_ROWS_PER_IMPORT,
            active_fallback: true,
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取最大文件大小（字节）
    ///
    /// # 默认值
    /// - 5242880 (5 MiB)
    async fn get_max_file_size_bytes(&self) -> Result<u64, Box<dyn Error>>;

    /// 获取单次导入最大行数
    ///
    /// # 默认值
    /// - 1000
    async fn get_max_rows_per_import(&self) -> Result<usize, Box<dyn Error>>;

    /// 获取 active 列无法识别取值时的兜底布尔值
    ///
    /// # 默认值
    /// - true（宽容策略: 未知取值按激活处理）
    async fn get_active_fallback(&self) -> Result<bool, Box<dyn Error>>;

    /// 组合读取全部导入限制
    async fn get_import_limits(&self) -> Result<ImportLimits, Box<dyn Error>> {
        let max_file_size_bytes = self.get_max_file_size_bytes().await?;
        let max_rows_per_import = self.get_max_rows_per_import().await?;
        let active_fallback = self.get_active_fallback().await?;
        Ok(ImportLimits {
            max_file_size_bytes,
            max_rows_per_import,
            active_fallback,
        })
    }
}
