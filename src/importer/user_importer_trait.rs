// ==========================================
// SCIM 用户同步服务 - 批量导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 文件校验 → 结构解析 → 行校验 → 记录映射 → 重复检测 → 落库
// ==========================================

use crate::domain::import::{BulkImportReport, CsvUserRow, ImportPolicy, RawUserRow};
use crate::domain::user::ScimUserCreate;
use crate::importer::error::ImportModuleResult;
use async_trait::async_trait;

// ==========================================
// UserImporter Trait
// ==========================================
// 用途: 批量导入主接口
// 实现者: UserImporterImpl
#[async_trait]
pub trait UserImporter: Send + Sync {
    /// 将 CSV 文件内容批量导入指定租户
    ///
    /// # 参数
    /// - realm_id: 目标租户
    /// - file_name: 上传文件名（用于扩展名校验）
    /// - declared_size: 声明的文件大小（字节）
    /// - content: 文件原始字节
    /// - policy: 导入策略（试运行/跳过重复/失败后继续）
    ///
    /// # 返回
    /// - Ok(BulkImportReport): 单次调用的完整报告（含逐行结果与汇总状态）
    /// - Err: 仅当无法产出报告时（仓储不可用等）
    ///
    /// # 导入流程
    /// 1. 租户存在性检查（缺失 = 文件级拒绝）
    /// 2. 文件级校验（扩展名/大小，不读内容）
    /// 3. 结构解析（表头/列集/行上限/active 归一化）
    /// 4. 逐行: 行校验 → 重复检测(可选) → 落库或试运行
    /// 5. 汇总状态推导与报告组装
    async fn import_users(
        &self,
        realm_id: &str,
        file_name: &str,
        declared_size: u64,
        content: &[u8],
        policy: ImportPolicy,
    ) -> ImportModuleResult<BulkImportReport>;
}

// ==========================================
// FileValidator Trait
// ==========================================
// 用途: 文件级校验（阶段 1）——只看文件名与声明大小，不读内容
// 实现者: CsvFileValidator
pub trait FileValidator: Send + Sync {
    /// 校验上传文件
    ///
    /// # 返回
    /// - Vec<String>: 人类可读的拒绝原因；为空即通过
    fn validate(&self, file_name: &str, declared_size: u64) -> Vec<String>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 结构解析（阶段 2）——字节流 → 有序 RawUserRow 序列
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件内容
    ///
    /// # 返回
    /// - (rows, errors): 解析出的行与结构级错误/提示。
    ///   截断提示等非致命错误与行共存；rows 为空且 errors 非空
    ///   时调用方应整体拒绝
    fn parse(&self, content: &[u8]) -> (Vec<RawUserRow>, Vec<String>);
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行级 Schema 校验（阶段 3）——纯函数，不依赖其他行与存储状态
// 实现者: UserRowValidator
pub trait RowValidator: Send + Sync {
    /// 校验单行
    ///
    /// # 返回
    /// - Ok(CsvUserRow): 校验通过（displayName 已派生）
    /// - Err(Vec<String>): 非空的字段级错误（"行 N: 字段 - 原因"）
    fn validate_row(&self, row: &RawUserRow) -> Result<CsvUserRow, Vec<String>>;
}

// ==========================================
// UserMapper Trait
// ==========================================
// 用途: 记录映射（阶段 4）——校验行 → 存储层创建结构
// 实现者: ScimUserMapper
pub trait UserMapper: Send + Sync {
    /// 将校验通过的行映射为 SCIM 用户创建结构
    fn to_scim_create(&self, row: CsvUserRow) -> ScimUserCreate;
}
