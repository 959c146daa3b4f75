// ==========================================
// SCIM 用户同步服务 - 导入层
// ==========================================
// 职责: 批量导入管道——不可信 CSV 输入到逐行落库与确定性报告
// 流程: 文件校验 → 结构解析 → 行校验 → 记录映射 → 重复检测 → 落库
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod file_validator;
pub mod row_validator;
pub mod template;
pub mod user_importer_impl;
pub mod user_importer_trait;
pub mod user_mapper;

// 重导出核心类型
pub use error::{ImportError, ImportModuleResult};
pub use file_parser::{parse_active_flag, CsvParser, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
pub use file_validator::CsvFileValidator;
pub use row_validator::UserRowValidator;
pub use template::generate_csv_template;
pub use user_importer_impl::UserImporterImpl;
pub use user_mapper::ScimUserMapper;

// 重导出 Trait 接口
pub use user_importer_trait::{FileParser, FileValidator, RowValidator, UserImporter, UserMapper};
