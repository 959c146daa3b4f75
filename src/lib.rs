// ==========================================
// SCIM 用户同步服务 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 多租户用户同步与批量导入
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 批量导入管道
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/Schema 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ImportStatus, RowStatus, SCIM_LIST_RESPONSE_SCHEMA, SCIM_USER_SCHEMA};

// 领域实体
pub use domain::{
    BulkImportReport, CsvUserRow, EmailAddress, ImportPolicy, RawUserRow, Realm, RealmCreate,
    ScimUser, ScimUserCreate, ScimUserUpdate, UserRowResult,
};

// 导入管道
pub use importer::{
    generate_csv_template, CsvFileValidator, CsvParser, ScimUserMapper, UserImporter,
    UserImporterImpl, UserRowValidator,
};

// API
pub use api::{ImportApi, RealmApi, UserApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SCIM 用户同步服务";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
