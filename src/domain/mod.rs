// ==========================================
// SCIM 用户同步服务 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入管道值对象
// 红线: 不含数据访问逻辑,不含管道编排逻辑
// ==========================================

pub mod import;
pub mod realm;
pub mod types;
pub mod user;

// 重导出核心类型
pub use import::{BulkImportReport, CsvUserRow, ImportPolicy, RawUserRow, UserRowResult};
pub use realm::{generate_realm_id, Realm, RealmCreate};
pub use types::{ImportStatus, RowStatus, SCIM_LIST_RESPONSE_SCHEMA, SCIM_USER_SCHEMA};
pub use user::{EmailAddress, ScimUser, ScimUserCreate, ScimUserUpdate};
