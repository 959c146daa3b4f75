// ==========================================
// SCIM 用户同步服务 - API 层
// ==========================================
// 职责: 面向调用方的业务接口封装
// 红线: API 层只做装配、参数校验与错误转换，不含管道逻辑
// ==========================================

pub mod error;
pub mod import_api;
pub mod realm_api;
pub mod user_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use realm_api::RealmApi;
pub use user_api::{ResourceMeta, ScimUserListView, ScimUserView, UserApi};
