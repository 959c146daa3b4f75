// ==========================================
// SCIM 用户同步服务 - 数据仓储层
// ==========================================
// 职责: 用户/租户记录的数据访问
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

pub mod error;
pub mod realm_repo;
pub mod realm_repo_impl;
pub mod user_repo;
pub mod user_repo_impl;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use realm_repo::RealmRepository;
pub use realm_repo_impl::RealmRepositoryImpl;
pub use user_repo::ScimUserRepository;
pub use user_repo_impl::ScimUserRepositoryImpl;
