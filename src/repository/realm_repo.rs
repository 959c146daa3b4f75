// ==========================================
// SCIM 用户同步服务 - 租户仓储 Trait
// ==========================================
// 职责: 定义租户数据访问接口（不包含业务逻辑）
// ==========================================

use crate::domain::realm::{Realm, RealmCreate};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// RealmRepository Trait
// ==========================================
// 用途: 租户数据访问
// 实现者: RealmRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait RealmRepository: Send + Sync {
    /// 创建租户（realm_id 自动生成）
    async fn create_realm(&self, realm: RealmCreate) -> RepositoryResult<Realm>;

    /// 按 realm_id 查询租户
    async fn get_realm(&self, realm_id: &str) -> RepositoryResult<Option<Realm>>;

    /// 查询全部租户
    async fn list_realms(&self) -> RepositoryResult<Vec<Realm>>;

    /// 检查租户是否存在
    ///
    /// 说明: 导入流程在处理任何行之前调用一次；
    /// 租户缺失是文件级拒绝而非行级错误
    async fn exists(&self, realm_id: &str) -> RepositoryResult<bool>;
}
