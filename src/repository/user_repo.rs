// ==========================================
// SCIM 用户同步服务 - 用户仓储 Trait
// ==========================================
// 职责: 定义用户记录数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD;
//       同租户内 userName 唯一由存储层约束兜底
// ==========================================

use crate::domain::user::{ScimUser, ScimUserCreate, ScimUserUpdate};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ScimUserRepository Trait
// ==========================================
// 用途: 用户记录数据访问
// 实现者: ScimUserRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ScimUserRepository: Send + Sync {
    /// 在指定租户内创建用户
    ///
    /// # 参数
    /// - realm_id: 租户标识
    /// - user: 用户创建结构
    ///
    /// # 返回
    /// - Ok(ScimUser): 创建后的完整记录（含生成的 user_id）
    /// - Err(UniqueConstraintViolation): 同租户内 userName 已存在
    async fn create_user(
        &self,
        realm_id: &str,
        user: ScimUserCreate,
    ) -> RepositoryResult<ScimUser>;

    /// 按 user_id 查询用户
    async fn get_user_by_id(
        &self,
        realm_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<ScimUser>>;

    /// 按 userName 查询用户（重复检测的自然键查询）
    async fn get_user_by_username(
        &self,
        realm_id: &str,
        user_name: &str,
    ) -> RepositoryResult<Option<ScimUser>>;

    /// 按邮箱查询用户（遍历 JSON 邮箱列表）
    async fn get_user_by_email(
        &self,
        realm_id: &str,
        email: &str,
    ) -> RepositoryResult<Option<ScimUser>>;

    /// 分页查询用户列表
    ///
    /// # 参数
    /// - start_index: 1 基起始下标
    /// - count: 返回条数上限
    /// - filter: 可选子串过滤（userName/displayName/firstName/surName）
    ///
    /// # 返回
    /// - Ok((users, total)): 当前页与过滤后总数
    async fn list_users(
        &self,
        realm_id: &str,
        start_index: usize,
        count: usize,
        filter: Option<&str>,
    ) -> RepositoryResult<(Vec<ScimUser>, i64)>;

    /// 部分更新用户（仅覆盖提供的字段）
    ///
    /// # 返回
    /// - Ok(Some(ScimUser)): 更新后的记录
    /// - Ok(None): 用户不存在
    async fn update_user(
        &self,
        realm_id: &str,
        user_id: &str,
        update: ScimUserUpdate,
    ) -> RepositoryResult<Option<ScimUser>>;

    /// 删除用户
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 用户不存在
    async fn delete_user(&self, realm_id: &str, user_id: &str) -> RepositoryResult<bool>;

    /// 统计租户内用户数量
    async fn count_users(&self, realm_id: &str) -> RepositoryResult<i64>;
}
