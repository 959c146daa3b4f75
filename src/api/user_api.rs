// ==========================================
// SCIM 用户同步服务 - 用户API
// ==========================================
// 职责: 单用户 CRUD 的薄封装（租户检查、重复冲突、SCIM 响应视图）
// 依据: RFC 7644 - SCIM Protocol (Users 资源)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::SCIM_LIST_RESPONSE_SCHEMA;
use crate::domain::user::{EmailAddress, ScimUser, ScimUserCreate, ScimUserUpdate};
use crate::repository::{
    RealmRepository, RealmRepositoryImpl, ScimUserRepository, ScimUserRepositoryImpl,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// 列表查询单页条数上限
const MAX_PAGE_SIZE: usize = 1000;

// ==========================================
// 响应视图
// ==========================================

/// SCIM 资源元信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub resource_type: String,
    pub created: String,
    pub last_modified: String,
    pub location: String,
}

/// SCIM 用户响应视图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUserView {
    pub id: String,
    pub schemas: Vec<String>,
    pub user_name: String,
    pub external_id: Option<String>,
    pub first_name: String,
    pub sur_name: String,
    pub display_name: String,
    pub active: bool,
    pub emails: Vec<EmailAddress>,
    pub meta: ResourceMeta,
}

impl From<ScimUser> for ScimUserView {
    fn from(user: ScimUser) -> Self {
        let location = format!("/scim/v2/Realms/{}/Users/{}", user.realm_id, user.user_id);
        Self {
            id: user.user_id,
            schemas: user.schemas,
            user_name: user.user_name,
            external_id: user.external_id,
            first_name: user.first_name,
            sur_name: user.sur_name,
            display_name: user.display_name,
            active: user.active,
            emails: user.emails,
            meta: ResourceMeta {
                resource_type: "User".to_string(),
                created: user.created_at.to_rfc3339(),
                last_modified: user.updated_at.to_rfc3339(),
                location,
            },
        }
    }
}

/// SCIM 用户列表响应（ListResponse 信封）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimUserListView {
    pub schemas: Vec<String>,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
    #[serde(rename = "startIndex")]
    pub start_index: usize,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: usize,
    #[serde(rename = "Resources")]
    pub resources: Vec<ScimUserView>,
}

// ==========================================
// UserApi
// ==========================================
pub struct UserApi {
    db_path: String,
}

impl UserApi {
    /// 创建新的UserApi实例
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn user_repo(&self) -> ApiResult<ScimUserRepositoryImpl> {
        Ok(ScimUserRepositoryImpl::new(&self.db_path)?)
    }

    fn realm_repo(&self) -> ApiResult<RealmRepositoryImpl> {
        Ok(RealmRepositoryImpl::new(&self.db_path)?)
    }

    /// 在指定租户内创建用户
    ///
    /// # 错误
    /// - NotFound: 租户不存在
    /// - Conflict: 同租户内 userName 已存在
    /// - InvalidInput: 字段校验失败（邮箱格式、长度等）
    pub async fn create_user(
        &self,
        realm_id: &str,
        mut user: ScimUserCreate,
    ) -> ApiResult<ScimUserView> {
        user.normalize_primary_email();
        user.validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        if !self.realm_repo()?.exists(realm_id).await? {
            return Err(ApiError::NotFound(format!("租户不存在: {}", realm_id)));
        }

        let repo = self.user_repo()?;
        if repo
            .get_user_by_username(realm_id, &user.user_name)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "用户 '{}' 在租户 '{}' 内已存在",
                user.user_name, realm_id
            )));
        }

        let created = repo.create_user(realm_id, user).await?;
        info!(realm_id = realm_id, user_id = %created.user_id, user_name = %created.user_name, "用户创建成功");
        Ok(created.into())
    }

    /// 按 user_id 查询用户
    pub async fn get_user(&self, realm_id: &str, user_id: &str) -> ApiResult<ScimUserView> {
        self.user_repo()?
            .get_user_by_id(realm_id, user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| {
                ApiError::NotFound(format!("用户 '{}' 在租户 '{}' 内不存在", user_id, realm_id))
            })
    }

    /// 按 userName 查询用户
    pub async fn get_user_by_username(
        &self,
        realm_id: &str,
        user_name: &str,
    ) -> ApiResult<ScimUserView> {
        self.user_repo()?
            .get_user_by_username(realm_id, user_name)
            .await?
            .map(Into::into)
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "用户名 '{}' 在租户 '{}' 内不存在",
                    user_name, realm_id
                ))
            })
    }

    /// 按邮箱查询用户
    pub async fn get_user_by_email(&self, realm_id: &str, email: &str) -> ApiResult<ScimUserView> {
        self.user_repo()?
            .get_user_by_email(realm_id, email)
            .await?
            .map(Into::into)
            .ok_or_else(|| {
                ApiError::NotFound(format!("邮箱 '{}' 在租户 '{}' 内不存在", email, realm_id))
            })
    }

    /// 分页查询用户列表
    ///
    /// # 参数
    /// - start_index: 1 基起始下标（小于 1 时按 1 处理）
    /// - count: 单页条数（限制在 1..=1000）
    /// - filter: 可选子串过滤
    pub async fn list_users(
        &self,
        realm_id: &str,
        start_index: usize,
        count: usize,
        filter: Option<&str>,
    ) -> ApiResult<ScimUserListView> {
        let start_index = start_index.max(1);
        let count = count.clamp(1, MAX_PAGE_SIZE);

        let (users, total) = self
            .user_repo()?
            .list_users(realm_id, start_index, count, filter)
            .await?;

        let resources: Vec<ScimUserView> = users.into_iter().map(Into::into).collect();
        Ok(ScimUserListView {
            schemas: vec![SCIM_LIST_RESPONSE_SCHEMA.to_string()],
            total_results: total,
            start_index,
            items_per_page: resources.len(),
            resources,
        })
    }

    /// 部分更新用户
    pub async fn update_user(
        &self,
        realm_id: &str,
        user_id: &str,
        update: ScimUserUpdate,
    ) -> ApiResult<ScimUserView> {
        update
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        self.user_repo()?
            .update_user(realm_id, user_id, update)
            .await?
            .map(Into::into)
            .ok_or_else(|| {
                ApiError::NotFound(format!("用户 '{}' 在租户 '{}' 内不存在", user_id, realm_id))
            })
    }

    /// 删除用户
    pub async fn delete_user(&self, realm_id: &str, user_id: &str) -> ApiResult<()> {
        let deleted = self.user_repo()?.delete_user(realm_id, user_id).await?;
        if !deleted {
            return Err(ApiError::NotFound(format!(
                "用户 '{}' 在租户 '{}' 内不存在",
                user_id, realm_id
            )));
        }
        info!(realm_id = realm_id, user_id = user_id, "用户已删除");
        Ok(())
    }
}
