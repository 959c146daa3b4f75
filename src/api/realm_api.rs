// ==========================================
// SCIM 用户同步服务 - 租户API
// ==========================================
// 职责: 租户生命周期的薄封装（创建/查询/列表）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::realm::{Realm, RealmCreate};
use crate::repository::{RealmRepository, RealmRepositoryImpl};
use tracing::info;

pub struct RealmApi {
    db_path: String,
}

impl RealmApi {
    /// 创建新的RealmApi实例
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn repo(&self) -> ApiResult<RealmRepositoryImpl> {
        Ok(RealmRepositoryImpl::new(&self.db_path)?)
    }

    /// 创建租户（realm_id 自动生成）
    pub async fn create_realm(&self, realm: RealmCreate) -> ApiResult<Realm> {
        let name = realm.name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(ApiError::InvalidInput(
                "租户名称不能为空且长度不得超过 100".to_string(),
            ));
        }

        let created = self.repo()?.create_realm(realm).await?;
        info!(realm_id = %created.realm_id, name = %created.name, "租户创建成功");
        Ok(created)
    }

    /// 按 realm_id 查询租户
    pub async fn get_realm(&self, realm_id: &str) -> ApiResult<Realm> {
        self.repo()?
            .get_realm(realm_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("租户不存在: {}", realm_id)))
    }

    /// 查询全部租户
    pub async fn list_realms(&self) -> ApiResult<Vec<Realm>> {
        Ok(self.repo()?.list_realms().await?)
    }
}
