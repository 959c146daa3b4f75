// ==========================================
// SCIM 用户同步服务 - 批量导入编排器实现
// ==========================================
// 职责: 整合导入流程，从文件字节到逐行落库与报告组装
// 流程: 租户检查 → 文件校验 → 结构解析 → 逐行(校验 → 重复检测 → 落库/试运行)
// 红线: 行级提交各自独立，任何一行失败不回滚已提交行;
//       需要全有或全无语义的调用方应先以试运行验证
// ==========================================

use crate::domain::import::{BulkImportReport, ImportPolicy, UserRowResult};
use crate::domain::types::ImportStatus;
use crate::importer::error::ImportModuleResult;
use crate::importer::user_importer_trait::{
    FileParser, FileValidator, RowValidator, UserImporter, UserMapper,
};
use crate::repository::{RealmRepository, ScimUserRepository};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// UserImporterImpl - 批量导入编排器
// ==========================================
pub struct UserImporterImpl<R, T>
where
    R: ScimUserRepository,
    T: RealmRepository,
{
    // 数据访问层
    user_repo: R,
    realm_repo: T,

    // 管道组件
    file_validator: Box<dyn FileValidator>,
    file_parser: Box<dyn FileParser>,
    row_validator: Box<dyn RowValidator>,
    user_mapper: Box<dyn UserMapper>,
}

impl<R, T> UserImporterImpl<R, T>
where
    R: ScimUserRepository,
    T: RealmRepository,
{
    /// 创建新的 UserImporter 实例
    ///
    /// # 参数
    /// - user_repo: 用户仓储
    /// - realm_repo: 租户仓储
    /// - file_validator: 文件级校验器
    /// - file_parser: 结构解析器
    /// - row_validator: 行校验器
    /// - user_mapper: 记录映射器
    pub fn new(
        user_repo: R,
        realm_repo: T,
        file_validator: Box<dyn FileValidator>,
        file_parser: Box<dyn FileParser>,
        row_validator: Box<dyn RowValidator>,
        user_mapper: Box<dyn UserMapper>,
    ) -> Self {
        Self {
            user_repo,
            realm_repo,
            file_validator,
            file_parser,
            row_validator,
            user_mapper,
        }
    }
}

/// 汇总状态推导（循环结束后基于既有结果计算一次）
///
/// - 无任何成功行 → failed（含文件级/结构级整体拒绝）
/// - 全部行成功且无结构级错误 → success
/// - 其余（存在失败/跳过/截断提示等） → partial_success
fn derive_status(successful: usize, total_rows: usize, structural_errors: &[String]) -> ImportStatus {
    if successful == 0 {
        ImportStatus::Failed
    } else if successful == total_rows && structural_errors.is_empty() {
        ImportStatus::Success
    } else {
        ImportStatus::PartialSuccess
    }
}

#[async_trait::async_trait]
impl<R, T> UserImporter for UserImporterImpl<R, T>
where
    R: ScimUserRepository + Send + Sync,
    T: RealmRepository + Send + Sync,
{
    #[instrument(skip(self, content), fields(realm_id = %realm_id, file = %file_name))]
    async fn import_users(
        &self,
        realm_id: &str,
        file_name: &str,
        declared_size: u64,
        content: &[u8],
        policy: ImportPolicy,
    ) -> ImportModuleResult<BulkImportReport> {
        let start_time = Instant::now();

        info!(
            dry_run = policy.dry_run,
            skip_duplicates = policy.skip_duplicates,
            continue_on_error = policy.continue_on_error,
            "开始批量导入用户"
        );

        // === 步骤 1: 租户存在性检查（处理任何行之前仅此一次） ===
        if !self.realm_repo.exists(realm_id).await? {
            warn!("目标租户不存在，整体拒绝");
            return Ok(BulkImportReport::rejected(
                Some(vec![format!("租户不存在: {}", realm_id)]),
                None,
                start_time.elapsed().as_secs_f64(),
            ));
        }

        // === 步骤 2: 文件级校验（不读内容） ===
        let file_errors = self.file_validator.validate(file_name, declared_size);
        if !file_errors.is_empty() {
            warn!(errors = file_errors.len(), "文件级校验未通过");
            return Ok(BulkImportReport::rejected(
                Some(file_errors),
                None,
                start_time.elapsed().as_secs_f64(),
            ));
        }

        // === 步骤 3: 结构解析 ===
        debug!("步骤 3: 结构解析");
        let (rows, structural_errors) = self.file_parser.parse(content);
        if rows.is_empty() {
            warn!(errors = structural_errors.len(), "结构解析未产出任何行");
            return Ok(BulkImportReport::rejected(
                None,
                Some(structural_errors),
                start_time.elapsed().as_secs_f64(),
            ));
        }

        let total_rows = rows.len();
        info!(total_rows = total_rows, "结构解析完成");

        // === 步骤 4: 逐行处理 ===
        // 行序严格按源文件顺序；should_stop 显式承载
        // continue_on_error=false 的提前终止分支
        let mut results: Vec<UserRowResult> = Vec::with_capacity(total_rows);
        let mut successful_count = 0usize;
        let mut failed_count = 0usize;
        let mut skipped_count = 0usize;
        let mut should_stop = false;

        for row in &rows {
            if should_stop {
                // 终止点之后的行不产出结果；total_rows 仍计全部解析行
                break;
            }

            let row_number = row.row_number;

            // 步骤 4.1: 行校验
            let user = match self.row_validator.validate_row(row) {
                Ok(user) => user,
                Err(validation_errors) => {
                    failed_count += 1;
                    warn!(row_number = row_number, "行校验失败");
                    results.push(UserRowResult::error(
                        row_number,
                        row.get("userName").map(str::to_string),
                        "校验失败",
                        validation_errors,
                    ));
                    should_stop = !policy.continue_on_error;
                    continue;
                }
            };

            // 步骤 4.2: 重复检测（仅在策略开启时查询存储；
            // 关闭时由存储层唯一约束兜底，以创建失败形式呈现）
            if policy.skip_duplicates {
                match self
                    .user_repo
                    .get_user_by_username(realm_id, &user.user_name)
                    .await
                {
                    Ok(Some(_)) => {
                        skipped_count += 1;
                        debug!(row_number = row_number, user_name = %user.user_name, "用户已存在，跳过");
                        results.push(UserRowResult::skipped(
                            row_number,
                            &user.user_name,
                            format!("用户 '{}' 在租户内已存在", user.user_name),
                        ));
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // 重复检测的存储故障按行级错误处理，与创建失败同口径
                        failed_count += 1;
                        error!(row_number = row_number, error = %e, "重复检测失败");
                        results.push(UserRowResult::error(
                            row_number,
                            Some(user.user_name.clone()),
                            format!("重复检测失败: {}", e),
                            Vec::new(),
                        ));
                        should_stop = !policy.continue_on_error;
                        continue;
                    }
                }
            }

            // 步骤 4.3: 落库或试运行
            if policy.dry_run {
                successful_count += 1;
                results.push(UserRowResult::success(
                    row_number,
                    &user.user_name,
                    None,
                    "校验通过（试运行）",
                ));
                continue;
            }

            let create = self.user_mapper.to_scim_create(user);
            let user_name = create.user_name.clone();
            match self.user_repo.create_user(realm_id, create).await {
                Ok(created) => {
                    successful_count += 1;
                    info!(row_number = row_number, user_name = %user_name, user_id = %created.user_id, "用户创建成功");
                    results.push(UserRowResult::success(
                        row_number,
                        &user_name,
                        Some(created.user_id),
                        format!("用户 '{}' 创建成功", user_name),
                    ));
                }
                Err(e) => {
                    failed_count += 1;
                    error!(row_number = row_number, user_name = %user_name, error = %e, "用户创建失败");
                    results.push(UserRowResult::error(
                        row_number,
                        Some(user_name),
                        format!("创建用户失败: {}", e),
                        Vec::new(),
                    ));
                    should_stop = !policy.continue_on_error;
                }
            }
        }

        // === 步骤 5: 汇总状态与报告组装 ===
        let status = derive_status(successful_count, total_rows, &structural_errors);
        let processing_time = start_time.elapsed().as_secs_f64();

        info!(
            status = %status,
            total = total_rows,
            success = successful_count,
            failed = failed_count,
            skipped = skipped_count,
            elapsed_s = processing_time,
            "批量导入完成"
        );

        Ok(BulkImportReport {
            status,
            total_rows,
            successful_imports: successful_count,
            failed_imports: failed_count,
            skipped_imports: skipped_count,
            processing_time_seconds: processing_time,
            results,
            file_errors: None,
            structural_errors: if structural_errors.is_empty() {
                None
            } else {
                Some(structural_errors)
            },
        })
    }
}
