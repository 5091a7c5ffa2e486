// ==========================================
// 航班数据分析系统 - 导入 API
// ==========================================
// 职责: 封装导入层与仓储层，提供导入/批次/冲突查询接口
// 架构: API 层 → 导入层 (FlightImporter) → 仓储层
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::flight::{CleanSummary, ImportBatch, ImportConflict, ImportResult};
use crate::importer::csv_cleaner::CsvCleaner;
use crate::importer::flight_importer_impl::FlightImporterImpl;
use crate::importer::flight_importer_trait::FlightImporter;
use crate::repository::flight_import_repo::FlightImportRepository;
use crate::repository::flight_import_repo_impl::FlightImportRepositoryImpl;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// ImportApi - 导入 API
// ==========================================
pub struct ImportApi {
    repo: Arc<FlightImportRepositoryImpl>,
    importer: FlightImporterImpl<FlightImportRepositoryImpl, ConfigManager>,
}

impl ImportApi {
    pub fn new(repo: Arc<FlightImportRepositoryImpl>, config: Arc<ConfigManager>) -> Self {
        let importer = FlightImporterImpl::new(repo.clone(), config);
        Self { repo, importer }
    }

    /// 清洗原始航班 CSV（不入库，产物可直接用于 import_file）
    #[instrument(skip(self, input, output))]
    pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> ApiResult<CleanSummary> {
        let input = input.as_ref();
        let output = output.as_ref();
        if input.as_os_str().is_empty() || output.as_os_str().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        CsvCleaner::new()
            .clean_file(input, output)
            .map_err(|e| ApiError::ImportError(e.to_string()))
    }

    /// 导入单个航班文件（CSV/Excel）
    #[instrument(skip(self, file_path))]
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ApiResult<ImportResult> {
        let path = file_path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        self.importer
            .import_from_file(path)
            .await
            .map_err(|e| ApiError::ImportError(e.to_string()))
    }

    /// 批量导入多个文件（单文件失败不影响其他文件）
    pub async fn import_files<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> ApiResult<Vec<Result<ImportResult, String>>> {
        if file_paths.is_empty() {
            return Err(ApiError::InvalidInput("文件列表不能为空".to_string()));
        }

        self.importer
            .batch_import(file_paths)
            .await
            .map_err(|e| ApiError::ImportError(e.to_string()))
    }

    /// 查询最近的导入批次
    pub async fn recent_batches(&self, limit: usize) -> ApiResult<Vec<ImportBatch>> {
        Ok(self.repo.get_recent_batches(limit.max(1)).await?)
    }

    /// 查询冲突记录（可按批次 / 是否已处理过滤）
    pub async fn list_conflicts(
        &self,
        batch_id: Option<&str>,
        resolved: Option<bool>,
    ) -> ApiResult<Vec<ImportConflict>> {
        Ok(self.repo.list_conflicts(batch_id, resolved).await?)
    }

    /// 冲突记录计数
    pub async fn count_conflicts(
        &self,
        batch_id: Option<&str>,
        resolved: Option<bool>,
    ) -> ApiResult<i64> {
        Ok(self.repo.count_conflicts(batch_id, resolved).await?)
    }

    /// 标记冲突已处理
    pub async fn resolve_conflict(&self, conflict_id: &str) -> ApiResult<()> {
        if conflict_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("冲突 ID 不能为空".to_string()));
        }
        Ok(self.repo.resolve_conflict(conflict_id).await?)
    }

    /// 航班主表行数
    pub async fn count_flights(&self) -> ApiResult<i64> {
        Ok(self.repo.count_flights().await?)
    }
}
