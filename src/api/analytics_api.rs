// ==========================================
// 航班数据分析系统 - 统计分析 API
// ==========================================
// 职责: 封装统计仓储，提供描述性统计查询与仪表盘聚合
// 口径: 准点阈值从配置读取（on_time_threshold_minutes）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::config::import_config_trait::LoaderConfigReader;
use crate::domain::stats::{
    AirportStat, CancellationBreakdown, CarrierDelaySummary, DelayCauseTotals, MonthlyTrendPoint,
    OnTimeSummary, RouteStat, WeekdayProfilePoint,
};
use crate::repository::stats_repo::{StatsRepository, StatsRepositoryImpl};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Top N 查询的上限（防止误传超大 limit）
const MAX_TOP_LIMIT: usize = 500;

// ==========================================
// DashboardSummary - 仪表盘聚合
// ==========================================
// 用途: 一次取全所有统计口径（export 命令的数据源）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub on_time: OnTimeSummary,
    pub carriers: Vec<CarrierDelaySummary>,
    pub monthly_trend: Vec<MonthlyTrendPoint>,
    pub top_routes: Vec<RouteStat>,
    pub busiest_airports: Vec<AirportStat>,
    pub cancellation_breakdown: Vec<CancellationBreakdown>,
    pub delay_causes: DelayCauseTotals,
    pub weekday_profile: Vec<WeekdayProfilePoint>,
}

// ==========================================
// AnalyticsApi - 统计分析 API
// ==========================================
pub struct AnalyticsApi {
    stats_repo: Arc<StatsRepositoryImpl>,
    config: Arc<ConfigManager>,
}

impl AnalyticsApi {
    pub fn new(stats_repo: Arc<StatsRepositoryImpl>, config: Arc<ConfigManager>) -> Self {
        Self { stats_repo, config }
    }

    fn check_limit(limit: usize) -> ApiResult<usize> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }
        Ok(limit.min(MAX_TOP_LIMIT))
    }

    /// 承运人延误/取消汇总
    pub async fn carrier_summary(&self) -> ApiResult<Vec<CarrierDelaySummary>> {
        Ok(self.stats_repo.carrier_delay_summary().await?)
    }

    /// 月度趋势
    pub async fn monthly_trend(&self) -> ApiResult<Vec<MonthlyTrendPoint>> {
        Ok(self.stats_repo.monthly_trend().await?)
    }

    /// 航班量 Top N 航线
    pub async fn top_routes(&self, limit: usize) -> ApiResult<Vec<RouteStat>> {
        let limit = Self::check_limit(limit)?;
        Ok(self.stats_repo.top_routes(limit).await?)
    }

    /// 出港量 Top N 机场
    pub async fn busiest_airports(&self, limit: usize) -> ApiResult<Vec<AirportStat>> {
        let limit = Self::check_limit(limit)?;
        Ok(self.stats_repo.busiest_airports(limit).await?)
    }

    /// 取消原因分布
    pub async fn cancellation_breakdown(&self) -> ApiResult<Vec<CancellationBreakdown>> {
        Ok(self.stats_repo.cancellation_breakdown().await?)
    }

    /// 延误归因合计
    pub async fn delay_cause_totals(&self) -> ApiResult<DelayCauseTotals> {
        Ok(self.stats_repo.delay_cause_totals().await?)
    }

    /// 准点率汇总（阈值取配置 on_time_threshold_minutes）
    pub async fn on_time_summary(&self) -> ApiResult<OnTimeSummary> {
        let threshold = self
            .config
            .get_on_time_threshold_minutes()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(self.stats_repo.on_time_summary(threshold).await?)
    }

    /// 星期维度概况
    pub async fn weekday_profile(&self) -> ApiResult<Vec<WeekdayProfilePoint>> {
        Ok(self.stats_repo.weekday_profile().await?)
    }

    /// 仪表盘聚合（export 命令的数据源）
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self, top_limit: usize) -> ApiResult<DashboardSummary> {
        let top_limit = Self::check_limit(top_limit)?;

        Ok(DashboardSummary {
            on_time: self.on_time_summary().await?,
            carriers: self.carrier_summary().await?,
            monthly_trend: self.monthly_trend().await?,
            top_routes: self.top_routes(top_limit).await?,
            busiest_airports: self.busiest_airports(top_limit).await?,
            cancellation_breakdown: self.cancellation_breakdown().await?,
            delay_causes: self.delay_cause_totals().await?,
            weekday_profile: self.weekday_profile().await?,
        })
    }
}
