// ==========================================
// 航班数据分析系统 - 统计查询仓储
// ==========================================
// 职责: flight 表只读聚合查询（描述性统计）
// 口径:
// - 延误均值仅统计未取消航班（cancelled = 0）
// - 取消率 = 取消数 / 航班数
// - 准点 = arr_delay <= 阈值（仅未取消未备降航班）
// ==========================================

use crate::domain::stats::{
    AirportStat, CancellationBreakdown, CarrierDelaySummary, DelayCauseTotals, MonthlyTrendPoint,
    OnTimeSummary, RouteStat, WeekdayProfilePoint,
};
use crate::domain::types::CancellationReason;
use crate::repository::error::{RepoResult, RepositoryError};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::instrument;

// ==========================================
// StatsRepository Trait
// ==========================================
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// 承运人维度延误/取消汇总（按航班数倒序）
    async fn carrier_delay_summary(&self) -> RepoResult<Vec<CarrierDelaySummary>>;

    /// 月度趋势（1-12 月，按月份升序）
    async fn monthly_trend(&self) -> RepoResult<Vec<MonthlyTrendPoint>>;

    /// 航班量最大的航线 Top N
    async fn top_routes(&self, limit: usize) -> RepoResult<Vec<RouteStat>>;

    /// 出港航班量最大的机场 Top N
    async fn busiest_airports(&self, limit: usize) -> RepoResult<Vec<AirportStat>>;

    /// 取消原因分布（仅取消航班）
    async fn cancellation_breakdown(&self) -> RepoResult<Vec<CancellationBreakdown>>;

    /// 延误归因分钟数合计
    async fn delay_cause_totals(&self) -> RepoResult<DelayCauseTotals>;

    /// 准点率汇总
    ///
    /// # 参数
    /// - threshold_minutes: 准点判定阈值（分钟）
    async fn on_time_summary(&self, threshold_minutes: i32) -> RepoResult<OnTimeSummary>;

    /// 星期维度概况（1=周一 ... 7=周日）
    async fn weekday_profile(&self) -> RepoResult<Vec<WeekdayProfilePoint>>;
}

// ==========================================
// StatsRepositoryImpl - SQLite 实现
// ==========================================
pub struct StatsRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl StatsRepositoryImpl {
    pub fn new(db_path: &str) -> RepoResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepoResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl StatsRepository for StatsRepositoryImpl {
    #[instrument(skip(self))]
    async fn carrier_delay_summary(&self) -> RepoResult<Vec<CarrierDelaySummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT op_unique_carrier,
                   COUNT(*) AS flights,
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN dep_delay END), 0.0),
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN arr_delay END), 0.0),
                   SUM(cancelled)
            FROM flight
            GROUP BY op_unique_carrier
            ORDER BY flights DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let flights: i64 = row.get(1)?;
            let cancelled: i64 = row.get(4)?;
            Ok(CarrierDelaySummary {
                carrier: row.get(0)?,
                flights,
                avg_dep_delay: row.get(2)?,
                avg_arr_delay: row.get(3)?,
                cancelled,
                cancellation_rate: if flights > 0 {
                    cancelled as f64 / flights as f64
                } else {
                    0.0
                },
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    #[instrument(skip(self))]
    async fn monthly_trend(&self) -> RepoResult<Vec<MonthlyTrendPoint>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT month,
                   COUNT(*) AS flights,
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN dep_delay END), 0.0),
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN arr_delay END), 0.0),
                   SUM(cancelled)
            FROM flight
            WHERE month IS NOT NULL
            GROUP BY month
            ORDER BY month ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let flights: i64 = row.get(1)?;
            let cancelled: i64 = row.get(4)?;
            Ok(MonthlyTrendPoint {
                month: row.get(0)?,
                flights,
                avg_dep_delay: row.get(2)?,
                avg_arr_delay: row.get(3)?,
                cancelled,
                cancellation_rate: if flights > 0 {
                    cancelled as f64 / flights as f64
                } else {
                    0.0
                },
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    #[instrument(skip(self))]
    async fn top_routes(&self, limit: usize) -> RepoResult<Vec<RouteStat>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT origin, dest,
                   COUNT(*) AS flights,
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN arr_delay END), 0.0),
                   COALESCE(AVG(distance), 0.0)
            FROM flight
            GROUP BY origin, dest
            ORDER BY flights DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(RouteStat {
                origin: row.get(0)?,
                dest: row.get(1)?,
                flights: row.get(2)?,
                avg_arr_delay: row.get(3)?,
                avg_distance: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    #[instrument(skip(self))]
    async fn busiest_airports(&self, limit: usize) -> RepoResult<Vec<AirportStat>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT origin,
                   MAX(origin_city_name),
                   COUNT(*) AS departures,
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN dep_delay END), 0.0),
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN taxi_out END), 0.0)
            FROM flight
            GROUP BY origin
            ORDER BY departures DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(AirportStat {
                airport: row.get(0)?,
                city_name: row.get(1)?,
                departures: row.get(2)?,
                avg_dep_delay: row.get(3)?,
                avg_taxi_out: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    #[instrument(skip(self))]
    async fn cancellation_breakdown(&self) -> RepoResult<Vec<CancellationBreakdown>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT UPPER(COALESCE(cancellation_code, '')),
                   COUNT(*)
            FROM flight
            WHERE cancelled = 1
            GROUP BY UPPER(COALESCE(cancellation_code, ''))
            ORDER BY COUNT(*) DESC
            "#,
        )?;

        let raw: Vec<(String, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = raw.iter().map(|(_, c)| c).sum();

        let breakdown = raw
            .into_iter()
            .map(|(code, count)| {
                let label = CancellationReason::from_code(&code)
                    .map(|r| r.as_label().to_string())
                    .unwrap_or_else(|| {
                        if code.is_empty() {
                            "Unknown".to_string()
                        } else {
                            code.clone()
                        }
                    });
                CancellationBreakdown {
                    code,
                    label,
                    count,
                    share: if total > 0 {
                        count as f64 / total as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        Ok(breakdown)
    }

    #[instrument(skip(self))]
    async fn delay_cause_totals(&self) -> RepoResult<DelayCauseTotals> {
        let conn = self.lock()?;
        let totals = conn.query_row(
            r#"
            SELECT COALESCE(SUM(carrier_delay), 0),
                   COALESCE(SUM(weather_delay), 0),
                   COALESCE(SUM(nas_delay), 0),
                   COALESCE(SUM(security_delay), 0),
                   COALESCE(SUM(late_aircraft_delay), 0)
            FROM flight
            WHERE cancelled = 0
            "#,
            [],
            |row| {
                Ok(DelayCauseTotals {
                    carrier_minutes: row.get(0)?,
                    weather_minutes: row.get(1)?,
                    nas_minutes: row.get(2)?,
                    security_minutes: row.get(3)?,
                    late_aircraft_minutes: row.get(4)?,
                })
            },
        )?;
        Ok(totals)
    }

    #[instrument(skip(self))]
    async fn on_time_summary(&self, threshold_minutes: i32) -> RepoResult<OnTimeSummary> {
        let conn = self.lock()?;
        let summary = conn.query_row(
            r#"
            SELECT COUNT(*),
                   SUM(CASE WHEN cancelled = 0 AND diverted = 0
                            AND arr_delay <= ?1 THEN 1 ELSE 0 END),
                   SUM(CASE WHEN cancelled = 0 AND diverted = 0
                            AND arr_delay > ?1 THEN 1 ELSE 0 END),
                   SUM(cancelled),
                   SUM(diverted)
            FROM flight
            "#,
            params![threshold_minutes as f64],
            |row| {
                let total_flights: i64 = row.get(0)?;
                let on_time: i64 = row.get::<_, Option<i64>>(1)?.unwrap_or(0);
                let delayed: i64 = row.get::<_, Option<i64>>(2)?.unwrap_or(0);
                let cancelled: i64 = row.get::<_, Option<i64>>(3)?.unwrap_or(0);
                let diverted: i64 = row.get::<_, Option<i64>>(4)?.unwrap_or(0);
                Ok((total_flights, on_time, delayed, cancelled, diverted))
            },
        )?;

        let (total_flights, on_time, delayed, cancelled, diverted) = summary;
        let operated = total_flights - cancelled - diverted;

        Ok(OnTimeSummary {
            total_flights,
            on_time,
            delayed,
            cancelled,
            diverted,
            on_time_rate: if operated > 0 {
                on_time as f64 / operated as f64
            } else {
                0.0
            },
            threshold_minutes,
        })
    }

    #[instrument(skip(self))]
    async fn weekday_profile(&self) -> RepoResult<Vec<WeekdayProfilePoint>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT day_of_week,
                   COUNT(*),
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN dep_delay END), 0.0),
                   COALESCE(AVG(CASE WHEN cancelled = 0 THEN arr_delay END), 0.0)
            FROM flight
            WHERE day_of_week IS NOT NULL
            GROUP BY day_of_week
            ORDER BY day_of_week ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(WeekdayProfilePoint {
                day_of_week: row.get(0)?,
                flights: row.get(1)?,
                avg_dep_delay: row.get(2)?,
                avg_arr_delay: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
