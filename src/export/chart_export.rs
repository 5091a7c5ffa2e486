// ==========================================
// 航班数据分析系统 - 图表数据导出
// ==========================================
// 职责: 将仪表盘统计结果导出为图表数据序列（CSV + JSON）
// 产物: 每个图表一张二维表，BI 工具（Power BI 等）可直接接入
// ==========================================

use crate::api::analytics_api::DashboardSummary;
use crate::api::error::{ApiError, ApiResult};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

// ==========================================
// ChartTable - 图表数据表
// ==========================================
// 一个图表 = 表名 + 列名 + 行数据（全部字符串化）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ChartTable {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// 写出 CSV（表头 + 行）
    pub fn write_csv(&self, path: &Path) -> ApiResult<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        writer
            .write_record(&self.columns)
            .map_err(|e| ApiError::ExportError(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| ApiError::ExportError(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;
        Ok(())
    }

    /// 写出 JSON（对象数组，列名为键）
    pub fn write_json(&self, path: &Path) -> ApiResult<()> {
        let objects: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for (col, value) in self.columns.iter().zip(row.iter()) {
                    obj.insert(col.clone(), json!(value));
                }
                serde_json::Value::Object(obj)
            })
            .collect();

        let payload = json!({
            "chart": self.name,
            "data": objects,
        });

        fs::write(path, serde_json::to_string_pretty(&payload).map_err(|e| {
            ApiError::ExportError(e.to_string())
        })?)
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
        Ok(())
    }
}

fn fmt2(value: f64) -> String {
    format!("{:.2}", value)
}

fn fmt4(value: f64) -> String {
    format!("{:.4}", value)
}

// ==========================================
// 仪表盘 → 图表数据表
// ==========================================

/// 将仪表盘聚合结果拆成 8 张图表数据表
pub fn build_chart_tables(summary: &DashboardSummary) -> Vec<ChartTable> {
    let mut tables = Vec::new();

    // 1. 准点率汇总（单行）
    let mut on_time = ChartTable::new(
        "on_time_summary",
        &[
            "total_flights",
            "on_time",
            "delayed",
            "cancelled",
            "diverted",
            "on_time_rate",
            "threshold_minutes",
        ],
    );
    on_time.push_row(vec![
        summary.on_time.total_flights.to_string(),
        summary.on_time.on_time.to_string(),
        summary.on_time.delayed.to_string(),
        summary.on_time.cancelled.to_string(),
        summary.on_time.diverted.to_string(),
        fmt4(summary.on_time.on_time_rate),
        summary.on_time.threshold_minutes.to_string(),
    ]);
    tables.push(on_time);

    // 2. 承运人延误（条形图）
    let mut carriers = ChartTable::new(
        "carrier_delay",
        &[
            "carrier",
            "flights",
            "avg_dep_delay",
            "avg_arr_delay",
            "cancelled",
            "cancellation_rate",
        ],
    );
    for c in &summary.carriers {
        carriers.push_row(vec![
            c.carrier.clone(),
            c.flights.to_string(),
            fmt2(c.avg_dep_delay),
            fmt2(c.avg_arr_delay),
            c.cancelled.to_string(),
            fmt4(c.cancellation_rate),
        ]);
    }
    tables.push(carriers);

    // 3. 月度趋势（折线图）
    let mut monthly = ChartTable::new(
        "monthly_trend",
        &[
            "month",
            "flights",
            "avg_dep_delay",
            "avg_arr_delay",
            "cancelled",
            "cancellation_rate",
        ],
    );
    for m in &summary.monthly_trend {
        monthly.push_row(vec![
            m.month.to_string(),
            m.flights.to_string(),
            fmt2(m.avg_dep_delay),
            fmt2(m.avg_arr_delay),
            m.cancelled.to_string(),
            fmt4(m.cancellation_rate),
        ]);
    }
    tables.push(monthly);

    // 4. Top 航线
    let mut routes = ChartTable::new(
        "top_routes",
        &["origin", "dest", "flights", "avg_arr_delay", "avg_distance"],
    );
    for r in &summary.top_routes {
        routes.push_row(vec![
            r.origin.clone(),
            r.dest.clone(),
            r.flights.to_string(),
            fmt2(r.avg_arr_delay),
            fmt2(r.avg_distance),
        ]);
    }
    tables.push(routes);

    // 5. 最繁忙机场
    let mut airports = ChartTable::new(
        "busiest_airports",
        &[
            "airport",
            "city_name",
            "departures",
            "avg_dep_delay",
            "avg_taxi_out",
        ],
    );
    for a in &summary.busiest_airports {
        airports.push_row(vec![
            a.airport.clone(),
            a.city_name.clone().unwrap_or_default(),
            a.departures.to_string(),
            fmt2(a.avg_dep_delay),
            fmt2(a.avg_taxi_out),
        ]);
    }
    tables.push(airports);

    // 6. 取消原因分布（饼图）
    let mut cancellations =
        ChartTable::new("cancellation_breakdown", &["code", "label", "count", "share"]);
    for c in &summary.cancellation_breakdown {
        cancellations.push_row(vec![
            c.code.clone(),
            c.label.clone(),
            c.count.to_string(),
            fmt4(c.share),
        ]);
    }
    tables.push(cancellations);

    // 7. 延误归因（饼图）
    let mut causes = ChartTable::new("delay_causes", &["cause", "minutes"]);
    causes.push_row(vec![
        "Carrier".to_string(),
        summary.delay_causes.carrier_minutes.to_string(),
    ]);
    causes.push_row(vec![
        "Weather".to_string(),
        summary.delay_causes.weather_minutes.to_string(),
    ]);
    causes.push_row(vec![
        "National Air System".to_string(),
        summary.delay_causes.nas_minutes.to_string(),
    ]);
    causes.push_row(vec![
        "Security".to_string(),
        summary.delay_causes.security_minutes.to_string(),
    ]);
    causes.push_row(vec![
        "Late Aircraft".to_string(),
        summary.delay_causes.late_aircraft_minutes.to_string(),
    ]);
    tables.push(causes);

    // 8. 星期维度（条形图）
    let mut weekday = ChartTable::new(
        "weekday_profile",
        &["day_of_week", "flights", "avg_dep_delay", "avg_arr_delay"],
    );
    for w in &summary.weekday_profile {
        weekday.push_row(vec![
            w.day_of_week.to_string(),
            w.flights.to_string(),
            fmt2(w.avg_dep_delay),
            fmt2(w.avg_arr_delay),
        ]);
    }
    tables.push(weekday);

    tables
}

/// 导出全部图表数据表到目录（每张表一个 .csv + 一个 .json）
///
/// # 返回
/// - 写出的文件路径列表
#[instrument(skip(summary))]
pub fn export_dashboard_tables(
    summary: &DashboardSummary,
    out_dir: &Path,
) -> ApiResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| ApiError::ExportError(e.to_string()))?;

    let tables = build_chart_tables(summary);
    let mut written = Vec::with_capacity(tables.len() * 2);

    for table in &tables {
        let csv_path = out_dir.join(format!("{}.csv", table.name));
        table.write_csv(&csv_path)?;
        written.push(csv_path);

        let json_path = out_dir.join(format!("{}.json", table.name));
        table.write_json(&json_path)?;
        written.push(json_path);
    }

    info!(dir = %out_dir.display(), files = written.len(), "图表数据导出完成");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::*;

    fn sample_summary() -> DashboardSummary {
        DashboardSummary {
            on_time: OnTimeSummary {
                total_flights: 100,
                on_time: 80,
                delayed: 15,
                cancelled: 4,
                diverted: 1,
                on_time_rate: 80.0 / 95.0,
                threshold_minutes: 15,
            },
            carriers: vec![CarrierDelaySummary {
                carrier: "DL".to_string(),
                flights: 60,
                avg_dep_delay: 5.5,
                avg_arr_delay: 3.25,
                cancelled: 2,
                cancellation_rate: 2.0 / 60.0,
            }],
            monthly_trend: vec![],
            top_routes: vec![],
            busiest_airports: vec![],
            cancellation_breakdown: vec![CancellationBreakdown {
                code: "B".to_string(),
                label: "Weather".to_string(),
                count: 3,
                share: 0.75,
            }],
            delay_causes: DelayCauseTotals {
                carrier_minutes: 100,
                weather_minutes: 200,
                nas_minutes: 50,
                security_minutes: 0,
                late_aircraft_minutes: 150,
            },
            weekday_profile: vec![],
        }
    }

    #[test]
    fn test_build_chart_tables_count() {
        let tables = build_chart_tables(&sample_summary());
        assert_eq!(tables.len(), 8);

        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"on_time_summary"));
        assert!(names.contains(&"delay_causes"));
    }

    #[test]
    fn test_export_writes_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_dashboard_tables(&sample_summary(), dir.path()).unwrap();

        // 8 张表 × 2 种格式
        assert_eq!(written.len(), 16);
        for path in &written {
            assert!(path.exists());
        }

        let csv = std::fs::read_to_string(dir.path().join("carrier_delay.csv")).unwrap();
        assert!(csv.starts_with("carrier,flights"));
        assert!(csv.contains("DL"));

        let json = std::fs::read_to_string(dir.path().join("delay_causes.json")).unwrap();
        assert!(json.contains("Late Aircraft"));
    }
}
