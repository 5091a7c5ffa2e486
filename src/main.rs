// ==========================================
// 航班数据分析系统 - 命令行入口
// ==========================================
// 技术栈: Rust + SQLite
// 工作流: clean → load → analyze / export
// ==========================================

use flight_analytics::api::error::ApiError;
use flight_analytics::app::AppState;
use flight_analytics::export::export_dashboard_tables;
use flight_analytics::importer::csv_cleaner::CsvCleaner;
use flight_analytics::perf::PerfGuard;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = r#"航班数据分析系统

用法:
  flight-analytics clean <输入.csv> <输出.csv>       清洗原始航班 CSV
  flight-analytics load <文件...>                    导入清洗后的 CSV/Excel
  flight-analytics analyze [--top N]                 输出描述性统计
  flight-analytics export <输出目录> [--top N]       导出图表数据（CSV+JSON）
  flight-analytics batches [--limit N]               查看最近导入批次
  flight-analytics conflicts [--batch ID] [--open]   查看导入冲突队列
  flight-analytics config set <key> <value>          写入配置项
  flight-analytics config get <key>                  读取配置项
  flight-analytics config list                       输出全部配置快照（JSON）

环境变量:
  FLIGHT_ANALYTICS_DB_PATH   数据库文件路径
  RUST_LOG                   日志级别（如 flight_analytics=debug）
"#;

#[tokio::main]
async fn main() -> ExitCode {
    flight_analytics::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprint!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    match args[0].as_str() {
        "clean" => cmd_clean(&args[1..]),
        "load" => cmd_load(&args[1..]).await,
        "analyze" => cmd_analyze(&args[1..]).await,
        "export" => cmd_export(&args[1..]).await,
        "batches" => cmd_batches(&args[1..]).await,
        "conflicts" => cmd_conflicts(&args[1..]).await,
        "config" => cmd_config(&args[1..]).await,
        "help" | "--help" | "-h" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => Err(format!("未知命令: {}（使用 help 查看用法）", other).into()),
    }
}

/// 解析 --flag N 形式的可选参数
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn open_state() -> Result<AppState, Box<dyn std::error::Error>> {
    AppState::with_default_db()
}

// ==========================================
// clean - 清洗原始 CSV
// ==========================================
fn cmd_clean(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let [input, output] = args else {
        return Err("用法: clean <输入.csv> <输出.csv>".into());
    };

    let _perf = PerfGuard::new("clean");
    let cleaner = CsvCleaner::new();
    let summary = cleaner.clean_file(Path::new(input), Path::new(output))?;

    println!("清洗完成: {}", output);
    println!("  输入行数:        {}", summary.total_rows);
    println!("  写出行数:        {}", summary.written_rows);
    println!("  丢弃行数:        {}", summary.dropped_rows);
    println!("  填 0 单元格数:   {}", summary.zero_filled_cells);
    println!("  填充取消代码行:  {}", summary.normalized_codes);
    Ok(())
}

// ==========================================
// load - 导入文件
// ==========================================
async fn cmd_load(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if args.is_empty() {
        return Err("用法: load <文件...>".into());
    }

    let state = open_state()?;
    let _perf = PerfGuard::new("load");

    let results = state
        .import_api
        .import_files(args.iter().map(|s| s.as_str()).collect())
        .await?;

    for result in &results {
        match result {
            Ok(r) => {
                println!(
                    "批次 {}: 总 {} / 成功 {} / 阻断 {} / 警告 {} / 冲突 {} / {} 块 / {} ms",
                    r.batch.batch_id,
                    r.summary.total_rows,
                    r.summary.success,
                    r.summary.blocked,
                    r.summary.warning,
                    r.summary.conflict,
                    r.batch.chunk_count,
                    r.batch.elapsed_ms.unwrap_or(0),
                );
            }
            Err(e) => println!("导入失败: {}", e),
        }
    }

    let total = state.import_api.count_flights().await?;
    println!("航班主表当前行数: {}", total);
    Ok(())
}

// ==========================================
// analyze - 描述性统计
// ==========================================
async fn cmd_analyze(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let top = flag_value(args, "--top")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10);

    let state = open_state()?;
    let _perf = PerfGuard::new("analyze");
    let summary = state.analytics_api.dashboard_summary(top).await?;

    println!("===== 准点率 =====");
    println!(
        "总航班 {} | 准点 {} | 延误 {} | 取消 {} | 备降 {} | 准点率 {:.1}%（阈值 {} 分钟）",
        summary.on_time.total_flights,
        summary.on_time.on_time,
        summary.on_time.delayed,
        summary.on_time.cancelled,
        summary.on_time.diverted,
        summary.on_time.on_time_rate * 100.0,
        summary.on_time.threshold_minutes,
    );

    println!("\n===== 承运人延误（前 {} 位）=====", top);
    for c in summary.carriers.iter().take(top) {
        println!(
            "{:<4} 航班 {:>8} | 起飞延误 {:>7.2} | 到达延误 {:>7.2} | 取消率 {:>6.2}%",
            c.carrier,
            c.flights,
            c.avg_dep_delay,
            c.avg_arr_delay,
            c.cancellation_rate * 100.0,
        );
    }

    println!("\n===== 月度趋势 =====");
    for m in &summary.monthly_trend {
        println!(
            "{:>2} 月: 航班 {:>8} | 到达延误 {:>7.2} | 取消率 {:>6.2}%",
            m.month,
            m.flights,
            m.avg_arr_delay,
            m.cancellation_rate * 100.0,
        );
    }

    println!("\n===== Top {} 航线 =====", top);
    for r in &summary.top_routes {
        println!(
            "{} → {}: 航班 {:>7} | 到达延误 {:>7.2} | 平均航距 {:>7.1} 英里",
            r.origin, r.dest, r.flights, r.avg_arr_delay, r.avg_distance,
        );
    }

    println!("\n===== 取消原因 =====");
    for c in &summary.cancellation_breakdown {
        println!(
            "{:<20} {:>7} ({:.1}%)",
            c.label,
            c.count,
            c.share * 100.0
        );
    }

    println!("\n===== 延误归因（分钟）=====");
    let d = &summary.delay_causes;
    println!("承运人 {:>10}", d.carrier_minutes);
    println!("天气   {:>10}", d.weather_minutes);
    println!("空管   {:>10}", d.nas_minutes);
    println!("安全   {:>10}", d.security_minutes);
    println!("前序   {:>10}", d.late_aircraft_minutes);
    println!("合计   {:>10}", d.total_minutes());

    Ok(())
}

// ==========================================
// export - 图表数据导出
// ==========================================
async fn cmd_export(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let Some(out_dir) = args.first() else {
        return Err("用法: export <输出目录> [--top N]".into());
    };
    let top = flag_value(args, "--top")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(20);

    let state = open_state()?;
    let _perf = PerfGuard::new("export");
    let summary = state.analytics_api.dashboard_summary(top).await?;
    let written = export_dashboard_tables(&summary, Path::new(out_dir))?;

    println!("已导出 {} 个文件到 {}", written.len(), out_dir);
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

// ==========================================
// batches - 最近批次
// ==========================================
async fn cmd_batches(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let limit = flag_value(args, "--limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10);

    let state = open_state()?;
    let batches = state.import_api.recent_batches(limit).await?;

    if batches.is_empty() {
        println!("暂无导入批次");
        return Ok(());
    }

    for b in &batches {
        println!(
            "{} | {} | 总 {} / 成功 {} / 阻断 {} / 冲突 {} | {} 块 | {} ms",
            b.batch_id,
            b.file_name.as_deref().unwrap_or("-"),
            b.total_rows,
            b.success_rows,
            b.blocked_rows,
            b.conflict_rows,
            b.chunk_count,
            b.elapsed_ms.unwrap_or(0),
        );
    }
    Ok(())
}

// ==========================================
// conflicts - 冲突队列
// ==========================================
async fn cmd_conflicts(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let batch_id = flag_value(args, "--batch");
    let resolved = if args.iter().any(|a| a == "--open") {
        Some(false)
    } else {
        None
    };

    let state = open_state()?;
    let conflicts = state
        .import_api
        .list_conflicts(batch_id.as_deref(), resolved)
        .await?;

    if conflicts.is_empty() {
        println!("暂无冲突记录");
        return Ok(());
    }

    for c in &conflicts {
        println!(
            "{} | 批次 {} | 行 {} | {:?} | {} | {}",
            c.conflict_id,
            c.batch_id,
            c.row_number,
            c.conflict_type,
            if c.resolved { "已处理" } else { "待处理" },
            c.reason,
        );
    }
    Ok(())
}

// ==========================================
// config - 配置读写
// ==========================================
async fn cmd_config(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let state = open_state()?;

    match args {
        [action, key, value] if action == "set" => {
            state.config.set_global_config_value(key, value)?;
            println!("已写入配置: {} = {}", key, value);
            Ok(())
        }
        [action, key] if action == "get" => {
            match state.config.get_global_config_value(key)? {
                Some(value) => println!("{} = {}", key, value),
                None => println!("{} 未设置（使用默认值）", key),
            }
            Ok(())
        }
        [action] if action == "list" => {
            println!("{}", state.config.get_config_snapshot()?);
            Ok(())
        }
        _ => Err(Box::new(ApiError::InvalidInput(
            "用法: config set <key> <value> | config get <key> | config list".to_string(),
        ))
        .into()),
    }
}
