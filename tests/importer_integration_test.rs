// ==========================================
// FlightImporter 集成测试
// ==========================================
// 测试目标: 验证完整的航班导入流程
// ==========================================


use flight_analytics::config::ConfigManager;
use flight_analytics::domain::flight::ConflictType;
use flight_analytics::importer::{FlightImporter, FlightImporterImpl};
use flight_analytics::logging;
use flight_analytics::repository::{FlightImportRepository, FlightImportRepositoryImpl};
use std::sync::Arc;
use test_helpers::{create_test_db, insert_test_config, write_flight_csv};

/// 创建测试用的 FlightImporter 实例
fn create_test_importer(
    db_path: &str,
) -> (
    FlightImporterImpl<FlightImportRepositoryImpl, ConfigManager>,
    Arc<FlightImportRepositoryImpl>,
) {
    let repo = Arc::new(
        FlightImportRepositoryImpl::new(db_path).expect("Failed to create repository"),
    );
    let config = Arc::new(ConfigManager::new(db_path).expect("Failed to create ConfigManager"));
    let importer = FlightImporterImpl::new(repo.clone(), config);
    (importer, repo)
}

#[tokio::test]
async fn test_import_csv_basic() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    let csv = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,-2.0,-5.0,15.0,0,,0,760,3,5,0,0",
        "2024-03-15,AA,5678,DFW,Dallas TX,LAX,900,12.0,8.0,18.0,0,,0,1235,3,5,0,0",
        "2024-03-16,UA,9012,ORD,Chicago IL,DEN,1430,0.0,0.0,10.0,0,,0,888,3,6,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let result = importer.import_from_file(csv.path()).await.unwrap();

    assert_eq!(result.summary.total_rows, 3);
    assert_eq!(result.summary.success, 3);
    assert_eq!(result.summary.blocked, 0);
    assert_eq!(result.summary.conflict, 0);
    assert_eq!(result.batch.chunk_count, 1);

    assert_eq!(repo.count_flights().await.unwrap(), 3);
}

#[tokio::test]
async fn test_import_blocks_missing_required_fields() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    // 第二行缺 DEST
    let csv = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
        "2024-03-15,DL,2222,ATL,Atlanta GA,,700,0,0,10,0,,0,500,3,5,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let result = importer.import_from_file(csv.path()).await.unwrap();

    assert_eq!(result.summary.total_rows, 2);
    assert_eq!(result.summary.success, 1);
    assert_eq!(result.summary.blocked, 1);
    assert_eq!(repo.count_flights().await.unwrap(), 1);
}

#[tokio::test]
async fn test_import_type_error_goes_to_conflict_queue() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    // 第二行 DISTANCE 非数值
    let csv = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
        "2024-03-15,AA,5678,DFW,Dallas TX,LAX,900,0,0,10,0,,0,abc,3,5,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let result = importer.import_from_file(csv.path()).await.unwrap();

    assert_eq!(result.summary.success, 1);
    assert_eq!(result.summary.conflict, 1);

    let conflicts = repo.list_conflicts(None, None).await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::DataTypeError);
    assert_eq!(conflicts[0].row_number, 3);
    assert!(!conflicts[0].resolved);
}

#[tokio::test]
async fn test_import_duplicate_in_same_batch() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    // 第三行与第一行自然键相同（保留首行）
    let csv = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
        "2024-03-15,AA,5678,DFW,Dallas TX,LAX,900,0,0,10,0,,0,1235,3,5,0,0",
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,5,5,12,0,,0,760,3,5,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let result = importer.import_from_file(csv.path()).await.unwrap();

    assert_eq!(result.summary.success, 2);
    assert_eq!(result.summary.conflict, 1);

    let conflicts = repo.list_conflicts(None, None).await.unwrap();
    assert_eq!(conflicts[0].conflict_type, ConflictType::DuplicateFlight);
    assert_eq!(conflicts[0].row_number, 4);
}

#[tokio::test]
async fn test_import_cross_batch_duplicate() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        // truncate_before_load=false: 跨批次重复检测生效
        insert_test_config(&conn).unwrap();
    }

    let csv1 = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
    ])
    .unwrap();
    let csv2 = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,9,9,15,0,,0,760,3,5,0,0",
        "2024-03-16,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,6,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    importer.import_from_file(csv1.path()).await.unwrap();
    let result = importer.import_from_file(csv2.path()).await.unwrap();

    // 第一行与批次 1 重复，进入冲突队列；第二行日期不同，正常入库
    assert_eq!(result.summary.success, 1);
    assert_eq!(result.summary.conflict, 1);
    assert_eq!(repo.count_flights().await.unwrap(), 2);
}

#[tokio::test]
async fn test_import_header_only_file() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    let csv = write_flight_csv(&[]).unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let result = importer.import_from_file(csv.path()).await.unwrap();

    // 仅表头文件: 零行成功，不报错
    assert_eq!(result.summary.total_rows, 0);
    assert_eq!(result.summary.success, 0);
    assert_eq!(repo.count_flights().await.unwrap(), 0);

    // 批次记录仍然落库
    let batches = repo.get_recent_batches(10).await.unwrap();
    assert_eq!(batches.len(), 1);
}

#[tokio::test]
async fn test_import_truncate_before_load() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
        // 全量重载模式
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value)
             VALUES ('global', 'truncate_before_load', 'true')",
            [],
        )
        .unwrap();
    }

    let csv1 = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
        "2024-03-15,AA,5678,DFW,Dallas TX,LAX,900,0,0,10,0,,0,1235,3,5,0,0",
    ])
    .unwrap();
    let csv2 = write_flight_csv(&[
        "2024-04-01,UA,9012,ORD,Chicago IL,DEN,1430,0,0,10,0,,0,888,4,1,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    importer.import_from_file(csv1.path()).await.unwrap();
    assert_eq!(repo.count_flights().await.unwrap(), 2);

    // 第二次导入先清空主表
    importer.import_from_file(csv2.path()).await.unwrap();
    assert_eq!(repo.count_flights().await.unwrap(), 1);
}

#[tokio::test]
async fn test_import_cancelled_flight_without_code() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    // 已取消但取消代码缺失: INFO 级，允许导入，代码保持 NULL
    let csv = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,,,,1,,0,760,3,5,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let result = importer.import_from_file(csv.path()).await.unwrap();

    assert_eq!(result.summary.success, 1);
    assert_eq!(result.summary.blocked, 0);
    assert!(result
        .violations
        .iter()
        .any(|v| v.field == "cancellation_code"));

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let code: Option<String> = conn
        .query_row(
            "SELECT cancellation_code FROM flight WHERE cancelled = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(code, None);
}

#[tokio::test]
async fn test_import_records_operator_in_batch() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    let csv = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
    ])
    .unwrap();

    let repo = Arc::new(FlightImportRepositoryImpl::new(&db_path).unwrap());
    let config = Arc::new(ConfigManager::new(&db_path).unwrap());
    let importer =
        FlightImporterImpl::new(repo.clone(), config).with_imported_by("etl-nightly");

    let result = importer.import_from_file(csv.path()).await.unwrap();
    assert_eq!(result.batch.imported_by.as_deref(), Some("etl-nightly"));

    // 批次记录落库后仍带操作者
    let batches = repo.get_recent_batches(1).await.unwrap();
    assert_eq!(batches[0].imported_by.as_deref(), Some("etl-nightly"));
}

#[tokio::test]
async fn test_batch_import_multiple_files() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        insert_test_config(&conn).unwrap();
    }

    let csv1 = write_flight_csv(&[
        "2024-03-15,DL,1234,ATL,Atlanta GA,JFK,630,0,0,10,0,,0,760,3,5,0,0",
    ])
    .unwrap();
    let csv2 = write_flight_csv(&[
        "2024-03-16,AA,5678,DFW,Dallas TX,LAX,900,0,0,10,0,,0,1235,3,6,0,0",
    ])
    .unwrap();

    let (importer, repo) = create_test_importer(&db_path);
    let results = importer
        .batch_import(vec![
            csv1.path().to_path_buf(),
            csv2.path().to_path_buf(),
            std::path::PathBuf::from("missing_file.csv"),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    // 缺失文件失败，不影响其他文件
    assert!(results[2].is_err());
    assert_eq!(repo.count_flights().await.unwrap(), 2);
}
