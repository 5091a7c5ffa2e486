// ==========================================
// 航班数据分析系统 - 仓储层
// ==========================================
// 职责: SQLite 持久化（航班/批次/冲突）与统计聚合查询
// ==========================================

pub mod error;
pub mod flight_import_repo;
pub mod flight_import_repo_impl;
pub mod stats_repo;

pub use error::{RepoResult, RepositoryError};
pub use flight_import_repo::FlightImportRepository;
pub use flight_import_repo_impl::FlightImportRepositoryImpl;
pub use stats_repo::{StatsRepository, StatsRepositoryImpl};
