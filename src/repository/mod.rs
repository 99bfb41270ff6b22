// ==========================================
// 家禽生产分析系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供批次数据只读访问接口,屏蔽存储细节
// ==========================================

pub mod error;
pub mod in_memory_repo;
pub mod lot_data_source;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use in_memory_repo::InMemoryLotRepository;
pub use lot_data_source::LotDataSource;
