// ==========================================
// 车队运营驾驶舱 - 引擎层
// ==========================================
// 职责: 产能模型 → 结果估计器 → 财务模型
// 红线: 引擎不访问存储, 不修改协作方集合
// ==========================================

pub mod capacity;
pub mod error;
pub mod financial;
pub mod orchestrator;
pub mod outcome;
pub mod variability;

// 重导出核心引擎
pub use capacity::CapacityModel;
pub use error::{SimulationError, SimulationOutcome};
pub use financial::FinancialModel;
pub use orchestrator::SimulationEngine;
pub use outcome::OutcomeEstimator;
pub use variability::lateness_jitter_factor;
