// ==========================================
// 车队运营驾驶舱 - API 层
// ==========================================
// 职责: 面向展示层的调用入口, 统一错误映射
// ==========================================

pub mod config_api;
pub mod error;
pub mod simulation_api;

pub use config_api::{ConfigApi, ConfigItem};
pub use error::{ApiError, ApiResult};
pub use simulation_api::{SimulationApi, SimulationRequest, SimulationRun};
