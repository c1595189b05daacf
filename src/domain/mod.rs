// ==========================================
// 车队运营驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、模拟输入输出
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod fleet;
pub mod simulation;
pub mod types;

// 重导出核心类型
pub use fleet::{Driver, DriverSummary, FleetSnapshot, Order, Route, RouteProfile};
pub use simulation::{
    FinancialBreakdown, OutcomeEstimate, PerDriverCapacity, SimulationInput, SimulationResult,
    TrafficBreakdown, Variability,
};
pub use types::{DriverStatus, OrderStatus, RouteStatus, RouteValueSource, TrafficLevel};
