// ==========================================
// 车队运营驾驶舱 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (车队规模/班次方案模拟)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 产能/结果/财务模型
pub mod engine;

// 配置层 - 经营参数
pub mod config;

// 车队数据源 - 司机/线路/订单
pub mod fleet;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态与会话
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DriverStatus, OrderStatus, RouteStatus, RouteValueSource, TrafficLevel};

// 领域实体
pub use domain::{
    Driver, FleetSnapshot, Order, Route, RouteProfile, SimulationInput, SimulationResult,
};

// 引擎
pub use engine::{
    CapacityModel, FinancialModel, OutcomeEstimator, SimulationEngine, SimulationError,
};

// 配置
pub use config::{ConfigManager, SimulationConfig, SimulationConfigReader};

// API
pub use api::{ApiError, SimulationApi, SimulationRequest, SimulationRun};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队运营驾驶舱";
