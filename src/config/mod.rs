// ==========================================
// 车队运营驾驶舱 - 配置层
// ==========================================
// 职责: 经营参数管理（燃油/罚款/奖励/收入/路况/效率权重）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod simulation_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::SimulationConfigReader;
pub use simulation_config::{
    demo_simulation_config, EfficiencyWeights, SimulationConfig, TrafficProfile, TrafficProfiles,
};
