// ==========================================
// 车队运营驾驶舱 - 模拟配置读取 Trait
// ==========================================
// 职责: 定义模拟引擎所需的配置读取接口（不包含实现）
// 实现者: ConfigManager（config_kv 表）、HashMap（内存配置）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::config_keys;
use crate::config::simulation_config::SimulationConfig;
use crate::engine::error::SimulationOutcome;
use async_trait::async_trait;
use std::collections::HashMap;

// ==========================================
// SimulationConfigReader Trait
// ==========================================
#[async_trait]
pub trait SimulationConfigReader: Send + Sync {
    /// 读取单个配置原始值
    ///
    /// # 返回
    /// - Ok(Some(String)): 配置值
    /// - Ok(None): 配置不存在
    /// - Err(Configuration): 配置源不可读
    async fn get_simulation_value(&self, key: &str) -> SimulationOutcome<Option<String>>;

    /// 读取全部已识别配置并解析为 SimulationConfig
    ///
    /// # 错误
    /// - 财务常量缺失或非数值 → Configuration
    async fn load_simulation_config(&self) -> SimulationOutcome<SimulationConfig> {
        let mut values = HashMap::new();
        for key in config_keys::SIMULATION_KEYS {
            if let Some(value) = self.get_simulation_value(key).await? {
                values.insert(key.to_string(), value);
            }
        }
        SimulationConfig::from_values(&values)
    }
}

// ==========================================
// 内存配置实现
// ==========================================
#[async_trait]
impl SimulationConfigReader for HashMap<String, String> {
    async fn get_simulation_value(&self, key: &str) -> SimulationOutcome<Option<String>> {
        Ok(self.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::SimulationError;

    #[tokio::test]
    async fn test_hashmap_reader_loads_config() {
        let values: HashMap<String, String> = [
            ("base_fuel_cost", "8000"),
            ("per_driver_fuel_rate", "400"),
            ("per_late_penalty", "50"),
            ("per_on_time_bonus", "10"),
            ("on_time_bonus_threshold", "0.9"),
            ("average_route_value", "1200"),
            ("lateness_probability_high", "0.4"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = values.load_simulation_config().await.unwrap();
        assert_eq!(config.average_route_value, 1200.0);
        assert_eq!(config.traffic.high.lateness_probability, 0.4);
    }

    #[tokio::test]
    async fn test_empty_reader_is_configuration_error() {
        let values: HashMap<String, String> = HashMap::new();
        let err = values.load_simulation_config().await.unwrap_err();
        assert!(matches!(err, SimulationError::Configuration { .. }));
    }
}
