// ==========================================
// 车队运营驾驶舱 - 模拟参数配置
// ==========================================
// 职责: 将 config_kv 键值解析为强类型 SimulationConfig
// 红线: 财务常量缺失/非数值必须报错, 不得静默使用默认值
// 红线: 仅非财务参数允许使用文档化默认值
// ==========================================

use crate::config::config_manager::config_keys;
use crate::domain::types::{RouteValueSource, TrafficLevel};
use crate::engine::error::{SimulationError, SimulationOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 系统默认平均线路耗时（分钟）；空车队时使用
pub const DEFAULT_AVERAGE_ROUTE_TIME_MINUTES: f64 = 45.0;

/// 准时奖励阈值推荐值（准时率 >= 90% 才发放奖励，阶跃而非渐进）
pub const DEFAULT_ON_TIME_BONUS_THRESHOLD: f64 = 0.9;

/// 燃油里程基准（公里）：平均里程等于基准时系数为 1
pub const DEFAULT_FUEL_REFERENCE_DISTANCE_KM: f64 = 20.0;

// 路况延误概率默认值 (Low < Medium < High)
pub const DEFAULT_LATENESS_PROBABILITY_LOW: f64 = 0.05;
pub const DEFAULT_LATENESS_PROBABILITY_MEDIUM: f64 = 0.12;
pub const DEFAULT_LATENESS_PROBABILITY_HIGH: f64 = 0.25;

// 路况耗时系数默认值
pub const DEFAULT_DELAY_FACTOR_LOW: f64 = 1.0;
pub const DEFAULT_DELAY_FACTOR_MEDIUM: f64 = 1.15;
pub const DEFAULT_DELAY_FACTOR_HIGH: f64 = 1.35;

// 效率评分权重默认值
pub const DEFAULT_RELIABILITY_WEIGHT: f64 = 70.0;
pub const DEFAULT_PRODUCTIVITY_WEIGHT: f64 = 30.0;
pub const DEFAULT_TARGET_DELIVERIES_PER_DRIVER_HOUR: f64 = 1.5;

// ==========================================
// TrafficProfile - 单一路况参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficProfile {
    pub lateness_probability: f64, // [0, 1]
    pub delay_factor: f64,         // 实际耗时 / 基准耗时, > 0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficProfiles {
    pub low: TrafficProfile,
    pub medium: TrafficProfile,
    pub high: TrafficProfile,
}

impl TrafficProfiles {
    pub fn get(&self, level: TrafficLevel) -> TrafficProfile {
        match level {
            TrafficLevel::Low => self.low,
            TrafficLevel::Medium => self.medium,
            TrafficLevel::High => self.high,
        }
    }
}

impl Default for TrafficProfiles {
    fn default() -> Self {
        Self {
            low: TrafficProfile {
                lateness_probability: DEFAULT_LATENESS_PROBABILITY_LOW,
                delay_factor: DEFAULT_DELAY_FACTOR_LOW,
            },
            medium: TrafficProfile {
                lateness_probability: DEFAULT_LATENESS_PROBABILITY_MEDIUM,
                delay_factor: DEFAULT_DELAY_FACTOR_MEDIUM,
            },
            high: TrafficProfile {
                lateness_probability: DEFAULT_LATENESS_PROBABILITY_HIGH,
                delay_factor: DEFAULT_DELAY_FACTOR_HIGH,
            },
        }
    }
}

// ==========================================
// EfficiencyWeights - 效率评分权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyWeights {
    pub reliability_weight: f64,
    pub productivity_weight: f64,
    pub target_deliveries_per_driver_hour: f64,
}

impl Default for EfficiencyWeights {
    fn default() -> Self {
        Self {
            reliability_weight: DEFAULT_RELIABILITY_WEIGHT,
            productivity_weight: DEFAULT_PRODUCTIVITY_WEIGHT,
            target_deliveries_per_driver_hour: DEFAULT_TARGET_DELIVERIES_PER_DRIVER_HOUR,
        }
    }
}

// ==========================================
// SimulationConfig - 模拟参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    // ===== 财务常量 (必需) =====
    pub base_fuel_cost: f64,
    pub per_driver_fuel_rate: f64,
    pub per_late_penalty: f64,
    pub per_on_time_bonus: f64,
    pub on_time_bonus_threshold: f64,
    pub average_route_value: f64,

    // ===== 可选参数 (有默认值) =====
    pub default_average_route_time_minutes: f64,
    pub route_value_source: RouteValueSource,
    pub fuel_reference_distance_km: f64,
    pub traffic: TrafficProfiles,
    pub efficiency: EfficiencyWeights,
}

impl SimulationConfig {
    /// 由财务常量构造配置，其余参数取默认值
    pub fn new(
        base_fuel_cost: f64,
        per_driver_fuel_rate: f64,
        per_late_penalty: f64,
        per_on_time_bonus: f64,
        on_time_bonus_threshold: f64,
        average_route_value: f64,
    ) -> Self {
        Self {
            base_fuel_cost,
            per_driver_fuel_rate,
            per_late_penalty,
            per_on_time_bonus,
            on_time_bonus_threshold,
            average_route_value,
            default_average_route_time_minutes: DEFAULT_AVERAGE_ROUTE_TIME_MINUTES,
            route_value_source: RouteValueSource::Configured,
            fuel_reference_distance_km: DEFAULT_FUEL_REFERENCE_DISTANCE_KM,
            traffic: TrafficProfiles::default(),
            efficiency: EfficiencyWeights::default(),
        }
    }

    /// 从键值表解析配置
    ///
    /// # 错误
    /// - 必需财务键缺失 → Configuration
    /// - 任意键非数值/越界 → Configuration
    pub fn from_values(values: &HashMap<String, String>) -> SimulationOutcome<Self> {
        let config = Self {
            base_fuel_cost: required_f64(values, config_keys::BASE_FUEL_COST)?,
            per_driver_fuel_rate: required_f64(values, config_keys::PER_DRIVER_FUEL_RATE)?,
            per_late_penalty: required_f64(values, config_keys::PER_LATE_PENALTY)?,
            per_on_time_bonus: required_f64(values, config_keys::PER_ON_TIME_BONUS)?,
            on_time_bonus_threshold: required_f64(values, config_keys::ON_TIME_BONUS_THRESHOLD)?,
            average_route_value: required_f64(values, config_keys::AVERAGE_ROUTE_VALUE)?,
            default_average_route_time_minutes: optional_f64(
                values,
                config_keys::DEFAULT_AVERAGE_ROUTE_TIME_MINUTES,
                DEFAULT_AVERAGE_ROUTE_TIME_MINUTES,
            )?,
            route_value_source: match values.get(config_keys::ROUTE_VALUE_SOURCE) {
                Some(raw) => raw
                    .parse::<RouteValueSource>()
                    .map_err(|e| SimulationError::configuration(config_keys::ROUTE_VALUE_SOURCE, e))?,
                None => RouteValueSource::Configured,
            },
            fuel_reference_distance_km: optional_f64(
                values,
                config_keys::FUEL_REFERENCE_DISTANCE_KM,
                DEFAULT_FUEL_REFERENCE_DISTANCE_KM,
            )?,
            traffic: TrafficProfiles {
                low: TrafficProfile {
                    lateness_probability: optional_f64(
                        values,
                        config_keys::LATENESS_PROBABILITY_LOW,
                        DEFAULT_LATENESS_PROBABILITY_LOW,
                    )?,
                    delay_factor: optional_f64(
                        values,
                        config_keys::TRAFFIC_DELAY_FACTOR_LOW,
                        DEFAULT_DELAY_FACTOR_LOW,
                    )?,
                },
                medium: TrafficProfile {
                    lateness_probability: optional_f64(
                        values,
                        config_keys::LATENESS_PROBABILITY_MEDIUM,
                        DEFAULT_LATENESS_PROBABILITY_MEDIUM,
                    )?,
                    delay_factor: optional_f64(
                        values,
                        config_keys::TRAFFIC_DELAY_FACTOR_MEDIUM,
                        DEFAULT_DELAY_FACTOR_MEDIUM,
                    )?,
                },
                high: TrafficProfile {
                    lateness_probability: optional_f64(
                        values,
                        config_keys::LATENESS_PROBABILITY_HIGH,
                        DEFAULT_LATENESS_PROBABILITY_HIGH,
                    )?,
                    delay_factor: optional_f64(
                        values,
                        config_keys::TRAFFIC_DELAY_FACTOR_HIGH,
                        DEFAULT_DELAY_FACTOR_HIGH,
                    )?,
                },
            },
            efficiency: EfficiencyWeights {
                reliability_weight: optional_f64(
                    values,
                    config_keys::EFFICIENCY_RELIABILITY_WEIGHT,
                    DEFAULT_RELIABILITY_WEIGHT,
                )?,
                productivity_weight: optional_f64(
                    values,
                    config_keys::EFFICIENCY_PRODUCTIVITY_WEIGHT,
                    DEFAULT_PRODUCTIVITY_WEIGHT,
                )?,
                target_deliveries_per_driver_hour: optional_f64(
                    values,
                    config_keys::TARGET_DELIVERIES_PER_DRIVER_HOUR,
                    DEFAULT_TARGET_DELIVERIES_PER_DRIVER_HOUR,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 以"演示默认值 + 已存储值 + 覆写值"组装候选配置并解析校验
    ///
    /// 写入前调用: 尚未落库的键取演示默认值, 因此可逐项初始化,
    /// 但任何非法取值或约束冲突都会以 Configuration 拒绝
    pub fn check_overrides(
        stored: &HashMap<String, String>,
        overrides: &HashMap<String, String>,
    ) -> SimulationOutcome<Self> {
        let mut candidate: HashMap<String, String> = demo_simulation_config()
            .to_values()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        candidate.extend(stored.iter().map(|(k, v)| (k.clone(), v.clone())));
        candidate.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self::from_values(&candidate)
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> SimulationOutcome<()> {
        let non_negative = [
            (config_keys::BASE_FUEL_COST, self.base_fuel_cost),
            (config_keys::PER_DRIVER_FUEL_RATE, self.per_driver_fuel_rate),
            (config_keys::PER_LATE_PENALTY, self.per_late_penalty),
            (config_keys::PER_ON_TIME_BONUS, self.per_on_time_bonus),
            (config_keys::AVERAGE_ROUTE_VALUE, self.average_route_value),
            (config_keys::EFFICIENCY_RELIABILITY_WEIGHT, self.efficiency.reliability_weight),
            (config_keys::EFFICIENCY_PRODUCTIVITY_WEIGHT, self.efficiency.productivity_weight),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::configuration(
                    key,
                    format!("必须为非负有限数值, 实际为 {}", value),
                ));
            }
        }

        let positive = [
            (
                config_keys::DEFAULT_AVERAGE_ROUTE_TIME_MINUTES,
                self.default_average_route_time_minutes,
            ),
            (config_keys::FUEL_REFERENCE_DISTANCE_KM, self.fuel_reference_distance_km),
            (
                config_keys::TARGET_DELIVERIES_PER_DRIVER_HOUR,
                self.efficiency.target_deliveries_per_driver_hour,
            ),
            (config_keys::TRAFFIC_DELAY_FACTOR_LOW, self.traffic.low.delay_factor),
            (config_keys::TRAFFIC_DELAY_FACTOR_MEDIUM, self.traffic.medium.delay_factor),
            (config_keys::TRAFFIC_DELAY_FACTOR_HIGH, self.traffic.high.delay_factor),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::configuration(
                    key,
                    format!("必须为正有限数值, 实际为 {}", value),
                ));
            }
        }

        let unit_interval = [
            (config_keys::ON_TIME_BONUS_THRESHOLD, self.on_time_bonus_threshold),
            (config_keys::LATENESS_PROBABILITY_LOW, self.traffic.low.lateness_probability),
            (config_keys::LATENESS_PROBABILITY_MEDIUM, self.traffic.medium.lateness_probability),
            (config_keys::LATENESS_PROBABILITY_HIGH, self.traffic.high.lateness_probability),
        ];
        for (key, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::configuration(
                    key,
                    format!("必须在 [0, 1] 区间, 实际为 {}", value),
                ));
            }
        }

        // 延误概率必须严格递增: Low < Medium < High
        let low = self.traffic.low.lateness_probability;
        let medium = self.traffic.medium.lateness_probability;
        let high = self.traffic.high.lateness_probability;
        if !(low < medium && medium < high) {
            return Err(SimulationError::configuration(
                config_keys::LATENESS_PROBABILITY_MEDIUM,
                format!(
                    "延误概率必须严格递增 low < medium < high, 实际为 {} / {} / {}",
                    low, medium, high
                ),
            ));
        }

        Ok(())
    }

    /// 导出为键值表（用于写入 config_kv）
    pub fn to_values(&self) -> Vec<(&'static str, String)> {
        vec![
            (config_keys::BASE_FUEL_COST, self.base_fuel_cost.to_string()),
            (config_keys::PER_DRIVER_FUEL_RATE, self.per_driver_fuel_rate.to_string()),
            (config_keys::PER_LATE_PENALTY, self.per_late_penalty.to_string()),
            (config_keys::PER_ON_TIME_BONUS, self.per_on_time_bonus.to_string()),
            (config_keys::ON_TIME_BONUS_THRESHOLD, self.on_time_bonus_threshold.to_string()),
            (config_keys::AVERAGE_ROUTE_VALUE, self.average_route_value.to_string()),
            (
                config_keys::DEFAULT_AVERAGE_ROUTE_TIME_MINUTES,
                self.default_average_route_time_minutes.to_string(),
            ),
            (config_keys::ROUTE_VALUE_SOURCE, self.route_value_source.to_string()),
            (
                config_keys::FUEL_REFERENCE_DISTANCE_KM,
                self.fuel_reference_distance_km.to_string(),
            ),
            (
                config_keys::LATENESS_PROBABILITY_LOW,
                self.traffic.low.lateness_probability.to_string(),
            ),
            (
                config_keys::LATENESS_PROBABILITY_MEDIUM,
                self.traffic.medium.lateness_probability.to_string(),
            ),
            (
                config_keys::LATENESS_PROBABILITY_HIGH,
                self.traffic.high.lateness_probability.to_string(),
            ),
            (config_keys::TRAFFIC_DELAY_FACTOR_LOW, self.traffic.low.delay_factor.to_string()),
            (
                config_keys::TRAFFIC_DELAY_FACTOR_MEDIUM,
                self.traffic.medium.delay_factor.to_string(),
            ),
            (config_keys::TRAFFIC_DELAY_FACTOR_HIGH, self.traffic.high.delay_factor.to_string()),
            (
                config_keys::EFFICIENCY_RELIABILITY_WEIGHT,
                self.efficiency.reliability_weight.to_string(),
            ),
            (
                config_keys::EFFICIENCY_PRODUCTIVITY_WEIGHT,
                self.efficiency.productivity_weight.to_string(),
            ),
            (
                config_keys::TARGET_DELIVERIES_PER_DRIVER_HOUR,
                self.efficiency.target_deliveries_per_driver_hour.to_string(),
            ),
        ]
    }
}

/// 演示环境财务参数（仅用于初始化空库，运行时仍从 config_kv 读取）
pub fn demo_simulation_config() -> SimulationConfig {
    SimulationConfig::new(
        8000.0,                          // base_fuel_cost
        400.0,                           // per_driver_fuel_rate
        50.0,                            // per_late_penalty
        10.0,                            // per_on_time_bonus
        DEFAULT_ON_TIME_BONUS_THRESHOLD, // on_time_bonus_threshold
        1330.0,                          // average_route_value
    )
}

fn parse_f64(key: &str, raw: &str) -> SimulationOutcome<f64> {
    let value = raw.trim().parse::<f64>().map_err(|_| {
        SimulationError::configuration(key, format!("非数值配置: {:?}", raw))
    })?;
    if !value.is_finite() {
        return Err(SimulationError::configuration(
            key,
            format!("非有限数值配置: {:?}", raw),
        ));
    }
    Ok(value)
}

fn required_f64(values: &HashMap<String, String>, key: &str) -> SimulationOutcome<f64> {
    match values.get(key) {
        Some(raw) => parse_f64(key, raw),
        None => Err(SimulationError::configuration(key, "必需配置缺失")),
    }
}

fn optional_f64(values: &HashMap<String, String>, key: &str, default: f64) -> SimulationOutcome<f64> {
    match values.get(key) {
        Some(raw) => parse_f64(key, raw),
        None => Ok(default),
    }
}
