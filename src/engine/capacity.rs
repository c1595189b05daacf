// ==========================================
// 车队运营驾驶舱 - 产能模型
// ==========================================
// 职责: (司机数, 单日工时上限, 线路结构) → 单司机/全车队可完成配送量
// 输入: SimulationInput + FleetSnapshot + SimulationConfig
// 输出: PerDriverCapacity
// 红线: 唯一输入校验点, 下游阶段信任已校验输入
// 红线: 空车队使用默认平均耗时, 永不除零
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::fleet::FleetSnapshot;
use crate::domain::simulation::{
    PerDriverCapacity, SimulationInput, MAX_DRIVER_COUNT, MAX_HOURS_PER_DAY_LIMIT,
    MIN_DRIVER_COUNT,
};
use crate::engine::error::{SimulationError, SimulationOutcome};
use tracing::{debug, instrument};

// ==========================================
// CapacityModel - 产能模型
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityModel {
    // 无状态引擎
}

impl CapacityModel {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验模拟输入
    ///
    /// # 规则
    /// - driver_count ∈ [1, 50]
    /// - max_hours_per_day 有限且 0 < h <= 12
    /// - 随机扰动幅度 ∈ [0, 1]
    pub fn validate_input(&self, input: &SimulationInput) -> SimulationOutcome<()> {
        if !(MIN_DRIVER_COUNT..=MAX_DRIVER_COUNT).contains(&input.driver_count) {
            return Err(SimulationError::invalid_input(
                "driver_count",
                format!(
                    "必须在 {}..={} 之间, 实际为 {}",
                    MIN_DRIVER_COUNT, MAX_DRIVER_COUNT, input.driver_count
                ),
            ));
        }

        let hours = input.max_hours_per_day;
        if !hours.is_finite() || hours <= 0.0 || hours > MAX_HOURS_PER_DAY_LIMIT {
            return Err(SimulationError::invalid_input(
                "max_hours_per_day",
                format!(
                    "必须满足 0 < h <= {}, 实际为 {}",
                    MAX_HOURS_PER_DAY_LIMIT, hours
                ),
            ));
        }

        if let Some(variability) = input.variability {
            let amplitude = variability.amplitude;
            if !amplitude.is_finite() || !(0.0..=1.0).contains(&amplitude) {
                return Err(SimulationError::invalid_input(
                    "variability.amplitude",
                    format!("必须在 [0, 1] 区间, 实际为 {}", amplitude),
                ));
            }
        }

        Ok(())
    }

    /// 校验扰动幅度与延误概率配置的组合
    ///
    /// 高峰概率放大后仍须 <= 1: high * (1 + amplitude) <= 1,
    /// 否则截断会抹平 Medium / High 的差异
    pub fn validate_variability(
        &self,
        input: &SimulationInput,
        config: &SimulationConfig,
    ) -> SimulationOutcome<()> {
        let Some(variability) = input.variability else {
            return Ok(());
        };

        let high = config.traffic.high.lateness_probability;
        if high * (1.0 + variability.amplitude) > 1.0 {
            let limit = if high > 0.0 { (1.0 / high - 1.0).min(1.0) } else { 1.0 };
            return Err(SimulationError::invalid_input(
                "variability.amplitude",
                format!(
                    "高峰延误概率 {} 下扰动幅度不得超过 {:.4}, 实际为 {}",
                    high, limit, variability.amplitude
                ),
            ));
        }

        Ok(())
    }

    /// 估算单司机产能
    ///
    /// per_driver = max_hours_per_day * 60 / 平均线路耗时
    /// - 随工时单调递增
    /// - 随平均线路耗时单调递减
    #[instrument(skip(self, fleet, config), fields(
        driver_count = input.driver_count,
        max_hours_per_day = input.max_hours_per_day,
        route_count = fleet.route_count()
    ))]
    pub fn estimate(
        &self,
        input: &SimulationInput,
        fleet: &FleetSnapshot,
        config: &SimulationConfig,
    ) -> SimulationOutcome<PerDriverCapacity> {
        self.validate_input(input)?;

        let (average_route_time_minutes, used_default_route_time) =
            match fleet.average_base_time_minutes() {
                Some(avg) if avg > 0.0 => (avg, false),
                _ => {
                    debug!(
                        default_minutes = config.default_average_route_time_minutes,
                        "车队无有效线路耗时, 使用默认平均耗时"
                    );
                    (config.default_average_route_time_minutes, true)
                }
            };

        let available_minutes_per_driver = input.max_hours_per_day * 60.0;
        let per_driver = available_minutes_per_driver / average_route_time_minutes;
        let aggregate = per_driver * input.driver_count as f64;

        debug!(
            average_route_time_minutes,
            per_driver, aggregate, "产能估算完成"
        );

        Ok(PerDriverCapacity {
            available_minutes_per_driver,
            average_route_time_minutes,
            used_default_route_time,
            per_driver,
            aggregate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::demo_simulation_config;
    use crate::domain::fleet::RouteProfile;
    use crate::domain::types::TrafficLevel;
    use chrono::NaiveTime;

    fn nine_am() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    fn fleet_with_times(times: &[f64]) -> FleetSnapshot {
        FleetSnapshot::from_routes(
            times
                .iter()
                .enumerate()
                .map(|(i, t)| RouteProfile::new(format!("RT{:03}", i), 10.0, TrafficLevel::Medium, *t))
                .collect(),
        )
    }

    #[test]
    fn test_amplitude_limited_by_high_lateness() {
        let model = CapacityModel::new();
        let mut config = demo_simulation_config();
        config.traffic.medium.lateness_probability = 0.6;
        config.traffic.high.lateness_probability = 0.8;

        let too_wide = SimulationInput::new(10, nine_am(), 8.0).with_variability(7, 0.8);
        match model.validate_variability(&too_wide, &config) {
            Err(SimulationError::InvalidInput { field, .. }) => {
                assert_eq!(field, "variability.amplitude")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let within = SimulationInput::new(10, nine_am(), 8.0).with_variability(7, 0.25);
        assert!(model.validate_variability(&within, &config).is_ok());

        // 演示配置 high = 0.25, 任意合法幅度均可
        let demo = demo_simulation_config();
        let full = SimulationInput::new(10, nine_am(), 8.0).with_variability(7, 1.0);
        assert!(model.validate_variability(&full, &demo).is_ok());
    }

    #[test]
    fn test_estimate_basic() {
        let model = CapacityModel::new();
        let config = demo_simulation_config();
        let fleet = fleet_with_times(&[30.0, 60.0]); // 平均 45 分钟
        let input = SimulationInput::new(15, nine_am(), 8.0);

        let capacity = model.estimate(&input, &fleet, &config).unwrap();

        assert_eq!(capacity.average_route_time_minutes, 45.0);
        assert!(!capacity.used_default_route_time);
        assert!((capacity.per_driver - 480.0 / 45.0).abs() < 1e-9);
        assert!((capacity.aggregate - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_fleet_uses_default_route_time() {
        let model = CapacityModel::new();
        let mut config = demo_simulation_config();
        config.default_average_route_time_minutes = 60.0;
        let input = SimulationInput::new(10, nine_am(), 6.0);

        let capacity = model.estimate(&input, &FleetSnapshot::default(), &config).unwrap();

        assert!(capacity.used_default_route_time);
        assert_eq!(capacity.per_driver, 6.0);
    }

    #[test]
    fn test_zero_time_routes_fall_back_to_default() {
        let model = CapacityModel::new();
        let config = demo_simulation_config();
        let input = SimulationInput::new(10, nine_am(), 8.0);

        let capacity = model
            .estimate(&input, &fleet_with_times(&[0.0, 0.0]), &config)
            .unwrap();

        assert!(capacity.used_default_route_time);
        assert!(capacity.per_driver.is_finite());
    }

    #[test]
    fn test_capacity_monotonic_in_hours_and_route_time() {
        let model = CapacityModel::new();
        let config = demo_simulation_config();
        let fleet = fleet_with_times(&[45.0]);

        let short_day = model
            .estimate(&SimulationInput::new(5, nine_am(), 4.0), &fleet, &config)
            .unwrap();
        let long_day = model
            .estimate(&SimulationInput::new(5, nine_am(), 10.0), &fleet, &config)
            .unwrap();
        assert!(long_day.per_driver > short_day.per_driver);

        let slow_fleet = fleet_with_times(&[90.0]);
        let slow = model
            .estimate(&SimulationInput::new(5, nine_am(), 10.0), &slow_fleet, &config)
            .unwrap();
        assert!(slow.per_driver < long_day.per_driver);
    }

    #[test]
    fn test_validate_input_bounds() {
        let model = CapacityModel::new();

        assert!(model.validate_input(&SimulationInput::new(1, nine_am(), 12.0)).is_ok());
        assert!(model.validate_input(&SimulationInput::new(50, nine_am(), 0.1)).is_ok());

        let invalid = [
            SimulationInput::new(0, nine_am(), 8.0),
            SimulationInput::new(51, nine_am(), 8.0),
            SimulationInput::new(10, nine_am(), 0.0),
            SimulationInput::new(10, nine_am(), 13.0),
            SimulationInput::new(10, nine_am(), f64::NAN),
            SimulationInput::new(10, nine_am(), f64::INFINITY),
            SimulationInput::new(10, nine_am(), 8.0).with_variability(7, 1.5),
        ];
        for input in invalid.iter() {
            match model.validate_input(input) {
                Err(SimulationError::InvalidInput { .. }) => {}
                other => panic!("Expected InvalidInput for {:?}, got {:?}", input, other),
            }
        }
    }
}
