// ==========================================
// 车队运营驾驶舱 - 模拟引擎编排器
// ==========================================
// 用途: 串联 产能模型 → 结果估计器 → 财务模型, 产出 SimulationResult
// 红线: 纯函数, 不持有可变状态, 可并发调用
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::fleet::FleetSnapshot;
use crate::domain::simulation::{SimulationInput, SimulationResult};
use crate::engine::capacity::CapacityModel;
use crate::engine::error::SimulationOutcome;
use crate::engine::financial::FinancialModel;
use crate::engine::outcome::OutcomeEstimator;
use tracing::{debug, info, instrument};

// ==========================================
// SimulationEngine - 模拟引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    capacity: CapacityModel,
    outcome: OutcomeEstimator,
    financial: FinancialModel,
}

impl SimulationEngine {
    /// 创建新的引擎实例
    ///
    /// # 参数
    /// - config: 已加载的模拟配置
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            capacity: CapacityModel::new(),
            outcome: OutcomeEstimator::new(),
            financial: FinancialModel::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// 执行一次完整模拟
    ///
    /// # 错误
    /// - InvalidInput: 司机数/工时越界 (任何阶段运行前)
    /// - Configuration: 配置取值非法
    #[instrument(skip_all, fields(
        driver_count = input.driver_count,
        max_hours_per_day = input.max_hours_per_day,
        route_count = fleet.route_count()
    ))]
    pub fn run(
        &self,
        input: &SimulationInput,
        fleet: &FleetSnapshot,
    ) -> SimulationOutcome<SimulationResult> {
        // ==========================================
        // 步骤0: 输入与配置校验
        // ==========================================
        self.capacity.validate_input(input)?;
        self.config.validate()?;
        self.capacity.validate_variability(input, &self.config)?;

        // ==========================================
        // 步骤1: Capacity Model - 产能估算
        // ==========================================
        debug!("步骤1: 执行产能估算");
        let capacity = self.capacity.estimate(input, fleet, &self.config)?;

        // ==========================================
        // 步骤2: Outcome Estimator - 配送结果估计
        // ==========================================
        debug!("步骤2: 执行配送结果估计");
        let outcome = self.outcome.estimate(&capacity, input, fleet, &self.config);

        // ==========================================
        // 步骤3: Financial Model - 财务明细
        // ==========================================
        debug!("步骤3: 执行财务明细计算");
        let financial = self.financial.estimate(&outcome, input, fleet, &self.config);

        let on_time_rate = outcome.on_time_rate();
        let deliveries_per_driver = outcome.total_deliveries as f64 / input.driver_count as f64;
        let profit_per_delivery = if outcome.total_deliveries > 0 {
            Some(
                (financial.total_profit as f64 / outcome.total_deliveries as f64).round() as i64,
            )
        } else {
            None
        };

        info!(
            total_deliveries = outcome.total_deliveries,
            on_time_deliveries = outcome.on_time_deliveries,
            total_profit = financial.total_profit,
            efficiency_score = financial.efficiency_score,
            "模拟完成"
        );

        Ok(SimulationResult {
            driver_count: input.driver_count,
            max_hours_per_day: input.max_hours_per_day,
            shift_start: input.shift_start_time,
            shift_end: input.shift_end_time(),
            total_profit: financial.total_profit,
            efficiency_score: financial.efficiency_score,
            on_time_deliveries: outcome.on_time_deliveries,
            total_deliveries: outcome.total_deliveries,
            late_deliveries: outcome.late_deliveries,
            revenue: financial.revenue,
            fuel_cost: financial.fuel_cost,
            penalties: financial.penalties,
            bonuses: financial.bonuses,
            total_costs: financial.fuel_cost + financial.penalties,
            bonus_applied: financial.bonus_applied,
            on_time_rate,
            deliveries_per_driver,
            profit_per_delivery,
            capacity,
            traffic_breakdown: outcome.traffic_breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::demo_simulation_config;
    use crate::domain::fleet::RouteProfile;
    use crate::domain::types::TrafficLevel;
    use crate::engine::error::SimulationError;
    use chrono::NaiveTime;

    fn demo_fleet() -> FleetSnapshot {
        FleetSnapshot::from_routes(vec![
            RouteProfile::new("RT001", 15.2, TrafficLevel::Medium, 45.0),
            RouteProfile::new("RT002", 22.8, TrafficLevel::High, 60.0),
            RouteProfile::new("RT003", 8.5, TrafficLevel::Low, 30.0),
            RouteProfile::new("RT004", 18.3, TrafficLevel::Medium, 45.0),
        ])
    }

    #[test]
    fn test_run_produces_consistent_result() {
        let engine = SimulationEngine::new(demo_simulation_config());
        let input = SimulationInput::default();

        let result = engine.run(&input, &demo_fleet()).unwrap();

        assert!(result.reconciles());
        assert!(result.on_time_deliveries <= result.total_deliveries);
        assert_eq!(result.shift_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(result.shift_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!((0.0..=100.0).contains(&result.efficiency_score));
    }

    #[test]
    fn test_run_is_deterministic() {
        let engine = SimulationEngine::new(demo_simulation_config());
        let input = SimulationInput::default();

        let first = engine.run(&input, &demo_fleet()).unwrap();
        let second = engine.run(&input, &demo_fleet()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = demo_simulation_config();
        config.traffic.low.lateness_probability = 0.5;
        let engine = SimulationEngine::new(config);

        let err = engine.run(&SimulationInput::default(), &demo_fleet()).unwrap_err();
        assert!(matches!(err, SimulationError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_input_checked_before_config() {
        let mut config = demo_simulation_config();
        config.base_fuel_cost = -1.0;
        let engine = SimulationEngine::new(config);
        let input = SimulationInput::new(0, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 8.0);

        let err = engine.run(&input, &demo_fleet()).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput { .. }));
    }
}
