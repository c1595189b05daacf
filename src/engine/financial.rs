// ==========================================
// 车队运营驾驶舱 - 财务模型
// ==========================================
// 职责: 配送结果 → 收入 / 燃油 / 罚款 / 奖励 / 利润 / 效率评分
// 输入: OutcomeEstimate + SimulationInput + FleetSnapshot + SimulationConfig
// 输出: FinancialBreakdown
// 红线: 仅在输出边界取整; 利润由取整后的分项计算, 精确对账
// 红线: 效率评分截断在 [0, 100]
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::fleet::FleetSnapshot;
use crate::domain::simulation::{FinancialBreakdown, OutcomeEstimate, SimulationInput};
use crate::domain::types::RouteValueSource;
use tracing::{debug, instrument, warn};

/// 效率评分上限
pub const MAX_EFFICIENCY_SCORE: f64 = 100.0;

// ==========================================
// FinancialModel - 财务模型
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct FinancialModel {
    // 无状态引擎
}

impl FinancialModel {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算财务明细
    ///
    /// # 规则
    /// - revenue = total * 单线路价值
    /// - fuel_cost = 基础燃油 + 司机数 * 单司机燃油 * 里程系数
    /// - penalties = late * 单次延误罚款
    /// - bonuses = on_time * 单次准时奖励 (准时率 >= 阈值时, 否则为 0)
    /// - total_profit = revenue + bonuses - fuel_cost - penalties
    #[instrument(skip_all, fields(
        driver_count = input.driver_count,
        total_deliveries = outcome.total_deliveries
    ))]
    pub fn estimate(
        &self,
        outcome: &OutcomeEstimate,
        input: &SimulationInput,
        fleet: &FleetSnapshot,
        config: &SimulationConfig,
    ) -> FinancialBreakdown {
        let average_route_value = self.resolve_route_value(fleet, config);
        let distance_factor = self.distance_factor(fleet, config);
        let drivers = input.driver_count as f64;

        let revenue = round_money(outcome.total_deliveries as f64 * average_route_value);
        let fuel_cost = round_money(
            config.base_fuel_cost + drivers * config.per_driver_fuel_rate * distance_factor,
        );
        let penalties = round_money(outcome.late_deliveries as f64 * config.per_late_penalty);

        let on_time_rate = outcome.on_time_rate();
        let bonus_applied =
            outcome.total_deliveries > 0 && on_time_rate >= config.on_time_bonus_threshold;
        let bonuses = if bonus_applied {
            round_money(outcome.on_time_deliveries as f64 * config.per_on_time_bonus)
        } else {
            0
        };

        let total_profit = revenue + bonuses - fuel_cost - penalties;

        let driver_hours = drivers * input.max_hours_per_day;
        let deliveries_per_driver_hour = if driver_hours > 0.0 {
            outcome.total_deliveries as f64 / driver_hours
        } else {
            0.0
        };
        let efficiency_score =
            self.efficiency_score(on_time_rate, deliveries_per_driver_hour, config);

        debug!(
            revenue,
            fuel_cost, penalties, bonuses, total_profit, efficiency_score, "财务明细计算完成"
        );

        FinancialBreakdown {
            average_route_value,
            distance_factor,
            revenue,
            fuel_cost,
            penalties,
            bonuses,
            bonus_applied,
            total_profit,
            deliveries_per_driver_hour,
            efficiency_score,
        }
    }

    /// 单线路价值
    ///
    /// 配置为 historical_orders 且快照有订单时取历史订单均值, 否则取配置常量
    fn resolve_route_value(&self, fleet: &FleetSnapshot, config: &SimulationConfig) -> f64 {
        let value = match config.route_value_source {
            RouteValueSource::Configured => config.average_route_value,
            RouteValueSource::HistoricalOrders => match fleet.average_order_value() {
                Some(avg) => avg,
                None => {
                    warn!(
                        fallback = config.average_route_value,
                        "无历史订单金额, 回退到配置的单线路价值"
                    );
                    config.average_route_value
                }
            },
        };
        value.max(0.0)
    }

    /// 里程系数 = 平均里程 / 参考里程; 空车队为 1
    fn distance_factor(&self, fleet: &FleetSnapshot, config: &SimulationConfig) -> f64 {
        match fleet.average_distance_km() {
            Some(avg) if config.fuel_reference_distance_km > 0.0 => {
                avg / config.fuel_reference_distance_km
            }
            _ => 1.0,
        }
    }

    /// 效率评分
    ///
    /// score = 可靠性权重 * 准时率 + 产能权重 * min(1, 人时配送量 / 目标值)
    fn efficiency_score(
        &self,
        on_time_rate: f64,
        deliveries_per_driver_hour: f64,
        config: &SimulationConfig,
    ) -> f64 {
        let weights = &config.efficiency;
        let productivity = if weights.target_deliveries_per_driver_hour > 0.0 {
            (deliveries_per_driver_hour / weights.target_deliveries_per_driver_hour).min(1.0)
        } else {
            1.0
        };

        let score = weights.reliability_weight * on_time_rate
            + weights.productivity_weight * productivity;
        if score.is_finite() {
            score.clamp(0.0, MAX_EFFICIENCY_SCORE)
        } else {
            0.0
        }
    }
}

/// 金额取整（输出边界）
fn round_money(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.round() as i64
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

    fn outcome(total: u32, on_time: u32) -> OutcomeEstimate {
        OutcomeEstimate {
            total_deliveries: total,
            on_time_deliveries: on_time,
            late_deliveries: total - on_time,
            average_lateness_probability: 0.12,
            traffic_breakdown: vec![],
            jitter_factor: None,
        }
    }

    fn fleet_with_distance(distance_km: f64) -> FleetSnapshot {
        FleetSnapshot::from_routes(vec![RouteProfile::new(
            "RT001",
            distance_km,
            TrafficLevel::Medium,
            45.0,
        )])
    }

    #[test]
    fn test_breakdown_reconciles() {
        let model = FinancialModel::new();
        let config = demo_simulation_config();
        let input = SimulationInput::new(15, nine_am(), 8.0);

        let breakdown = model.estimate(&outcome(160, 141), &input, &fleet_with_distance(20.0), &config);

        assert_eq!(breakdown.revenue, 160 * 1330);
        assert_eq!(breakdown.fuel_cost, 8000 + 15 * 400);
        assert_eq!(breakdown.penalties, 19 * 50);
        // 141 / 160 = 0.88 < 0.9
        assert!(!breakdown.bonus_applied);
        assert_eq!(breakdown.bonuses, 0);
        assert_eq!(
            breakdown.total_profit,
            breakdown.revenue + breakdown.bonuses - breakdown.fuel_cost - breakdown.penalties
        );
    }

    #[test]
    fn test_bonus_is_step_function() {
        let model = FinancialModel::new();
        let config = demo_simulation_config();
        let input = SimulationInput::new(10, nine_am(), 8.0);
        let fleet = fleet_with_distance(20.0);

        let below = model.estimate(&outcome(100, 89), &input, &fleet, &config);
        let at = model.estimate(&outcome(100, 90), &input, &fleet, &config);

        assert_eq!(below.bonuses, 0);
        assert!(at.bonus_applied);
        assert_eq!(at.bonuses, 900);
    }

    #[test]
    fn test_fuel_monotonic_in_drivers_and_distance() {
        let model = FinancialModel::new();
        let config = demo_simulation_config();
        let o = outcome(50, 45);

        let few = model.estimate(&o, &SimulationInput::new(5, nine_am(), 8.0), &fleet_with_distance(20.0), &config);
        let many = model.estimate(&o, &SimulationInput::new(10, nine_am(), 8.0), &fleet_with_distance(20.0), &config);
        let far = model.estimate(&o, &SimulationInput::new(10, nine_am(), 8.0), &fleet_with_distance(40.0), &config);

        assert!(many.fuel_cost > few.fuel_cost);
        assert!(far.fuel_cost > many.fuel_cost);
        assert_eq!(far.distance_factor, 2.0);
    }

    #[test]
    fn test_empty_fleet_distance_factor_is_one() {
        let model = FinancialModel::new();
        let config = demo_simulation_config();
        let input = SimulationInput::new(3, nine_am(), 8.0);

        let breakdown = model.estimate(&outcome(32, 28), &input, &FleetSnapshot::default(), &config);

        assert_eq!(breakdown.distance_factor, 1.0);
        assert_eq!(breakdown.fuel_cost, 8000 + 3 * 400);
    }

    #[test]
    fn test_historical_route_value() {
        let model = FinancialModel::new();
        let mut config = demo_simulation_config();
        config.route_value_source = RouteValueSource::HistoricalOrders;
        let input = SimulationInput::new(1, nine_am(), 8.0);

        let mut fleet = fleet_with_distance(20.0);
        fleet.order_values = vec![1000.0, 2000.0];
        let breakdown = model.estimate(&outcome(10, 10), &input, &fleet, &config);
        assert_eq!(breakdown.average_route_value, 1500.0);
        assert_eq!(breakdown.revenue, 15_000);

        // 无订单时回退到配置值
        let breakdown = model.estimate(&outcome(10, 10), &input, &fleet_with_distance(20.0), &config);
        assert_eq!(breakdown.average_route_value, 1330.0);
    }

    #[test]
    fn test_efficiency_score_bounded() {
        let model = FinancialModel::new();
        let mut config = demo_simulation_config();
        config.efficiency.reliability_weight = 90.0;
        config.efficiency.productivity_weight = 90.0;
        let input = SimulationInput::new(1, nine_am(), 1.0);

        let breakdown = model.estimate(&outcome(20, 20), &input, &fleet_with_distance(20.0), &config);
        assert_eq!(breakdown.efficiency_score, 100.0);

        let breakdown = model.estimate(&outcome(0, 0), &input, &fleet_with_distance(20.0), &config);
        assert_eq!(breakdown.efficiency_score, 0.0);
        assert!(!breakdown.bonus_applied);
    }
}
