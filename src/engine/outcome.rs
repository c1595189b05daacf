// ==========================================
// 车队运营驾驶舱 - 结果估计器
// ==========================================
// 职责: 叠加路况/线路耗时影响, 估计完成配送量、准时/延误拆分与耗时分布
// 输入: PerDriverCapacity + SimulationInput + FleetSnapshot + SimulationConfig
// 输出: OutcomeEstimate
// 红线: 同输入同输出, 无隐式随机
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::fleet::FleetSnapshot;
use crate::domain::simulation::{
    OutcomeEstimate, PerDriverCapacity, SimulationInput, TrafficBreakdown,
};
use crate::domain::types::TrafficLevel;
use crate::engine::variability::lateness_jitter_factor;
use tracing::{debug, instrument};

/// 空车队时视为全部线路处于该路况
pub const DEFAULT_TRAFFIC_LEVEL: TrafficLevel = TrafficLevel::Medium;

// ==========================================
// OutcomeEstimator - 结果估计器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct OutcomeEstimator {
    // 无状态引擎
}

impl OutcomeEstimator {
    pub fn new() -> Self {
        Self {}
    }

    /// 估计配送结果
    ///
    /// # 规则
    /// 1) total = round(per_driver * driver_count)
    /// 2) 平均延误概率 = 各线路按路况取值后按线路数平均
    /// 3) on_time = round(total * (1 - 平均延误概率)), total = 0 时为 0
    #[instrument(skip_all, fields(
        driver_count = input.driver_count,
        route_count = fleet.route_count()
    ))]
    pub fn estimate(
        &self,
        capacity: &PerDriverCapacity,
        input: &SimulationInput,
        fleet: &FleetSnapshot,
        config: &SimulationConfig,
    ) -> OutcomeEstimate {
        let total_deliveries = round_count(capacity.per_driver * input.driver_count as f64);

        let jitter_factor = input.variability.as_ref().map(lateness_jitter_factor);
        let lateness = |level: TrafficLevel| -> f64 {
            let base = config.traffic.get(level).lateness_probability;
            match jitter_factor {
                Some(factor) => (base * factor).clamp(0.0, 1.0),
                None => base,
            }
        };

        let average_lateness_probability = if fleet.is_empty() {
            lateness(DEFAULT_TRAFFIC_LEVEL)
        } else {
            let sum: f64 = fleet
                .routes
                .iter()
                .map(|r| lateness(r.traffic_level))
                .sum();
            sum / fleet.route_count() as f64
        };

        let on_time_deliveries = if total_deliveries == 0 {
            0
        } else {
            round_count(total_deliveries as f64 * (1.0 - average_lateness_probability))
                .min(total_deliveries)
        };
        let late_deliveries = total_deliveries - on_time_deliveries;

        let traffic_breakdown =
            self.build_traffic_breakdown(capacity, fleet, config, total_deliveries, &lateness);

        debug!(
            total_deliveries,
            on_time_deliveries,
            late_deliveries,
            average_lateness_probability,
            "配送结果估计完成"
        );

        OutcomeEstimate {
            total_deliveries,
            on_time_deliveries,
            late_deliveries,
            average_lateness_probability,
            traffic_breakdown,
            jitter_factor,
        }
    }

    /// 生成分路况耗时分布
    ///
    /// 空车队时输出单一默认路况桶 (route_count = 0, share = 1)
    fn build_traffic_breakdown(
        &self,
        capacity: &PerDriverCapacity,
        fleet: &FleetSnapshot,
        config: &SimulationConfig,
        total_deliveries: u32,
        lateness: &dyn Fn(TrafficLevel) -> f64,
    ) -> Vec<TrafficBreakdown> {
        let total = total_deliveries as f64;

        if fleet.is_empty() {
            let probability = lateness(DEFAULT_TRAFFIC_LEVEL);
            let base = capacity.average_route_time_minutes;
            return vec![TrafficBreakdown {
                traffic_level: DEFAULT_TRAFFIC_LEVEL,
                route_count: 0,
                route_share: 1.0,
                lateness_probability: probability,
                average_base_time_minutes: base,
                average_elapsed_minutes: base * config.traffic.get(DEFAULT_TRAFFIC_LEVEL).delay_factor,
                expected_deliveries: total,
                expected_late_deliveries: total * probability,
            }];
        }

        let route_total = fleet.route_count() as f64;
        TrafficLevel::ALL
            .iter()
            .filter_map(|&level| {
                let route_count = fleet.count_by_traffic(level);
                if route_count == 0 {
                    return None;
                }

                let route_share = route_count as f64 / route_total;
                let probability = lateness(level);
                let average_base_time_minutes = fleet
                    .routes
                    .iter()
                    .filter(|r| r.traffic_level == level)
                    .map(|r| r.base_time_minutes)
                    .sum::<f64>()
                    / route_count as f64;
                let expected_deliveries = total * route_share;

                Some(TrafficBreakdown {
                    traffic_level: level,
                    route_count: route_count as u32,
                    route_share,
                    lateness_probability: probability,
                    average_base_time_minutes,
                    average_elapsed_minutes: average_base_time_minutes
                        * config.traffic.get(level).delay_factor,
                    expected_deliveries,
                    expected_late_deliveries: expected_deliveries * probability,
                })
            })
            .collect()
    }
}

/// 非负实数四舍五入为计数 (饱和到 u32 上限)
fn round_count(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as u32
}
