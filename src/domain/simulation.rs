// ==========================================
// 车队运营驾驶舱 - 模拟输入/输出领域模型
// ==========================================
// 职责: SimulationInput (单次运行参数) 与 SimulationResult (不可变结果)
// 红线: 结果一经产出不可修改; 重新运行即整体替换
// 红线: 利润必须与收入/奖励/燃油/罚款明细精确对账
// ==========================================

use crate::domain::types::TrafficLevel;
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// 司机数下限
pub const MIN_DRIVER_COUNT: u32 = 1;
/// 司机数上限
pub const MAX_DRIVER_COUNT: u32 = 50;
/// 单日最大工时上限（小时）
pub const MAX_HOURS_PER_DAY_LIMIT: f64 = 12.0;

/// 默认司机数
pub const DEFAULT_DRIVER_COUNT: u32 = 15;
/// 默认单日最大工时（小时）
pub const DEFAULT_MAX_HOURS_PER_DAY: f64 = 8.0;

/// 默认发车时间 09:00
pub fn default_shift_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

// ==========================================
// Variability - 可复现随机扰动
// ==========================================
// 同一 seed 必然得到同一结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Variability {
    pub seed: u64,
    pub amplitude: f64, // 延误概率相对扰动幅度 [0, 1]
}

// ==========================================
// SimulationInput - 单次模拟参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub driver_count: u32,
    pub shift_start_time: NaiveTime, // 仅用于结果说明，不参与计算
    pub max_hours_per_day: f64,
    #[serde(default)]
    pub variability: Option<Variability>,
}

impl SimulationInput {
    pub fn new(driver_count: u32, shift_start_time: NaiveTime, max_hours_per_day: f64) -> Self {
        Self {
            driver_count,
            shift_start_time,
            max_hours_per_day,
            variability: None,
        }
    }

    pub fn with_variability(mut self, seed: u64, amplitude: f64) -> Self {
        self.variability = Some(Variability { seed, amplitude });
        self
    }

    /// 班次结束时间 (跨零点时回绕)
    pub fn shift_end_time(&self) -> NaiveTime {
        let minutes = (self.max_hours_per_day * 60.0).round();
        let minutes = if minutes.is_finite() { minutes as i64 } else { 0 };
        let (end, _wrapped_days) = self
            .shift_start_time
            .overflowing_add_signed(Duration::minutes(minutes));
        end
    }
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self::new(
            DEFAULT_DRIVER_COUNT,
            default_shift_start_time(),
            DEFAULT_MAX_HOURS_PER_DAY,
        )
    }
}

// ==========================================
// PerDriverCapacity - 产能模型输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerDriverCapacity {
    pub available_minutes_per_driver: f64,
    pub average_route_time_minutes: f64,
    pub used_default_route_time: bool, // 空车队/零耗时时使用默认平均耗时
    pub per_driver: f64,               // 单司机可完成配送量 (实数)
    pub aggregate: f64,                // 全车队可完成配送量 (实数)
}

// ==========================================
// TrafficBreakdown - 分路况耗时分布
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficBreakdown {
    pub traffic_level: TrafficLevel,
    pub route_count: u32,
    pub route_share: f64,
    pub lateness_probability: f64,
    pub average_base_time_minutes: f64,
    pub average_elapsed_minutes: f64,
    pub expected_deliveries: f64,
    pub expected_late_deliveries: f64,
}

// ==========================================
// OutcomeEstimate - 结果估计器输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEstimate {
    pub total_deliveries: u32,
    pub on_time_deliveries: u32,
    pub late_deliveries: u32,
    pub average_lateness_probability: f64,
    pub traffic_breakdown: Vec<TrafficBreakdown>,
    pub jitter_factor: Option<f64>, // 启用随机扰动时的乘数
}

impl OutcomeEstimate {
    /// 实际准时率；无配送时为 0
    pub fn on_time_rate(&self) -> f64 {
        if self.total_deliveries == 0 {
            return 0.0;
        }
        self.on_time_deliveries as f64 / self.total_deliveries as f64
    }
}

// ==========================================
// FinancialBreakdown - 财务模型输出
// ==========================================
// 金额均为整数货币单位 (仅在输出边界取整)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdown {
    pub average_route_value: f64,
    pub distance_factor: f64,
    pub revenue: i64,
    pub fuel_cost: i64,
    pub penalties: i64,
    pub bonuses: i64,
    pub bonus_applied: bool,
    pub total_profit: i64,
    pub deliveries_per_driver_hour: f64,
    pub efficiency_score: f64,
}

// ==========================================
// SimulationResult - 模拟结果 (不可变)
// ==========================================
// 说明: 不含时间戳/随机ID，同输入同结果（逐位一致）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    // ===== 运行说明 =====
    pub driver_count: u32,
    pub max_hours_per_day: f64,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,

    // ===== KPI =====
    pub total_profit: i64,
    pub efficiency_score: f64,
    pub on_time_deliveries: u32,
    pub total_deliveries: u32,
    pub late_deliveries: u32,

    // ===== 收入/成本明细 =====
    pub revenue: i64,
    pub fuel_cost: i64,
    pub penalties: i64,
    pub bonuses: i64,
    pub total_costs: i64,
    pub bonus_applied: bool,

    // ===== 展示用派生指标 (前端不得自行计算) =====
    pub on_time_rate: f64,
    pub deliveries_per_driver: f64,
    pub profit_per_delivery: Option<i64>,

    // ===== 解释性明细 =====
    pub capacity: PerDriverCapacity,
    pub traffic_breakdown: Vec<TrafficBreakdown>,
}

impl SimulationResult {
    /// 对账检查: total_profit == revenue + bonuses - fuel_cost - penalties
    pub fn reconciles(&self) -> bool {
        self.total_profit == self.revenue + self.bonuses - self.fuel_cost - self.penalties
            && self.total_costs == self.fuel_cost + self.penalties
    }
}
