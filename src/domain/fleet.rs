// ==========================================
// 车队运营驾驶舱 - 车队领域模型
// ==========================================
// 职责: 司机/线路/订单记录 (外部协作方数据) 与模拟快照
// 红线: 引擎只读快照, 不读写司机/线路/订单集合
// ==========================================

use crate::domain::types::{DriverStatus, OrderStatus, RouteStatus, TrafficLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Driver - 司机
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub current_shift_hours: f64, // 当前班次已工作时长
    pub past_7_day_hours: f64,    // 近7日累计工时
    pub status: DriverStatus,
    pub efficiency: f64,          // 个人效率 (0-100)
}

// ==========================================
// Route - 线路
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub route_id: String,          // 线路编号 (如 RT001)
    pub distance_km: f64,          // 里程
    pub traffic_level: TrafficLevel,
    pub base_time_minutes: f64,    // 基准耗时
    pub average_deliveries: u32,   // 平均单趟配送量
    pub status: RouteStatus,
}

// ==========================================
// Order - 订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_id: String,
    pub value: f64,                        // 订单金额
    pub assigned_route: String,            // 所属线路编号
    pub delivery_timestamp: NaiveDateTime, // 计划送达时间
    pub status: OrderStatus,
    pub customer_name: String,
}

// ==========================================
// RouteProfile - 线路画像 (快照内)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProfile {
    pub route_id: String,
    pub distance_km: f64,       // >= 0
    pub traffic_level: TrafficLevel,
    pub base_time_minutes: f64, // >= 0
}

impl RouteProfile {
    /// 构造线路画像
    ///
    /// 非有限值或负值按 0 处理，保证快照内数值始终 >= 0
    pub fn new(
        route_id: impl Into<String>,
        distance_km: f64,
        traffic_level: TrafficLevel,
        base_time_minutes: f64,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            distance_km: non_negative(distance_km),
            traffic_level,
            base_time_minutes: non_negative(base_time_minutes),
        }
    }
}

impl From<&Route> for RouteProfile {
    fn from(route: &Route) -> Self {
        RouteProfile::new(
            route.route_id.clone(),
            route.distance_km,
            route.traffic_level,
            route.base_time_minutes,
        )
    }
}

// ==========================================
// DriverSummary - 司机汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSummary {
    pub known_count: u32,         // 已登记司机数
    pub active_count: u32,        // 在岗司机数
    pub average_efficiency: f64,  // 平均效率 (无司机时为 0)
}

impl DriverSummary {
    pub fn from_drivers(drivers: &[Driver]) -> Self {
        let known_count = drivers.len() as u32;
        let active_count = drivers
            .iter()
            .filter(|d| d.status == DriverStatus::Active)
            .count() as u32;

        let efficiencies: Vec<f64> = drivers
            .iter()
            .map(|d| d.efficiency)
            .filter(|e| e.is_finite())
            .collect();
        let average_efficiency = mean(&efficiencies).unwrap_or(0.0);

        Self {
            known_count,
            active_count,
            average_efficiency,
        }
    }
}

// ==========================================
// FleetSnapshot - 车队快照
// ==========================================
// 不变量: 空快照也必须能产出结果 (引擎使用全局默认值)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub routes: Vec<RouteProfile>,
    pub drivers: DriverSummary,
    pub order_values: Vec<f64>, // 历史订单金额
}

impl FleetSnapshot {
    /// 仅由线路构造快照（司机/订单为空）
    pub fn from_routes(routes: Vec<RouteProfile>) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    /// 由协作方记录组装快照
    ///
    /// # 规则
    /// - 只纳入 Active 线路 (维护/关闭线路不出车)
    /// - 司机全部计入汇总
    /// - 订单金额仅保留有限且非负的值
    pub fn from_records(drivers: &[Driver], routes: &[Route], orders: &[Order]) -> Self {
        let routes = routes
            .iter()
            .filter(|r| r.status == RouteStatus::Active)
            .map(RouteProfile::from)
            .collect();

        let order_values = orders
            .iter()
            .map(|o| o.value)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .collect();

        Self {
            routes,
            drivers: DriverSummary::from_drivers(drivers),
            order_values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// 平均基准耗时（分钟）；无线路时返回 None
    pub fn average_base_time_minutes(&self) -> Option<f64> {
        let times: Vec<f64> = self.routes.iter().map(|r| r.base_time_minutes).collect();
        mean(&times)
    }

    /// 平均里程（公里）；无线路时返回 None
    pub fn average_distance_km(&self) -> Option<f64> {
        let distances: Vec<f64> = self.routes.iter().map(|r| r.distance_km).collect();
        mean(&distances)
    }

    /// 指定路况等级的线路数
    pub fn count_by_traffic(&self, level: TrafficLevel) -> usize {
        self.routes.iter().filter(|r| r.traffic_level == level).count()
    }

    /// 历史订单平均金额；无订单时返回 None
    pub fn average_order_value(&self) -> Option<f64> {
        mean(&self.order_values)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
