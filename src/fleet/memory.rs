// ==========================================
// 车队运营驾驶舱 - 内存车队数据源
// ==========================================
// 职责: 进程内司机/线路/订单集合 (演示与测试)
// ==========================================

use crate::domain::fleet::{Driver, Order, Route};
use crate::domain::types::{DriverStatus, OrderStatus, RouteStatus, TrafficLevel};
use crate::fleet::FleetSource;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::RwLock;

// ==========================================
// InMemoryFleet
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryFleet {
    drivers: RwLock<Vec<Driver>>,
    routes: RwLock<Vec<Route>>,
    orders: RwLock<Vec<Order>>,
}

impl InMemoryFleet {
    pub fn new(drivers: Vec<Driver>, routes: Vec<Route>, orders: Vec<Order>) -> Self {
        Self {
            drivers: RwLock::new(drivers),
            routes: RwLock::new(routes),
            orders: RwLock::new(orders),
        }
    }

    /// 整体替换线路集合 (协作方编辑后的同步入口)
    pub fn replace_routes(&self, routes: Vec<Route>) {
        match self.routes.write() {
            Ok(mut guard) => *guard = routes,
            Err(poisoned) => *poisoned.into_inner() = routes,
        }
    }

}

fn read_all<T: Clone>(lock: &RwLock<Vec<T>>) -> Vec<T> {
    match lock.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

impl FleetSource for InMemoryFleet {
    fn drivers(&self) -> Vec<Driver> {
        read_all(&self.drivers)
    }

    fn routes(&self) -> Vec<Route> {
        read_all(&self.routes)
    }

    fn orders(&self) -> Vec<Order> {
        read_all(&self.orders)
    }
}

// ==========================================
// 演示数据
// ==========================================

/// 演示车队: 5 名司机, 5 条线路 (3 条在运营), 5 笔订单
pub fn demo_fleet() -> InMemoryFleet {
    InMemoryFleet::new(demo_drivers(), demo_routes(), demo_orders())
}

fn driver(id: &str, name: &str, shift: f64, week: f64, status: DriverStatus, efficiency: f64) -> Driver {
    Driver {
        id: id.to_string(),
        name: name.to_string(),
        current_shift_hours: shift,
        past_7_day_hours: week,
        status,
        efficiency,
    }
}

fn demo_drivers() -> Vec<Driver> {
    vec![
        driver("1", "Rajesh Kumar", 6.5, 45.0, DriverStatus::Active, 92.0),
        driver("2", "Priya Sharma", 4.2, 38.0, DriverStatus::Active, 88.0),
        driver("3", "Amit Singh", 8.0, 52.0, DriverStatus::OnBreak, 95.0),
        driver("4", "Neha Patel", 2.1, 28.0, DriverStatus::Active, 85.0),
        driver("5", "Rohit Gupta", 0.0, 0.0, DriverStatus::Inactive, 78.0),
    ]
}

fn route(
    id: &str,
    route_id: &str,
    distance_km: f64,
    traffic_level: TrafficLevel,
    base_time_minutes: f64,
    average_deliveries: u32,
    status: RouteStatus,
) -> Route {
    Route {
        id: id.to_string(),
        route_id: route_id.to_string(),
        distance_km,
        traffic_level,
        base_time_minutes,
        average_deliveries,
        status,
    }
}

fn demo_routes() -> Vec<Route> {
    vec![
        route("1", "RT001", 15.5, TrafficLevel::Medium, 45.0, 8, RouteStatus::Active),
        route("2", "RT002", 22.3, TrafficLevel::High, 65.0, 12, RouteStatus::Active),
        route("3", "RT003", 8.7, TrafficLevel::Low, 25.0, 5, RouteStatus::Active),
        route("4", "RT004", 18.2, TrafficLevel::Medium, 52.0, 9, RouteStatus::Maintenance),
        route("5", "RT005", 31.8, TrafficLevel::High, 85.0, 15, RouteStatus::Closed),
    ]
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn order(
    id: &str,
    order_id: &str,
    value: f64,
    assigned_route: &str,
    delivery_timestamp: NaiveDateTime,
    status: OrderStatus,
    customer_name: &str,
) -> Order {
    Order {
        id: id.to_string(),
        order_id: order_id.to_string(),
        value,
        assigned_route: assigned_route.to_string(),
        delivery_timestamp,
        status,
        customer_name: customer_name.to_string(),
    }
}

fn demo_orders() -> Vec<Order> {
    vec![
        order("1", "ORD001", 1250.0, "RT001", timestamp(2025, 1, 15, 14, 30), OrderStatus::Delivered, "Aarav Sharma"),
        order("2", "ORD002", 850.0, "RT002", timestamp(2025, 1, 15, 16, 0), OrderStatus::InTransit, "Priya Singh"),
        order("3", "ORD003", 2100.0, "RT003", timestamp(2025, 1, 15, 11, 45), OrderStatus::Delivered, "Rohit Kumar"),
        order("4", "ORD004", 650.0, "RT001", timestamp(2025, 1, 15, 18, 30), OrderStatus::Delayed, "Neha Patel"),
        order("5", "ORD005", 1800.0, "RT004", timestamp(2025, 1, 16, 9, 0), OrderStatus::Pending, "Amit Gupta"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fleet::FleetSnapshot;

    #[test]
    fn test_demo_fleet_snapshot() {
        let fleet = demo_fleet();
        let snapshot = FleetSnapshot::capture(&fleet);

        // RT004 维护中, RT005 已关闭
        assert_eq!(snapshot.route_count(), 3);
        assert_eq!(snapshot.drivers.known_count, 5);
        assert_eq!(snapshot.drivers.active_count, 3);
        assert_eq!(snapshot.order_values.len(), 5);
        assert_eq!(snapshot.average_base_time_minutes(), Some(45.0));
    }

    #[test]
    fn test_snapshot_detached_from_source() {
        let fleet = demo_fleet();
        let snapshot = FleetSnapshot::capture(&fleet);

        fleet.replace_routes(vec![]);

        assert_eq!(snapshot.route_count(), 3);
        assert!(FleetSnapshot::capture(&fleet).is_empty());
    }

    #[test]
    fn test_demo_timestamps_parse() {
        let orders = demo_fleet().orders();
        assert_eq!(orders[0].delivery_timestamp, timestamp(2025, 1, 15, 14, 30));
        assert_ne!(orders[0].delivery_timestamp, NaiveDateTime::default());
    }
}
