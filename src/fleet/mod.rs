// ==========================================
// 车队运营驾驶舱 - 车队数据源
// ==========================================
// 职责: 司机/线路/订单集合的只读访问接口 + 快照组装
// 说明: 集合的增删改属于外部协作方, 本层只读
// ==========================================

pub mod memory;

use crate::domain::fleet::{Driver, FleetSnapshot, Order, Route};
use tracing::debug;

pub use memory::{demo_fleet, InMemoryFleet};

// ==========================================
// FleetSource Trait
// ==========================================
pub trait FleetSource: Send + Sync {
    /// 当前全部司机
    fn drivers(&self) -> Vec<Driver>;

    /// 当前全部线路 (含维护/关闭状态)
    fn routes(&self) -> Vec<Route>;

    /// 历史订单
    fn orders(&self) -> Vec<Order>;
}

impl FleetSnapshot {
    /// 从数据源采集快照
    ///
    /// 采集后快照与数据源解耦, 数据源后续变更不影响已采集快照
    pub fn capture(source: &dyn FleetSource) -> Self {
        let drivers = source.drivers();
        let routes = source.routes();
        let orders = source.orders();

        let snapshot = FleetSnapshot::from_records(&drivers, &routes, &orders);
        debug!(
            drivers = drivers.len(),
            routes = routes.len(),
            active_routes = snapshot.route_count(),
            orders = orders.len(),
            "车队快照采集完成"
        );
        snapshot
    }
}
