// ==========================================
// 车队运营驾驶舱 - 领域类型定义
// ==========================================
// 职责: 路况等级、司机/线路/订单状态枚举
// 序列化格式: snake_case / SCREAMING_SNAKE_CASE (与前端、配置键一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 路况等级 (Traffic Level)
// ==========================================
// 顺序: Low < Medium < High (延误概率严格递增)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,    // 畅通
    Medium, // 一般
    High,   // 拥堵
}

impl TrafficLevel {
    /// 全部路况等级（按严重程度升序）
    pub const ALL: [TrafficLevel; 3] = [TrafficLevel::Low, TrafficLevel::Medium, TrafficLevel::High];
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficLevel::Low => write!(f, "Low"),
            TrafficLevel::Medium => write!(f, "Medium"),
            TrafficLevel::High => write!(f, "High"),
        }
    }
}

impl FromStr for TrafficLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(TrafficLevel::Low),
            "MEDIUM" => Ok(TrafficLevel::Medium),
            "HIGH" => Ok(TrafficLevel::High),
            other => Err(format!("未知路况等级: {}", other)),
        }
    }
}

// ==========================================
// 司机状态 (Driver Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriverStatus {
    Active,   // 在岗
    Inactive, // 停用
    OnBreak,  // 休息中
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverStatus::Active => write!(f, "active"),
            DriverStatus::Inactive => write!(f, "inactive"),
            DriverStatus::OnBreak => write!(f, "on-break"),
        }
    }
}

// ==========================================
// 线路状态 (Route Status)
// ==========================================
// 只有 Active 线路进入模拟快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStatus {
    Active,      // 运营中
    Maintenance, // 维护中
    Closed,      // 已关闭
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStatus::Active => write!(f, "active"),
            RouteStatus::Maintenance => write!(f, "maintenance"),
            RouteStatus::Closed => write!(f, "closed"),
        }
    }
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,   // 待配送
    InTransit, // 配送中
    Delivered, // 已送达
    Delayed,   // 已延误
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::InTransit => write!(f, "in-transit"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Delayed => write!(f, "delayed"),
        }
    }
}

// ==========================================
// 线路价值来源 (Route Value Source)
// ==========================================
// 决定收入口径: 配置常量 或 历史订单均值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteValueSource {
    Configured,       // 使用 average_route_value 配置
    HistoricalOrders, // 使用快照中的历史订单均值
}

impl fmt::Display for RouteValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteValueSource::Configured => write!(f, "configured"),
            RouteValueSource::HistoricalOrders => write!(f, "historical_orders"),
        }
    }
}

impl FromStr for RouteValueSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "configured" => Ok(RouteValueSource::Configured),
            "historical_orders" => Ok(RouteValueSource::HistoricalOrders),
            other => Err(format!("未知线路价值来源: {}", other)),
        }
    }
}
