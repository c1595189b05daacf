// ==========================================
// 车队运营驾驶舱 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照与恢复
// 红线: 快照恢复先校验后写入
// 存储: config_kv 表 (key-value + scope, 当前仅使用 global)
// ==========================================

use crate::config::config_reader_trait::SimulationConfigReader;
use crate::config::simulation_config::SimulationConfig;
use crate::db::{ensure_config_schema, open_sqlite_connection};
use crate::engine::error::{SimulationError, SimulationOutcome};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 会确保 config_scope / config_kv 表存在（幂等）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::debug!(config_key = key, value = value, "config_kv 写入");
        Ok(())
    }

    /// 初始化模拟配置（仅写入缺失的键，不覆盖已有值）
    ///
    /// # 返回
    /// - Ok(usize): 新写入的配置项数量
    pub fn seed_simulation_config(&self, config: &SimulationConfig) -> Result<usize, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut count = 0;
        for (key, value) in config.to_values() {
            count += conn.execute(
                "INSERT OR IGNORE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                params![key, value],
            )?;
        }

        Ok(count)
    }

    /// 获取所有配置的快照（JSON 对象, 按键名排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let values = read_global_values(&conn)?;
        Ok(serde_json::to_string(&values)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 错误
    /// - 快照无法解析或含未知键 → SimulationError::InvalidInput
    /// - 合并后的候选配置非法 → SimulationError::Configuration
    ///
    /// 校验与写入在同一事务内完成, 失败时不写入任何键
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let snapshot: HashMap<String, String> = serde_json::from_str(snapshot_json).map_err(|e| {
            SimulationError::invalid_input("snapshot", format!("快照JSON解析失败: {}", e))
        })?;

        let mut unknown: Vec<&str> = snapshot
            .keys()
            .map(String::as_str)
            .filter(|key| !config_keys::SIMULATION_KEYS.contains(key))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(Box::new(SimulationError::invalid_input(
                "snapshot",
                format!("未知配置键: {}", unknown.join(", ")),
            )));
        }

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let stored: HashMap<String, String> = read_global_values(&tx)?.into_iter().collect();
        SimulationConfig::check_overrides(&stored, &snapshot)?;

        let mut count = 0;
        for (key, value) in snapshot.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

/// 读取 global scope 全部配置
fn read_global_values(conn: &Connection) -> rusqlite::Result<BTreeMap<String, String>> {
    let mut stmt =
        conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global'")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    rows.collect()
}

// ==========================================
// SimulationConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SimulationConfigReader for ConfigManager {
    async fn get_simulation_value(&self, key: &str) -> SimulationOutcome<Option<String>> {
        self.get_config_value(key)
            .map_err(|e| SimulationError::configuration(key, format!("配置读取失败: {}", e)))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 燃油
    pub const BASE_FUEL_COST: &str = "base_fuel_cost";
    pub const PER_DRIVER_FUEL_RATE: &str = "per_driver_fuel_rate";
    pub const FUEL_REFERENCE_DISTANCE_KM: &str = "fuel_reference_distance_km";

    // 罚款/奖励
    pub const PER_LATE_PENALTY: &str = "per_late_penalty";
    pub const PER_ON_TIME_BONUS: &str = "per_on_time_bonus";
    pub const ON_TIME_BONUS_THRESHOLD: &str = "on_time_bonus_threshold";

    // 收入
    pub const AVERAGE_ROUTE_VALUE: &str = "average_route_value";
    pub const ROUTE_VALUE_SOURCE: &str = "route_value_source"; // configured | historical_orders

    // 产能
    pub const DEFAULT_AVERAGE_ROUTE_TIME_MINUTES: &str = "default_average_route_time_minutes";

    // 路况
    pub const LATENESS_PROBABILITY_LOW: &str = "lateness_probability_low";
    pub const LATENESS_PROBABILITY_MEDIUM: &str = "lateness_probability_medium";
    pub const LATENESS_PROBABILITY_HIGH: &str = "lateness_probability_high";
    pub const TRAFFIC_DELAY_FACTOR_LOW: &str = "traffic_delay_factor_low";
    pub const TRAFFIC_DELAY_FACTOR_MEDIUM: &str = "traffic_delay_factor_medium";
    pub const TRAFFIC_DELAY_FACTOR_HIGH: &str = "traffic_delay_factor_high";

    // 效率评分
    pub const EFFICIENCY_RELIABILITY_WEIGHT: &str = "efficiency_reliability_weight";
    pub const EFFICIENCY_PRODUCTIVITY_WEIGHT: &str = "efficiency_productivity_weight";
    pub const TARGET_DELIVERIES_PER_DRIVER_HOUR: &str = "target_deliveries_per_driver_hour";

    /// 模拟引擎识别的全部配置键
    pub const SIMULATION_KEYS: &[&str] = &[
        BASE_FUEL_COST,
        PER_DRIVER_FUEL_RATE,
        FUEL_REFERENCE_DISTANCE_KM,
        PER_LATE_PENALTY,
        PER_ON_TIME_BONUS,
        ON_TIME_BONUS_THRESHOLD,
        AVERAGE_ROUTE_VALUE,
        ROUTE_VALUE_SOURCE,
        DEFAULT_AVERAGE_ROUTE_TIME_MINUTES,
        LATENESS_PROBABILITY_LOW,
        LATENESS_PROBABILITY_MEDIUM,
        LATENESS_PROBABILITY_HIGH,
        TRAFFIC_DELAY_FACTOR_LOW,
        TRAFFIC_DELAY_FACTOR_MEDIUM,
        TRAFFIC_DELAY_FACTOR_HIGH,
        EFFICIENCY_RELIABILITY_WEIGHT,
        EFFICIENCY_PRODUCTIVITY_WEIGHT,
        TARGET_DELIVERIES_PER_DRIVER_HOUR,
    ];
}
