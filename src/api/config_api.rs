// ==========================================
// 车队运营驾驶舱 - 经营参数 API
// ==========================================
// 职责: 模拟配置查询、单项更新、快照与恢复
// 红线: 写入前校验, 非法取值不落库
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, ConfigManager, SimulationConfig, SimulationConfigReader};
use crate::engine::error::SimulationError;
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tracing::info;

// ==========================================
// ConfigItem - 配置项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

// ==========================================
// ConfigApi - 经营参数 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 列出已设置的模拟配置项 (按键名顺序)
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let values = self.current_values()?;
        let mut items: Vec<ConfigItem> = values
            .into_iter()
            .map(|(key, value)| ConfigItem { key, value })
            .collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(items)
    }

    /// 读取并解析完整模拟配置
    pub async fn get_simulation_config(&self) -> ApiResult<SimulationConfig> {
        Ok(self.config_manager.load_simulation_config().await?)
    }

    /// 更新单个配置项
    ///
    /// # 规则
    /// - 仅接受模拟引擎识别的键
    /// - 以"演示默认值 + 当前值 + 新值"试解析, 新值本身或其引发的约束冲突 → 拒绝
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = key.trim();
        if !config_keys::SIMULATION_KEYS.contains(&key) {
            return Err(ApiError::InvalidInput(format!("未知配置键: {}", key)));
        }

        let overrides = HashMap::from([(key.to_string(), value.trim().to_string())]);
        SimulationConfig::check_overrides(&self.current_values()?, &overrides)?;

        self.config_manager
            .set_global_config_value(key, value.trim())
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        info!(config_key = key, "{}", i18n::t_with_args("config.updated", &[("key", key)]));
        Ok(())
    }

    /// 获取配置快照
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    /// 从快照恢复配置
    ///
    /// 与 update_config 同一校验口径: 未知键 → InvalidInput, 非法取值 → Configuration,
    /// 任一失败则不写入
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置数量
    pub fn restore_from_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        if snapshot_json.trim().is_empty() {
            return Err(ApiError::InvalidInput("快照JSON不能为空".to_string()));
        }

        let count = self
            .config_manager
            .restore_config_from_snapshot(snapshot_json)
            .map_err(storage_error)?;

        info!(
            restored = count,
            "{}",
            i18n::t_with_args("config.restored", &[("count", &count.to_string())])
        );
        Ok(count)
    }

    fn current_values(&self) -> ApiResult<HashMap<String, String>> {
        let mut values = HashMap::new();
        for key in config_keys::SIMULATION_KEYS {
            let value = self
                .config_manager
                .get_global_config_value(key)
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
            if let Some(value) = value {
                values.insert(key.to_string(), value);
            }
        }
        Ok(values)
    }
}

/// 配置存储错误映射: 校验类错误保留分类, 其余视为数据库错误
fn storage_error(err: Box<dyn Error>) -> ApiError {
    match err.downcast::<SimulationError>() {
        Ok(err) => ApiError::from(*err),
        Err(other) => ApiError::DatabaseError(other.to_string()),
    }
}
