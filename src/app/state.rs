// ==========================================
// 车队运营驾驶舱 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 红线: 计算在会话锁之外进行, 仅在成功后整体替换结果
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::{ApiError, ApiResult, ConfigApi, SimulationApi, SimulationRequest, SimulationRun};
use crate::app::session::SimulationSession;
use crate::config::config_manager::ConfigManager;
use crate::fleet::FleetSource;
use crate::i18n;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 经营参数API
    pub config_api: Arc<ConfigApi>,

    /// 模拟API
    pub simulation_api: Arc<SimulationApi<ConfigManager>>,

    session: Mutex<SimulationSession>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - fleet: 司机/线路/订单数据源
    pub fn new(db_path: String, fleet: Arc<dyn FleetSource>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config_manager = Arc::new(
            ConfigManager::new(&db_path).map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));
        let simulation_api = Arc::new(SimulationApi::new(config_manager.clone(), fleet));

        Ok(Self {
            db_path,
            config_manager,
            config_api,
            simulation_api,
            session: Mutex::new(SimulationSession::new()),
        })
    }

    fn lock_session(&self) -> ApiResult<MutexGuard<'_, SimulationSession>> {
        self.session
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话锁获取失败: {}", e)))
    }

    /// 提交表单并运行模拟
    ///
    /// 失败时保留上一次结果; 表单始终更新为本次提交内容
    pub async fn run_simulation(&self, request: SimulationRequest) -> ApiResult<SimulationRun> {
        self.lock_session()?.set_form(request.clone());

        let run = self.simulation_api.run(&request).await?;

        self.lock_session()?.record(run.clone());
        Ok(run)
    }

    /// 清空结果并恢复默认表单
    pub fn reset_simulation(&self) -> ApiResult<SimulationRequest> {
        let mut session = self.lock_session()?;
        session.reset();
        tracing::info!("{}", i18n::t("simulation.reset"));
        Ok(session.form().clone())
    }

    pub fn latest_run(&self) -> ApiResult<Option<SimulationRun>> {
        Ok(self.lock_session()?.latest().cloned())
    }

    pub fn current_form(&self) -> ApiResult<SimulationRequest> {
        Ok(self.lock_session()?.form().clone())
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 FLEET_OPS_DB_PATH, 否则使用用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("FLEET_OPS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./fleet_ops.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("fleet-ops-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("fleet-ops");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("fleet_ops.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
    }
}
