// ==========================================
// 车队运营驾驶舱 - 命令行入口
// ==========================================
// 用途: 初始化配置库, 以默认参数对演示车队运行一次模拟并输出 JSON
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use fleet_ops::api::SimulationRequest;
use fleet_ops::app::{get_default_db_path, AppState};
use fleet_ops::config::demo_simulation_config;
use fleet_ops::fleet::demo_fleet;
use fleet_ops::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 车队规模模拟", fleet_ops::APP_NAME);
    tracing::info!("系统版本: {}", fleet_ops::VERSION);
    tracing::info!("==================================================");

    if let Ok(locale) = std::env::var("FLEET_OPS_LOCALE") {
        i18n::set_locale(locale.trim());
    }

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path, Arc::new(demo_fleet())).map_err(anyhow::Error::msg)?;

    let seeded = app_state
        .config_manager
        .seed_simulation_config(&demo_simulation_config())
        .map_err(|e| anyhow::anyhow!("初始化经营参数失败: {}", e))?;
    if seeded > 0 {
        tracing::info!(seeded, "已写入默认经营参数");
    }

    let run = match app_state.run_simulation(SimulationRequest::default()).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(code = e.code(), "{}", i18n::simulation_error_message(&e));
            return Err(e.into());
        }
    };
    tracing::info!("{}", i18n::simulation_completed_message(&run));

    let output = serde_json::to_string_pretty(&run).context("序列化模拟结果失败")?;
    println!("{}", output);
    Ok(())
}
