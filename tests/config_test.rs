// ==========================================
// ConfigManager / ConfigApi 集成测试
// ==========================================
// 测试目标: 验证经营参数的读取、写入校验、快照与恢复
// ==========================================


use fleet_ops::api::{ApiError, ConfigApi};
use fleet_ops::config::{
    config_keys, demo_simulation_config, ConfigManager, SimulationConfigReader,
};
use fleet_ops::domain::types::RouteValueSource;
use fleet_ops::engine::SimulationError;
use std::sync::Arc;
use test_helpers::{create_seeded_config_manager, create_test_db};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_load_seeded_config() {
    let (_temp_file, manager) = create_seeded_config_manager().expect("Failed to seed config");

    let config = manager
        .load_simulation_config()
        .await
        .expect("Should load simulation config");

    assert_eq!(config, demo_simulation_config());
}

#[tokio::test]
async fn test_missing_required_key_is_configuration_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).unwrap();

    let err = manager.load_simulation_config().await.unwrap_err();
    match err {
        SimulationError::Configuration { key, .. } => {
            assert_eq!(key, config_keys::BASE_FUEL_COST)
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_numeric_value_is_configuration_error() {
    let (_temp_file, manager) = create_seeded_config_manager().unwrap();
    manager
        .set_global_config_value(config_keys::PER_LATE_PENALTY, "fifty")
        .unwrap();

    let err = manager.load_simulation_config().await.unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Configuration { ref key, .. } if key == config_keys::PER_LATE_PENALTY
    ));
}

#[tokio::test]
async fn test_seed_does_not_overwrite_existing_values() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    let first = manager.seed_simulation_config(&demo_simulation_config()).unwrap();
    assert_eq!(first, config_keys::SIMULATION_KEYS.len());

    manager
        .set_global_config_value(config_keys::AVERAGE_ROUTE_VALUE, "1500")
        .unwrap();
    let second = manager.seed_simulation_config(&demo_simulation_config()).unwrap();
    assert_eq!(second, 0);

    let config = manager.load_simulation_config().await.unwrap();
    assert_eq!(config.average_route_value, 1500.0);
}

#[tokio::test]
async fn test_config_api_rejects_invalid_updates() {
    let (_temp_file, manager) = create_seeded_config_manager().unwrap();
    let api = ConfigApi::new(Arc::new(manager));

    // 未知键
    assert!(matches!(
        api.update_config("driver_salary", "100"),
        Err(ApiError::InvalidInput(_))
    ));

    // 破坏延误概率单调性
    assert!(matches!(
        api.update_config(config_keys::LATENESS_PROBABILITY_LOW, "0.5"),
        Err(ApiError::Configuration(_))
    ));

    // 合法更新
    api.update_config(config_keys::ROUTE_VALUE_SOURCE, "historical_orders")
        .unwrap();
    let config = api.get_simulation_config().await.unwrap();
    assert_eq!(config.route_value_source, RouteValueSource::HistoricalOrders);
    assert_eq!(config.traffic.low.lateness_probability, 0.05);
}

#[tokio::test]
async fn test_config_api_allows_incremental_initialisation() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ConfigApi::new(Arc::new(ConfigManager::new(&db_path).unwrap()));

    api.update_config(config_keys::BASE_FUEL_COST, "9000").unwrap();
    assert!(matches!(
        api.update_config(config_keys::PER_DRIVER_FUEL_RATE, "-1"),
        Err(ApiError::Configuration(_))
    ));

    let items = api.list_configs().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, config_keys::BASE_FUEL_COST);
    assert_eq!(items[0].value, "9000");
}

#[tokio::test]
async fn test_snapshot_and_restore() {
    let (_temp_file, manager) = create_seeded_config_manager().unwrap();
    let api = ConfigApi::new(Arc::new(manager));

    let snapshot = api.get_config_snapshot().unwrap();

    api.update_config(config_keys::PER_ON_TIME_BONUS, "25").unwrap();
    assert_eq!(
        api.get_simulation_config().await.unwrap().per_on_time_bonus,
        25.0
    );

    let restored = api.restore_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, config_keys::SIMULATION_KEYS.len());
    assert_eq!(
        api.get_simulation_config().await.unwrap(),
        demo_simulation_config()
    );

    assert!(matches!(
        api.restore_from_snapshot("  "),
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_restore_rejects_invalid_snapshot_without_writing() {
    let (_temp_file, manager) = create_seeded_config_manager().unwrap();
    let api = ConfigApi::new(Arc::new(manager));

    // 非数值取值与单项更新同口径拒绝
    assert!(matches!(
        api.update_config(config_keys::BASE_FUEL_COST, "lots"),
        Err(ApiError::Configuration(_))
    ));

    // 含未知键 → InvalidInput, 合法键也不写入
    assert!(matches!(
        api.restore_from_snapshot(r#"{"base_fuel_cost":"9000","bogus_key":"1"}"#),
        Err(ApiError::InvalidInput(_))
    ));

    // 非法取值 → Configuration
    assert!(matches!(
        api.restore_from_snapshot(r#"{"base_fuel_cost":"lots"}"#),
        Err(ApiError::Configuration(_))
    ));

    // 破坏延误概率次序 → Configuration, 同批其余键也不写入
    assert!(matches!(
        api.restore_from_snapshot(
            r#"{"per_late_penalty":"75","lateness_probability_high":"0.01"}"#
        ),
        Err(ApiError::Configuration(_))
    ));

    // 非 JSON → InvalidInput
    assert!(matches!(
        api.restore_from_snapshot("not json"),
        Err(ApiError::InvalidInput(_))
    ));

    assert_eq!(
        api.get_simulation_config().await.unwrap(),
        demo_simulation_config()
    );
}

#[tokio::test]
async fn test_restore_partial_snapshot_on_fresh_db() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ConfigApi::new(Arc::new(ConfigManager::new(&db_path).unwrap()));

    let restored = api
        .restore_from_snapshot(r#"{"base_fuel_cost":"9000","per_late_penalty":"60"}"#)
        .unwrap();
    assert_eq!(restored, 2);

    let items = api.list_configs().unwrap();
    assert_eq!(
        items.iter().map(|i| i.key.as_str()).collect::<Vec<_>>(),
        vec![config_keys::BASE_FUEL_COST, config_keys::PER_LATE_PENALTY]
    );
}
