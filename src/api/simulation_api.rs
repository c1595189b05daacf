// ==========================================
// 车队运营驾驶舱 - 模拟 API
// ==========================================
// 职责: 表单请求解析 → 配置加载 → 快照采集 → 引擎运行
// 红线: 运行失败不产出任何结果, 调用方保留上一次结果
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::SimulationConfigReader;
use crate::domain::fleet::FleetSnapshot;
use crate::domain::simulation::{
    default_shift_start_time, SimulationInput, SimulationResult, DEFAULT_DRIVER_COUNT,
    DEFAULT_MAX_HOURS_PER_DAY,
};
use crate::engine::{SimulationEngine, SimulationError, SimulationOutcome};
use crate::fleet::FleetSource;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 表单时间格式
pub const START_TIME_FORMAT: &str = "%H:%M";

// ==========================================
// SimulationRequest - 表单原始输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub driver_count: f64,
    pub start_time: String, // "HH:MM"
    pub max_hours_per_day: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub jitter_amplitude: Option<f64>,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            driver_count: DEFAULT_DRIVER_COUNT as f64,
            start_time: default_shift_start_time().format(START_TIME_FORMAT).to_string(),
            max_hours_per_day: DEFAULT_MAX_HOURS_PER_DAY,
            seed: None,
            jitter_amplitude: None,
        }
    }
}

impl SimulationRequest {
    /// 解析为 SimulationInput
    ///
    /// # 错误
    /// - driver_count 非有限/非整数/超出 u32 → InvalidInput
    /// - start_time 非 HH:MM → InvalidInput
    ///
    /// 取值范围 (1..=50, 0 < h <= 12) 由引擎统一校验
    pub fn into_input(&self) -> SimulationOutcome<SimulationInput> {
        let count = self.driver_count;
        if !count.is_finite() || count.fract() != 0.0 {
            return Err(SimulationError::invalid_input(
                "driver_count",
                format!("必须为整数, 实际为 {}", count),
            ));
        }
        if count < 0.0 || count > u32::MAX as f64 {
            return Err(SimulationError::invalid_input(
                "driver_count",
                format!("超出取值范围, 实际为 {}", count),
            ));
        }

        let start = parse_start_time(&self.start_time)?;
        let input = SimulationInput::new(count as u32, start, self.max_hours_per_day);

        Ok(match self.jitter_amplitude {
            Some(amplitude) => input.with_variability(self.seed.unwrap_or_default(), amplitude),
            None => input,
        })
    }
}

fn parse_start_time(raw: &str) -> SimulationOutcome<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, START_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| {
            SimulationError::invalid_input("start_time", format!("必须为 HH:MM, 实际为 {:?}", raw))
        })
}

// ==========================================
// SimulationRun - 一次成功运行
// ==========================================
// 运行元信息 (run_id / computed_at) 与确定性结果分离
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub input: SimulationInput,
    pub result: SimulationResult,
}

// ==========================================
// SimulationApi - 模拟 API
// ==========================================
pub struct SimulationApi<C>
where
    C: SimulationConfigReader,
{
    config: Arc<C>,
    fleet: Arc<dyn FleetSource>,
}

impl<C> SimulationApi<C>
where
    C: SimulationConfigReader,
{
    pub fn new(config: Arc<C>, fleet: Arc<dyn FleetSource>) -> Self {
        Self { config, fleet }
    }

    /// 处理表单请求
    #[instrument(skip(self), fields(driver_count = request.driver_count))]
    pub async fn run(&self, request: &SimulationRequest) -> ApiResult<SimulationRun> {
        let input = request.into_input().map_err(|e| {
            warn!(error = %e, "模拟请求被拒绝");
            ApiError::from(e)
        })?;
        self.run_input(input).await
    }

    /// 以已解析的输入运行一次模拟
    pub async fn run_input(&self, input: SimulationInput) -> ApiResult<SimulationRun> {
        let config = self.config.load_simulation_config().await.map_err(|e| {
            warn!(error = %e, "模拟配置加载失败");
            ApiError::from(e)
        })?;

        let snapshot = FleetSnapshot::capture(self.fleet.as_ref());
        let engine = SimulationEngine::new(config);
        let result = engine.run(&input, &snapshot).map_err(|e| {
            warn!(error = %e, "模拟运行失败");
            ApiError::from(e)
        })?;

        let run = SimulationRun {
            run_id: Uuid::new_v4(),
            computed_at: Utc::now(),
            input,
            result,
        };

        info!(
            run_id = %run.run_id,
            total_profit = run.result.total_profit,
            total_deliveries = run.result.total_deliveries,
            "模拟请求处理完成"
        );
        Ok(run)
    }
}
