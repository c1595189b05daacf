// ==========================================
// 车队运营驾驶舱 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将引擎/存储错误转换为用户友好的错误消息
// 红线: 错误信息必须包含显式原因
// ==========================================

use crate::engine::error::SimulationError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码（供展示层分支处理）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Configuration(_) => "CONFIGURATION",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 SimulationError 转换
// ==========================================
impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::InvalidInput { field, reason } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, reason))
            }
            SimulationError::Configuration { key, reason } => {
                ApiError::Configuration(format!("配置项{}错误: {}", key, reason))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_error_conversion() {
        let err: ApiError = SimulationError::invalid_input("driver_count", "实际为 0").into();
        match &err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("driver_count")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert_eq!(err.code(), "INVALID_INPUT");

        let err: ApiError = SimulationError::configuration("base_fuel_cost", "必需配置缺失").into();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert_eq!(err.code(), "CONFIGURATION");
    }

    #[test]
    fn test_anyhow_maps_to_internal_code() {
        let err: ApiError = anyhow::anyhow!("boom").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.to_string(), "boom");
    }
}
