// ==========================================
// 车队运营驾驶舱 - 模拟引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 仅两类错误, 同步立即返回, 不重试、不吞掉
// ==========================================

use thiserror::Error;

/// 模拟引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// 输入越界或非有限值（在任何阶段运行前抛出）
    #[error("无效输入: field={field}, {reason}")]
    InvalidInput { field: String, reason: String },

    /// 必需配置缺失或非数值
    #[error("配置错误: key={key}, {reason}")]
    Configuration { key: String, reason: String },
}

impl SimulationError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn configuration(key: &str, reason: impl Into<String>) -> Self {
        SimulationError::Configuration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type SimulationOutcome<T> = Result<T, SimulationError>;
