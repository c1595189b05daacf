// ==========================================
// 车队运营驾驶舱 - 模拟会话
// ==========================================
// 职责: 保存当前表单与最近一次成功运行
// 状态: Idle(无结果) → Computed(有结果); 运行失败保持原状态
// 红线: 结果整体替换, 不做局部修改
// ==========================================

use crate::api::simulation_api::{SimulationRequest, SimulationRun};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSession {
    form: SimulationRequest,
    latest: Option<SimulationRun>,
}

impl SimulationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SimulationRequest {
        &self.form
    }

    /// 更新表单 (不影响已有结果)
    pub fn set_form(&mut self, form: SimulationRequest) {
        self.form = form;
    }

    pub fn latest(&self) -> Option<&SimulationRun> {
        self.latest.as_ref()
    }

    pub fn has_result(&self) -> bool {
        self.latest.is_some()
    }

    /// 记录一次成功运行, 替换上一次结果
    pub fn record(&mut self, run: SimulationRun) {
        self.latest = Some(run);
    }

    /// 清空结果并恢复默认表单
    pub fn reset(&mut self) {
        self.form = SimulationRequest::default();
        self.latest = None;
    }
}
