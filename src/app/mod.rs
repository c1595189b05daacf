// ==========================================
// 车队运营驾驶舱 - 应用层
// ==========================================
// 职责: 组装配置、数据源与API, 持有模拟会话
// ==========================================

pub mod session;
pub mod state;

// 重导出
pub use session::SimulationSession;
pub use state::{get_default_db_path, AppState};
