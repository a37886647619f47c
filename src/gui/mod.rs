//! GUI 系统模块
//!
//! 基于 Dear ImGui（docking 分支）+ winit 的调试界面，绘制由 DX12 后端完成。

mod manager;
mod metrics;
mod state;
pub mod panels;

pub use manager::GuiManager;
pub use metrics::PerformanceMetrics;
pub use state::GuiState;
