//! GUI 状态管理
//!
//! GuiState 保存所有 GUI 相关的状态数据，与具体的图形后端无关。

use crate::core::config::GuiConfig;
use crate::gui::panels::overlay::OverlayCorner;

/// GUI 状态（与后端无关）
#[derive(Debug, Clone)]
pub struct GuiState {
    // 调试浮层
    pub show_debug_overlay: bool,
    pub overlay_corner: OverlayCorner,

    pub show_demo_window: bool,

    // 性能监控
    pub fps: f32,
    pub frame_time_ms: f32,

    /// Viewport 面板上一帧的内容区域大小
    pub viewport_panel_size: [f32; 2],

    /// 当前使用的适配器
    pub adapter_name: String,
}

impl GuiState {
    /// 从配置创建 GUI 状态
    pub fn new(config: &GuiConfig) -> Self {
        Self {
            show_debug_overlay: config.show_debug_overlay,
            overlay_corner: config.overlay_corner.into(),
            show_demo_window: config.show_demo_window,
            fps: 0.0,
            frame_time_ms: 0.0,
            viewport_panel_size: [0.0, 0.0],
            adapter_name: String::new(),
        }
    }

    /// 更新性能数据
    pub fn update_performance(&mut self, fps: f32, frame_time_ms: f32) {
        self.fps = fps;
        self.frame_time_ms = frame_time_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OverlayCornerConfig;

    #[test]
    fn test_state_from_config() {
        let config = GuiConfig {
            show_demo_window: false,
            overlay_corner: OverlayCornerConfig::BottomRight,
            ..GuiConfig::default()
        };
        let state = GuiState::new(&config);

        assert!(!state.show_demo_window);
        assert!(state.show_debug_overlay);
        assert_eq!(state.overlay_corner, OverlayCorner::BottomRight);
        assert_eq!(state.fps, 0.0);
    }

    #[test]
    fn test_update_performance() {
        let mut state = GuiState::new(&GuiConfig::default());
        state.update_performance(60.0, 16.7);
        assert_eq!(state.fps, 60.0);
        assert_eq!(state.frame_time_ms, 16.7);
    }
}
