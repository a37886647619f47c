//! 编辑器工作区窗口
//!
//! Debug 统计窗口，以及可停靠的 Viewport、Content Browser、Scene Hierarchy。

use imgui::{Ui, WindowFlags};

use crate::gui::panels::overlay::OverlayCorner;
use crate::gui::state::GuiState;

/// Viewport 面板的目标宽高比
pub const VIEWPORT_ASPECT: f32 = 16.0 / 9.0;

/// 在 `available` 区域内放下给定宽高比的最大尺寸
pub fn fit_aspect(available: [f32; 2], aspect: f32) -> [f32; 2] {
    let [width, height] = available;
    if width <= 0.0 || height <= 0.0 || aspect <= 0.0 {
        return [0.0, 0.0];
    }

    if width / height > aspect {
        [height * aspect, height]
    } else {
        [width, width / aspect]
    }
}

/// "Debug: " 统计窗口
pub fn debug_window(ui: &Ui, state: &mut GuiState) {
    ui.window("Debug: ").build(|| {
        let framerate = ui.io().framerate;
        let frame_ms = if framerate > 0.0 { 1000.0 / framerate } else { 0.0 };
        ui.text(format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            frame_ms, framerate
        ));

        if !state.adapter_name.is_empty() {
            ui.text(format!("Adapter: {}", state.adapter_name));
        }

        ui.separator();
        ui.checkbox("Demo window", &mut state.show_demo_window);
        ui.checkbox("Overlay", &mut state.show_debug_overlay);

        let labels = OverlayCorner::ALL.map(OverlayCorner::label);
        let mut current = state.overlay_corner.index();
        if ui.combo_simple_string("Overlay position", &mut current, &labels) {
            state.overlay_corner = OverlayCorner::ALL[current];
        }
    });
}

/// 场景视口面板
pub fn viewport_window(ui: &Ui, state: &mut GuiState) {
    ui.window("Viewport")
        .flags(WindowFlags::NO_SCROLLBAR | WindowFlags::NO_SCROLL_WITH_MOUSE)
        .build(|| {
            let available = ui.content_region_avail();
            state.viewport_panel_size = available;

            let [width, height] = fit_aspect(available, VIEWPORT_ASPECT);
            ui.text(format!("Panel: {:.0} x {:.0}", available[0], available[1]));
            ui.text(format!("16:9 fit: {:.0} x {:.0}", width, height));
        });
}

pub fn content_browser_window(ui: &Ui) {
    ui.window("Content Browser").build(|| {
        ui.text_disabled("No assets");
    });
}

pub fn scene_hierarchy_window(ui: &Ui) {
    ui.window("Scene Hierarchy").build(|| {
        ui.text_disabled("Triangle");
    });
}

/// 渲染所有工作区窗口
pub fn render(ui: &Ui, state: &mut GuiState) {
    debug_window(ui, state);
    viewport_window(ui, state);
    content_browser_window(ui);
    scene_hierarchy_window(ui);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_aspect_height_limited() {
        let size = fit_aspect([1000.0, 360.0], VIEWPORT_ASPECT);
        assert!((size[0] - 640.0).abs() < 1e-3);
        assert_eq!(size[1], 360.0);
    }

    #[test]
    fn test_fit_aspect_width_limited() {
        let size = fit_aspect([320.0, 720.0], VIEWPORT_ASPECT);
        assert_eq!(size[0], 320.0);
        assert!((size[1] - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_aspect_empty_region() {
        assert_eq!(fit_aspect([0.0, 400.0], VIEWPORT_ASPECT), [0.0, 0.0]);
        assert_eq!(fit_aspect([400.0, -1.0], VIEWPORT_ASPECT), [0.0, 0.0]);
    }
}
