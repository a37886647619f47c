//! 调试浮层
//!
//! 固定在主视口某个角落（或中心）的半透明小窗口，显示 FPS 和帧时间。

use imgui::{Condition, Ui, WindowFlags};

use crate::core::config::OverlayCornerConfig;
use crate::gui::state::GuiState;

/// 浮层与工作区边缘的距离
pub const PAD: f32 = 40.0;

const BG_ALPHA: f32 = 0.5;

/// 浮层位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayCorner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl OverlayCorner {
    pub const ALL: [OverlayCorner; 5] = [
        OverlayCorner::TopLeft,
        OverlayCorner::TopRight,
        OverlayCorner::BottomLeft,
        OverlayCorner::BottomRight,
        OverlayCorner::Center,
    ];

    /// ImGui 的角落编码：bit 0 = 右，bit 1 = 下；中心没有编码
    pub fn location(self) -> Option<u8> {
        match self {
            OverlayCorner::TopLeft => Some(0),
            OverlayCorner::TopRight => Some(1),
            OverlayCorner::BottomLeft => Some(2),
            OverlayCorner::BottomRight => Some(3),
            OverlayCorner::Center => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverlayCorner::TopLeft => "Top-left",
            OverlayCorner::TopRight => "Top-right",
            OverlayCorner::BottomLeft => "Bottom-left",
            OverlayCorner::BottomRight => "Bottom-right",
            OverlayCorner::Center => "Center",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

impl From<OverlayCornerConfig> for OverlayCorner {
    fn from(config: OverlayCornerConfig) -> Self {
        match config {
            OverlayCornerConfig::TopLeft => OverlayCorner::TopLeft,
            OverlayCornerConfig::TopRight => OverlayCorner::TopRight,
            OverlayCornerConfig::BottomLeft => OverlayCorner::BottomLeft,
            OverlayCornerConfig::BottomRight => OverlayCorner::BottomRight,
            OverlayCornerConfig::Center => OverlayCorner::Center,
        }
    }
}

/// 计算浮层窗口的位置和锚点
///
/// 返回 `(position, pivot)`，可直接传给 `SetNextWindowPos`。
pub fn placement(corner: OverlayCorner, work_pos: [f32; 2], work_size: [f32; 2], pad: f32) -> ([f32; 2], [f32; 2]) {
    let Some(location) = corner.location() else {
        let center = [
            work_pos[0] + work_size[0] * 0.5,
            work_pos[1] + work_size[1] * 0.5,
        ];
        return (center, [0.5, 0.5]);
    };

    let right = location & 1 != 0;
    let bottom = location & 2 != 0;

    let position = [
        if right { work_pos[0] + work_size[0] - pad } else { work_pos[0] + pad },
        if bottom { work_pos[1] + work_size[1] - pad } else { work_pos[1] + pad },
    ];
    let pivot = [
        if right { 1.0 } else { 0.0 },
        if bottom { 1.0 } else { 0.0 },
    ];

    (position, pivot)
}

fn overlay_flags() -> WindowFlags {
    WindowFlags::NO_DECORATION
        | WindowFlags::NO_DOCKING
        | WindowFlags::ALWAYS_AUTO_RESIZE
        | WindowFlags::NO_SAVED_SETTINGS
        | WindowFlags::NO_FOCUS_ON_APPEARING
        | WindowFlags::NO_NAV
        | WindowFlags::NO_MOVE
}

/// 主视口的工作区（去掉菜单栏等占用的部分）
fn main_work_area() -> ([f32; 2], [f32; 2]) {
    unsafe {
        let viewport = imgui::sys::igGetMainViewport();
        if viewport.is_null() {
            return ([0.0, 0.0], [0.0, 0.0]);
        }
        let viewport = &*viewport;
        (
            [viewport.WorkPos.x, viewport.WorkPos.y],
            [viewport.WorkSize.x, viewport.WorkSize.y],
        )
    }
}

/// 渲染调试浮层
pub fn render(ui: &Ui, state: &mut GuiState) {
    if !state.show_debug_overlay {
        return;
    }

    let (work_pos, work_size) = main_work_area();
    let (position, pivot) = placement(state.overlay_corner, work_pos, work_size, PAD);

    let fps = state.fps;
    let frame_time_ms = state.frame_time_ms;

    ui.window("Debug")
        .opened(&mut state.show_debug_overlay)
        .position(position, Condition::Always)
        .position_pivot(pivot)
        .bg_alpha(BG_ALPHA)
        .flags(overlay_flags())
        .build(|| {
            ui.text(format!("FPS: {:.1}", fps));
            ui.text(format!("Frame Time: {:.3} ms", frame_time_ms));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: [f32; 2] = [0.0, 20.0];
    const SIZE: [f32; 2] = [1280.0, 780.0];

    #[test]
    fn test_location_bits() {
        assert_eq!(OverlayCorner::TopLeft.location(), Some(0));
        assert_eq!(OverlayCorner::TopRight.location(), Some(1));
        assert_eq!(OverlayCorner::BottomLeft.location(), Some(2));
        assert_eq!(OverlayCorner::BottomRight.location(), Some(3));
        assert_eq!(OverlayCorner::Center.location(), None);
    }

    #[test]
    fn test_placement_top_left() {
        let (pos, pivot) = placement(OverlayCorner::TopLeft, POS, SIZE, PAD);
        assert_eq!(pos, [40.0, 60.0]);
        assert_eq!(pivot, [0.0, 0.0]);
    }

    #[test]
    fn test_placement_top_right() {
        let (pos, pivot) = placement(OverlayCorner::TopRight, POS, SIZE, PAD);
        assert_eq!(pos, [1240.0, 60.0]);
        assert_eq!(pivot, [1.0, 0.0]);
    }

    #[test]
    fn test_placement_bottom_left() {
        let (pos, pivot) = placement(OverlayCorner::BottomLeft, POS, SIZE, PAD);
        assert_eq!(pos, [40.0, 760.0]);
        assert_eq!(pivot, [0.0, 1.0]);
    }

    #[test]
    fn test_placement_bottom_right() {
        let (pos, pivot) = placement(OverlayCorner::BottomRight, POS, SIZE, PAD);
        assert_eq!(pos, [1240.0, 760.0]);
        assert_eq!(pivot, [1.0, 1.0]);
    }

    #[test]
    fn test_placement_center_ignores_pad() {
        let (pos, pivot) = placement(OverlayCorner::Center, POS, SIZE, PAD);
        assert_eq!(pos, [640.0, 410.0]);
        assert_eq!(pivot, [0.5, 0.5]);
    }

    #[test]
    fn test_corner_from_config_and_index() {
        assert_eq!(OverlayCorner::from(OverlayCornerConfig::Center), OverlayCorner::Center);
        for (i, corner) in OverlayCorner::ALL.iter().enumerate() {
            assert_eq!(corner.index(), i);
        }
    }
}
