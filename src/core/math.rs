//! 数学工具
//!
//! 基于 `nalgebra`，只包含渲染器实际用到的几个变换。

pub use nalgebra::{Matrix4, Vector4};

/// 宽高比，高度为 0 时返回 1.0（窗口最小化）
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// 把 ImGui 显示区域映射到 D3D 裁剪空间的正交投影
///
/// `display_pos` 是左上角，y 轴向下；结果矩阵按列主序存储，
/// 可以直接作为 16 个根常量传给 HLSL 的 `mul(ProjectionMatrix, pos)`。
pub fn ortho_projection(display_pos: [f32; 2], display_size: [f32; 2]) -> Matrix4<f32> {
    let l = display_pos[0];
    let r = display_pos[0] + display_size[0];
    let t = display_pos[1];
    let b = display_pos[1] + display_size[1];

    Matrix4::new(
        2.0 / (r - l), 0.0,           0.0, (r + l) / (l - r),
        0.0,           2.0 / (t - b), 0.0, (t + b) / (b - t),
        0.0,           0.0,           0.5, 0.5,
        0.0,           0.0,           0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: &Matrix4<f32>, x: f32, y: f32) -> [f32; 2] {
        let v = m * Vector4::new(x, y, 0.0, 1.0);
        [v.x / v.w, v.y / v.w]
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn ortho_maps_display_corners_to_ndc() {
        let m = ortho_projection([0.0, 0.0], [1280.0, 800.0]);
        assert!(close(project(&m, 0.0, 0.0), [-1.0, 1.0]));
        assert!(close(project(&m, 1280.0, 800.0), [1.0, -1.0]));
        assert!(close(project(&m, 640.0, 400.0), [0.0, 0.0]));
    }

    #[test]
    fn ortho_respects_display_offset() {
        let m = ortho_projection([100.0, 50.0], [200.0, 100.0]);
        assert!(close(project(&m, 100.0, 50.0), [-1.0, 1.0]));
        assert!(close(project(&m, 300.0, 150.0), [1.0, -1.0]));
    }

    #[test]
    fn ortho_is_column_major() {
        let m = ortho_projection([0.0, 0.0], [2.0, 2.0]);
        // 第 4 列是平移
        let s = m.as_slice();
        assert_eq!(s[12], -1.0);
        assert_eq!(s[13], 1.0);
        assert_eq!(s[15], 1.0);
    }

    #[test]
    fn aspect_ratio_handles_minimized() {
        assert_eq!(aspect_ratio(1280, 800), 1.6);
        assert_eq!(aspect_ratio(1280, 0), 1.0);
    }
}
