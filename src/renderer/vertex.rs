//! 顶点数据定义
//!
//! 三角形管线使用的顶点结构体和输入布局描述。
//!
//! - 使用 `#[repr(C)]` 确保内存布局与 HLSL 输入布局一致
//! - 实现 `Pod` 和 `Zeroable` trait 以便直接拷贝进上传缓冲

use bytemuck::{Pod, Zeroable};
use std::ffi::CStr;
use std::mem::{offset_of, size_of};

/// 顶点属性描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// HLSL 语义名
    pub semantic: &'static CStr,
    /// 在顶点中的字节偏移
    pub offset: u32,
    /// f32 分量个数
    pub components: u32,
}

/// 顶点结构体
///
/// # 内存布局
///
/// - `position`：前 12 字节（3 个 f32）
/// - `color`：后 16 字节（4 个 f32）
///
/// 总大小：28 字节
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 裁剪空间位置
    pub position: [f32; 3],
    /// RGBA 颜色，范围 0.0-1.0
    pub color: [f32; 4],
}

impl Vertex {
    /// 与 `triangle.hlsl` 的 `VSMain` 输入一一对应
    pub const ATTRIBUTES: [VertexAttribute; 2] = [
        VertexAttribute {
            semantic: c"POSITION",
            offset: offset_of!(Vertex, position) as u32,
            components: 3,
        },
        VertexAttribute {
            semantic: c"COLOR",
            offset: offset_of!(Vertex, color) as u32,
            components: 4,
        },
    ];

    /// 顶点步长
    pub const STRIDE: u32 = size_of::<Vertex>() as u32;

    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// 根据窗口宽高比生成三角形
///
/// y 方向乘以宽高比，顶点按顺时针排列（D3D 默认正面）。
pub fn triangle(aspect_ratio: f32) -> [Vertex; 3] {
    [
        Vertex::new([0.0, 0.25 * aspect_ratio, 0.0], [1.0, 0.0, 0.0, 1.0]),
        Vertex::new([0.25, -0.25 * aspect_ratio, 0.0], [0.0, 1.0, 0.0, 1.0]),
        Vertex::new([-0.25, -0.25 * aspect_ratio, 0.0], [0.0, 0.0, 1.0, 1.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 28);
        assert_eq!(Vertex::ATTRIBUTES[0].semantic, c"POSITION");
        assert_eq!(Vertex::ATTRIBUTES[0].offset, 0);
        assert_eq!(Vertex::ATTRIBUTES[1].offset, 12);

        let total: u32 = Vertex::ATTRIBUTES.iter().map(|a| a.components * 4).sum();
        assert_eq!(total, Vertex::STRIDE);
    }

    #[test]
    fn test_triangle_colors() {
        let tri = triangle(1.6);
        assert_eq!(tri[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(tri[1].color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(tri[2].color, [0.0, 0.0, 1.0, 1.0]);
        assert!((tri[0].position[1] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_is_clockwise() {
        let [a, b, c] = triangle(1.0);
        // 二维叉积为负即顺时针
        let cross = (b.position[0] - a.position[0]) * (c.position[1] - a.position[1])
            - (b.position[1] - a.position[1]) * (c.position[0] - a.position[0]);
        assert!(cross < 0.0);
    }

    #[test]
    fn test_vertices_cast_to_bytes() {
        let tri = triangle(1.0);
        let bytes: &[u8] = bytemuck::cast_slice(&tri);
        assert_eq!(bytes.len(), 3 * 28);
    }
}
