//! 渲染器模块
//!
//! 与图形 API 无关的渲染器组件：帧同步记账、资源尺寸、描述符运算和顶点数据。
//! Direct3D 12 的具体实现在 `gfx::dx12` 中，只在 Windows 上编译。

pub mod descriptor;
pub mod resource;
pub mod sync;
pub mod vertex;

#[cfg(target_os = "windows")]
pub use crate::gfx::dx12::Renderer;
