//! 图形后端模块
//!
//! 封装 Direct3D 12 的底层实现：设备与交换链、管线、缓冲、
//! ImGui 绘制后端以及逐帧渲染器。只在 Windows 上编译。

#[cfg(target_os = "windows")]
pub mod dx12;

#[cfg(target_os = "windows")]
pub use dx12::Dx12Context;
