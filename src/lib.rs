//! BlueD Render - Direct3D 12 入门渲染器
//!
//! 在 Win32 窗口里用 Direct3D 12 绘制一个三角形，并叠加 Dear ImGui 调试界面。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（配置、日志、错误处理、数学）
//! - `renderer`: 与图形 API 无关的渲染组件（帧同步、资源尺寸、描述符、顶点）
//! - `gui`: ImGui 界面（停靠空间、调试浮层、工作区窗口）
//! - `gfx`: Direct3D 12 实现（仅 Windows）
//! - `app`: 窗口与事件循环（仅 Windows）
//!
//! # 帧同步
//!
//! ```
//! use blued_render::renderer::sync::FrameSync;
//!
//! let mut sync = FrameSync::new(3);
//! let slot = sync.begin_frame();
//! assert!(slot.wait_for.is_none());
//! let signaled = sync.end_frame(slot.index);
//! assert_eq!(signaled.value(), 1);
//! ```

pub mod core;
pub mod gfx;
pub mod gui;
pub mod renderer;

#[cfg(target_os = "windows")]
pub mod app;
