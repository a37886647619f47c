//! GUI 面板模块
//!
//! 包含各种 GUI 面板的实现。

pub mod overlay;
pub mod workspace;
