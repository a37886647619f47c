//! 核心功能模块
//!
//! 本模块提供了渲染器的基础功能：配置管理、日志系统、错误处理和少量数学工具。
//! 这些模块独立于具体的图形 API，在所有平台上都可以编译和测试。
//!
//! # 模块组织
//!
//! - `config`：配置管理，支持从 TOML 文件加载并用命令行参数覆盖
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `error`：错误处理，定义统一的错误类型
//! - `math`：投影矩阵等数学工具

pub mod config;
pub mod error;
pub mod log;
pub mod math;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use error::{BlueRenderError, Result};
