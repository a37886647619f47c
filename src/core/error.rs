//! 错误处理模块
//!
//! 定义了渲染器中使用的统一错误类型。
//!
//! 原生图形 API 的任何一次失败调用都是致命的：错误中携带失败调用的名称，
//! 沿 `?` 一路传播到 `main`，由 `main` 记录日志后以非零状态退出。

use std::fmt;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, BlueRenderError>;

/// BlueD Render 的错误类型
#[derive(Debug)]
pub enum BlueRenderError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// IO 错误
    Io(std::io::Error),

    /// 窗口 / 事件循环错误
    Window(String),

    /// GUI 错误
    Gui(String),

    /// 初始化错误
    Initialization(String),

    /// 运行时错误
    Runtime(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 没有满足要求的适配器
    AdapterNotFound(String),

    /// 设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),

    /// 着色器编译失败
    ShaderCompilation { entry: String, message: String },

    /// 资源创建失败
    ResourceCreation(String),

    /// 渲染命令执行失败
    CommandExecution(String),

    /// 原生 API 调用失败
    Api {
        /// 失败的调用名，例如 `CreateCommandQueue`
        call: &'static str,
        /// HRESULT
        code: i32,
        message: String,
    },
}

impl GraphicsError {
    /// 失败的原生调用名（仅 `Api` 变体）
    pub fn failed_call(&self) -> Option<&'static str> {
        match self {
            GraphicsError::Api { call, .. } => Some(call),
            _ => None,
        }
    }
}

impl fmt::Display for BlueRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlueRenderError::Config(e) => write!(f, "Configuration error: {}", e),
            BlueRenderError::Graphics(e) => write!(f, "Graphics error: {}", e),
            BlueRenderError::Io(e) => write!(f, "IO error: {}", e),
            BlueRenderError::Window(msg) => write!(f, "Window error: {}", msg),
            BlueRenderError::Gui(msg) => write!(f, "GUI error: {}", msg),
            BlueRenderError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
            BlueRenderError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::AdapterNotFound(msg) => write!(f, "No suitable adapter: {}", msg),
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
            GraphicsError::ShaderCompilation { entry, message } => {
                write!(f, "Shader compilation failed ({}): {}", entry, message)
            }
            GraphicsError::ResourceCreation(msg) => write!(f, "Resource creation failed: {}", msg),
            GraphicsError::CommandExecution(msg) => write!(f, "Command execution failed: {}", msg),
            GraphicsError::Api { call, code, message } => {
                write!(f, "{} failed (HRESULT 0x{:08X}): {}", call, *code as u32, message)
            }
        }
    }
}

impl std::error::Error for BlueRenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlueRenderError::Config(e) => Some(e),
            BlueRenderError::Graphics(e) => Some(e),
            BlueRenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for BlueRenderError {
    fn from(err: std::io::Error) -> Self {
        BlueRenderError::Io(err)
    }
}

impl From<ConfigError> for BlueRenderError {
    fn from(err: ConfigError) -> Self {
        BlueRenderError::Config(err)
    }
}

impl From<GraphicsError> for BlueRenderError {
    fn from(err: GraphicsError) -> Self {
        BlueRenderError::Graphics(err)
    }
}

impl From<winit::error::EventLoopError> for BlueRenderError {
    fn from(err: winit::error::EventLoopError) -> Self {
        BlueRenderError::Window(err.to_string())
    }
}

impl From<winit::error::OsError> for BlueRenderError {
    fn from(err: winit::error::OsError) -> Self {
        BlueRenderError::Window(err.to_string())
    }
}

/// 为 `windows::core::Result` 附加失败调用名
///
/// ```ignore
/// let queue: ID3D12CommandQueue = unsafe { device.CreateCommandQueue(&desc) }
///     .api("CreateCommandQueue")?;
/// ```
#[cfg(target_os = "windows")]
pub trait ApiResultExt<T> {
    fn api(self, call: &'static str) -> Result<T>;
}

#[cfg(target_os = "windows")]
impl<T> ApiResultExt<T> for windows::core::Result<T> {
    fn api(self, call: &'static str) -> Result<T> {
        self.map_err(|e| {
            GraphicsError::Api {
                call,
                code: e.code().0,
                message: e.message().to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_names_failing_call() {
        let err: BlueRenderError = GraphicsError::Api {
            call: "CreateSwapChainForHwnd",
            code: 0x887A0001u32 as i32,
            message: "The application made a call that is invalid.".to_string(),
        }
        .into();

        let text = err.to_string();
        assert!(text.contains("CreateSwapChainForHwnd"));
        assert!(text.contains("0x887A0001"));

        match err {
            BlueRenderError::Graphics(g) => assert_eq!(g.failed_call(), Some("CreateSwapChainForHwnd")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn config_error_converts_and_chains() {
        let err: BlueRenderError = ConfigError::InvalidValue {
            field: "graphics.back_buffers".to_string(),
            reason: "must be between 2 and 16".to_string(),
        }
        .into();

        assert!(err.to_string().contains("graphics.back_buffers"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn shader_error_reports_entry_point() {
        let err = GraphicsError::ShaderCompilation {
            entry: "VSMain".to_string(),
            message: "error X3000: syntax error".to_string(),
        };
        assert_eq!(err.failed_call(), None);
        assert!(err.to_string().contains("VSMain"));
    }
}
