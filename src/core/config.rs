//! 配置管理模块
//!
//! 提供渲染器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 800
//! title = "BlueD Render"
//! resizable = true
//!
//! [graphics]
//! adapter = "hardware"   # 或 "warp"
//! frames_in_flight = 3
//! back_buffers = 3
//! vsync = true
//! clear_color = [0.0, 0.2, 0.4, 1.0]
//!
//! [gui]
//! enabled = true
//! overlay_corner = "top-left"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{BlueRenderError, ConfigError, Result};

/// 交换链缓冲和帧资源槽位的上限（DXGI 最多 16 个后备缓冲）
pub const MAX_BUFFERED_FRAMES: u32 = 16;

/// 渲染器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// GUI 配置
    #[serde(default)]
    pub gui: GuiConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,

    /// 是否可调整大小
    #[serde(default = "default_resizable")]
    pub resizable: bool,
}

/// 图形配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 适配器选择策略
    #[serde(default)]
    pub adapter: AdapterPreference,

    /// 同时在 GPU 上排队的帧数（每帧一个命令分配器）
    #[serde(default = "default_frames_in_flight")]
    pub frames_in_flight: u32,

    /// 交换链后备缓冲数量
    #[serde(default = "default_back_buffers")]
    pub back_buffers: u32,

    /// 垂直同步
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// 渲染目标清屏颜色（RGBA）
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],

    /// 启用 D3D12 调试层
    #[serde(default = "default_debug_layer")]
    pub debug_layer: bool,
}

/// 适配器选择策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterPreference {
    /// 第一个支持 D3D12 的硬件适配器
    #[default]
    Hardware,
    /// WARP 软件光栅化器
    Warp,
}

/// GUI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiConfig {
    /// 是否绘制 ImGui
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 启用停靠
    #[serde(default = "default_true")]
    pub docking: bool,

    /// 显示 ImGui 演示窗口
    #[serde(default = "default_true")]
    pub show_demo_window: bool,

    /// 显示调试浮层（FPS / 帧时间）
    #[serde(default = "default_true")]
    pub show_debug_overlay: bool,

    /// 调试浮层所在的角落
    #[serde(default)]
    pub overlay_corner: OverlayCornerConfig,

    /// 窗口圆角半径
    #[serde(default = "default_window_rounding")]
    pub window_rounding: f32,
}

/// 调试浮层位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayCornerConfig {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 800 }
fn default_title() -> String { "BlueD Render".to_string() }
fn default_resizable() -> bool { true }
fn default_frames_in_flight() -> u32 { 3 }
fn default_back_buffers() -> u32 { 3 }
fn default_vsync() -> bool { true }
fn default_clear_color() -> [f32; 4] { [0.0, 0.2, 0.4, 1.0] }
fn default_debug_layer() -> bool { cfg!(debug_assertions) }
fn default_true() -> bool { true }
fn default_window_rounding() -> f32 { 5.0 }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "blued_render.log".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            resizable: default_resizable(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterPreference::default(),
            frames_in_flight: default_frames_in_flight(),
            back_buffers: default_back_buffers(),
            vsync: default_vsync(),
            clear_color: default_clear_color(),
            debug_layer: default_debug_layer(),
        }
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            docking: true,
            show_demo_window: true,
            show_debug_overlay: true,
            overlay_corner: OverlayCornerConfig::default(),
            window_rounding: default_window_rounding(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    ///
    /// 成功返回 `Config` 实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在或无法解析则使用默认配置
    ///
    /// 日志系统此时还没初始化，解析失败直接打印到 stderr。
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => config,
            Err(BlueRenderError::Config(ConfigError::ParseError(msg))) => {
                eprintln!("Ignoring malformed config {}: {}", path.display(), msg);
                Self::default()
            }
            Err(_) => Self::default(),
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--width <value>` / `--height <value>`: 窗口尺寸
    /// - `--frames <value>`: 在途帧数
    /// - `--warp`: 使用 WARP 软件适配器
    /// - `--no-vsync`: 关闭垂直同步
    /// - `--no-gui`: 不绘制 ImGui
    /// - `--debug-layer`: 强制启用 D3D12 调试层
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let flag = |name: &str| args.iter().any(|a| a == name);
        let value = |name: &str| -> Option<u32> {
            let idx = args.iter().position(|a| a == name)?;
            args.get(idx + 1)?.parse().ok()
        };

        if flag("--warp") {
            self.graphics.adapter = AdapterPreference::Warp;
        }
        if flag("--no-vsync") {
            self.graphics.vsync = false;
        }
        if flag("--no-gui") {
            self.gui.enabled = false;
        }
        if flag("--debug-layer") {
            self.graphics.debug_layer = true;
        }

        if let Some(width) = value("--width") {
            self.window.width = width;
        }
        if let Some(height) = value("--height") {
            self.window.height = height;
        }
        if let Some(frames) = value("--frames") {
            self.graphics.frames_in_flight = frames;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        // 验证窗口尺寸
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: "Window dimensions must be greater than 0".to_string(),
            }.into());
        }

        if !(1..=MAX_BUFFERED_FRAMES).contains(&self.graphics.frames_in_flight) {
            return Err(ConfigError::InvalidValue {
                field: "graphics.frames_in_flight".to_string(),
                reason: format!("Frames in flight must be between 1 and {}", MAX_BUFFERED_FRAMES),
            }.into());
        }

        // 翻转模型交换链至少需要两个缓冲
        if !(2..=MAX_BUFFERED_FRAMES).contains(&self.graphics.back_buffers) {
            return Err(ConfigError::InvalidValue {
                field: "graphics.back_buffers".to_string(),
                reason: format!("Back buffer count must be between 2 and {}", MAX_BUFFERED_FRAMES),
            }.into());
        }

        if self.graphics.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::InvalidValue {
                field: "graphics.clear_color".to_string(),
                reason: "Color components must be within [0, 1]".to_string(),
            }.into());
        }

        if self.gui.window_rounding.is_nan() || self.gui.window_rounding < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "gui.window_rounding".to_string(),
                reason: "Window rounding must not be negative".to_string(),
            }.into());
        }

        Ok(())
    }
}

impl AdapterPreference {
    /// 获取名称
    pub fn name(&self) -> &'static str {
        match self {
            AdapterPreference::Hardware => "hardware",
            AdapterPreference::Warp => "WARP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.title, "BlueD Render");
        assert_eq!(config.graphics.frames_in_flight, 3);
        assert_eq!(config.graphics.back_buffers, 3);
        assert_eq!(config.graphics.clear_color, [0.0, 0.2, 0.4, 1.0]);
        assert_eq!(config.graphics.adapter, AdapterPreference::Hardware);
        assert!(config.gui.enabled);
        assert_eq!(config.gui.window_rounding, 5.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_buffer_count_bounds() {
        let mut config = Config::default();
        config.graphics.back_buffers = 1;
        assert!(config.validate().is_err());

        config.graphics.back_buffers = 2;
        config.graphics.frames_in_flight = 0;
        assert!(config.validate().is_err());

        config.graphics.frames_in_flight = 17;
        assert!(config.validate().is_err());

        config.graphics.frames_in_flight = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clear_color_range() {
        let mut config = Config::default();
        config.graphics.clear_color = [0.0, 1.5, 0.0, 1.0];
        assert!(config.validate().is_err());

        config.graphics.clear_color = [f32::NAN, 0.0, 0.0, 1.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "blued_render", "--width", "640", "--height", "480",
            "--frames", "2", "--warp", "--no-vsync", "--no-gui",
        ]);

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.graphics.frames_in_flight, 2);
        assert_eq!(config.graphics.adapter, AdapterPreference::Warp);
        assert!(!config.graphics.vsync);
        assert!(!config.gui.enabled);
    }

    #[test]
    fn test_apply_args_ignores_bad_numbers() {
        let mut config = Config::default();
        config.apply_args(["blued_render", "--width", "wide", "--height"]);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 800);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [window]
            width = 1920

            [gui]
            overlay_corner = "bottom-right"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.gui.overlay_corner, OverlayCornerConfig::BottomRight);
        assert_eq!(config.graphics.back_buffers, 3);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("blued_render_config_{}.toml", std::process::id()));

        let mut config = Config::default();
        config.window.title = "Round Trip".to_string();
        config.graphics.adapter = AdapterPreference::Warp;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.window.title, "Round Trip");
        assert_eq!(loaded.graphics.adapter, AdapterPreference::Warp);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::from_file_or_default("definitely/not/here.toml");
        assert_eq!(config.window.width, 1280);
        assert!(Config::from_file("definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let path = std::env::temp_dir().join(format!("blued_render_bad_{}.toml", std::process::id()));
        std::fs::write(&path, "[window\nwidth = ").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(BlueRenderError::Config(ConfigError::ParseError(_)))
        ));
        let config = Config::from_file_or_default(&path);
        assert_eq!(config.window.width, 1280);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_window_rounding_rejects_nan() {
        let mut config = Config::default();
        config.gui.window_rounding = -1.0;
        assert!(config.validate().is_err());

        config.gui.window_rounding = f32::NAN;
        assert!(config.validate().is_err());

        config.gui.window_rounding = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped: Config = toml::from_str(include_str!("../../config.toml")).unwrap();
        let defaults = Config::default();

        assert_eq!(shipped.logging.log_file, defaults.logging.log_file);
        assert_eq!(shipped.window.width, defaults.window.width);
        assert_eq!(shipped.graphics.back_buffers, defaults.graphics.back_buffers);
        assert!(shipped.validate().is_ok());
    }
}
