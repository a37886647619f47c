//! BlueD Render - Direct3D 12 三角形 + Dear ImGui 调试界面
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件
//! cargo run
//!
//! # 使用 WARP 软件适配器，关闭垂直同步
//! cargo run -- --warp --no-vsync
//! ```
//!
//! # 命令行参数
//!
//! - `--width <value>` / `--height <value>`：窗口大小
//! - `--frames <value>`：在途帧数
//! - `--warp`：使用 WARP 适配器
//! - `--no-vsync`：关闭垂直同步
//! - `--no-gui`：不绘制 ImGui
//! - `--debug-layer`：启用 D3D12 调试层

use blued_render::core::{log, Config};
use tracing::info;

fn main() {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("config.toml");

    // 2. 应用命令行参数
    config.apply_args(std::env::args());

    // 3. 验证配置
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // 4. 初始化日志系统
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!("BlueD Render starting...");
    info!(version = env!("CARGO_PKG_VERSION"), "Application initialized");

    // 5. 输出配置信息
    info!(
        width = config.window.width,
        height = config.window.height,
        adapter = config.graphics.adapter.name(),
        frames_in_flight = config.graphics.frames_in_flight,
        back_buffers = config.graphics.back_buffers,
        vsync = config.graphics.vsync,
        debug_layer = config.graphics.debug_layer,
        "Graphics configuration"
    );
    info!(
        enabled = config.gui.enabled,
        docking = config.gui.docking,
        demo_window = config.gui.show_demo_window,
        "GUI configuration"
    );

    // 6. 运行
    run(&config);
}

#[cfg(target_os = "windows")]
fn run(config: &Config) {
    use blued_render::app::App;
    use tracing::error;

    let result = App::new(config).and_then(App::run);
    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }

    info!("BlueD Render exited cleanly");
}

#[cfg(not(target_os = "windows"))]
fn run(_config: &Config) {
    tracing::error!("Direct3D 12 is only available on Windows");
    eprintln!("BlueD Render requires Windows (Direct3D 12)");
    std::process::exit(1);
}
