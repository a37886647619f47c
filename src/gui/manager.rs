//! GUI 管理器
//!
//! GuiManager 持有 ImGui 上下文和 winit 平台层，处理输入事件，
//! 每帧构建 UI 并产出交给 DX12 后端的 `DrawData`。

use std::path::PathBuf;
use std::time::Instant;

use imgui::{ConfigFlags, DrawData, StyleColor};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use tracing::debug;
use winit::event::Event;
use winit::window::Window;

use crate::core::config::GuiConfig;
use crate::core::error::{BlueRenderError, Result};
use crate::gui::metrics::PerformanceMetrics;
use crate::gui::panels;
use crate::gui::state::GuiState;

/// GUI 管理器（ImGui + winit）
pub struct GuiManager {
    context: imgui::Context,
    platform: WinitPlatform,

    // GUI 状态和统计
    state: GuiState,
    metrics: PerformanceMetrics,

    enabled: bool,
    docking: bool,
    last_frame: Instant,
}

impl GuiManager {
    /// 创建 GUI 管理器
    pub fn new(window: &Window, config: &GuiConfig) -> Self {
        let mut context = imgui::Context::create();
        context.set_ini_filename(None::<PathBuf>);

        let io = context.io_mut();
        io.config_flags |= ConfigFlags::NAV_ENABLE_KEYBOARD;
        if config.docking {
            io.config_flags |= ConfigFlags::DOCKING_ENABLE;
        }

        // 深色主题，窗口背景不透明
        let style = context.style_mut();
        style.use_dark_colors();
        style.window_rounding = config.window_rounding;
        style.colors[StyleColor::WindowBg as usize][3] = 1.0;

        let mut platform = WinitPlatform::init(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Default);

        debug!(docking = config.docking, "ImGui context created");

        Self {
            context,
            platform,
            state: GuiState::new(config),
            metrics: PerformanceMetrics::new(),
            enabled: config.enabled,
            docking: config.docking,
            last_frame: Instant::now(),
        }
    }

    /// 把 winit 事件转发给 ImGui
    pub fn handle_event<T>(&mut self, window: &Window, event: &Event<T>) {
        self.platform.handle_event(self.context.io_mut(), window, event);
    }

    /// 更新 ImGui 的帧间隔
    pub fn update_delta_time(&mut self) {
        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;
    }

    /// 构建本帧 UI 并返回绘制数据
    pub fn frame(&mut self, window: &Window) -> Result<&DrawData> {
        if self.metrics.record_frame() {
            self.state
                .update_performance(self.metrics.fps(), self.metrics.frame_time_ms());
        }

        self.platform
            .prepare_frame(self.context.io_mut(), window)
            .map_err(|e| BlueRenderError::Gui(format!("Failed to prepare ImGui frame: {}", e)))?;

        let ui = self.context.new_frame();

        if self.docking {
            dockspace_over_main_viewport();
        }

        if self.state.show_demo_window {
            ui.show_demo_window(&mut self.state.show_demo_window);
        }

        panels::overlay::render(ui, &mut self.state);
        panels::workspace::render(ui, &mut self.state);

        self.platform.prepare_render(ui, window);
        Ok(self.context.render())
    }

    /// 渲染器初始化时需要上下文（字体上传、后端标志）
    pub fn context_mut(&mut self) -> &mut imgui::Context {
        &mut self.context
    }

    pub fn state_mut(&mut self) -> &mut GuiState {
        &mut self.state
    }

    /// 是否绘制 ImGui
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// 覆盖整个主视口的停靠空间，中央节点透明，场景保持可见
fn dockspace_over_main_viewport() {
    unsafe {
        imgui::sys::igDockSpaceOverViewport(
            imgui::sys::igGetMainViewport(),
            imgui::sys::ImGuiDockNodeFlags_PassthruCentralNode as imgui::sys::ImGuiDockNodeFlags,
            std::ptr::null(),
        );
    }
}
