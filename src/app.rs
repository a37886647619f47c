//! 应用程序：窗口、事件循环、GUI 和渲染器的组装

use std::sync::Arc;

use tracing::{debug, error, info};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::core::error::{BlueRenderError, Result};
use crate::core::Config;
use crate::gui::GuiManager;
use crate::renderer::Renderer;

pub struct App {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    renderer: Renderer,
    gui: GuiManager,
}

impl App {
    /// 创建窗口、GUI 和渲染器
    pub fn new(config: &Config) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let window = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .with_resizable(config.window.resizable)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        info!(width = size.width, height = size.height, "Window created");

        let mut gui = GuiManager::new(&window, &config.gui);
        let renderer = Renderer::new(window.clone(), config, gui.context_mut())?;
        gui.state_mut().adapter_name = renderer.adapter_name().to_string();

        Ok(Self {
            event_loop,
            window,
            renderer,
            gui,
        })
    }

    /// 运行主循环，直到窗口关闭或出现致命错误
    pub fn run(self) -> Result<()> {
        let Self {
            event_loop,
            window,
            mut renderer,
            mut gui,
        } = self;

        let mut fatal: Option<BlueRenderError> = None;
        let mut minimized = false;

        event_loop.run(|event, elwt| {
            gui.handle_event(&window, &event);

            match event {
                Event::NewEvents(_) => gui.update_delta_time(),
                Event::AboutToWait => window.request_redraw(),
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        info!("Close requested, shutting down...");
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        debug!(width = new_size.width, height = new_size.height, "Window resized");
                        minimized = new_size.width == 0 || new_size.height == 0;
                        if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                            error!("Resize failed: {}", e);
                            keep_first(&mut fatal, e);
                            elwt.exit();
                        }
                    }
                    WindowEvent::RedrawRequested if !minimized => {
                        let draw_data = if gui.enabled() {
                            match gui.frame(&window) {
                                Ok(draw_data) => Some(draw_data),
                                Err(e) => {
                                    error!("GUI frame failed: {}", e);
                                    keep_first(&mut fatal, e);
                                    elwt.exit();
                                    return;
                                }
                            }
                        } else {
                            None
                        };

                        if let Err(e) = renderer.render_frame(draw_data) {
                            error!("Draw failed: {}", e);
                            keep_first(&mut fatal, e);
                            elwt.exit();
                        }
                    }
                    _ => (),
                },
                Event::LoopExiting => {
                    info!(frames = renderer.frame_count(), "Event loop exiting");
                }
                _ => (),
            }
        })?;

        match fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// 只保留第一个致命错误，之后的通常是它的连锁反应
fn keep_first(fatal: &mut Option<BlueRenderError>, e: BlueRenderError) {
    match fatal {
        Some(first) => debug!(first = %first, later = %e, "Dropping error after fatal failure"),
        None => *fatal = Some(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fatal_error_wins() {
        let mut fatal = None;
        keep_first(&mut fatal, BlueRenderError::Runtime("resize".to_string()));
        keep_first(&mut fatal, BlueRenderError::Runtime("draw".to_string()));

        match fatal {
            Some(BlueRenderError::Runtime(msg)) => assert_eq!(msg, "resize"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
