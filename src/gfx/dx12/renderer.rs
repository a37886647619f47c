//! 逐帧渲染：帧资源等待、命令录制、提交与 Present
//!
//! 窗口缩放和关闭前都先让 GPU 空闲。

use std::sync::Arc;

use imgui::DrawData;
use tracing::{debug, error, info, trace};
use windows::core::HSTRING;
use windows::Win32::Foundation::{RECT, WAIT_FAILED};
use windows::Win32::Graphics::Direct3D::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::DXGI_PRESENT;
use windows::Win32::System::Threading::{WaitForMultipleObjects, WaitForSingleObject, INFINITE};
use winit::window::Window;

use crate::core::error::{ApiResultExt, GraphicsError, Result};
use crate::core::math::aspect_ratio;
use crate::core::Config;
use crate::gfx::dx12::buffer::{create_upload_buffer, transition, write_upload_buffer};
use crate::gfx::dx12::context::BACK_BUFFER_FORMAT;
use crate::gfx::dx12::imgui_renderer::ImguiRenderer;
use crate::gfx::dx12::pipeline::TrianglePipeline;
use crate::gfx::Dx12Context;
use crate::renderer::sync::{FrameSlot, FrameSync};
use crate::renderer::vertex::{triangle, Vertex};

fn viewport_for(width: u32, height: u32) -> D3D12_VIEWPORT {
    D3D12_VIEWPORT {
        TopLeftX: 0.0,
        TopLeftY: 0.0,
        Width: width as f32,
        Height: height as f32,
        MinDepth: D3D12_MIN_DEPTH,
        MaxDepth: D3D12_MAX_DEPTH,
    }
}

fn scissor_for(width: u32, height: u32) -> RECT {
    RECT {
        left: 0,
        top: 0,
        right: width as i32,
        bottom: height as i32,
    }
}

/// DirectX 12 渲染器
///
/// 每帧：等待帧资源 → 录制（清屏、三角形、ImGui）→ 提交 → Present → Signal。
pub struct Renderer {
    gfx: Dx12Context,
    command_allocators: Vec<ID3D12CommandAllocator>,
    command_list: ID3D12GraphicsCommandList,
    triangle: TrianglePipeline,
    vertex_buffer: ID3D12Resource,
    vertex_buffer_view: D3D12_VERTEX_BUFFER_VIEW,
    viewport: D3D12_VIEWPORT,
    scissor_rect: RECT,
    frame_sync: FrameSync,
    imgui: ImguiRenderer,
    clear_color: [f32; 4],
    sync_interval: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, config: &Config, imgui: &mut imgui::Context) -> Result<Self> {
        let gfx = Dx12Context::new(window, &config.graphics)?;
        let frames_in_flight = config.graphics.frames_in_flight as usize;

        unsafe {
            // 每个帧槽位一个命令分配器
            debug!(frames_in_flight, "Creating command allocators for frame buffering");
            let command_allocators = (0..frames_in_flight)
                .map(|i| {
                    let allocator: ID3D12CommandAllocator = gfx
                        .device
                        .CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)
                        .api("CreateCommandAllocator")?;
                    let _ = allocator.SetName(&HSTRING::from(format!("Frame Allocator {}", i)));
                    Ok(allocator)
                })
                .collect::<Result<Vec<_>>>()?;

            let triangle_pipeline = TrianglePipeline::new(&gfx.device, BACK_BUFFER_FORMAT)?;

            // 创建后立即关闭，render_frame 开头统一 Reset
            let command_list: ID3D12GraphicsCommandList = gfx
                .device
                .CreateCommandList(
                    0,
                    D3D12_COMMAND_LIST_TYPE_DIRECT,
                    &command_allocators[0],
                    &triangle_pipeline.pipeline_state,
                )
                .api("CreateCommandList")?;
            command_list.Close().api("Close")?;

            // 三角形顶点缓冲
            let vertex_buffer_size = 3 * Vertex::STRIDE;
            let vertex_buffer = create_upload_buffer(&gfx.device, vertex_buffer_size as u64, "Triangle Vertex Buffer")?;
            let vertices = triangle(aspect_ratio(gfx.width, gfx.height));
            write_upload_buffer(&vertex_buffer, bytemuck::cast_slice(&vertices))?;

            let vertex_buffer_view = D3D12_VERTEX_BUFFER_VIEW {
                BufferLocation: vertex_buffer.GetGPUVirtualAddress(),
                StrideInBytes: Vertex::STRIDE,
                SizeInBytes: vertex_buffer_size,
            };
            debug!(size = vertex_buffer_size, "Vertex buffer created");

            let imgui_renderer = ImguiRenderer::new(
                imgui,
                &gfx.device,
                &gfx.srv_heap,
                frames_in_flight,
                BACK_BUFFER_FORMAT,
            )?;

            let viewport = viewport_for(gfx.width, gfx.height);
            let scissor_rect = scissor_for(gfx.width, gfx.height);
            let sync_interval = if config.graphics.vsync { 1 } else { 0 };

            info!(
                frames_in_flight,
                back_buffers = gfx.back_buffer_count,
                vsync = config.graphics.vsync,
                "DX12 Renderer initialized"
            );

            Ok(Self {
                gfx,
                command_allocators,
                command_list,
                triangle: triangle_pipeline,
                vertex_buffer,
                vertex_buffer_view,
                viewport,
                scissor_rect,
                frame_sync: FrameSync::new(frames_in_flight),
                imgui: imgui_renderer,
                clear_color: config.graphics.clear_color,
                sync_interval,
            })
        }
    }

    /// 取得下一帧的槽位，必要时阻塞到它空闲
    ///
    /// 同时等待交换链的帧延迟对象和（若槽位仍在使用）fence 事件。
    pub fn wait_for_next_frame_resources(&mut self) -> Result<FrameSlot> {
        let slot = self.frame_sync.begin_frame();

        let mut handles = vec![self.gfx.swap_chain_waitable];
        if let Some(value) = slot.wait_for {
            trace!(slot = slot.index, fence_value = value.value(), "Waiting for frame slot");
            unsafe {
                self.gfx
                    .fence
                    .SetEventOnCompletion(value.value(), self.gfx.fence_event)
                    .api("SetEventOnCompletion")?;
            }
            handles.push(self.gfx.fence_event);
        }

        let result = unsafe { WaitForMultipleObjects(&handles, true, INFINITE) };
        if result == WAIT_FAILED {
            return Err(GraphicsError::CommandExecution("WaitForMultipleObjects failed".to_string()).into());
        }

        Ok(slot)
    }

    /// 录制并提交一帧
    pub fn render_frame(&mut self, draw_data: Option<&DrawData>) -> Result<()> {
        // 1. 帧资源
        let slot = self.wait_for_next_frame_resources()?;
        let allocator = &self.command_allocators[slot.index];
        let list = &self.command_list;

        unsafe {
            // 2. 重置分配器和命令列表
            allocator.Reset().api("ID3D12CommandAllocator::Reset")?;
            list.Reset(allocator, &self.triangle.pipeline_state)
                .api("ID3D12GraphicsCommandList::Reset")?;

            // 3. 固定状态
            list.SetGraphicsRootSignature(&self.triangle.root_signature);
            list.RSSetViewports(&[self.viewport]);
            list.RSSetScissorRects(&[self.scissor_rect]);

            // 4. PRESENT → RENDER_TARGET
            let back_buffer_index = self.gfx.back_buffer_index();
            let back_buffer = self.gfx.render_target(back_buffer_index)?;
            transition(
                list,
                back_buffer,
                D3D12_RESOURCE_STATE_PRESENT,
                D3D12_RESOURCE_STATE_RENDER_TARGET,
            );

            // 5. 绑定并清屏
            let rtv = self.gfx.rtv_handle(back_buffer_index);
            list.OMSetRenderTargets(1, Some(&rtv), false, None);
            list.ClearRenderTargetView(rtv, &self.clear_color, None);

            // 6. 三角形
            list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            list.IASetVertexBuffers(0, Some(&[self.vertex_buffer_view]));
            list.DrawInstanced(3, 1, 0, 0);

            // 7. ImGui
            if let Some(draw_data) = draw_data {
                list.SetDescriptorHeaps(&[Some(self.gfx.srv_heap.heap().clone())]);
                self.imgui.render(&self.gfx.device, draw_data, slot.index, list)?;
            }

            // 8. RENDER_TARGET → PRESENT
            transition(
                list,
                back_buffer,
                D3D12_RESOURCE_STATE_RENDER_TARGET,
                D3D12_RESOURCE_STATE_PRESENT,
            );
            list.Close().api("ID3D12GraphicsCommandList::Close")?;

            // 9. 提交
            self.gfx
                .command_queue
                .ExecuteCommandLists(&[Some(list.clone().into())]);

            // 10. Present
            self.gfx
                .swap_chain
                .Present(self.sync_interval, DXGI_PRESENT(0))
                .ok()
                .api("Present")?;

            // 11. Signal
            let fence_value = self.frame_sync.end_frame(slot.index);
            self.gfx
                .command_queue
                .Signal(&self.gfx.fence, fence_value.value())
                .api("Signal")?;

            trace!(slot = slot.index, back_buffer_index, fence_value = fence_value.value(), "Frame submitted");
        }

        Ok(())
    }

    /// 等待最后提交的一帧完成，之后 GPU 空闲
    pub fn wait_for_last_submitted_frame(&mut self) -> Result<()> {
        let value = self.frame_sync.flush_value();

        unsafe {
            self.gfx
                .command_queue
                .Signal(&self.gfx.fence, value.value())
                .api("Signal")?;

            if self.gfx.fence.GetCompletedValue() < value.value() {
                self.gfx
                    .fence
                    .SetEventOnCompletion(value.value(), self.gfx.fence_event)
                    .api("SetEventOnCompletion")?;
                if WaitForSingleObject(self.gfx.fence_event, INFINITE) == WAIT_FAILED {
                    return Err(GraphicsError::CommandExecution(
                        "WaitForSingleObject failed while flushing the GPU".to_string(),
                    )
                    .into());
                }
            }

            debug_assert_eq!(self.frame_sync.pending_slots(self.gfx.fence.GetCompletedValue()), 0);
        }

        self.frame_sync.complete_all();
        debug!(fence_value = value.value(), "GPU idle");
        Ok(())
    }

    /// 窗口大小变化
    ///
    /// 宽或高为 0（最小化）时忽略。
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            debug!(width, height, "Ignoring resize to empty client area");
            return Ok(());
        }
        if width == self.gfx.width && height == self.gfx.height {
            return Ok(());
        }

        self.wait_for_last_submitted_frame()?;

        self.gfx.release_render_targets();
        self.gfx.resize_buffers(width, height)?;
        self.gfx.create_render_targets()?;

        self.viewport = viewport_for(width, height);
        self.scissor_rect = scissor_for(width, height);

        // GPU 已空闲，可以直接改写顶点
        let vertices = triangle(aspect_ratio(width, height));
        write_upload_buffer(&self.vertex_buffer, bytemuck::cast_slice(&vertices))?;

        debug!(width, height, "Resize completed");
        Ok(())
    }

    /// 已开始的帧数
    pub fn frame_count(&self) -> u64 {
        self.frame_sync.frame_counter()
    }

    pub fn adapter_name(&self) -> &str {
        &self.gfx.adapter_name
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(e) = self.wait_for_last_submitted_frame() {
            error!(error = %e, "Failed to wait for GPU during renderer shutdown");
        }
        debug!("DX12 Renderer dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_covers_window() {
        let viewport = viewport_for(1280, 720);
        assert_eq!((viewport.Width, viewport.Height), (1280.0, 720.0));
        assert_eq!((viewport.MinDepth, viewport.MaxDepth), (0.0, 1.0));

        let scissor = scissor_for(1280, 720);
        assert_eq!((scissor.left, scissor.top, scissor.right, scissor.bottom), (0, 0, 1280, 720));
    }
}
