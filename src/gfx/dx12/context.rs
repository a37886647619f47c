//! DirectX 12 设备与交换链
//!
//! `Dx12Context` 持有在整个程序生命周期内不变的核心对象。
//!
//! # 初始化流程
//!
//! 1. 启用调试层（配置开启时）
//! 2. 创建 DXGI 工厂
//! 3. 选择适配器
//! 4. 创建 D3D12 设备
//! 5. 创建命令队列
//! 6. 创建交换链（带帧延迟等待对象）
//! 7. 创建 RTV 堆和渲染目标视图
//! 8. 创建着色器可见的 SRV 堆
//! 9. 创建同步对象（Fence）
//!
//! 每一步失败都是致命的，错误中带有失败调用的名称。

use std::sync::Arc;

use tracing::{debug, info, warn};
use windows::core::{Interface, HSTRING};
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::System::Threading::CreateEventA;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::window::Window;

use crate::core::config::{AdapterPreference, GraphicsConfig};
use crate::core::error::{ApiResultExt, BlueRenderError, GraphicsError, Result};
use crate::gfx::dx12::descriptor::Dx12DescriptorHeap;
use crate::renderer::descriptor::DescriptorHeapDescriptor;

/// 后备缓冲格式
pub const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

/// 需要的最低特性级别
pub const MIN_FEATURE_LEVEL: D3D_FEATURE_LEVEL = D3D_FEATURE_LEVEL_11_0;

/// SRV 堆中 ImGui 字体图集所在的槽位
pub const FONT_SRV_INDEX: u32 = 0;

const MICROSOFT_VENDOR_ID: u32 = 0x1414;
const BASIC_RENDER_DRIVER_DEVICE_ID: u32 = 0x8c;

/// 是否是 Microsoft Basic Render Driver
pub fn is_basic_render_driver(vendor_id: u32, device_id: u32) -> bool {
    vendor_id == MICROSOFT_VENDOR_ID && device_id == BASIC_RENDER_DRIVER_DEVICE_ID
}

/// 把以 NUL 结尾的 UTF-16 描述转成字符串
pub fn adapter_description(raw: &[u16]) -> String {
    let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    String::from_utf16_lossy(&raw[..len])
}

/// 从 winit 窗口取得 HWND
fn window_hwnd(window: &Window) -> Result<HWND> {
    let handle = window
        .window_handle()
        .map_err(|e| BlueRenderError::Window(format!("Failed to get window handle: {}", e)))?;
    match handle.as_raw() {
        RawWindowHandle::Win32(win32) => {
            Ok(HWND(win32.hwnd.get() as *mut core::ffi::c_void))
        }
        _ => Err(BlueRenderError::Window(
            "Expected Win32 window handle on Windows platform".to_string(),
        )),
    }
}

/// 选择适配器
///
/// 硬件模式下跳过软件适配器和 Basic Render Driver，取第一个支持 D3D12 的适配器。
fn select_adapter(factory: &IDXGIFactory4, preference: AdapterPreference) -> Result<(IDXGIAdapter1, String)> {
    unsafe {
        if preference == AdapterPreference::Warp {
            let adapter: IDXGIAdapter1 = factory.EnumWarpAdapter().api("EnumWarpAdapter")?;
            let desc = adapter.GetDesc1().api("GetDesc1")?;
            return Ok((adapter, adapter_description(&desc.Description)));
        }

        let mut index = 0;
        while let Ok(adapter) = factory.EnumAdapters1(index) {
            index += 1;

            let desc = adapter.GetDesc1().api("GetDesc1")?;
            let name = adapter_description(&desc.Description);

            if desc.Flags & DXGI_ADAPTER_FLAG_SOFTWARE.0 as u32 != 0 {
                debug!(adapter = %name, "Skipping software adapter");
                continue;
            }
            if is_basic_render_driver(desc.VendorId, desc.DeviceId) {
                debug!(adapter = %name, "Skipping Basic Render Driver");
                continue;
            }

            // 只探测是否支持，不真正创建设备
            let supported = D3D12CreateDevice(
                &adapter,
                MIN_FEATURE_LEVEL,
                std::ptr::null_mut::<Option<ID3D12Device>>(),
            )
            .is_ok();
            if supported {
                return Ok((adapter, name));
            }
            debug!(adapter = %name, "Adapter does not support Direct3D 12");
        }

        Err(GraphicsError::AdapterNotFound(format!(
            "none of {} enumerated adapters supports Direct3D 12 at feature level 11_0",
            index
        ))
        .into())
    }
}

/// DirectX 12 核心对象
pub struct Dx12Context {
    /// DXGI 工厂
    pub factory: IDXGIFactory4,
    /// 适配器名称
    pub adapter_name: String,
    /// D3D12 设备
    pub device: ID3D12Device,
    /// 直接命令队列
    pub command_queue: ID3D12CommandQueue,
    /// 交换链
    pub swap_chain: IDXGISwapChain3,
    /// 交换链的帧延迟等待对象
    pub swap_chain_waitable: HANDLE,
    /// 渲染目标视图堆（每个后备缓冲一个）
    pub rtv_heap: Dx12DescriptorHeap,
    /// 着色器可见的 SRV 堆
    pub srv_heap: Dx12DescriptorHeap,
    /// 后备缓冲资源
    render_targets: Vec<ID3D12Resource>,
    /// 后备缓冲数量
    pub back_buffer_count: u32,
    /// 同步栅栏
    pub fence: ID3D12Fence,
    /// 栅栏事件句柄
    pub fence_event: HANDLE,
    /// 窗口引用
    pub window: Arc<Window>,
    /// 交换链宽度
    pub width: u32,
    /// 交换链高度
    pub height: u32,
}

impl Dx12Context {
    /// 创建 DirectX 12 核心对象
    pub fn new(window: Arc<Window>, config: &GraphicsConfig) -> Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width, size.height);
        let back_buffer_count = config.back_buffers;

        unsafe {
            // 1. 调试层
            let mut factory_flags = DXGI_CREATE_FACTORY_FLAGS(0);
            if config.debug_layer {
                let mut debug: Option<ID3D12Debug> = None;
                match D3D12GetDebugInterface(&mut debug) {
                    Ok(()) => {
                        if let Some(debug) = debug {
                            debug.EnableDebugLayer();
                            factory_flags = DXGI_CREATE_FACTORY_DEBUG;
                            debug!("DX12 Debug Layer enabled");
                        }
                    }
                    Err(e) => warn!(error = %e.message(), "Failed to enable DX12 Debug Layer"),
                }
            }

            // 2. DXGI 工厂
            let factory: IDXGIFactory4 = CreateDXGIFactory2(factory_flags).api("CreateDXGIFactory2")?;

            // 3. 适配器
            let (adapter, adapter_name) = select_adapter(&factory, config.adapter)?;
            info!(adapter = %adapter_name, preference = config.adapter.name(), "Adapter selected");

            // 4. 设备
            let mut device: Option<ID3D12Device> = None;
            D3D12CreateDevice(&adapter, MIN_FEATURE_LEVEL, &mut device).api("D3D12CreateDevice")?;
            let device = device.ok_or_else(|| {
                GraphicsError::DeviceCreation("D3D12CreateDevice returned no device".to_string())
            })?;

            // 5. 命令队列
            let queue_desc = D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                Flags: D3D12_COMMAND_QUEUE_FLAG_NONE,
                NodeMask: 1,
                ..Default::default()
            };
            let command_queue: ID3D12CommandQueue =
                device.CreateCommandQueue(&queue_desc).api("CreateCommandQueue")?;

            // 6. 交换链
            let hwnd = window_hwnd(&window)?;
            let swap_chain_desc = DXGI_SWAP_CHAIN_DESC1 {
                Width: width,
                Height: height,
                Format: BACK_BUFFER_FORMAT,
                Stereo: false.into(),
                SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
                BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
                BufferCount: back_buffer_count,
                Scaling: DXGI_SCALING_STRETCH,
                SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
                AlphaMode: DXGI_ALPHA_MODE_UNSPECIFIED,
                Flags: DXGI_SWAP_CHAIN_FLAG_FRAME_LATENCY_WAITABLE_OBJECT.0 as u32,
            };

            let swap_chain: IDXGISwapChain1 = factory
                .CreateSwapChainForHwnd(&command_queue, hwnd, &swap_chain_desc, None, None)
                .api("CreateSwapChainForHwnd")?;
            let swap_chain: IDXGISwapChain3 = swap_chain.cast().api("IDXGISwapChain3 cast")?;

            swap_chain
                .SetMaximumFrameLatency(back_buffer_count)
                .api("SetMaximumFrameLatency")?;
            let swap_chain_waitable = swap_chain.GetFrameLatencyWaitableObject();
            if swap_chain_waitable.is_invalid() {
                return Err(GraphicsError::SwapchainError(
                    "GetFrameLatencyWaitableObject returned an invalid handle".to_string(),
                )
                .into());
            }

            factory
                .MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER)
                .api("MakeWindowAssociation")?;

            info!(width, height, buffers = back_buffer_count, "Swap chain created");

            // 7. RTV 堆
            let rtv_heap = Dx12DescriptorHeap::new(&device, &DescriptorHeapDescriptor::rtv(back_buffer_count))?;

            // 8. SRV 堆（ImGui 字体）
            let srv_heap = Dx12DescriptorHeap::new(&device, &DescriptorHeapDescriptor::srv_cbv_uav(1))?;

            // 9. 同步对象
            let fence: ID3D12Fence = device.CreateFence(0, D3D12_FENCE_FLAG_NONE).api("CreateFence")?;
            let fence_event = CreateEventA(None, false, false, None).api("CreateEventA")?;

            debug!("Synchronization objects created");

            let mut context = Self {
                factory,
                adapter_name,
                device,
                command_queue,
                swap_chain,
                swap_chain_waitable,
                rtv_heap,
                srv_heap,
                render_targets: Vec::with_capacity(back_buffer_count as usize),
                back_buffer_count,
                fence,
                fence_event,
                window,
                width,
                height,
            };
            context.create_render_targets()?;

            info!("DX12 context initialization complete");
            Ok(context)
        }
    }

    /// 当前要渲染的后备缓冲索引
    pub fn back_buffer_index(&self) -> u32 {
        unsafe { self.swap_chain.GetCurrentBackBufferIndex() }
    }

    /// 指定后备缓冲资源
    pub fn render_target(&self, index: u32) -> Result<&ID3D12Resource> {
        self.render_targets.get(index as usize).ok_or_else(|| {
            BlueRenderError::Runtime(format!(
                "Back buffer {} is not available ({} created)",
                index,
                self.render_targets.len()
            ))
        })
    }

    /// 指定后备缓冲的 RTV
    pub fn rtv_handle(&self, index: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        self.rtv_heap.cpu_handle(index)
    }

    /// 释放对后备缓冲的引用（`ResizeBuffers` 之前必须调用）
    pub fn release_render_targets(&mut self) {
        self.render_targets.clear();
    }

    /// 取得后备缓冲并创建 RTV
    pub fn create_render_targets(&mut self) -> Result<()> {
        self.render_targets.clear();

        for i in 0..self.back_buffer_count {
            unsafe {
                let buffer: ID3D12Resource = self.swap_chain.GetBuffer(i).api("GetBuffer")?;
                self.device.CreateRenderTargetView(&buffer, None, self.rtv_heap.cpu_handle(i));
                let _ = buffer.SetName(&HSTRING::from(format!("Back Buffer {}", i)));
                self.render_targets.push(buffer);
            }
        }

        Ok(())
    }

    /// 调整交换链缓冲大小
    ///
    /// 保持缓冲数量和格式不变，保留等待对象标志。调用前必须释放所有后备缓冲引用。
    pub fn resize_buffers(&mut self, width: u32, height: u32) -> Result<()> {
        debug_assert!(self.render_targets.is_empty());

        unsafe {
            self.swap_chain
                .ResizeBuffers(
                    self.back_buffer_count,
                    width,
                    height,
                    BACK_BUFFER_FORMAT,
                    DXGI_SWAP_CHAIN_FLAG_FRAME_LATENCY_WAITABLE_OBJECT,
                )
                .api("ResizeBuffers")?;
        }

        self.width = width;
        self.height = height;
        Ok(())
    }
}

impl Drop for Dx12Context {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = CloseHandle(self.fence_event) {
                warn!(error = %e.message(), "Failed to close fence event");
            }
            if let Err(e) = CloseHandle(self.swap_chain_waitable) {
                warn!(error = %e.message(), "Failed to close swap chain waitable object");
            }
        }
        debug!("DX12 context dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_render_driver_detection() {
        assert!(is_basic_render_driver(0x1414, 0x8c));
        assert!(!is_basic_render_driver(0x1414, 0x8d));
        assert!(!is_basic_render_driver(0x10de, 0x8c));
    }

    #[test]
    fn test_adapter_description_stops_at_nul() {
        let mut raw = [0u16; 128];
        for (slot, c) in raw.iter_mut().zip("NVIDIA GeForce".encode_utf16()) {
            *slot = c;
        }
        assert_eq!(adapter_description(&raw), "NVIDIA GeForce");
    }
}
