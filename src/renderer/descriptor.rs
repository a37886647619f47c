//! 描述符堆描述
//!
//! 与图形 API 无关的描述符堆参数和句柄运算。
//! `gfx::dx12::descriptor` 用它们创建真正的 `ID3D12DescriptorHeap`。
//!
//! # 本渲染器用到的堆
//!
//! - **RTV**：每个交换链后备缓冲一个渲染目标视图
//! - **CBV/SRV/UAV**：着色器可见，槽位 0 存放 ImGui 字体图集的 SRV

/// 描述符类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// 渲染目标视图 (RTV)
    RenderTargetView,
    /// 深度模板视图 (DSV)
    DepthStencilView,
    /// 常量缓冲 / 着色资源 / 无序访问视图
    CbvSrvUav,
    /// 采样器
    Sampler,
}

impl DescriptorType {
    /// 描述符类型是否可以放进着色器可见的堆
    pub fn is_shader_visible(&self) -> bool {
        matches!(self, DescriptorType::CbvSrvUav | DescriptorType::Sampler)
    }

    /// 获取描述符类型名称
    pub fn name(&self) -> &'static str {
        match self {
            DescriptorType::RenderTargetView => "RTV",
            DescriptorType::DepthStencilView => "DSV",
            DescriptorType::CbvSrvUav => "CBV/SRV/UAV",
            DescriptorType::Sampler => "Sampler",
        }
    }
}

/// 描述符堆描述信息
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorHeapDescriptor {
    /// 描述符类型
    pub descriptor_type: DescriptorType,
    /// 描述符数量
    pub num_descriptors: u32,
    /// 是否着色器可见
    pub shader_visible: bool,
    /// 调试名称
    pub name: Option<String>,
}

impl DescriptorHeapDescriptor {
    /// 创建新的描述符堆描述符
    pub fn new(descriptor_type: DescriptorType, num_descriptors: u32) -> Self {
        Self {
            descriptor_type,
            num_descriptors,
            shader_visible: descriptor_type.is_shader_visible(),
            name: None,
        }
    }

    /// 设置调试名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 创建 RTV 堆描述符
    pub fn rtv(num_descriptors: u32) -> Self {
        Self::new(DescriptorType::RenderTargetView, num_descriptors)
            .with_name("RTV Heap")
    }

    /// 创建 SRV/CBV/UAV 堆描述符
    pub fn srv_cbv_uav(num_descriptors: u32) -> Self {
        Self::new(DescriptorType::CbvSrvUav, num_descriptors)
            .with_name("SRV Heap")
    }
}

/// 描述符句柄（CPU 可见）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuDescriptorHandle {
    /// 句柄指针值
    pub ptr: usize,
    /// 描述符索引
    pub index: u32,
}

impl CpuDescriptorHandle {
    pub fn new(ptr: usize, index: u32) -> Self {
        Self { ptr, index }
    }

    /// 偏移句柄
    pub fn offset(&self, count: u32, increment_size: u32) -> Self {
        Self {
            ptr: self.ptr + count as usize * increment_size as usize,
            index: self.index + count,
        }
    }
}

/// 描述符句柄（GPU 可见）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuDescriptorHandle {
    /// 句柄指针值
    pub ptr: u64,
    /// 描述符索引
    pub index: u32,
}

impl GpuDescriptorHandle {
    pub fn new(ptr: u64, index: u32) -> Self {
        Self { ptr, index }
    }

    /// 偏移句柄
    pub fn offset(&self, count: u32, increment_size: u32) -> Self {
        Self {
            ptr: self.ptr + count as u64 * increment_size as u64,
            index: self.index + count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_type() {
        assert!(DescriptorType::CbvSrvUav.is_shader_visible());
        assert!(!DescriptorType::RenderTargetView.is_shader_visible());
        assert_eq!(DescriptorType::RenderTargetView.name(), "RTV");
    }

    #[test]
    fn test_descriptor_heap_descriptor() {
        let desc = DescriptorHeapDescriptor::rtv(3);
        assert_eq!(desc.descriptor_type, DescriptorType::RenderTargetView);
        assert_eq!(desc.num_descriptors, 3);
        assert!(!desc.shader_visible);
        assert_eq!(desc.name, Some("RTV Heap".to_string()));

        let desc = DescriptorHeapDescriptor::srv_cbv_uav(1);
        assert!(desc.shader_visible);
    }

    #[test]
    fn test_shader_visibility_follows_type() {
        let sampler = DescriptorHeapDescriptor::new(DescriptorType::Sampler, 4);
        assert!(sampler.shader_visible);
        assert_eq!(sampler.name, None);

        let dsv = DescriptorHeapDescriptor::new(DescriptorType::DepthStencilView, 1);
        assert!(!dsv.shader_visible);
    }

    #[test]
    fn test_cpu_descriptor_handle_offset() {
        let handle = CpuDescriptorHandle::new(1000, 0);
        let offset_handle = handle.offset(5, 32);
        assert_eq!(offset_handle.ptr, 1160); // 1000 + 5 * 32
        assert_eq!(offset_handle.index, 5);
    }

    #[test]
    fn test_gpu_descriptor_handle_offset() {
        let handle = GpuDescriptorHandle::new(2000, 0);
        let offset_handle = handle.offset(10, 32);
        assert_eq!(offset_handle.ptr, 2320); // 2000 + 10 * 32
        assert_eq!(offset_handle.index, 10);
    }
}
