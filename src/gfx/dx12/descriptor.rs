//! DirectX 12 描述符堆实现
//!
//! 把 `renderer::descriptor` 中与 API 无关的描述转换成 `ID3D12DescriptorHeap`，
//! 并按索引给出 CPU / GPU 句柄。

use windows::core::HSTRING;
use windows::Win32::Graphics::Direct3D12::*;

use crate::core::error::{ApiResultExt, Result};
use crate::renderer::descriptor::{
    CpuDescriptorHandle, DescriptorHeapDescriptor, DescriptorType, GpuDescriptorHandle,
};

/// 描述符类型对应的 D3D12 堆类型
pub fn heap_type(descriptor_type: DescriptorType) -> D3D12_DESCRIPTOR_HEAP_TYPE {
    match descriptor_type {
        DescriptorType::RenderTargetView => D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
        DescriptorType::DepthStencilView => D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
        DescriptorType::CbvSrvUav => D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV,
        DescriptorType::Sampler => D3D12_DESCRIPTOR_HEAP_TYPE_SAMPLER,
    }
}

/// DX12 描述符堆
///
/// 封装 ID3D12DescriptorHeap 并提供按索引访问句柄的接口。
pub struct Dx12DescriptorHeap {
    /// 底层 DX12 描述符堆
    heap: ID3D12DescriptorHeap,
    /// 描述符增量大小
    increment_size: u32,
    /// CPU 句柄基址
    cpu_start: CpuDescriptorHandle,
    /// GPU 句柄基址（仅对着色器可见的堆）
    gpu_start: Option<GpuDescriptorHandle>,
    /// 描述符数量
    num_descriptors: u32,
}

impl Dx12DescriptorHeap {
    /// 创建新的 DX12 描述符堆
    pub fn new(device: &ID3D12Device, desc: &DescriptorHeapDescriptor) -> Result<Self> {
        let heap_type = heap_type(desc.descriptor_type);

        let flags = if desc.shader_visible {
            D3D12_DESCRIPTOR_HEAP_FLAG_SHADER_VISIBLE
        } else {
            D3D12_DESCRIPTOR_HEAP_FLAG_NONE
        };

        let heap_desc = D3D12_DESCRIPTOR_HEAP_DESC {
            Type: heap_type,
            NumDescriptors: desc.num_descriptors,
            Flags: flags,
            NodeMask: 0,
        };

        unsafe {
            let heap: ID3D12DescriptorHeap = device
                .CreateDescriptorHeap(&heap_desc)
                .api("CreateDescriptorHeap")?;

            // 调试名称只影响调试工具，失败不影响渲染
            if let Some(name) = &desc.name {
                let _ = heap.SetName(&HSTRING::from(name.as_str()));
            }

            let increment_size = device.GetDescriptorHandleIncrementSize(heap_type);

            let cpu_start = CpuDescriptorHandle::new(heap.GetCPUDescriptorHandleForHeapStart().ptr, 0);
            let gpu_start = desc
                .shader_visible
                .then(|| GpuDescriptorHandle::new(heap.GetGPUDescriptorHandleForHeapStart().ptr, 0));

            tracing::debug!(
                heap = desc.descriptor_type.name(),
                count = desc.num_descriptors,
                shader_visible = desc.shader_visible,
                "Descriptor heap created"
            );

            Ok(Self {
                heap,
                increment_size,
                cpu_start,
                gpu_start,
                num_descriptors: desc.num_descriptors,
            })
        }
    }

    /// 获取底层 DX12 描述符堆
    pub fn heap(&self) -> &ID3D12DescriptorHeap {
        &self.heap
    }

    /// 获取指定索引的 CPU 句柄
    pub fn cpu_handle(&self, index: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        debug_assert!(index < self.num_descriptors);
        let handle = self.cpu_start.offset(index, self.increment_size);
        D3D12_CPU_DESCRIPTOR_HANDLE { ptr: handle.ptr }
    }

    /// 获取指定索引的 GPU 句柄（仅对着色器可见的堆）
    pub fn gpu_handle(&self, index: u32) -> Option<D3D12_GPU_DESCRIPTOR_HANDLE> {
        debug_assert!(index < self.num_descriptors);
        self.gpu_start
            .map(|start| start.offset(index, self.increment_size))
            .map(|handle| D3D12_GPU_DESCRIPTOR_HANDLE { ptr: handle.ptr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_type_mapping() {
        assert_eq!(heap_type(DescriptorType::RenderTargetView), D3D12_DESCRIPTOR_HEAP_TYPE_RTV);
        assert_eq!(heap_type(DescriptorType::CbvSrvUav), D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV);
        assert_eq!(heap_type(DescriptorType::Sampler), D3D12_DESCRIPTOR_HEAP_TYPE_SAMPLER);
    }
}
