//! 上传堆缓冲和资源屏障
//!
//! 三角形顶点缓冲和 ImGui 的流式顶点 / 索引缓冲都放在上传堆里，
//! CPU 直接写入，GPU 直接读取。

use std::mem::ManuallyDrop;

use windows::core::HSTRING;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_SAMPLE_DESC;

use crate::core::error::{ApiResultExt, GraphicsError, Result};

/// 上传堆中的缓冲资源描述
fn buffer_desc(size: u64) -> D3D12_RESOURCE_DESC {
    D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Width: size,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        ..Default::default()
    }
}

/// 创建上传堆缓冲（初始状态 `GENERIC_READ`）
pub fn create_upload_buffer(device: &ID3D12Device, size: u64, name: &str) -> Result<ID3D12Resource> {
    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_UPLOAD,
        ..Default::default()
    };

    let mut resource: Option<ID3D12Resource> = None;
    unsafe {
        device
            .CreateCommittedResource(
                &heap_props,
                D3D12_HEAP_FLAG_NONE,
                &buffer_desc(size),
                D3D12_RESOURCE_STATE_GENERIC_READ,
                None,
                &mut resource,
            )
            .api("CreateCommittedResource")?;
    }

    let resource = resource.ok_or_else(|| {
        GraphicsError::ResourceCreation(format!("CreateCommittedResource returned no buffer for {}", name))
    })?;

    unsafe {
        let _ = resource.SetName(&HSTRING::from(name));
    }

    Ok(resource)
}

/// 映射整个缓冲，返回 CPU 可写指针
///
/// # Safety
///
/// 调用者负责在写入完成后 `Unmap`，并且不越过缓冲大小写入。
pub unsafe fn map_buffer(resource: &ID3D12Resource) -> Result<*mut u8> {
    // CPU 不读取上传堆
    let read_range = D3D12_RANGE { Begin: 0, End: 0 };
    let mut data = std::ptr::null_mut();
    resource
        .Map(0, Some(&read_range), Some(&mut data))
        .api("Map")?;
    Ok(data.cast())
}

/// 把字节拷贝到上传缓冲开头
pub fn write_upload_buffer(resource: &ID3D12Resource, bytes: &[u8]) -> Result<()> {
    unsafe {
        let dest = map_buffer(resource)?;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), dest, bytes.len());
        resource.Unmap(0, None);
    }
    Ok(())
}

/// 资源状态转换屏障
///
/// 屏障不持有资源引用，资源必须在命令列表执行完之前保持存活。
pub fn transition_barrier(
    resource: &ID3D12Resource,
    before: D3D12_RESOURCE_STATES,
    after: D3D12_RESOURCE_STATES,
) -> D3D12_RESOURCE_BARRIER {
    D3D12_RESOURCE_BARRIER {
        Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
        Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
        Anonymous: D3D12_RESOURCE_BARRIER_0 {
            Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                pResource: unsafe { std::mem::transmute_copy(resource) },
                Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
                StateBefore: before,
                StateAfter: after,
            }),
        },
    }
}

/// 在命令列表中记录一次状态转换
pub fn transition(
    list: &ID3D12GraphicsCommandList,
    resource: &ID3D12Resource,
    before: D3D12_RESOURCE_STATES,
    after: D3D12_RESOURCE_STATES,
) {
    let barrier = transition_barrier(resource, before, after);
    unsafe { list.ResourceBarrier(&[barrier]) };
}
