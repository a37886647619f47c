//! ImGui 绘制数据的 Direct3D 12 后端
//!
//! 只绘制主视口。每个在途帧槽位持有一对上传堆顶点 / 索引缓冲，
//! 槽位由 `FrameSync` 决定，所以 CPU 永远不会写 GPU 还在读的缓冲。

use std::ffi::c_void;
use std::mem::{offset_of, size_of};

use imgui::internal::RawWrapper;
use imgui::{BackendFlags, DrawCmd, DrawData, DrawIdx, DrawVert, TextureId};
use tracing::{debug, warn};
use windows::core::{s, HSTRING};
use windows::Win32::Foundation::{CloseHandle, FALSE, RECT, TRUE, WAIT_FAILED};
use windows::Win32::Graphics::Direct3D::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::System::Threading::{CreateEventA, WaitForSingleObject, INFINITE};

use crate::core::error::{ApiResultExt, GraphicsError, Result};
use crate::core::math::ortho_projection;
use crate::gfx::dx12::buffer::{create_upload_buffer, map_buffer, transition};
use crate::gfx::dx12::context::FONT_SRV_INDEX;
use crate::gfx::dx12::descriptor::Dx12DescriptorHeap;
use crate::gfx::dx12::pipeline::{
    compile_shader, create_root_signature, disabled_depth_stencil, rasterizer_state, shader_bytecode,
};
use crate::renderer::resource::{BufferCapacity, TextureUploadLayout};

const IMGUI_HLSL: &str = include_str!("shaders/imgui.hlsl");

/// 单个帧槽位的流式缓冲
struct FrameBuffers {
    vertex_buffer: Option<ID3D12Resource>,
    index_buffer: Option<ID3D12Resource>,
    vertex_capacity: BufferCapacity,
    index_capacity: BufferCapacity,
}

impl FrameBuffers {
    fn new() -> Self {
        Self {
            vertex_buffer: None,
            index_buffer: None,
            vertex_capacity: BufferCapacity::new(BufferCapacity::IMGUI_VERTEX_HEADROOM),
            index_capacity: BufferCapacity::new(BufferCapacity::IMGUI_INDEX_HEADROOM),
        }
    }

    /// 容量不足时重建缓冲
    fn reserve(&mut self, device: &ID3D12Device, slot: usize, vertices: usize, indices: usize) -> Result<()> {
        if let Some(capacity) = self.vertex_capacity.reserve(vertices) {
            self.vertex_buffer = None;
            let name = format!("ImGui Vertex Buffer {}", slot);
            self.vertex_buffer = Some(create_upload_buffer(device, (capacity * size_of::<DrawVert>()) as u64, &name)?);
            debug!(slot, capacity, "ImGui vertex buffer grown");
        }
        if let Some(capacity) = self.index_capacity.reserve(indices) {
            self.index_buffer = None;
            let name = format!("ImGui Index Buffer {}", slot);
            self.index_buffer = Some(create_upload_buffer(device, (capacity * size_of::<DrawIdx>()) as u64, &name)?);
            debug!(slot, capacity, "ImGui index buffer grown");
        }
        Ok(())
    }

    /// 把所有绘制列表依次拷贝进缓冲
    fn upload(&self, draw_data: &DrawData) -> Result<()> {
        let (Some(vb), Some(ib)) = (&self.vertex_buffer, &self.index_buffer) else {
            return Err(GraphicsError::ResourceCreation("ImGui buffers were not allocated".to_string()).into());
        };

        unsafe {
            let mut vtx_dest = map_buffer(vb)?.cast::<DrawVert>();
            let mut idx_dest = match map_buffer(ib) {
                Ok(ptr) => ptr.cast::<DrawIdx>(),
                Err(e) => {
                    vb.Unmap(0, None);
                    return Err(e);
                }
            };

            for list in draw_data.draw_lists() {
                let vtx = list.vtx_buffer();
                let idx = list.idx_buffer();
                std::ptr::copy_nonoverlapping(vtx.as_ptr(), vtx_dest, vtx.len());
                std::ptr::copy_nonoverlapping(idx.as_ptr(), idx_dest, idx.len());
                vtx_dest = vtx_dest.add(vtx.len());
                idx_dest = idx_dest.add(idx.len());
            }

            vb.Unmap(0, None);
            ib.Unmap(0, None);
        }
        Ok(())
    }
}

/// ImGui 的 D3D12 渲染后端
pub struct ImguiRenderer {
    root_signature: ID3D12RootSignature,
    pipeline_state: ID3D12PipelineState,
    _font_texture: ID3D12Resource,
    frame_buffers: Vec<FrameBuffers>,
}

impl ImguiRenderer {
    /// 创建管线并上传字体图集
    ///
    /// 字体 SRV 写入 `srv_heap` 的槽位 0，`TextureId` 保存其 GPU 句柄。
    pub fn new(
        imgui: &mut imgui::Context,
        device: &ID3D12Device,
        srv_heap: &Dx12DescriptorHeap,
        frames_in_flight: usize,
        rtv_format: DXGI_FORMAT,
    ) -> Result<Self> {
        imgui.set_renderer_name(Some(format!("blued_render-dx12 {}", env!("CARGO_PKG_VERSION"))));
        imgui
            .io_mut()
            .backend_flags
            .insert(BackendFlags::RENDERER_HAS_VTX_OFFSET);

        let root_signature = Self::create_root_signature(device)?;
        let pipeline_state = Self::create_pipeline_state(device, &root_signature, rtv_format)?;

        let font_gpu_handle = srv_heap.gpu_handle(FONT_SRV_INDEX).ok_or_else(|| {
            GraphicsError::ResourceCreation("ImGui font SRV heap is not shader visible".to_string())
        })?;

        let font_texture = {
            let fonts = imgui.fonts();
            let atlas = fonts.build_rgba32_texture();
            upload_font_texture(device, srv_heap.cpu_handle(FONT_SRV_INDEX), atlas.width, atlas.height, atlas.data)?
        };
        imgui.fonts().tex_id = TextureId::new(font_gpu_handle.ptr as usize);

        let frame_buffers = (0..frames_in_flight).map(|_| FrameBuffers::new()).collect();

        debug!(frames_in_flight, "ImGui renderer created");

        Ok(Self {
            root_signature,
            pipeline_state,
            _font_texture: font_texture,
            frame_buffers,
        })
    }

    fn create_root_signature(device: &ID3D12Device) -> Result<ID3D12RootSignature> {
        let srv_range = D3D12_DESCRIPTOR_RANGE {
            RangeType: D3D12_DESCRIPTOR_RANGE_TYPE_SRV,
            NumDescriptors: 1,
            BaseShaderRegister: 0,
            RegisterSpace: 0,
            OffsetInDescriptorsFromTableStart: 0,
        };

        let params = [
            // b0: 投影矩阵
            D3D12_ROOT_PARAMETER {
                ParameterType: D3D12_ROOT_PARAMETER_TYPE_32BIT_CONSTANTS,
                Anonymous: D3D12_ROOT_PARAMETER_0 {
                    Constants: D3D12_ROOT_CONSTANTS {
                        ShaderRegister: 0,
                        RegisterSpace: 0,
                        Num32BitValues: 16,
                    },
                },
                ShaderVisibility: D3D12_SHADER_VISIBILITY_VERTEX,
            },
            // t0: 纹理
            D3D12_ROOT_PARAMETER {
                ParameterType: D3D12_ROOT_PARAMETER_TYPE_DESCRIPTOR_TABLE,
                Anonymous: D3D12_ROOT_PARAMETER_0 {
                    DescriptorTable: D3D12_ROOT_DESCRIPTOR_TABLE {
                        NumDescriptorRanges: 1,
                        pDescriptorRanges: &srv_range,
                    },
                },
                ShaderVisibility: D3D12_SHADER_VISIBILITY_PIXEL,
            },
        ];

        let sampler = D3D12_STATIC_SAMPLER_DESC {
            Filter: D3D12_FILTER_MIN_MAG_MIP_LINEAR,
            AddressU: D3D12_TEXTURE_ADDRESS_MODE_WRAP,
            AddressV: D3D12_TEXTURE_ADDRESS_MODE_WRAP,
            AddressW: D3D12_TEXTURE_ADDRESS_MODE_WRAP,
            MipLODBias: 0.0,
            MaxAnisotropy: 0,
            ComparisonFunc: D3D12_COMPARISON_FUNC_ALWAYS,
            BorderColor: D3D12_STATIC_BORDER_COLOR_TRANSPARENT_BLACK,
            MinLOD: 0.0,
            MaxLOD: 0.0,
            ShaderRegister: 0,
            RegisterSpace: 0,
            ShaderVisibility: D3D12_SHADER_VISIBILITY_PIXEL,
        };

        let desc = D3D12_ROOT_SIGNATURE_DESC {
            NumParameters: params.len() as u32,
            pParameters: params.as_ptr(),
            NumStaticSamplers: 1,
            pStaticSamplers: &sampler,
            Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT
                | D3D12_ROOT_SIGNATURE_FLAG_DENY_HULL_SHADER_ROOT_ACCESS
                | D3D12_ROOT_SIGNATURE_FLAG_DENY_DOMAIN_SHADER_ROOT_ACCESS
                | D3D12_ROOT_SIGNATURE_FLAG_DENY_GEOMETRY_SHADER_ROOT_ACCESS,
        };

        create_root_signature(device, &desc)
    }

    fn create_pipeline_state(
        device: &ID3D12Device,
        root_signature: &ID3D12RootSignature,
        rtv_format: DXGI_FORMAT,
    ) -> Result<ID3D12PipelineState> {
        let vs = compile_shader(IMGUI_HLSL, "VSMain", "vs_5_0")?;
        let ps = compile_shader(IMGUI_HLSL, "PSMain", "ps_5_0")?;

        let input_layout = [
            D3D12_INPUT_ELEMENT_DESC {
                SemanticName: s!("POSITION"),
                SemanticIndex: 0,
                Format: DXGI_FORMAT_R32G32_FLOAT,
                InputSlot: 0,
                AlignedByteOffset: offset_of!(DrawVert, pos) as u32,
                InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            },
            D3D12_INPUT_ELEMENT_DESC {
                SemanticName: s!("TEXCOORD"),
                SemanticIndex: 0,
                Format: DXGI_FORMAT_R32G32_FLOAT,
                InputSlot: 0,
                AlignedByteOffset: offset_of!(DrawVert, uv) as u32,
                InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            },
            D3D12_INPUT_ELEMENT_DESC {
                SemanticName: s!("COLOR"),
                SemanticIndex: 0,
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                InputSlot: 0,
                AlignedByteOffset: offset_of!(DrawVert, col) as u32,
                InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            },
        ];

        // 标准 alpha 混合
        let alpha_blend = D3D12_RENDER_TARGET_BLEND_DESC {
            BlendEnable: TRUE,
            LogicOpEnable: FALSE,
            SrcBlend: D3D12_BLEND_SRC_ALPHA,
            DestBlend: D3D12_BLEND_INV_SRC_ALPHA,
            BlendOp: D3D12_BLEND_OP_ADD,
            SrcBlendAlpha: D3D12_BLEND_ONE,
            DestBlendAlpha: D3D12_BLEND_INV_SRC_ALPHA,
            BlendOpAlpha: D3D12_BLEND_OP_ADD,
            LogicOp: D3D12_LOGIC_OP_NOOP,
            RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
        };

        let mut desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC {
            pRootSignature: unsafe { std::mem::transmute_copy(root_signature) },
            VS: shader_bytecode(&vs),
            PS: shader_bytecode(&ps),
            BlendState: D3D12_BLEND_DESC {
                AlphaToCoverageEnable: FALSE,
                IndependentBlendEnable: FALSE,
                RenderTarget: [alpha_blend; 8],
            },
            SampleMask: u32::MAX,
            RasterizerState: rasterizer_state(D3D12_CULL_MODE_NONE),
            DepthStencilState: disabled_depth_stencil(),
            InputLayout: D3D12_INPUT_LAYOUT_DESC {
                pInputElementDescs: input_layout.as_ptr(),
                NumElements: input_layout.len() as u32,
            },
            PrimitiveTopologyType: D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
            NumRenderTargets: 1,
            SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            ..Default::default()
        };
        desc.RTVFormats[0] = rtv_format;

        unsafe { device.CreateGraphicsPipelineState(&desc) }.api("CreateGraphicsPipelineState")
    }

    /// 录制 ImGui 绘制命令
    ///
    /// `slot` 必须是本帧 `FrameSync::begin_frame` 给出的槽位。
    /// 调用前命令列表上已经设置好渲染目标和 SRV 堆。
    pub fn render(
        &mut self,
        device: &ID3D12Device,
        draw_data: &DrawData,
        slot: usize,
        list: &ID3D12GraphicsCommandList,
    ) -> Result<()> {
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return Ok(());
        }
        if draw_data.total_vtx_count <= 0 || draw_data.total_idx_count <= 0 {
            return Ok(());
        }

        let buffers = self.frame_buffers.get_mut(slot).ok_or_else(|| {
            GraphicsError::CommandExecution(format!("ImGui frame slot {} out of range", slot))
        })?;
        buffers.reserve(
            device,
            slot,
            draw_data.total_vtx_count as usize,
            draw_data.total_idx_count as usize,
        )?;
        buffers.upload(draw_data)?;

        let buffers = &self.frame_buffers[slot];
        setup_render_state(&self.root_signature, &self.pipeline_state, buffers, draw_data, list);

        let clip_off = draw_data.display_pos;
        let clip_scale = draw_data.framebuffer_scale;

        // 所有列表合并在同一对缓冲里，自己维护全局偏移
        let mut global_vtx_offset = 0;
        let mut global_idx_offset = 0;

        for draw_list in draw_data.draw_lists() {
            for cmd in draw_list.commands() {
                match cmd {
                    DrawCmd::Elements { count, cmd_params } => {
                        let Some(scissor) = scissor_rect(cmd_params.clip_rect, clip_off, clip_scale) else {
                            continue;
                        };

                        let texture = D3D12_GPU_DESCRIPTOR_HANDLE {
                            ptr: cmd_params.texture_id.id() as u64,
                        };

                        unsafe {
                            list.SetGraphicsRootDescriptorTable(1, texture);
                            list.RSSetScissorRects(&[scissor]);
                            list.DrawIndexedInstanced(
                                count as u32,
                                1,
                                (cmd_params.idx_offset + global_idx_offset) as u32,
                                (cmd_params.vtx_offset + global_vtx_offset) as i32,
                                0,
                            );
                        }
                    }
                    DrawCmd::ResetRenderState => {
                        setup_render_state(&self.root_signature, &self.pipeline_state, buffers, draw_data, list);
                    }
                    DrawCmd::RawCallback { callback, raw_cmd } => unsafe {
                        callback(draw_list.raw(), raw_cmd);
                    },
                }
            }
            global_idx_offset += draw_list.idx_buffer().len();
            global_vtx_offset += draw_list.vtx_buffer().len();
        }

        Ok(())
    }
}

/// 把 ImGui 裁剪矩形投影到帧缓冲空间，空矩形返回 `None`
pub fn scissor_rect(clip_rect: [f32; 4], clip_off: [f32; 2], clip_scale: [f32; 2]) -> Option<RECT> {
    let min = [
        (clip_rect[0] - clip_off[0]) * clip_scale[0],
        (clip_rect[1] - clip_off[1]) * clip_scale[1],
    ];
    let max = [
        (clip_rect[2] - clip_off[0]) * clip_scale[0],
        (clip_rect[3] - clip_off[1]) * clip_scale[1],
    ];

    if max[0] <= min[0] || max[1] <= min[1] {
        return None;
    }

    Some(RECT {
        left: min[0] as i32,
        top: min[1] as i32,
        right: max[0] as i32,
        bottom: max[1] as i32,
    })
}

fn setup_render_state(
    root_signature: &ID3D12RootSignature,
    pipeline_state: &ID3D12PipelineState,
    buffers: &FrameBuffers,
    draw_data: &DrawData,
    list: &ID3D12GraphicsCommandList,
) {
    let (Some(vb), Some(ib)) = (&buffers.vertex_buffer, &buffers.index_buffer) else {
        return;
    };

    let projection = ortho_projection(draw_data.display_pos, draw_data.display_size);

    let viewport = D3D12_VIEWPORT {
        TopLeftX: 0.0,
        TopLeftY: 0.0,
        Width: draw_data.display_size[0] * draw_data.framebuffer_scale[0],
        Height: draw_data.display_size[1] * draw_data.framebuffer_scale[1],
        MinDepth: 0.0,
        MaxDepth: 1.0,
    };

    let vertex_stride = size_of::<DrawVert>();
    let index_stride = size_of::<DrawIdx>();

    unsafe {
        let vbv = D3D12_VERTEX_BUFFER_VIEW {
            BufferLocation: vb.GetGPUVirtualAddress(),
            SizeInBytes: (buffers.vertex_capacity.capacity() * vertex_stride) as u32,
            StrideInBytes: vertex_stride as u32,
        };
        let ibv = D3D12_INDEX_BUFFER_VIEW {
            BufferLocation: ib.GetGPUVirtualAddress(),
            SizeInBytes: (buffers.index_capacity.capacity() * index_stride) as u32,
            Format: if index_stride == 2 { DXGI_FORMAT_R16_UINT } else { DXGI_FORMAT_R32_UINT },
        };

        list.RSSetViewports(&[viewport]);
        list.IASetVertexBuffers(0, Some(&[vbv]));
        list.IASetIndexBuffer(Some(&ibv));
        list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        list.SetGraphicsRootSignature(root_signature);
        list.SetPipelineState(pipeline_state);
        list.SetGraphicsRoot32BitConstants(0, 16, projection.as_ptr() as *const c_void, 0);
        list.OMSetBlendFactor(Some(&[0.0, 0.0, 0.0, 0.0]));
    }
}

/// 经上传缓冲把 RGBA8 字体图集拷到默认堆纹理，并在 `srv` 处创建 SRV
///
/// 使用独立的队列、分配器和 fence，等待拷贝完成后返回。
fn upload_font_texture(
    device: &ID3D12Device,
    srv: D3D12_CPU_DESCRIPTOR_HANDLE,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<ID3D12Resource> {
    let layout = TextureUploadLayout::rgba8(width, height);

    unsafe {
        // 默认堆纹理
        let texture_desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
            Width: width as u64,
            Height: height,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: DXGI_FORMAT_R8G8B8A8_UNORM,
            SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
            Flags: D3D12_RESOURCE_FLAG_NONE,
            ..Default::default()
        };
        let mut texture: Option<ID3D12Resource> = None;
        device
            .CreateCommittedResource(
                &D3D12_HEAP_PROPERTIES {
                    Type: D3D12_HEAP_TYPE_DEFAULT,
                    ..Default::default()
                },
                D3D12_HEAP_FLAG_NONE,
                &texture_desc,
                D3D12_RESOURCE_STATE_COPY_DEST,
                None,
                &mut texture,
            )
            .api("CreateCommittedResource")?;
        let texture = texture.ok_or_else(|| {
            GraphicsError::ResourceCreation("CreateCommittedResource returned no font texture".to_string())
        })?;
        let _ = texture.SetName(&HSTRING::from("ImGui Font Texture"));

        // 上传缓冲，逐行按 256 字节对齐
        let upload = create_upload_buffer(device, layout.total_size, "ImGui Font Upload")?;
        let mapped = map_buffer(&upload)?;
        for row in 0..height {
            let src = &pixels[layout.source_row(row)];
            std::ptr::copy_nonoverlapping(src.as_ptr(), mapped.add(layout.upload_offset(row)), src.len());
        }
        upload.Unmap(0, None);

        let src_location = D3D12_TEXTURE_COPY_LOCATION {
            pResource: std::mem::transmute_copy(&upload),
            Type: D3D12_TEXTURE_COPY_TYPE_PLACED_FOOTPRINT,
            Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 {
                PlacedFootprint: D3D12_PLACED_SUBRESOURCE_FOOTPRINT {
                    Offset: 0,
                    Footprint: D3D12_SUBRESOURCE_FOOTPRINT {
                        Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                        Width: width,
                        Height: height,
                        Depth: 1,
                        RowPitch: layout.row_pitch,
                    },
                },
            },
        };
        let dst_location = D3D12_TEXTURE_COPY_LOCATION {
            pResource: std::mem::transmute_copy(&texture),
            Type: D3D12_TEXTURE_COPY_TYPE_SUBRESOURCE_INDEX,
            Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 { SubresourceIndex: 0 },
        };

        // 一次性提交
        let fence: ID3D12Fence = device.CreateFence(0, D3D12_FENCE_FLAG_NONE).api("CreateFence")?;
        let queue: ID3D12CommandQueue = device
            .CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                NodeMask: 1,
                ..Default::default()
            })
            .api("CreateCommandQueue")?;
        let allocator: ID3D12CommandAllocator = device
            .CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)
            .api("CreateCommandAllocator")?;
        let list: ID3D12GraphicsCommandList = device
            .CreateCommandList(0, D3D12_COMMAND_LIST_TYPE_DIRECT, &allocator, None)
            .api("CreateCommandList")?;

        list.CopyTextureRegion(&dst_location, 0, 0, 0, &src_location, None);
        transition(
            &list,
            &texture,
            D3D12_RESOURCE_STATE_COPY_DEST,
            D3D12_RESOURCE_STATE_PIXEL_SHADER_RESOURCE,
        );
        list.Close().api("Close")?;

        queue.ExecuteCommandLists(&[Some(list.clone().into())]);
        queue.Signal(&fence, 1).api("Signal")?;

        let event = CreateEventA(None, false, false, None).api("CreateEventA")?;
        let waited = fence
            .SetEventOnCompletion(1, event)
            .api("SetEventOnCompletion")
            .and_then(|()| {
                if WaitForSingleObject(event, INFINITE) == WAIT_FAILED {
                    return Err(GraphicsError::CommandExecution(
                        "WaitForSingleObject failed during font upload".to_string(),
                    )
                    .into());
                }
                Ok(())
            });
        if let Err(e) = CloseHandle(event) {
            warn!(error = %e.message(), "Failed to close font upload event");
        }
        waited?;

        device.CreateShaderResourceView(
            &texture,
            Some(&D3D12_SHADER_RESOURCE_VIEW_DESC {
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                ViewDimension: D3D12_SRV_DIMENSION_TEXTURE2D,
                Shader4ComponentMapping: D3D12_DEFAULT_SHADER_4_COMPONENT_MAPPING,
                Anonymous: D3D12_SHADER_RESOURCE_VIEW_DESC_0 {
                    Texture2D: D3D12_TEX2D_SRV {
                        MipLevels: 1,
                        ..Default::default()
                    },
                },
            }),
            srv,
        );

        debug!(width, height, "ImGui font atlas uploaded");
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scissor_skips_empty_rect() {
        assert!(scissor_rect([10.0, 10.0, 10.0, 50.0], [0.0, 0.0], [1.0, 1.0]).is_none());
        assert!(scissor_rect([10.0, 60.0, 50.0, 50.0], [0.0, 0.0], [1.0, 1.0]).is_none());
    }

    #[test]
    fn test_scissor_applies_offset_and_scale() {
        let rect = scissor_rect([110.0, 60.0, 210.0, 160.0], [100.0, 50.0], [2.0, 2.0]).unwrap();
        assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (20, 20, 220, 220));
    }

    #[test]
    fn test_draw_vert_layout() {
        assert_eq!(offset_of!(DrawVert, pos), 0);
        assert_eq!(offset_of!(DrawVert, uv), 8);
        assert_eq!(offset_of!(DrawVert, col), 16);
        assert_eq!(size_of::<DrawVert>(), 20);
    }
}
