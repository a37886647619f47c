//! 着色器编译和三角形管线
//!
//! HLSL 源码通过 `include_str!` 嵌入，运行时用 `D3DCompile` 编译。

use std::ffi::CString;

use windows::core::PCSTR;
use windows::Win32::Foundation::{FALSE, TRUE};
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::ID3DBlob;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::core::error::{ApiResultExt, GraphicsError, Result};
use crate::renderer::vertex::Vertex;

const TRIANGLE_HLSL: &str = include_str!("shaders/triangle.hlsl");

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

fn blob_text(blob: &ID3DBlob) -> String {
    String::from_utf8_lossy(blob_bytes(blob)).trim_end_matches('\0').trim().to_string()
}

/// 字节码描述（不持有 blob）
pub fn shader_bytecode(blob: &ID3DBlob) -> D3D12_SHADER_BYTECODE {
    unsafe {
        D3D12_SHADER_BYTECODE {
            pShaderBytecode: blob.GetBufferPointer(),
            BytecodeLength: blob.GetBufferSize(),
        }
    }
}

/// 编译 HLSL
///
/// Debug 构建带调试信息并关闭优化。编译器的错误输出放进 `ShaderCompilation`。
pub fn compile_shader(source: &str, entry: &str, target: &str) -> Result<ID3DBlob> {
    let entry_c = CString::new(entry).map_err(|e| GraphicsError::ShaderCompilation {
        entry: entry.to_string(),
        message: e.to_string(),
    })?;
    let target_c = CString::new(target).map_err(|e| GraphicsError::ShaderCompilation {
        entry: entry.to_string(),
        message: e.to_string(),
    })?;

    let flags = if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    };

    let mut code: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;
    let result = unsafe {
        D3DCompile(
            source.as_ptr() as _,
            source.len(),
            None,
            None,
            None,
            PCSTR(entry_c.as_ptr() as *const u8),
            PCSTR(target_c.as_ptr() as *const u8),
            flags,
            0,
            &mut code,
            Some(&mut errors),
        )
    };

    if let Err(e) = result {
        let message = errors
            .as_ref()
            .map(blob_text)
            .unwrap_or_else(|| e.message().to_string());
        return Err(GraphicsError::ShaderCompilation {
            entry: entry.to_string(),
            message,
        }
        .into());
    }

    let code = code.ok_or_else(|| GraphicsError::ShaderCompilation {
        entry: entry.to_string(),
        message: "D3DCompile produced no bytecode".to_string(),
    })?;

    tracing::debug!(entry, target, size = unsafe { code.GetBufferSize() }, "Shader compiled");
    Ok(code)
}

/// 序列化根签名并在设备上创建
///
/// 序列化失败时带上序列化器的错误输出。
pub fn create_root_signature(
    device: &ID3D12Device,
    desc: &D3D12_ROOT_SIGNATURE_DESC,
) -> Result<ID3D12RootSignature> {
    let mut signature: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;

    let result = unsafe {
        D3D12SerializeRootSignature(desc, D3D_ROOT_SIGNATURE_VERSION_1, &mut signature, Some(&mut errors))
    };
    if let Err(e) = result {
        let message = errors
            .as_ref()
            .map(blob_text)
            .unwrap_or_else(|| e.message().to_string());
        return Err(GraphicsError::Api {
            call: "D3D12SerializeRootSignature",
            code: e.code().0,
            message,
        }
        .into());
    }

    let signature = signature.ok_or_else(|| {
        GraphicsError::ResourceCreation("D3D12SerializeRootSignature produced no blob".to_string())
    })?;

    unsafe { device.CreateRootSignature(0, blob_bytes(&signature)) }.api("CreateRootSignature")
}

/// 不透明渲染目标的混合状态
pub fn opaque_blend_target() -> D3D12_RENDER_TARGET_BLEND_DESC {
    D3D12_RENDER_TARGET_BLEND_DESC {
        BlendEnable: FALSE,
        LogicOpEnable: FALSE,
        SrcBlend: D3D12_BLEND_ONE,
        DestBlend: D3D12_BLEND_ZERO,
        BlendOp: D3D12_BLEND_OP_ADD,
        SrcBlendAlpha: D3D12_BLEND_ONE,
        DestBlendAlpha: D3D12_BLEND_ZERO,
        BlendOpAlpha: D3D12_BLEND_OP_ADD,
        LogicOp: D3D12_LOGIC_OP_NOOP,
        RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
    }
}

/// 实心填充的光栅化状态
pub fn rasterizer_state(cull_mode: D3D12_CULL_MODE) -> D3D12_RASTERIZER_DESC {
    D3D12_RASTERIZER_DESC {
        FillMode: D3D12_FILL_MODE_SOLID,
        CullMode: cull_mode,
        FrontCounterClockwise: FALSE,
        DepthBias: D3D12_DEFAULT_DEPTH_BIAS,
        DepthBiasClamp: D3D12_DEFAULT_DEPTH_BIAS_CLAMP,
        SlopeScaledDepthBias: D3D12_DEFAULT_SLOPE_SCALED_DEPTH_BIAS,
        DepthClipEnable: TRUE,
        ..Default::default()
    }
}

/// 关闭深度和模板测试
pub fn disabled_depth_stencil() -> D3D12_DEPTH_STENCIL_DESC {
    let keep = D3D12_DEPTH_STENCILOP_DESC {
        StencilFailOp: D3D12_STENCIL_OP_KEEP,
        StencilDepthFailOp: D3D12_STENCIL_OP_KEEP,
        StencilPassOp: D3D12_STENCIL_OP_KEEP,
        StencilFunc: D3D12_COMPARISON_FUNC_ALWAYS,
    };
    D3D12_DEPTH_STENCIL_DESC {
        DepthEnable: FALSE,
        DepthWriteMask: D3D12_DEPTH_WRITE_MASK_ALL,
        DepthFunc: D3D12_COMPARISON_FUNC_ALWAYS,
        StencilEnable: FALSE,
        StencilReadMask: 0xFF,
        StencilWriteMask: 0xFF,
        FrontFace: keep,
        BackFace: keep,
    }
}

fn float_format(components: u32) -> DXGI_FORMAT {
    match components {
        1 => DXGI_FORMAT_R32_FLOAT,
        2 => DXGI_FORMAT_R32G32_FLOAT,
        3 => DXGI_FORMAT_R32G32B32_FLOAT,
        _ => DXGI_FORMAT_R32G32B32A32_FLOAT,
    }
}

/// 三角形顶点的输入布局
fn triangle_input_layout() -> [D3D12_INPUT_ELEMENT_DESC; 2] {
    Vertex::ATTRIBUTES.map(|attr| D3D12_INPUT_ELEMENT_DESC {
        SemanticName: PCSTR(attr.semantic.as_ptr() as *const u8),
        SemanticIndex: 0,
        Format: float_format(attr.components),
        InputSlot: 0,
        AlignedByteOffset: attr.offset,
        InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
        InstanceDataStepRate: 0,
    })
}

/// 三角形管线：空根签名 + 顶点色 PSO
pub struct TrianglePipeline {
    pub root_signature: ID3D12RootSignature,
    pub pipeline_state: ID3D12PipelineState,
}

impl TrianglePipeline {
    pub fn new(device: &ID3D12Device, rtv_format: DXGI_FORMAT) -> Result<Self> {
        // 1. 空根签名，只允许输入装配
        let root_desc = D3D12_ROOT_SIGNATURE_DESC {
            NumParameters: 0,
            pParameters: std::ptr::null(),
            NumStaticSamplers: 0,
            pStaticSamplers: std::ptr::null(),
            Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
        };
        let root_signature = create_root_signature(device, &root_desc)?;

        // 2. 着色器
        let vs = compile_shader(TRIANGLE_HLSL, "VSMain", "vs_5_0")?;
        let ps = compile_shader(TRIANGLE_HLSL, "PSMain", "ps_5_0")?;

        // 3. 输入布局
        let input_layout = triangle_input_layout();

        // 4. PSO
        let mut pso_desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC {
            pRootSignature: unsafe { std::mem::transmute_copy(&root_signature) },
            VS: shader_bytecode(&vs),
            PS: shader_bytecode(&ps),
            BlendState: D3D12_BLEND_DESC {
                AlphaToCoverageEnable: FALSE,
                IndependentBlendEnable: FALSE,
                RenderTarget: [opaque_blend_target(); 8],
            },
            SampleMask: u32::MAX,
            RasterizerState: rasterizer_state(D3D12_CULL_MODE_BACK),
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
        pso_desc.RTVFormats[0] = rtv_format;

        let pipeline_state: ID3D12PipelineState =
            unsafe { device.CreateGraphicsPipelineState(&pso_desc) }.api("CreateGraphicsPipelineState")?;

        tracing::debug!("Triangle pipeline created");

        Ok(Self {
            root_signature,
            pipeline_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_input_layout() {
        let layout = triangle_input_layout();
        assert_eq!(layout[0].Format, DXGI_FORMAT_R32G32B32_FLOAT);
        assert_eq!(layout[1].Format, DXGI_FORMAT_R32G32B32A32_FLOAT);
        assert_eq!(layout[1].AlignedByteOffset, 12);
    }
}
