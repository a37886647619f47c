//! DirectX 12 图形 API 实现模块
//!
//! - `context`：设备、命令队列、交换链、描述符堆和 fence
//! - `descriptor`：描述符堆封装
//! - `buffer`：上传堆缓冲和资源屏障
//! - `pipeline`：着色器编译和三角形管线
//! - `imgui_renderer`：ImGui 绘制数据的 D3D12 后端
//! - `renderer`：逐帧协议、调整大小和关闭

pub mod buffer;
pub mod context;
pub mod descriptor;
pub mod imgui_renderer;
pub mod pipeline;
pub mod renderer;

// 重新导出常用类型
pub use context::Dx12Context;
pub use renderer::Renderer;
