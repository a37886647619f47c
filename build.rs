/// Build script for BlueD Render
///
/// # Shader Compilation Strategy:
/// - HLSL sources are embedded with `include_str!` and compiled at runtime via D3DCompile
fn main() {
    // Trigger rebuild if shader files change
    println!("cargo:rerun-if-changed=src/gfx/dx12/shaders/triangle.hlsl");
    println!("cargo:rerun-if-changed=src/gfx/dx12/shaders/imgui.hlsl");
}
