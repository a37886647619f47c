//! 资源尺寸计算
//!
//! 上传缓冲的对齐规则和流式缓冲的扩容策略。与图形 API 无关，只做整数运算。

/// 纹理上传时每行数据的对齐（`D3D12_TEXTURE_DATA_PITCH_ALIGNMENT`）
pub const TEXTURE_PITCH_ALIGNMENT: u32 = 256;

/// 向上对齐到 `alignment`（必须是 2 的幂）
pub fn align_up(value: u32, alignment: u32) -> u32 {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// 纹理经上传缓冲拷贝时的布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureUploadLayout {
    pub width: u32,
    pub height: u32,
    /// 源数据每行的字节数
    pub row_bytes: u32,
    /// 上传缓冲中每行的字节数（已对齐）
    pub row_pitch: u32,
    /// 上传缓冲总大小
    pub total_size: u64,
}

impl TextureUploadLayout {
    /// RGBA8 纹理的上传布局
    pub fn rgba8(width: u32, height: u32) -> Self {
        let row_bytes = width * 4;
        let row_pitch = align_up(row_bytes, TEXTURE_PITCH_ALIGNMENT);
        Self {
            width,
            height,
            row_bytes,
            row_pitch,
            total_size: row_pitch as u64 * height as u64,
        }
    }

    /// 第 `row` 行在源数据中的字节范围
    pub fn source_row(&self, row: u32) -> std::ops::Range<usize> {
        let start = (row * self.row_bytes) as usize;
        start..start + self.row_bytes as usize
    }

    /// 第 `row` 行在上传缓冲中的偏移
    pub fn upload_offset(&self, row: u32) -> usize {
        (row * self.row_pitch) as usize
    }
}

/// 流式缓冲的容量（单位：元素个数）
///
/// 需求超过容量时扩容为“需求 + 余量”，避免每帧都重建缓冲。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity {
    capacity: usize,
    headroom: usize,
}

impl BufferCapacity {
    /// ImGui 顶点缓冲的扩容余量
    pub const IMGUI_VERTEX_HEADROOM: usize = 5000;
    /// ImGui 索引缓冲的扩容余量
    pub const IMGUI_INDEX_HEADROOM: usize = 10000;

    /// 尚未分配的容量
    pub fn new(headroom: usize) -> Self {
        Self { capacity: 0, headroom }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 确保能容纳 `required` 个元素
    ///
    /// 需要重新分配时返回新的容量。
    pub fn reserve(&mut self, required: usize) -> Option<usize> {
        if self.capacity != 0 && required <= self.capacity {
            return None;
        }
        self.capacity = required + self.headroom;
        Some(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 256), 0);
        assert_eq!(align_up(1, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
    }

    #[test]
    fn test_rgba8_layout_pads_rows() {
        // 512 像素宽的行恰好是 256 的倍数
        let aligned = TextureUploadLayout::rgba8(512, 64);
        assert_eq!(aligned.row_pitch, 2048);
        assert_eq!(aligned.total_size, 2048 * 64);

        let padded = TextureUploadLayout::rgba8(100, 10);
        assert_eq!(padded.row_bytes, 400);
        assert_eq!(padded.row_pitch, 512);
        assert_eq!(padded.total_size, 5120);
        assert_eq!(padded.source_row(2), 800..1200);
        assert_eq!(padded.upload_offset(2), 1024);
    }

    #[test]
    fn test_capacity_grows_with_headroom() {
        let mut vb = BufferCapacity::new(BufferCapacity::IMGUI_VERTEX_HEADROOM);
        assert_eq!(vb.reserve(100), Some(5100));
        assert_eq!(vb.reserve(5100), None);
        assert_eq!(vb.reserve(5101), Some(10101));
        assert_eq!(vb.capacity(), 10101);
    }

    #[test]
    fn test_first_reserve_always_allocates() {
        let mut ib = BufferCapacity::new(BufferCapacity::IMGUI_INDEX_HEADROOM);
        assert_eq!(ib.reserve(0), Some(10000));
        assert_eq!(ib.reserve(10), None);
    }
}
