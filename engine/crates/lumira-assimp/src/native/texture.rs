use crate::native::AiString;

/// 格式提示的字节数（含结尾 NUL）
pub const AI_HINT_MAX_LEN: usize = 9;

/// 一个纹素，BGRA 顺序
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AiTexel {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

/// 内嵌纹理
///
/// height == 0 表示压缩格式，此时 width 是总字节数，data 存放原始
/// 文件字节；否则 data 是 width * height 个纹素。
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiTexture {
    pub width: u32,
    pub height: u32,
    pub format_hint: [u8; AI_HINT_MAX_LEN],
    pub data: *mut AiTexel,
    pub filename: AiString,
}

impl AiTexture {
    /// data 指向的总字节数
    #[inline]
    pub fn byte_len(&self) -> usize {
        if self.height == 0 {
            self.width as usize
        } else {
            self.width as usize * self.height as usize * size_of::<AiTexel>()
        }
    }
}
