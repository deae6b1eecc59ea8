/// 内嵌在场景文件中的纹理
///
/// `height == 0` 表示压缩格式（png/jpg 等），此时 `width` 是字节数，
/// `data` 是原始文件字节；否则 `data` 是 `width * height` 个 BGRA 纹素
/// 按字节展开的结果。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// 最多 8 个字符的格式提示，如 "png"、"rgba8888"
    pub format_hint: String,
    pub data: Vec<u8>,
    pub filename: String,
}

// tools
impl Texture {
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.height == 0
    }

    /// data 的期望字节数：压缩时为 width，否则 width * height * 4
    #[inline]
    pub fn expected_byte_len(&self) -> usize {
        if self.is_compressed() {
            self.width as usize
        } else {
            self.width as usize * self.height as usize * 4
        }
    }
}
