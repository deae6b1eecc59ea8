use std::ptr;

use lumira_scene::texture::Texture;

use crate::marshal::NativeMarshal;
use crate::mem;
use crate::native::AiString;
use crate::native::texture::{AI_HINT_MAX_LEN, AiTexel, AiTexture};

impl NativeMarshal for Texture {
    type Raw = AiTexture;

    fn project_into(&self, raw: &mut AiTexture) {
        raw.width = self.width;
        raw.height = self.height;
        raw.format_hint = pack_hint(&self.format_hint);
        raw.filename = AiString::from_str(&self.filename);
        // data 按字节搬运；纹素数组与字节数组的换算由 width/height 决定
        raw.data = mem::copy_slice_to_native(&self.data) as *mut AiTexel;
    }

    fn lift_from(&mut self, raw: &AiTexture) {
        *self = Self::default();
        self.width = raw.width;
        self.height = raw.height;
        self.format_hint = unpack_hint(&raw.format_hint);
        self.filename = raw.filename.to_string();
        self.data = unsafe { mem::copy_slice_from_native(raw.data as *const u8, raw.byte_len()) };
    }

    unsafe fn release(raw: *mut AiTexture, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe { mem::free(r.data) };
        r.data = ptr::null_mut();
        r.width = 0;
        r.height = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

/// 截断到 8 字节并补 NUL
fn pack_hint(hint: &str) -> [u8; AI_HINT_MAX_LEN] {
    let mut out = [0u8; AI_HINT_MAX_LEN];
    let n = hint.len().min(AI_HINT_MAX_LEN - 1);
    out[..n].copy_from_slice(&hint.as_bytes()[..n]);
    out
}

fn unpack_hint(hint: &[u8; AI_HINT_MAX_LEN]) -> String {
    let end = hint.iter().position(|&b| b == 0).unwrap_or(hint.len());
    String::from_utf8_lossy(&hint[..end]).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compressed_texture_roundtrip() {
        // height == 0：width 即总字节数
        let tex = Texture {
            width: 4,
            height: 0,
            format_hint: "png".into(),
            data: vec![0x89, b'P', b'N', b'G'],
            filename: "embedded.png".into(),
        };
        let raw = tex.project();
        assert_eq!(unsafe { (*raw).byte_len() }, 4);
        let back = Texture::lift(unsafe { &*raw });
        assert_eq!(back, tex);
        unsafe { Texture::release(raw, true) };
    }

    #[test]
    fn uncompressed_texture_roundtrip() {
        let tex = Texture {
            width: 2,
            height: 1,
            format_hint: "rgba8888".into(),
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
            filename: String::new(),
        };
        let raw = tex.project();
        assert_eq!(unsafe { (*raw).byte_len() }, 8);
        let back = Texture::lift(unsafe { &*raw });
        assert_eq!(back, tex);
        unsafe { Texture::release(raw, true) };
    }

    #[test]
    fn overlong_hint_is_truncated_with_nul() {
        let packed = pack_hint("rgba16161616");
        assert_eq!(packed[AI_HINT_MAX_LEN - 1], 0);
        assert_eq!(unpack_hint(&packed), "rgba1616");
    }
}
