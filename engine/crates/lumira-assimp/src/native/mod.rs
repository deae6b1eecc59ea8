//! assimp C ABI 的内存布局定义
//!
//! 字段顺序、宽度、数组上限都是与原生库编译结果对齐的二进制契约，
//! 以 assimp 5.0 的 C API 为准（aiString 容量 1024，颜色/纹理坐标
//! 通道各 8 个，aiScene 末尾带 private 指针，无 5.1 的
//! mTextureCoordsNames）。修改任何字段前先核对原生头文件。

use std::ffi::{c_char, c_int};

pub mod anim;
pub mod io;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

/// aiString 的数据容量（含结尾 NUL）
pub const AI_MAXLEN: usize = 1024;
/// 顶点颜色通道上限
pub const AI_MAX_NUMBER_OF_COLOR_SETS: usize = 8;
/// 纹理坐标通道上限
pub const AI_MAX_NUMBER_OF_TEXTURECOORDS: usize = 8;

/// 原生侧的布尔值
pub type AiBool = c_int;
pub const AI_TRUE: AiBool = 1;
pub const AI_FALSE: AiBool = 0;

/// 原生调用的返回码
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiReturn {
    Success = 0,
    Failure = -1,
    OutOfMemory = -3,
}

impl AiReturn {
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => AiReturn::Success,
            -3 => AiReturn::OutOfMemory,
            _ => AiReturn::Failure,
        }
    }
}

/// 长度前缀 + 定容字节区的原生字符串
///
/// 内容恒为 UTF-8/ASCII，data 在 length 处以 NUL 结尾。
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AiString {
    pub length: u32,
    pub data: [u8; AI_MAXLEN],
}

impl AiString {
    /// 超出容量的部分直接截断
    pub fn from_str(s: &str) -> Self {
        let mut out = Self::default();
        let len = s.len().min(AI_MAXLEN - 1);
        out.data[..len].copy_from_slice(&s.as_bytes()[..len]);
        out.length = len as u32;
        out
    }

    /// 深拷贝为托管字符串，非法 UTF-8 按替换字符处理
    pub fn to_string(&self) -> String {
        let len = (self.length as usize).min(AI_MAXLEN - 1);
        String::from_utf8_lossy(&self.data[..len]).into_owned()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl Default for AiString {
    fn default() -> Self {
        Self { length: 0, data: [0; AI_MAXLEN] }
    }
}

impl std::fmt::Debug for AiString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AiString").field(&self.to_string()).finish()
    }
}

/// 行主序的 4x4 矩阵（glam 是列主序，转换时转置）
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AiMatrix4x4 {
    pub a1: f32,
    pub a2: f32,
    pub a3: f32,
    pub a4: f32,
    pub b1: f32,
    pub b2: f32,
    pub b3: f32,
    pub b4: f32,
    pub c1: f32,
    pub c2: f32,
    pub c3: f32,
    pub c4: f32,
    pub d1: f32,
    pub d2: f32,
    pub d3: f32,
    pub d4: f32,
}

impl AiMatrix4x4 {
    pub const IDENTITY: Self = Self {
        a1: 1.0,
        a2: 0.0,
        a3: 0.0,
        a4: 0.0,
        b1: 0.0,
        b2: 1.0,
        b3: 0.0,
        b4: 0.0,
        c1: 0.0,
        c2: 0.0,
        c3: 1.0,
        c4: 0.0,
        d1: 0.0,
        d2: 0.0,
        d3: 0.0,
        d4: 1.0,
    };
}

impl From<glam::Mat4> for AiMatrix4x4 {
    fn from(m: glam::Mat4) -> Self {
        Self {
            a1: m.x_axis.x,
            a2: m.y_axis.x,
            a3: m.z_axis.x,
            a4: m.w_axis.x,
            b1: m.x_axis.y,
            b2: m.y_axis.y,
            b3: m.z_axis.y,
            b4: m.w_axis.y,
            c1: m.x_axis.z,
            c2: m.y_axis.z,
            c3: m.z_axis.z,
            c4: m.w_axis.z,
            d1: m.x_axis.w,
            d2: m.y_axis.w,
            d3: m.z_axis.w,
            d4: m.w_axis.w,
        }
    }
}

impl From<AiMatrix4x4> for glam::Mat4 {
    fn from(m: AiMatrix4x4) -> Self {
        glam::Mat4::from_cols_array(&[
            m.a1, m.b1, m.c1, m.d1, //
            m.a2, m.b2, m.c2, m.d2, //
            m.a3, m.b3, m.c3, m.d3, //
            m.a4, m.b4, m.c4, m.d4, //
        ])
    }
}

/// 运行时日志流：原生侧每条日志回调一次
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AiLogStream {
    pub callback: Option<unsafe extern "C" fn(message: *const c_char, user: *mut c_char)>,
    pub user: *mut c_char,
}

/// 导入属性集合的原生存储，内容对托管侧不透明
#[repr(C)]
pub struct AiPropertyStore {
    pub sentinel: c_char,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ai_string_roundtrip() {
        let s = AiString::from_str("scene_root");
        assert_eq!(s.length, 10);
        assert_eq!(s.to_string(), "scene_root");
        assert_eq!(s.data[10], 0);
    }

    #[test]
    fn ai_string_truncates_oversized_input() {
        let long = "x".repeat(AI_MAXLEN * 2);
        let s = AiString::from_str(&long);
        assert_eq!(s.length as usize, AI_MAXLEN - 1);
    }

    #[test]
    fn matrix_conversion_is_transposed() {
        let m = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let raw = AiMatrix4x4::from(m);
        // 行主序下平移分量位于每行末尾
        assert_eq!((raw.a4, raw.b4, raw.c4), (1.0, 2.0, 3.0));
        assert_eq!(glam::Mat4::from(raw), m);
    }

    #[test]
    fn layout_sizes_match_native_contract() {
        assert_eq!(size_of::<AiString>(), 4 + AI_MAXLEN);
        assert_eq!(size_of::<AiMatrix4x4>(), 64);
    }
}
