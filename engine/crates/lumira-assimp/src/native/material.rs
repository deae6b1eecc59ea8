use std::ffi::c_char;

use crate::native::AiString;

/// 单条材质属性：key + (semantic, index) 定位，值为原始字节
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiMaterialProperty {
    pub key: AiString,
    /// 纹理属性的用途，非纹理属性为 0
    pub semantic: u32,
    /// 同一用途下的层号
    pub index: u32,
    pub data_length: u32,
    pub property_type: u32,
    pub data: *mut c_char,
}

/// 材质：属性指针数组
///
/// num_allocated 是原生侧数组的容量，托管侧投影时与 num_properties 相同。
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiMaterial {
    pub properties: *mut *mut AiMaterialProperty,
    pub num_properties: u32,
    pub num_allocated: u32,
}
