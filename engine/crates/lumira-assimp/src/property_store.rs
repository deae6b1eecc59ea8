//! 原生导入属性集的 RAII 包装

use std::ffi::CString;

use crate::library::{AssimpLibrary, InteropError, Result};
use crate::native::{AiMatrix4x4, AiPropertyStore};

/// 原生侧的导入属性集，RAII 释放
///
/// 属性在导入调用里生效，如 "PP_GSN_MAX_SMOOTHING_ANGLE"。
pub struct PropertyStore {
    pub(crate) ptr: *mut AiPropertyStore,
}

impl PropertyStore {
    pub(crate) fn as_ptr(&self) -> *mut AiPropertyStore {
        self.ptr
    }

    pub fn set_int(&self, name: &str, value: i32) -> Result<()> {
        AssimpLibrary::get().set_property_int(self.ptr, &property_name(name)?, value)
    }

    pub fn set_float(&self, name: &str, value: f32) -> Result<()> {
        AssimpLibrary::get().set_property_float(self.ptr, &property_name(name)?, value)
    }

    pub fn set_string(&self, name: &str, value: &str) -> Result<()> {
        AssimpLibrary::get().set_property_string(self.ptr, &property_name(name)?, value)
    }

    pub fn set_matrix(&self, name: &str, value: &AiMatrix4x4) -> Result<()> {
        AssimpLibrary::get().set_property_matrix(self.ptr, &property_name(name)?, value)
    }
}

impl Drop for PropertyStore {
    fn drop(&mut self) {
        AssimpLibrary::get().release_property_store(self.ptr);
    }
}

fn property_name(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| InteropError::InvalidArgument("property name contains NUL"))
}

