//! 自定义文件 IO 与导出结果的原生布局

use std::ffi::{c_char, c_void};

use crate::native::AiString;

pub type AiUserData = *mut c_char;

/// 原生侧打开的单个文件句柄与读写回调
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AiFile {
    pub read: Option<unsafe extern "C" fn(*mut AiFile, *mut c_char, usize, usize) -> usize>,
    pub write: Option<unsafe extern "C" fn(*mut AiFile, *const c_char, usize, usize) -> usize>,
    pub tell: Option<unsafe extern "C" fn(*mut AiFile) -> usize>,
    pub size: Option<unsafe extern "C" fn(*mut AiFile) -> usize>,
    pub seek: Option<unsafe extern "C" fn(*mut AiFile, usize, u32) -> i32>,
    pub flush: Option<unsafe extern "C" fn(*mut AiFile)>,
    pub user_data: AiUserData,
}

/// 文件系统替换表：导入/导出期间原生库用它打开/关闭文件
///
/// 传空指针表示使用原生库默认的文件访问。
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AiFileIO {
    pub open: Option<unsafe extern "C" fn(*mut AiFileIO, *const c_char, *const c_char) -> *mut AiFile>,
    pub close: Option<unsafe extern "C" fn(*mut AiFileIO, *mut AiFile)>,
    pub user_data: AiUserData,
}

/// 内存导出的结果。多文件格式时通过 next 构成链表
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiExportDataBlob {
    pub size: usize,
    pub data: *mut c_void,
    pub name: AiString,
    pub next: *mut AiExportDataBlob,
}
