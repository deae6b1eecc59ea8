//! 非托管内存原语
//!
//! marshal 引擎的所有分配都经过这里，走 libc 的 malloc/free 堆。
//! 原生库自己返回的内存（导入的场景、导出 blob）归原生库所有，
//! 必须经由对应的原生释放入口归还，不允许用这里的 free。
//!
//! 约定：所有操作对空指针都是 no-op 或返回空结果，不会出错。

use std::ptr;

/// 分配 size 字节的零初始化原生内存。size == 0 返回空指针
///
/// 分配失败直接 panic：继续运行只会破坏后续写入。
pub fn alloc_bytes(size: usize) -> *mut u8 {
    if size == 0 {
        return ptr::null_mut();
    }
    let p = unsafe { libc::calloc(1, size) } as *mut u8;
    assert!(!p.is_null(), "native allocation of {size} bytes failed");
    p
}

/// 为一个 T 分配零初始化内存
#[inline]
pub fn alloc_raw<T>() -> *mut T {
    alloc_bytes(size_of::<T>()) as *mut T
}

/// 释放本模块分配的内存。空指针为 no-op
///
/// # Safety
/// ptr 必须来自 [`alloc_bytes`]/[`alloc_raw`] 系列，且未被释放过
pub unsafe fn free<T>(ptr: *mut T) {
    if !ptr.is_null() {
        unsafe { libc::free(ptr as *mut libc::c_void) };
    }
}

/// 读取地址处的值。空指针返回 None
///
/// # Safety
/// 非空时 ptr 必须指向一个有效的 T
pub unsafe fn read<T: Copy>(ptr: *const T) -> Option<T> {
    if ptr.is_null() { None } else { Some(unsafe { ptr.read() }) }
}

/// 写入值到地址。空指针为 no-op
///
/// # Safety
/// 非空时 dst 必须可写且对齐
pub unsafe fn write<T>(dst: *mut T, value: T) {
    if !dst.is_null() {
        unsafe { dst.write(value) };
    }
}

/// 将 slice 深拷贝为新的原生数组。空 slice 返回空指针，而不是零长度分配
pub fn copy_slice_to_native<T: Copy>(src: &[T]) -> *mut T {
    if src.is_empty() {
        return ptr::null_mut();
    }
    let dst = alloc_bytes(size_of_val(src)) as *mut T;
    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len()) };
    dst
}

/// 从原生数组深拷贝 count 个元素。空指针返回空 Vec，绝不越过 count 读取
///
/// # Safety
/// 非空时 src 必须指向至少 count 个有效的 T
pub unsafe fn copy_slice_from_native<T: Copy>(src: *const T, count: usize) -> Vec<T> {
    if src.is_null() || count == 0 {
        return Vec::new();
    }
    unsafe { std::slice::from_raw_parts(src, count) }.to_vec()
}

/// 在同一实体的多条同长属性流之间复用的暂存缓冲
///
/// 每次 stage 先把缓冲整体覆写为本次数据，再拷出到新的原生数组，
/// 上一条流的内容不会残留到下一条。
#[derive(Default)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 经由暂存缓冲将 src 拷贝为新的原生数组。空 slice 返回空指针
    pub fn stage_to_native<T: Copy>(&mut self, src: &[T]) -> *mut T {
        if src.is_empty() {
            return ptr::null_mut();
        }
        let bytes = size_of_val(src);
        self.buf.clear();
        self.buf.resize(bytes, 0);
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr() as *const u8, self.buf.as_mut_ptr(), bytes);
        }
        let dst = alloc_bytes(bytes) as *mut T;
        unsafe {
            ptr::copy_nonoverlapping(self.buf.as_ptr(), dst as *mut u8, bytes);
        }
        dst
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_size_alloc_is_null() {
        assert!(alloc_bytes(0).is_null());
    }

    #[test]
    fn free_null_is_noop() {
        unsafe { free::<u32>(ptr::null_mut()) };
    }

    #[test]
    fn read_write_roundtrip() {
        let p = alloc_raw::<u64>();
        unsafe {
            write(p, 0xDEAD_BEEFu64);
            assert_eq!(read(p as *const u64), Some(0xDEAD_BEEF));
            free(p);
        }
    }

    #[test]
    fn read_null_returns_none() {
        assert_eq!(unsafe { read::<u32>(ptr::null()) }, None);
    }

    #[test]
    fn empty_slice_copies_to_null() {
        assert!(copy_slice_to_native::<f32>(&[]).is_null());
    }

    #[test]
    fn slice_roundtrip() {
        let src = [1.0f32, 2.0, 3.0];
        let p = copy_slice_to_native(&src);
        let back = unsafe { copy_slice_from_native(p, src.len()) };
        assert_eq!(back, src);
        unsafe { free(p) };
    }

    #[test]
    fn copy_from_null_is_empty() {
        let v = unsafe { copy_slice_from_native::<u32>(ptr::null(), 5) };
        assert!(v.is_empty());
    }

    #[test]
    fn scratch_buffer_does_not_leak_previous_stream() {
        let mut scratch = ScratchBuffer::new();
        let hot = [7.0f32, 8.0, 9.0];
        let cold = [0.0f32, 0.0, 0.0];

        let p_hot = scratch.stage_to_native(&hot);
        let p_cold = scratch.stage_to_native(&cold);
        let back = unsafe { copy_slice_from_native(p_cold, cold.len()) };
        assert_eq!(back, cold);
        unsafe {
            free(p_hot);
            free(p_cold);
        }
    }
}
