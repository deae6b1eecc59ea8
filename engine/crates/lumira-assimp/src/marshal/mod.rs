//! marshal 引擎：托管实体与原生内存布局之间的投影 / 提升 / 释放
//!
//! 每种交换实体都实现一对对称操作：
//! - project：托管实例 → 原生布局。非空容器精确分配原生数组并写入
//!   当前长度，空容器写空指针而不是零长度分配；
//! - lift：原生布局 → 托管实例。所有字符串和数组深拷贝，调用结束后
//!   不保留任何原生引用，空指针字段得到空容器；
//! - release：按 project 的分配结构逐一释放，释放过的指针/计数字段
//!   就地清零，因此对同一块内存重复 release 是 no-op。
//!
//! 布局无嵌套分配的实体（[`NativeMarshal::DIRECT`]）省去结构化释放，
//! 它们的序列走 [`crate::mem::copy_slice_to_native`] 的整块拷贝路径。

use std::ptr;

use crate::mem;

pub mod anim;
pub mod material;
pub mod mesh;
pub mod misc;
pub mod scene;
pub mod texture;

/// 一种交换实体的双向转换契约
pub trait NativeMarshal: Default {
    /// 对应的原生布局
    type Raw;

    /// 布局可整块转移（无嵌套分配）时为 true，release 走默认的快路径
    const DIRECT: bool = false;

    /// 将自身写入一块原生内存。目标必须是零初始化的完整 Raw
    fn project_into(&self, raw: &mut Self::Raw);

    /// 从原生内存填充自身。已有内容先被整体清空，可对同一实例重复调用
    fn lift_from(&mut self, raw: &Self::Raw);

    /// 释放 project 在 raw 内写入的所有嵌套分配；
    /// free_top 为 true 时额外释放 raw 本身。空指针为 no-op
    ///
    /// # Safety
    /// raw 必须来自匹配的 project 调用，或为空指针
    unsafe fn release(raw: *mut Self::Raw, free_top: bool) {
        debug_assert!(Self::DIRECT, "structural entities must override release");
        if free_top {
            unsafe { mem::free(raw) };
        }
    }

    /// 分配一块新的原生内存并投影自身进去，所有权归调用方
    fn project(&self) -> *mut Self::Raw {
        let raw = mem::alloc_raw::<Self::Raw>();
        self.project_into(unsafe { &mut *raw });
        raw
    }

    /// 从原生内存提升出一个新的托管实例
    fn lift(raw: &Self::Raw) -> Self {
        let mut out = Self::default();
        out.lift_from(raw);
        out
    }
}

/// 把实体序列投影成原生的指针数组，每个元素独立分配。空序列返回空指针
pub fn project_ptr_array<T: NativeMarshal>(items: &[T]) -> *mut *mut T::Raw {
    if items.is_empty() {
        return ptr::null_mut();
    }
    let arr = mem::alloc_bytes(items.len() * size_of::<*mut T::Raw>()) as *mut *mut T::Raw;
    for (i, item) in items.iter().enumerate() {
        unsafe { arr.add(i).write(item.project()) };
    }
    arr
}

/// 深拷贝原生指针数组为托管序列。空指针返回空 Vec，空元素被跳过
///
/// # Safety
/// 非空时 arr 必须指向 count 个有效的元素指针
pub unsafe fn lift_ptr_array<T: NativeMarshal>(arr: *const *mut T::Raw, count: u32) -> Vec<T> {
    if arr.is_null() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let p = unsafe { *arr.add(i) };
        if !p.is_null() {
            out.push(T::lift(unsafe { &*p }));
        }
    }
    out
}

/// 释放指针数组及其全部元素，并把字段就地清零
///
/// # Safety
/// arr/count 必须由匹配的 [`project_ptr_array`] 写入
pub unsafe fn release_ptr_array<T: NativeMarshal>(arr: &mut *mut *mut T::Raw, count: &mut u32) {
    if !arr.is_null() {
        for i in 0..*count as usize {
            unsafe { T::release(*arr.add(i), true) };
        }
        unsafe { mem::free(*arr) };
        *arr = ptr::null_mut();
    }
    *count = 0;
}

#[cfg(test)]
mod test {
    use lumira_scene::mesh::Bone;

    use super::*;

    #[test]
    fn project_empty_sequence_is_null() {
        let bones: Vec<Bone> = vec![];
        assert!(project_ptr_array(&bones).is_null());
    }

    #[test]
    fn lift_null_array_is_empty() {
        let out: Vec<Bone> = unsafe { lift_ptr_array(ptr::null(), 4) };
        assert!(out.is_empty());
    }

    #[test]
    fn release_ptr_array_is_idempotent() {
        let bones = vec![Bone { name: "spine".into(), ..Default::default() }];
        let mut arr = project_ptr_array(&bones);
        let mut count = bones.len() as u32;
        unsafe {
            release_ptr_array::<Bone>(&mut arr, &mut count);
            assert!(arr.is_null());
            assert_eq!(count, 0);
            // 清零后的再次释放必须是 no-op
            release_ptr_array::<Bone>(&mut arr, &mut count);
        }
    }
}
