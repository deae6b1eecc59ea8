//! 进程级的原生库门面
//!
//! 全进程最多加载一个原生 asset-import 库。[`AssimpLibrary::get`] 返回
//! 懒构造的单例，所有原生调用都经由它的函数表分发；重新 load 时旧库
//! 先完全关闭再打开新库，对调用方表现为原子替换。

use std::ffi::{CStr, CString, c_char, c_int};
use std::fmt;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, RwLock};

use glam::{Vec3, Vec4};
use lumira_scene::animation::Quaternion;
use lumira_scene::material::{
    MaterialProperty, TextureFlags, TextureMapMode, TextureMapping, TextureOp, TextureSlot, TextureType,
};
use lumira_scene::scene::Scene;
use scopeguard::defer;

use crate::loader::{FunctionTable, LoadError, LoadPolicy, Platform, PlatformLibrary};
use crate::logging::AttachedStream;
use crate::marshal::NativeMarshal;
use crate::mem;
use crate::native::io::AiFileIO;
use crate::native::material::{AiMaterial, AiMaterialProperty};
use crate::native::scene::AiScene;
use crate::native::{AI_FALSE, AI_TRUE, AiMatrix4x4, AiPropertyStore, AiReturn, AiString};
use crate::postprocess::PostProcessFlags;
use crate::property_store::PropertyStore;

/// 覆盖默认库名/路径的环境变量
pub const ENV_LIBRARY_PATH: &str = "LUMIRA_ASSIMP_PATH";

/// 默认的裸库名，经 [`Platform::decorate`] 补全
pub const DEFAULT_LIBRARY_NAME: &str = "assimp";

/// 原生调用层的错误
#[derive(Debug)]
pub enum InteropError {
    /// 尚未 load 或已 unload
    NotLoaded,
    /// 库已加载但缺少该入口
    MissingEntryPoint(&'static str),
    /// 调用方传入的参数不合法，未发起原生调用
    InvalidArgument(&'static str),
    /// 原生入口返回失败
    NativeCallFailed(String),
    /// 装载阶段的失败
    Load(LoadError),
}

impl fmt::Display for InteropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteropError::NotLoaded => write!(f, "native library is not loaded"),
            InteropError::MissingEntryPoint(name) => write!(f, "native entry point missing: {name}"),
            InteropError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            InteropError::NativeCallFailed(msg) => write!(f, "native call failed: {msg}"),
            InteropError::Load(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InteropError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InteropError::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for InteropError {
    fn from(e: LoadError) -> Self {
        InteropError::Load(e)
    }
}

pub type Result<T> = std::result::Result<T, InteropError>;

/// 驻留在原生内存中的场景句柄
///
/// 只作为 import -> postprocess -> export -> release 链路的不透明凭据，
/// 托管侧不解引用由原生库返回的这块内存，除非显式 lift。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandle(*const AiScene);

impl SceneHandle {
    pub const NULL: SceneHandle = SceneHandle(ptr::null());

    // getter
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
    #[inline]
    pub fn as_ptr(&self) -> *const AiScene {
        self.0
    }
}

/// 内存导出产物的一个文件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBlob {
    /// 多文件格式下的文件名，主文件为空
    pub name: String,
    pub data: Vec<u8>,
}

struct LoadedLibrary {
    lib: PlatformLibrary,
    fns: FunctionTable,
}

/// 原生库门面单例
pub struct AssimpLibrary {
    state: RwLock<Option<LoadedLibrary>>,
    /// 详细日志开关的托管镜像，读取不经过原生调用
    verbose: AtomicBool,
    /// 已注册给原生库的日志流，unload 时统一注销
    log_streams: Mutex<Vec<AttachedStream>>,
    /// 库被卸载前收到通知的观察者
    unload_observers: Mutex<Vec<Box<dyn Fn() + Send>>>,
}

static INSTANCE: OnceLock<AssimpLibrary> = OnceLock::new();

/// 取字段对应的函数指针，缺失则报 MissingEntryPoint
macro_rules! native_fn {
    ($fns:expr, $field:ident) => {
        $fns.$field.ok_or(InteropError::MissingEntryPoint(stringify!($field)))?
    };
}

// init & destroy
impl AssimpLibrary {
    fn new() -> Self {
        Self {
            state: RwLock::new(None),
            verbose: AtomicBool::new(false),
            log_streams: Mutex::new(Vec::new()),
            unload_observers: Mutex::new(Vec::new()),
        }
    }

    /// 进程级单例。首次访问时构造，构造本身不加载原生库
    pub fn get() -> &'static AssimpLibrary {
        INSTANCE.get_or_init(AssimpLibrary::new)
    }

    /// 按平台惯例补全库名并加载，已加载时先完全卸载旧库
    ///
    /// [`LoadPolicy::Fatal`] 下缺少任何必需入口都会失败；
    /// [`LoadPolicy::Tolerant`] 下允许打不开或缺入口，后续逐调用报错。
    pub fn load(&self, name: &str, policy: LoadPolicy) -> Result<()> {
        let path = Platform::host().decorate(name);
        let mut state = self.state.write().unwrap();

        // 旧库先走完整的卸载序列
        if let Some(old) = state.take() {
            self.teardown(old);
        }

        let lib = PlatformLibrary::open(&path, policy)?;
        let fns = FunctionTable::resolve(&lib);
        if policy == LoadPolicy::Fatal {
            let missing = fns.missing();
            if !missing.is_empty() {
                return Err(LoadError::MissingSymbols { path, symbols: missing }.into());
            }
        }

        // 把托管镜像的日志状态同步到新库
        if let Some(f) = fns.enable_verbose_logging {
            unsafe { f(if self.verbose.load(Ordering::Relaxed) { AI_TRUE } else { AI_FALSE }) };
        }
        if let Some(f) = fns.attach_log_stream {
            for stream in self.log_streams.lock().unwrap().iter() {
                unsafe { f(stream.as_ptr()) };
            }
        }

        *state = Some(LoadedLibrary { lib, fns });
        Ok(())
    }

    /// 用 `LUMIRA_ASSIMP_PATH`（缺省为 "assimp"）加载
    pub fn load_default(&self) -> Result<()> {
        let name = std::env::var(ENV_LIBRARY_PATH).unwrap_or_else(|_| DEFAULT_LIBRARY_NAME.to_string());
        self.load(&name, LoadPolicy::Fatal)
    }

    /// 卸载原生库。重复调用是 no-op
    pub fn unload(&self) {
        let mut state = self.state.write().unwrap();
        if let Some(old) = state.take() {
            self.teardown(old);
        }
    }

    /// 通知观察者、注销日志流并关闭动态库
    fn teardown(&self, mut old: LoadedLibrary) {
        for observer in self.unload_observers.lock().unwrap().iter() {
            observer();
        }
        let mut streams = self.log_streams.lock().unwrap();
        if !streams.is_empty() {
            if let Some(f) = old.fns.detach_all_log_streams {
                unsafe { f() };
            }
        }
        streams.clear();
        old.fns = FunctionTable::default();
        old.lib.close();
    }

    /// 注册一个在库卸载前被调用的观察者
    ///
    /// 回调在卸载序列内执行，期间不得再调用门面的 load/unload。
    pub fn on_unload(&self, observer: impl Fn() + Send + 'static) {
        self.unload_observers.lock().unwrap().push(Box::new(observer));
    }
}

// getter
impl AssimpLibrary {
    pub fn is_loaded(&self) -> bool {
        self.state.read().unwrap().as_ref().is_some_and(|s| s.lib.is_open())
    }

    /// 已加载库的实际路径
    pub fn library_path(&self) -> Option<String> {
        self.state.read().unwrap().as_ref().map(|s| s.lib.path().to_string())
    }
}

impl AssimpLibrary {
    /// 在读锁内对函数表执行一次调用
    fn with_fns<R>(&self, f: impl FnOnce(&FunctionTable) -> Result<R>) -> Result<R> {
        let state = self.state.read().unwrap();
        match state.as_ref() {
            Some(loaded) => f(&loaded.fns),
            None => Err(InteropError::NotLoaded),
        }
    }
}

// import
impl AssimpLibrary {
    /// 从文件导入，返回原生侧拥有的场景句柄
    pub fn import_file(&self, path: &str, flags: PostProcessFlags) -> Result<SceneHandle> {
        self.import_file_with_io(path, flags, None, None)
    }

    /// 从文件导入，可替换文件访问与导入属性
    pub fn import_file_with_io(
        &self,
        path: &str,
        flags: PostProcessFlags,
        io: Option<&mut AiFileIO>,
        props: Option<&PropertyStore>,
    ) -> Result<SceneHandle> {
        if path.is_empty() {
            return Err(InteropError::InvalidArgument("path must not be empty"));
        }
        let c_path = CString::new(path).map_err(|_| InteropError::InvalidArgument("path contains NUL"))?;
        let io_ptr = io.map_or(ptr::null_mut(), |t| t as *mut AiFileIO);
        let props_ptr = props.map_or(ptr::null(), |p| p.as_ptr().cast_const());
        self.with_fns(|fns| {
            let f = native_fn!(fns, import_file_ex_with_properties);
            let scene = unsafe { f(c_path.as_ptr(), flags.bits(), io_ptr, props_ptr) };
            if scene.is_null() {
                return Err(InteropError::NativeCallFailed(last_native_error(fns)));
            }
            Ok(SceneHandle(scene))
        })
    }

    /// 从内存缓冲导入。hint 是不带点的扩展名，可为空
    pub fn import_from_memory(
        &self,
        buffer: &[u8],
        flags: PostProcessFlags,
        hint: &str,
        props: Option<&PropertyStore>,
    ) -> Result<SceneHandle> {
        if buffer.is_empty() {
            return Err(InteropError::InvalidArgument("buffer must not be empty"));
        }
        let len = buffer_len_u32(buffer.len())?;
        let c_hint = CString::new(hint).map_err(|_| InteropError::InvalidArgument("hint contains NUL"))?;
        let props_ptr = props.map_or(ptr::null(), |p| p.as_ptr().cast_const());
        self.with_fns(|fns| {
            let f = native_fn!(fns, import_file_from_memory_with_properties);
            // 原生库在调用期间拷贝缓冲，切片可直接借出，无需暂存
            let scene = unsafe {
                f(buffer.as_ptr() as *const c_char, len, flags.bits(), c_hint.as_ptr(), props_ptr)
            };
            if scene.is_null() {
                return Err(InteropError::NativeCallFailed(last_native_error(fns)));
            }
            Ok(SceneHandle(scene))
        })
    }

    /// 导入并立即提升为托管场景，原生内存在返回前释放
    pub fn import(&self, path: &str, flags: PostProcessFlags) -> Result<Scene> {
        let handle = self.import_file(path, flags)?;
        let scene = Scene::lift(unsafe { &*handle.as_ptr() });
        self.release_import(handle)?;
        Ok(scene)
    }

    /// 释放一个由导入调用返回的场景。空句柄是 no-op
    pub fn release_import(&self, handle: SceneHandle) -> Result<()> {
        if handle.is_null() {
            return Ok(());
        }
        self.with_fns(|fns| {
            let f = native_fn!(fns, release_import);
            unsafe { f(handle.as_ptr()) };
            Ok(())
        })
    }

    /// 对已导入的场景追加后处理步骤
    pub fn apply_post_processing(&self, handle: SceneHandle, flags: PostProcessFlags) -> Result<SceneHandle> {
        if handle.is_null() {
            return Err(InteropError::InvalidArgument("scene handle is null"));
        }
        self.with_fns(|fns| {
            let f = native_fn!(fns, apply_post_processing);
            let scene = unsafe { f(handle.as_ptr(), flags.bits()) };
            if scene.is_null() {
                return Err(InteropError::NativeCallFailed(last_native_error(fns)));
            }
            Ok(SceneHandle(scene))
        })
    }

    /// 在原生内存中深拷贝场景。空输入直接返回空句柄，不发起原生调用
    pub fn copy_scene(&self, handle: SceneHandle) -> Result<SceneHandle> {
        if handle.is_null() {
            return Ok(SceneHandle::NULL);
        }
        self.with_fns(|fns| {
            let f = native_fn!(fns, copy_scene);
            let mut out: *mut AiScene = ptr::null_mut();
            unsafe { f(handle.as_ptr(), &mut out) };
            Ok(SceneHandle(out))
        })
    }

    /// 释放 [`Self::copy_scene`] 的产物
    pub fn free_scene(&self, handle: SceneHandle) -> Result<()> {
        if handle.is_null() {
            return Ok(());
        }
        self.with_fns(|fns| {
            let f = native_fn!(fns, free_scene);
            unsafe { f(handle.as_ptr()) };
            Ok(())
        })
    }
}

// export
impl AssimpLibrary {
    /// 把原生场景导出成内存中的文件集合
    pub fn export_to_blob(
        &self,
        handle: SceneHandle,
        format_id: &str,
        flags: PostProcessFlags,
    ) -> Result<Vec<ExportBlob>> {
        if handle.is_null() {
            return Err(InteropError::InvalidArgument("scene handle is null"));
        }
        if format_id.is_empty() {
            return Err(InteropError::InvalidArgument("format id must not be empty"));
        }
        let c_format =
            CString::new(format_id).map_err(|_| InteropError::InvalidArgument("format id contains NUL"))?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, export_scene_to_blob);
            let head = unsafe { f(handle.as_ptr(), c_format.as_ptr(), flags.bits()) };
            if head.is_null() {
                return Err(InteropError::NativeCallFailed(last_native_error(fns)));
            }
            // 多文件格式通过 next 串成链表，整链由头指针一次释放
            let mut blobs = Vec::new();
            let mut cursor = head;
            while !cursor.is_null() {
                let blob = unsafe { &*cursor };
                blobs.push(ExportBlob {
                    name: blob.name.to_string(),
                    data: unsafe { mem::copy_slice_from_native(blob.data as *const u8, blob.size) },
                });
                cursor = blob.next;
            }
            if let Some(release) = fns.release_export_blob {
                unsafe { release(head) };
            }
            Ok(blobs)
        })
    }

    /// 把原生场景写成文件
    pub fn export_to_file(
        &self,
        handle: SceneHandle,
        format_id: &str,
        path: &str,
        flags: PostProcessFlags,
    ) -> Result<()> {
        if handle.is_null() {
            return Err(InteropError::InvalidArgument("scene handle is null"));
        }
        if format_id.is_empty() {
            return Err(InteropError::InvalidArgument("format id must not be empty"));
        }
        if path.is_empty() {
            return Err(InteropError::InvalidArgument("path must not be empty"));
        }
        let c_format =
            CString::new(format_id).map_err(|_| InteropError::InvalidArgument("format id contains NUL"))?;
        let c_path = CString::new(path).map_err(|_| InteropError::InvalidArgument("path contains NUL"))?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, export_scene);
            let ret = unsafe { f(handle.as_ptr(), c_format.as_ptr(), c_path.as_ptr(), flags.bits()) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => Ok(()),
                _ => Err(InteropError::NativeCallFailed(last_native_error(fns))),
            }
        })
    }

    /// 把原生场景写成文件，文件访问经由调用方提供的回调表
    pub fn export_to_file_with_io(
        &self,
        handle: SceneHandle,
        format_id: &str,
        path: &str,
        flags: PostProcessFlags,
        io: Option<&mut AiFileIO>,
    ) -> Result<()> {
        if handle.is_null() {
            return Err(InteropError::InvalidArgument("scene handle is null"));
        }
        if format_id.is_empty() {
            return Err(InteropError::InvalidArgument("format id must not be empty"));
        }
        if path.is_empty() {
            return Err(InteropError::InvalidArgument("path must not be empty"));
        }
        let c_format =
            CString::new(format_id).map_err(|_| InteropError::InvalidArgument("format id contains NUL"))?;
        let c_path = CString::new(path).map_err(|_| InteropError::InvalidArgument("path contains NUL"))?;
        // 空回调表由原生侧回落到默认文件访问
        let io_ptr = io.map_or(ptr::null_mut(), |t| t as *mut AiFileIO);
        self.with_fns(|fns| {
            let f = native_fn!(fns, export_scene_ex);
            let ret = unsafe { f(handle.as_ptr(), c_format.as_ptr(), c_path.as_ptr(), io_ptr, flags.bits()) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => Ok(()),
                _ => Err(InteropError::NativeCallFailed(last_native_error(fns))),
            }
        })
    }

    /// 把托管场景投影到原生内存并导出成文件。
    /// 投影产生的内存在所有返回路径上都会释放
    pub fn export(&self, scene: &Scene, format_id: &str, path: &str, flags: PostProcessFlags) -> Result<()> {
        if format_id.is_empty() {
            return Err(InteropError::InvalidArgument("format id must not be empty"));
        }
        if path.is_empty() {
            return Err(InteropError::InvalidArgument("path must not be empty"));
        }
        let raw = scene.project();
        defer! {
            unsafe { Scene::release(raw, true) };
        }
        self.export_to_file(SceneHandle(raw), format_id, path, flags)
    }

    /// 扩展名（形如 ".fbx"）是否受支持
    pub fn is_extension_supported(&self, extension: &str) -> Result<bool> {
        let c_ext =
            CString::new(extension).map_err(|_| InteropError::InvalidArgument("extension contains NUL"))?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, is_extension_supported);
            Ok(unsafe { f(c_ext.as_ptr()) } == AI_TRUE)
        })
    }

    /// 全部受支持的导入扩展名，分号分隔
    pub fn extension_list(&self) -> Result<String> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_extension_list);
            let mut out = AiString::default();
            unsafe { f(&mut out) };
            Ok(out.to_string())
        })
    }
}

// material accessors
impl AssimpLibrary {
    /// 查颜色属性。键不存在时为 None
    pub fn material_color(
        &self,
        mat: &AiMaterial,
        key: &str,
        semantic: TextureType,
        index: u32,
    ) -> Result<Option<Vec4>> {
        let c_key = material_key(key)?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_color);
            let scratch = mem::alloc_raw::<Vec4>();
            defer! {
                unsafe { mem::free(scratch) };
            }
            let ret = unsafe { f(mat, c_key.as_ptr(), semantic as u32, index, scratch) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => Ok(Some(unsafe { *scratch })),
                _ => Ok(None),
            }
        })
    }

    /// 查浮点数组属性，最多取 max 个；实际返回原生报告的有效长度
    pub fn material_float_array(
        &self,
        mat: &AiMaterial,
        key: &str,
        semantic: TextureType,
        index: u32,
        max: u32,
    ) -> Result<Vec<f32>> {
        if max == 0 {
            return Err(InteropError::InvalidArgument("max must be positive"));
        }
        let c_key = material_key(key)?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_float_array);
            let scratch = mem::alloc_bytes(max as usize * size_of::<f32>()) as *mut f32;
            defer! {
                unsafe { mem::free(scratch) };
            }
            let mut count = max;
            let ret = unsafe { f(mat, c_key.as_ptr(), semantic as u32, index, scratch, &mut count) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => {
                    let valid = count.min(max) as usize;
                    Ok(unsafe { mem::copy_slice_from_native(scratch, valid) })
                }
                _ => Ok(Vec::new()),
            }
        })
    }

    /// 查整型数组属性
    pub fn material_int_array(
        &self,
        mat: &AiMaterial,
        key: &str,
        semantic: TextureType,
        index: u32,
        max: u32,
    ) -> Result<Vec<i32>> {
        if max == 0 {
            return Err(InteropError::InvalidArgument("max must be positive"));
        }
        let c_key = material_key(key)?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_integer_array);
            let scratch = mem::alloc_bytes(max as usize * size_of::<c_int>()) as *mut c_int;
            defer! {
                unsafe { mem::free(scratch) };
            }
            let mut count = max;
            let ret = unsafe { f(mat, c_key.as_ptr(), semantic as u32, index, scratch, &mut count) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => {
                    let valid = count.min(max) as usize;
                    Ok(unsafe { mem::copy_slice_from_native(scratch, valid) })
                }
                _ => Ok(Vec::new()),
            }
        })
    }

    /// 查字符串属性
    pub fn material_string(
        &self,
        mat: &AiMaterial,
        key: &str,
        semantic: TextureType,
        index: u32,
    ) -> Result<Option<String>> {
        let c_key = material_key(key)?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_string);
            let scratch = mem::alloc_raw::<AiString>();
            defer! {
                unsafe { mem::free(scratch) };
            }
            let ret = unsafe { f(mat, c_key.as_ptr(), semantic as u32, index, scratch) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => Ok(Some(unsafe { (*scratch).to_string() })),
                _ => Ok(None),
            }
        })
    }

    /// 查完整属性并提升为托管表示
    pub fn material_property(
        &self,
        mat: &AiMaterial,
        key: &str,
        semantic: TextureType,
        index: u32,
    ) -> Result<Option<MaterialProperty>> {
        let c_key = material_key(key)?;
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_property);
            let mut prop: *const AiMaterialProperty = ptr::null();
            let ret = unsafe { f(mat, c_key.as_ptr(), semantic as u32, index, &mut prop) };
            match AiReturn::from_i32(ret) {
                AiReturn::Success if !prop.is_null() => {
                    Ok(Some(MaterialProperty::lift(unsafe { &*prop })))
                }
                _ => Ok(None),
            }
        })
    }

    /// 指定用途的纹理层数
    pub fn material_texture_count(&self, mat: &AiMaterial, texture_type: TextureType) -> Result<u32> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_texture_count);
            Ok(unsafe { f(mat, texture_type as u32) })
        })
    }

    /// 聚合查询一个纹理槽位的全部参数
    pub fn material_texture(
        &self,
        mat: &AiMaterial,
        texture_type: TextureType,
        index: u32,
    ) -> Result<Option<TextureSlot>> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_material_texture);
            let path = mem::alloc_raw::<AiString>();
            defer! {
                unsafe { mem::free(path) };
            }
            let mut mapping = 0u32;
            let mut uv_index = 0u32;
            let mut blend = 0.0f32;
            let mut op = 0u32;
            let mut map_modes = [0u32; 2];
            let mut flags = 0u32;
            let ret = unsafe {
                f(
                    mat,
                    texture_type as u32,
                    index,
                    path,
                    &mut mapping,
                    &mut uv_index,
                    &mut blend,
                    &mut op,
                    map_modes.as_mut_ptr(),
                    &mut flags,
                )
            };
            match AiReturn::from_i32(ret) {
                AiReturn::Success => Ok(Some(TextureSlot {
                    path: unsafe { (*path).to_string() },
                    texture_type,
                    index,
                    mapping: TextureMapping::from_u32(mapping),
                    uv_index,
                    blend_factor: blend,
                    operation: TextureOp::from_u32(op),
                    wrap_mode_u: TextureMapMode::from_u32(map_modes[0]),
                    wrap_mode_v: TextureMapMode::from_u32(map_modes[1]),
                    flags: TextureFlags::from_bits_retain(flags),
                })),
                _ => Ok(None),
            }
        })
    }
}

// diagnostics
impl AssimpLibrary {
    /// 原生库版本 (major, minor, revision)
    pub fn version(&self) -> Result<(u32, u32, u32)> {
        self.with_fns(|fns| {
            let major = native_fn!(fns, get_version_major);
            let minor = native_fn!(fns, get_version_minor);
            let revision = native_fn!(fns, get_version_revision);
            Ok(unsafe { (major(), minor(), revision()) })
        })
    }

    pub fn compile_flags(&self) -> Result<u32> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_compile_flags);
            Ok(unsafe { f() })
        })
    }

    pub fn legal_string(&self) -> Result<String> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, get_legal_string);
            Ok(unsafe { c_str_to_string(f()) })
        })
    }

    /// 最近一次导入/导出失败的原生错误文本
    pub fn error_string(&self) -> Result<String> {
        self.with_fns(|fns| Ok(last_native_error(fns)))
    }
}

// logging
impl AssimpLibrary {
    /// 设置详细日志开关。镜像值立即更新，已加载时同步给原生库
    pub fn set_verbose_logging(&self, enabled: bool) {
        self.verbose.store(enabled, Ordering::Relaxed);
        let state = self.state.read().unwrap();
        if let Some(loaded) = state.as_ref() {
            if let Some(f) = loaded.fns.enable_verbose_logging {
                unsafe { f(if enabled { AI_TRUE } else { AI_FALSE }) };
            }
        }
    }

    /// 读取镜像值，不经过原生调用
    pub fn verbose_logging(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// 把原生库日志接入 `log` 门面（target = "assimp"）
    pub fn attach_log_forwarding(&self) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, attach_log_stream);
            let stream = AttachedStream::new();
            unsafe { f(stream.as_ptr()) };
            self.log_streams.lock().unwrap().push(stream);
            Ok(())
        })
    }

    /// 逐条注销本门面挂过的日志流，不影响其他来源挂接的流
    pub fn detach_log_forwarding(&self) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, detach_log_stream);
            let mut streams = self.log_streams.lock().unwrap();
            for stream in streams.iter() {
                let ret = unsafe { f(stream.as_ptr()) };
                if AiReturn::from_i32(ret) != AiReturn::Success {
                    log::warn!("native side did not recognize a log stream on detach");
                }
            }
            streams.clear();
            Ok(())
        })
    }

    /// 注销全部日志流
    pub fn detach_all_log_streams(&self) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, detach_all_log_streams);
            unsafe { f() };
            self.log_streams.lock().unwrap().clear();
            Ok(())
        })
    }
}

// math
impl AssimpLibrary {
    pub fn identity_matrix4(&self, m: &mut AiMatrix4x4) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, identity_matrix4);
            unsafe { f(m) };
            Ok(())
        })
    }

    pub fn transpose_matrix4(&self, m: &mut AiMatrix4x4) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, transpose_matrix4);
            unsafe { f(m) };
            Ok(())
        })
    }

    /// dst = dst * src
    pub fn multiply_matrix4(&self, dst: &mut AiMatrix4x4, src: &AiMatrix4x4) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, multiply_matrix4);
            unsafe { f(dst, src) };
            Ok(())
        })
    }

    pub fn transform_vec_by_matrix4(&self, v: &mut Vec3, m: &AiMatrix4x4) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, transform_vec_by_matrix4);
            unsafe { f(v, m) };
            Ok(())
        })
    }

    /// 分解为 (scaling, rotation, translation)
    pub fn decompose_matrix(&self, m: &AiMatrix4x4) -> Result<(Vec3, Quaternion, Vec3)> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, decompose_matrix);
            let mut scaling = Vec3::ZERO;
            let mut rotation = Quaternion::default();
            let mut translation = Vec3::ZERO;
            unsafe { f(m, &mut scaling, &mut rotation, &mut translation) };
            Ok((scaling, rotation, translation))
        })
    }
}

// property store
impl AssimpLibrary {
    /// 创建一个导入属性集
    pub fn create_property_store(&self) -> Result<PropertyStore> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, create_property_store);
            let ptr = unsafe { f() };
            if ptr.is_null() {
                return Err(InteropError::NativeCallFailed("property store allocation failed".to_string()));
            }
            Ok(PropertyStore { ptr })
        })
    }

    pub(crate) fn release_property_store(&self, store: *mut AiPropertyStore) {
        let state = self.state.read().unwrap();
        match state.as_ref().and_then(|s| s.fns.release_property_store) {
            Some(f) => unsafe { f(store) },
            None => log::warn!("leaking property store: native library already unloaded"),
        }
    }

    pub(crate) fn set_property_int(&self, store: *mut AiPropertyStore, name: &CStr, value: i32) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, set_import_property_integer);
            unsafe { f(store, name.as_ptr(), value) };
            Ok(())
        })
    }

    pub(crate) fn set_property_float(&self, store: *mut AiPropertyStore, name: &CStr, value: f32) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, set_import_property_float);
            unsafe { f(store, name.as_ptr(), value) };
            Ok(())
        })
    }

    pub(crate) fn set_property_string(&self, store: *mut AiPropertyStore, name: &CStr, value: &str) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, set_import_property_string);
            let s = AiString::from_str(value);
            unsafe { f(store, name.as_ptr(), &s) };
            Ok(())
        })
    }

    pub(crate) fn set_property_matrix(
        &self,
        store: *mut AiPropertyStore,
        name: &CStr,
        value: &AiMatrix4x4,
    ) -> Result<()> {
        self.with_fns(|fns| {
            let f = native_fn!(fns, set_import_property_matrix);
            unsafe { f(store, name.as_ptr(), value) };
            Ok(())
        })
    }
}

fn material_key(key: &str) -> Result<CString> {
    CString::new(key).map_err(|_| InteropError::InvalidArgument("material key contains NUL"))
}

/// 原生入口以 u32 计缓冲长度，超出范围的缓冲直接拒绝而不是截断
fn buffer_len_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| InteropError::InvalidArgument("buffer length exceeds u32 range"))
}

fn last_native_error(fns: &FunctionTable) -> String {
    match fns.get_error_string {
        Some(f) => unsafe { c_str_to_string(f()) },
        None => "unknown native error".to_string(),
    }
}

unsafe fn c_str_to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    // 单例未加载任何库时，所有失败路径都不触碰原生代码。
    // 涉及加载状态的用例共享进程级状态，必须串行
    fn state_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: Mutex<()> = Mutex::new(());
        LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn get_returns_same_instance() {
        let a = AssimpLibrary::get() as *const AssimpLibrary;
        let b = AssimpLibrary::get() as *const AssimpLibrary;
        assert_eq!(a, b);
    }

    #[test]
    fn argument_checks_precede_loaded_state() {
        let lib = AssimpLibrary::get();
        assert!(matches!(lib.import_file("", PostProcessFlags::empty()), Err(InteropError::InvalidArgument(_))));
        assert!(matches!(
            lib.import_from_memory(&[], PostProcessFlags::empty(), "obj", None),
            Err(InteropError::InvalidArgument(_))
        ));
        assert!(matches!(
            lib.export_to_blob(SceneHandle::NULL, "obj", PostProcessFlags::empty()),
            Err(InteropError::InvalidArgument(_))
        ));
        assert!(matches!(
            lib.export_to_file(SceneHandle::NULL, "obj", "out.obj", PostProcessFlags::empty()),
            Err(InteropError::InvalidArgument(_))
        ));
        assert!(matches!(
            lib.export_to_file_with_io(SceneHandle::NULL, "obj", "out.obj", PostProcessFlags::empty(), None),
            Err(InteropError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversize_memory_buffer_is_rejected() {
        assert_eq!(buffer_len_u32(16).unwrap(), 16);
        assert!(matches!(
            buffer_len_u32(u32::MAX as usize + 1),
            Err(InteropError::InvalidArgument(_))
        ));
    }

    #[test]
    fn calls_without_library_report_not_loaded() {
        let _guard = state_lock();
        let lib = AssimpLibrary::get();
        assert!(matches!(lib.version(), Err(InteropError::NotLoaded)));
        assert!(matches!(lib.extension_list(), Err(InteropError::NotLoaded)));
        assert!(matches!(
            lib.import_file("model.obj", PostProcessFlags::empty()),
            Err(InteropError::NotLoaded)
        ));
        assert!(matches!(lib.detach_log_forwarding(), Err(InteropError::NotLoaded)));
    }

    #[test]
    fn null_handles_short_circuit() {
        let lib = AssimpLibrary::get();
        // 空句柄的 copy/release 不需要已加载的库
        assert!(matches!(lib.copy_scene(SceneHandle::NULL), Ok(h) if h.is_null()));
        assert!(lib.release_import(SceneHandle::NULL).is_ok());
        assert!(lib.free_scene(SceneHandle::NULL).is_ok());
    }

    #[test]
    fn verbose_flag_is_readable_without_native_round_trip() {
        let lib = AssimpLibrary::get();
        lib.set_verbose_logging(true);
        assert!(lib.verbose_logging());
        lib.set_verbose_logging(false);
        assert!(!lib.verbose_logging());
    }

    #[test]
    fn unload_without_load_is_noop() {
        let _guard = state_lock();
        AssimpLibrary::get().unload();
        assert!(!AssimpLibrary::get().is_loaded());
    }

    #[test]
    fn fatal_load_of_missing_library_fails() {
        let _guard = state_lock();
        let err = AssimpLibrary::get().load("/nonexistent/libnope.so", LoadPolicy::Fatal).unwrap_err();
        assert!(matches!(err, InteropError::Load(LoadError::LibraryNotFound { .. })));
        assert!(!AssimpLibrary::get().is_loaded());
    }

    #[test]
    fn tolerant_load_keeps_unloaded_call_errors() {
        let _guard = state_lock();
        let lib = AssimpLibrary::get();
        lib.load("/nonexistent/libnope.so", LoadPolicy::Tolerant).unwrap();
        // 句柄存在但未打开，逐调用报缺入口
        assert!(!lib.is_loaded());
        assert!(matches!(lib.version(), Err(InteropError::MissingEntryPoint(_))));
        lib.unload();
    }
}
