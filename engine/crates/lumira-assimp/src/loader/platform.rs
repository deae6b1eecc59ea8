use std::ffi::CString;
use std::fmt;

use libloading::Library;

/// 动态库命名惯例对应的平台
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// 编译目标对应的平台。非三大桌面平台按 Linux 的 ELF 惯例处理
    pub const fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// 把裸库名补全成平台文件名，如 "assimp" -> "libassimp.so"
    ///
    /// 带路径分隔符或扩展名的输入视为调用方给定的完整名字，原样返回。
    pub fn decorate(&self, name: &str) -> String {
        if name.contains('/') || name.contains('\\') || name.contains('.') {
            return name.to_string();
        }
        match self {
            Platform::Windows => format!("{name}.dll"),
            Platform::Linux => format!("lib{name}.so"),
            Platform::MacOs => format!("lib{name}.dylib"),
        }
    }
}

/// 装载失败时的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// 打不开就报错
    #[default]
    Fatal,
    /// 打不开也返回一个未打开的句柄，所有符号解析为 None
    Tolerant,
}

#[derive(Debug)]
pub enum LoadError {
    /// 动态库本身打不开
    LibraryNotFound { path: String, reason: String },
    /// 库打开了，但缺少必需入口
    MissingSymbols { path: String, symbols: Vec<&'static str> },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::LibraryNotFound { path, reason } => {
                write!(f, "failed to open native library '{path}': {reason}")
            }
            LoadError::MissingSymbols { path, symbols } => {
                write!(f, "native library '{path}' lacks required entry points: {}", symbols.join(", "))
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// 一个已打开（或按 [`LoadPolicy::Tolerant`] 允许未打开）的动态库
#[derive(Debug)]
pub struct PlatformLibrary {
    lib: Option<Library>,
    path: String,
}

impl PlatformLibrary {
    /// 打开 path 指向的动态库。path 应当已经过 [`Platform::decorate`]
    pub fn open(path: &str, policy: LoadPolicy) -> Result<Self, LoadError> {
        match unsafe { Library::new(path) } {
            Ok(lib) => {
                log::info!("native library loaded: {path}");
                Ok(Self { lib: Some(lib), path: path.to_string() })
            }
            Err(e) => match policy {
                LoadPolicy::Fatal => Err(LoadError::LibraryNotFound {
                    path: path.to_string(),
                    reason: e.to_string(),
                }),
                LoadPolicy::Tolerant => {
                    log::warn!("native library unavailable, continuing unloaded: {path} ({e})");
                    Ok(Self { lib: None, path: path.to_string() })
                }
            },
        }
    }

    // getter
    #[inline]
    pub fn is_open(&self) -> bool {
        self.lib.is_some()
    }
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 按名字取一个导出符号的地址。库未打开或符号不存在时为 None
    pub fn resolve(&self, symbol: &str) -> Option<*const ()> {
        let lib = self.lib.as_ref()?;
        let name = CString::new(symbol).ok()?;
        unsafe {
            lib.get::<unsafe extern "C" fn()>(name.as_bytes_with_nul())
                .ok()
                .map(|sym| *sym as *const ())
        }
    }

    /// 关闭动态库。重复调用是 no-op
    pub fn close(&mut self) {
        if let Some(lib) = self.lib.take() {
            if let Err(e) = lib.close() {
                log::warn!("failed to unload native library {}: {e}", self.path);
            } else {
                log::info!("native library unloaded: {}", self.path);
            }
        }
    }
}

impl Drop for PlatformLibrary {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decorate_bare_names() {
        assert_eq!(Platform::Windows.decorate("assimp"), "assimp.dll");
        assert_eq!(Platform::Linux.decorate("assimp"), "libassimp.so");
        assert_eq!(Platform::MacOs.decorate("assimp"), "libassimp.dylib");
    }

    #[test]
    fn decorate_passes_explicit_names_through() {
        assert_eq!(Platform::Linux.decorate("libassimp.so.5"), "libassimp.so.5");
        assert_eq!(Platform::Windows.decorate("vendor\\assimp.dll"), "vendor\\assimp.dll");
        assert_eq!(Platform::Linux.decorate("/usr/lib/libassimp.so"), "/usr/lib/libassimp.so");
    }

    #[test]
    fn fatal_open_of_missing_library_fails() {
        let err = PlatformLibrary::open("/nonexistent/libnope.so", LoadPolicy::Fatal).unwrap_err();
        assert!(matches!(err, LoadError::LibraryNotFound { .. }));
    }

    #[test]
    fn tolerant_open_yields_unopened_handle() {
        let mut lib = PlatformLibrary::open("/nonexistent/libnope.so", LoadPolicy::Tolerant).unwrap();
        assert!(!lib.is_open());
        assert!(lib.resolve("aiGetVersionMajor").is_none());
        // 未打开的句柄上 close 也是 no-op
        lib.close();
        lib.close();
    }
}
