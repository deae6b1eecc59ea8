//! 原生 asset-import 库的托管绑定核心
//!
//! 分为四层：
//! - [`loader`]：跨平台动态库装载与类型化函数表；
//! - [`library`]：进程级门面单例，所有原生调用的唯一入口；
//! - [`marshal`]：托管实体与原生布局间的投影/提升/释放；
//! - [`mem`]：非托管内存分配与整块拷贝工具。
//!
//! 常规用法只需要 [`AssimpLibrary`] 与 [`lumira_scene`] 的托管类型：
//!
//! ```no_run
//! use lumira_assimp::{AssimpLibrary, PostProcessFlags};
//!
//! let lib = AssimpLibrary::get();
//! lib.load_default()?;
//! let scene = lib.import("model.fbx", PostProcessFlags::target_realtime_quality())?;
//! log::info!("meshes: {}", scene.meshes.len());
//! # Ok::<(), lumira_assimp::InteropError>(())
//! ```

pub mod loader;
pub mod library;
mod logging;
pub mod marshal;
pub mod mem;
pub mod native;
pub mod postprocess;
pub mod property_store;

pub use library::{AssimpLibrary, ExportBlob, InteropError, SceneHandle};
pub use loader::{LoadError, LoadPolicy};
pub use postprocess::PostProcessFlags;
pub use property_store::PropertyStore;
