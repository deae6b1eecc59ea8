//! 跨平台动态库装载
//!
//! [`PlatformLibrary`] 负责把一个库名按宿主平台惯例补全、打开动态库并
//! 逐符号取址；[`FunctionTable`] 在其上把原生入口批量解析成类型化的
//! 函数指针表。

mod function_table;
mod platform;

pub use function_table::FunctionTable;
pub use platform::{LoadError, LoadPolicy, Platform, PlatformLibrary};
