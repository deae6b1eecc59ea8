//! Lumira 工具集
//!
//! 提供各 crate 共享的日志初始化工具。

pub mod init_log;
