//! 原生日志到 `log` 门面的桥接

use std::ffi::{CStr, c_char};
use std::ptr;

use crate::native::AiLogStream;

/// 原生库日志回调：把每条消息转发到 `log`，target 固定为 "assimp"
///
/// 原生消息自带换行和 "Debug, " 之类的级别前缀，这里只做去尾换行，
/// 级别统一用 debug，由日志过滤器按 target 控制
pub(crate) unsafe extern "C" fn forward_native_log(message: *const c_char, _user: *mut c_char) {
    if message.is_null() {
        return;
    }
    let text = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    log::debug!(target: "assimp", "{}", text.trim_end());
}

/// 一条已注册给原生库的日志流
///
/// 原生侧保存的是这块结构的地址，必须在 detach 之前保持稳定，
/// 所以装箱持有。
pub(crate) struct AttachedStream(Box<AiLogStream>);

// 结构里只有回调指针和空的 user 指针，跨线程移动是安全的
unsafe impl Send for AttachedStream {}

impl AttachedStream {
    pub(crate) fn new() -> Self {
        Self(Box::new(AiLogStream {
            callback: Some(forward_native_log),
            user: ptr::null_mut(),
        }))
    }

    /// 原生注册/注销接口需要的稳定地址
    pub(crate) fn as_ptr(&self) -> *const AiLogStream {
        &*self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stream_address_is_stable_across_moves() {
        let stream = AttachedStream::new();
        let before = stream.as_ptr();
        let moved = stream;
        assert_eq!(before, moved.as_ptr());
    }

    #[test]
    fn null_message_is_ignored() {
        unsafe { forward_native_log(ptr::null(), ptr::null_mut()) };
    }

    #[test]
    fn trailing_newline_is_trimmed() {
        // 回调本身无返回值，这里只验证它对合法 C 字符串不崩溃
        let msg = c"Info,  Importer took 3 ms\n";
        unsafe { forward_native_log(msg.as_ptr(), ptr::null_mut()) };
    }
}
