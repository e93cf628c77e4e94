//! 错误类型定义
//!
//! 提供容器文件与空闲区链表操作的错误类型。

use core::fmt;

/// 容器操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// I/O 错误（读写失败、越过文件末尾读取、设备只读或无权限）
    Io,
    /// 记录损坏（标签不匹配、头部不完整、链表成环等）
    Corrupted,
    /// 非法操作（句柄不属于当前链表或已失效）
    InvalidOperation,
    /// 无效参数
    InvalidInput,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 创建带原因的错误（简化版，忽略 cause）
    ///
    /// 注意：在 no_std 环境下，cause 参数会被忽略
    pub fn with_cause(kind: ErrorKind, message: &'static str, _cause: impl fmt::Debug) -> Self {
        Self { kind, message }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// 是否为记录损坏
    pub fn is_corrupted(&self) -> bool {
        self.kind == ErrorKind::Corrupted
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::with_cause(ErrorKind::Io, "unexpected end of container", err)
            }
            std::io::ErrorKind::PermissionDenied => {
                Error::with_cause(ErrorKind::Io, "permission denied", err)
            }
            _ => Error::with_cause(ErrorKind::Io, "device I/O failed", err),
        }
    }
}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::new(ErrorKind::Corrupted, "bad tag");
        assert_eq!(err.to_string(), "Corrupted: bad tag");
        assert!(err.is_corrupted());
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert_eq!(err.message(), "bad tag");
    }

    #[test]
    fn test_with_cause_keeps_kind() {
        let err = Error::with_cause(ErrorKind::Io, "read failed", 42u32);
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!err.is_corrupted());
    }
}
