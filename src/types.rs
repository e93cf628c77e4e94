//! 容器数据类型
//!
//! 记录之间通过绝对文件偏移相互引用。这里把偏移包装成一个经过校验的类型，
//! 唯一合法的"解引用"方式是让容器句柄 seek 到该位置再解码。

use core::fmt;

use crate::error::{Error, ErrorKind, Result};

/// 容器内的绝对字节偏移
///
/// 磁盘上以有符号 i64 存储，0 表示"无"（链表结尾）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FileOffset(u64);

impl FileOffset {
    /// 链表结尾哨兵
    pub const NONE: FileOffset = FileOffset(0);

    /// 从原始偏移创建
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// 从磁盘上的 i64 解码
    ///
    /// 负值说明字段已损坏
    pub fn from_disk(raw: i64) -> Result<Self> {
        u64::try_from(raw)
            .map(Self)
            .map_err(|_| Error::new(ErrorKind::Corrupted, "negative offset in record"))
    }

    /// 编码为磁盘上的 i64
    pub fn to_disk(self) -> Result<i64> {
        i64::try_from(self.0)
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "offset exceeds i64 range"))
    }

    /// 获取原始偏移
    pub const fn get(self) -> u64 {
        self.0
    }

    /// 是否为哨兵值
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// 转换为 Option，哨兵值映射为 None
    pub const fn to_option(self) -> Option<u64> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0)
        }
    }

    /// 计算 `self + delta`
    pub fn checked_add(self, delta: u64) -> Result<u64> {
        self.0
            .checked_add(delta)
            .ok_or(Error::new(ErrorKind::InvalidInput, "offset overflow"))
    }
}

impl From<u64> for FileOffset {
    fn from(offset: u64) -> Self {
        Self(offset)
    }
}

impl fmt::Display for FileOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
