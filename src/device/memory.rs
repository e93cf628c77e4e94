//! 内存容器设备

use alloc::vec::Vec;

use super::ContainerDevice;
use crate::error::{Error, ErrorKind, Result};

/// 以 `Vec<u8>` 为后端的容器设备
///
/// 写入越过末尾时以 0 填充扩展，行为与普通文件一致。
#[derive(Debug, Clone, Default)]
pub struct MemoryDevice {
    data: Vec<u8>,
    read_only: bool,
}

impl MemoryDevice {
    /// 创建空设备
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建指定长度、全 0 的设备
    pub fn with_len(len: usize) -> Self {
        Self::from_vec(alloc::vec![0u8; len])
    }

    /// 使用已有字节创建设备
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data,
            read_only: false,
        }
    }

    /// 取回底层字节
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// 底层字节视图
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// 设置只读模式
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl ContainerDevice for MemoryDevice {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = usize::try_from(offset)
            .map_err(|_| Error::new(ErrorKind::Io, "offset out of range"))?;
        if start >= self.data.len() {
            return Ok(0);
        }

        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        if self.read_only {
            return Err(Error::new(ErrorKind::Io, "memory device is read-only"));
        }

        let start = usize::try_from(offset)
            .map_err(|_| Error::new(ErrorKind::Io, "offset out of range"))?;
        let end = start
            .checked_add(buf.len())
            .ok_or(Error::new(ErrorKind::Io, "offset out of range"))?;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }

        self.data[start..end].copy_from_slice(buf);
        Ok(buf.len())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
