//! 基于 `std::fs::File` 的容器设备

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom as IoSeekFrom, Write};
use std::path::Path;

use super::ContainerDevice;
use crate::error::Result;

/// 磁盘文件设备
///
/// 以读写模式独占打开，长度在每次写入后同步更新。
pub struct FileDevice {
    file: File,
    len: u64,
}

impl FileDevice {
    /// 以读写模式打开已有容器文件
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file)
    }

    /// 包装已打开的文件（必须可读写）
    pub fn from_file(file: File) -> Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }

    /// 取回底层文件
    pub fn into_inner(self) -> File {
        self.file
    }
}

impl ContainerDevice for FileDevice {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset >= self.len {
            return Ok(0);
        }

        let n = buf.len().min((self.len - offset) as usize);
        self.file.seek(IoSeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf[..n])?;
        Ok(n)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        self.file.seek(IoSeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        self.len = self.len.max(offset + buf.len() as u64);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
