//! 测试用容器构造工具

use alloc::vec::Vec;

use super::FreeList;
use crate::{
    consts::ROOT_DEFAULT_VERSION,
    device::{Container, ContainerDevice, MemoryDevice, SeekFrom},
    error::{Error, ErrorKind, Result},
    record::{FreeRecord, RootRecord},
    types::FileOffset,
};

/// 构造一个容器：偏移 0 处是根记录，随后按 `(offset, length, next)` 写入空闲区
pub(crate) fn build_device(records: &[(u64, u32, u64)], head: u64) -> MemoryDevice {
    let size = records
        .iter()
        .map(|&(offset, length, _)| offset + length as u64)
        .max()
        .unwrap_or(0)
        .max(1024);
    let mut container = Container::new(MemoryDevice::with_len(size as usize));

    let mut root = RootRecord::new(ROOT_DEFAULT_VERSION, FileOffset::NONE, FileOffset::new(head));
    root.encode(&mut container).unwrap();

    for &(offset, length, next) in records {
        container.seek(SeekFrom::Start(offset)).unwrap();
        let mut record = FreeRecord::new(length, FileOffset::new(next)).unwrap();
        record.encode(&mut container).unwrap();
    }

    container.into_inner()
}

/// 同 [`build_device`]，I/O 计数从 0 开始
pub(crate) fn build_container(records: &[(u64, u32, u64)], head: u64) -> Container<MemoryDevice> {
    Container::new(build_device(records, head))
}

/// 内存链的偏移序列
pub(crate) fn memory_offsets(list: &FreeList) -> Vec<u64> {
    list.iter().map(|(_, record)| record.offset()).collect()
}

/// 可注入写失败的设备
pub(crate) struct FaultyDevice {
    pub inner: MemoryDevice,
    pub fail_writes: bool,
}

impl FaultyDevice {
    pub fn new(inner: MemoryDevice) -> Self {
        Self {
            inner,
            fail_writes: false,
        }
    }
}

impl ContainerDevice for FaultyDevice {
    fn len(&self) -> u64 {
        self.inner.len()
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.inner.read_at(offset, buf)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        if self.fail_writes {
            return Err(Error::new(ErrorKind::Io, "injected write failure"));
        }
        self.inner.write_at(offset, buf)
    }
}
