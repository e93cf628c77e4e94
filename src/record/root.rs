//! 根描述记录（GGPK）
//!
//! 根记录位于容器起始处，其中 `first_free_offset` 字段就是空闲链表的头指针。
//! 根记录自身的位置在容器打开期间保持不变。
//!
//! # 磁盘布局（小端序）
//!
//! | 偏移 | 字段 | 大小 |
//! |------|------|------|
//! | 0 | length | 4 |
//! | 4 | tag (`GGPK`) | 4 |
//! | 8 | version | 4 |
//! | 12 | root_directory_offset | 8 |
//! | 20 | first_free_offset | 8 |

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use super::{RecordHeader, RecordTag};
use crate::{
    consts::*,
    device::{Container, ContainerDevice},
    error::{Error, ErrorKind, Result},
    types::FileOffset,
};

/// 根描述记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootRecord {
    offset: u64,
    length: u32,
    version: u32,
    root_directory_offset: FileOffset,
    first_free_offset: FileOffset,
}

impl RootRecord {
    /// 创建尚未写入的根记录
    pub fn new(version: u32, root_directory_offset: FileOffset, first_free_offset: FileOffset) -> Self {
        Self {
            offset: ROOT_RECORD_OFFSET,
            length: ROOT_RECORD_SIZE as u32,
            version,
            root_directory_offset,
            first_free_offset,
        }
    }

    /// 读取位于 `offset` 的根记录
    pub fn read_at<D: ContainerDevice>(container: &mut Container<D>, offset: u64) -> Result<Self> {
        let header = RecordHeader::read_at(container, offset)?;
        if header.tag != RecordTag::Root {
            return Err(Error::new(ErrorKind::Corrupted, "record is not a root descriptor"));
        }
        if (header.length as u64) < ROOT_RECORD_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "root descriptor too short"));
        }
        if container.remaining() < ROOT_RECORD_SIZE - RECORD_HEADER_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "truncated root descriptor"));
        }

        let version = container.read_u32()?;
        let root_directory_offset = FileOffset::from_disk(container.read_i64()?)?;
        let first_free_offset = FileOffset::from_disk(container.read_i64()?)?;
        container.skip(header.length as u64 - ROOT_RECORD_SIZE)?;

        trace!(
            "[ROOT] decoded at {:#x}: version={} root_dir={} first_free={}",
            offset,
            version,
            root_directory_offset,
            first_free_offset
        );

        Ok(Self {
            offset,
            length: header.length,
            version,
            root_directory_offset,
            first_free_offset,
        })
    }

    /// 在游标处写入根记录（一次写入）
    pub fn encode<D: ContainerDevice>(&mut self, container: &mut Container<D>) -> Result<()> {
        let offset = container.position();

        let mut buf = [0u8; ROOT_RECORD_SIZE as usize];
        LittleEndian::write_u32(&mut buf[0..4], self.length);
        buf[4..8].copy_from_slice(&TAG_ROOT);
        LittleEndian::write_u32(&mut buf[8..12], self.version);
        LittleEndian::write_i64(&mut buf[12..20], self.root_directory_offset.to_disk()?);
        LittleEndian::write_i64(&mut buf[20..28], self.first_free_offset.to_disk()?);
        container.write_all(&buf)?;
        container.skip(self.length as u64 - ROOT_RECORD_SIZE)?;

        self.offset = offset;
        Ok(())
    }

    /// 持久化新的链表头指针
    ///
    /// 先执行单次 8 字节定位写入，成功后才更新内存副本。
    pub fn write_first_free<D: ContainerDevice>(
        &mut self,
        container: &mut Container<D>,
        head: FileOffset,
    ) -> Result<()> {
        container.write_i64_at(self.first_free_field_offset(), head.to_disk()?)?;
        debug!("[ROOT] first_free {} -> {}", self.first_free_offset, head);
        self.first_free_offset = head;
        Ok(())
    }

    /// 重新读取磁盘上的头指针
    pub fn first_free_on_disk<D: ContainerDevice>(&self, container: &mut Container<D>) -> Result<FileOffset> {
        FileOffset::from_disk(container.read_i64_at(self.first_free_field_offset())?)
    }

    /// 根记录起点
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 根记录长度
    pub fn length(&self) -> u32 {
        self.length
    }

    /// 格式版本
    pub fn version(&self) -> u32 {
        self.version
    }

    /// 根目录记录偏移
    pub fn root_directory_offset(&self) -> FileOffset {
        self.root_directory_offset
    }

    /// 链表头指针（内存副本）
    pub fn first_free_offset(&self) -> FileOffset {
        self.first_free_offset
    }

    /// 头指针字段的绝对位置
    pub fn first_free_field_offset(&self) -> u64 {
        self.offset + ROOT_FIRST_FREE_FIELD
    }
}
