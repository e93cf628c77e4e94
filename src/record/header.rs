//! 通用记录头部

use log::trace;

use crate::{
    consts::*,
    device::{Container, ContainerDevice, SeekFrom},
    error::{Error, ErrorKind, Result},
};

/// 记录类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    /// 根描述记录 `GGPK`
    Root,
    /// 目录记录 `PDIR`
    Directory,
    /// 文件记录 `FILE`
    File,
    /// 空闲区记录 `FREE`
    Free,
}

impl RecordTag {
    /// 从磁盘标签解析
    pub fn from_bytes(tag: [u8; 4]) -> Result<Self> {
        match tag {
            TAG_ROOT => Ok(Self::Root),
            TAG_DIRECTORY => Ok(Self::Directory),
            TAG_FILE => Ok(Self::File),
            TAG_FREE => Ok(Self::Free),
            _ => Err(Error::new(ErrorKind::Corrupted, "unknown record tag")),
        }
    }

    /// 磁盘标签字节
    pub const fn as_bytes(&self) -> &'static [u8; 4] {
        match self {
            Self::Root => &TAG_ROOT,
            Self::Directory => &TAG_DIRECTORY,
            Self::File => &TAG_FILE,
            Self::Free => &TAG_FREE,
        }
    }
}

/// 已解析的记录头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// 记录起点（length 字段所在位置）
    pub offset: u64,
    /// 记录总长度（含头部）
    pub length: u32,
    /// 记录标签
    pub tag: RecordTag,
}

impl RecordHeader {
    /// 在游标处读取头部
    ///
    /// 成功后游标位于标签之后，正是各记录体解码所需的位置。
    pub fn read<D: ContainerDevice>(container: &mut Container<D>) -> Result<Self> {
        let offset = container.position();
        if container.remaining() < RECORD_HEADER_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "incomplete record header"));
        }

        let length = container.read_u32()?;
        let tag = RecordTag::from_bytes(container.read_tag()?)?;
        if (length as u64) < RECORD_HEADER_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "record length smaller than header"));
        }

        trace!("[RECORD] header at {:#x}: {:?} length={}", offset, tag, length);
        Ok(Self { offset, length, tag })
    }

    /// 在绝对偏移处读取头部
    pub fn read_at<D: ContainerDevice>(container: &mut Container<D>, offset: u64) -> Result<Self> {
        container.seek(SeekFrom::Start(offset))?;
        Self::read(container)
    }

    /// 记录结束位置（下一条记录的起点）
    pub fn end(&self) -> u64 {
        self.offset + self.length as u64
    }
}
