//! 空闲区记录
//!
//! 删除或替换数据时不重写容器，而是把腾出的区域标记为 `FREE` 记录，
//! 再挂到嵌在文件里的单向空闲链表上。
//!
//! # 磁盘布局（小端序）
//!
//! | 偏移 | 字段 | 大小 |
//! |------|------|------|
//! | 0 | length | 4 |
//! | 4 | tag (`FREE`) | 4 |
//! | 8 | next_free_offset | 8（有符号） |
//! | 16 | padding | length - 16 |

use alloc::vec;
use byteorder::{ByteOrder, LittleEndian};
use log::trace;

use super::{RecordHeader, RecordTag};
use crate::{
    consts::*,
    device::{Container, ContainerDevice, SeekFrom},
    error::{Error, ErrorKind, Result},
    types::FileOffset,
};

/// 空闲区记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeRecord {
    offset: u64,
    length: u32,
    next_free_offset: FileOffset,
}

impl FreeRecord {
    /// 创建尚未写入的空闲区记录
    ///
    /// `offset` 在 [`encode`](Self::encode) 时确定。
    pub fn new(length: u32, next_free_offset: FileOffset) -> Result<Self> {
        Self::with_offset(0, length, next_free_offset)
    }

    /// 创建位置已知的空闲区记录
    pub fn with_offset(offset: u64, length: u32, next_free_offset: FileOffset) -> Result<Self> {
        if (length as u64) < FREE_HEADER_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "free region shorter than its header",
            ));
        }

        Ok(Self {
            offset,
            length,
            next_free_offset,
        })
    }

    /// 解码记录体
    ///
    /// 调用前游标必须位于 length 和 tag 之后，标签由调用者检查。
    /// 成功后游标位于 `offset + length`。
    pub fn decode<D: ContainerDevice>(container: &mut Container<D>, length: u32) -> Result<Self> {
        let offset = container
            .position()
            .checked_sub(RECORD_HEADER_SIZE)
            .ok_or(Error::new(ErrorKind::Corrupted, "free record header before start of container"))?;

        if (length as u64) < FREE_HEADER_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "free record shorter than header"));
        }
        if container.remaining() < OFFSET_FIELD_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "truncated free record header"));
        }

        let next_free_offset = FileOffset::from_disk(container.read_i64()?)?;

        // padding 不做解释，只要求它仍在容器范围内
        let padding = length as u64 - FREE_HEADER_SIZE;
        if container.remaining() < padding {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "free record extends past end of container",
            ));
        }
        container.skip(padding)?;

        trace!(
            "[FREE] decoded at {:#x}: length={} next={}",
            offset,
            length,
            next_free_offset
        );

        Ok(Self {
            offset,
            length,
            next_free_offset,
        })
    }

    /// 读取并解码位于 `offset` 的空闲区记录
    ///
    /// 标签不是 `FREE` 时返回 `Corrupted`。
    pub fn read_at<D: ContainerDevice>(container: &mut Container<D>, offset: u64) -> Result<Self> {
        let header = RecordHeader::read_at(container, offset)?;
        if header.tag != RecordTag::Free {
            return Err(Error::new(ErrorKind::Corrupted, "record is not a free region"));
        }
        Self::decode(container, header.length)
    }

    /// 在游标处写入记录
    ///
    /// 16 字节头部一次写入，随后游标跳过 padding（不写）。
    /// 超出容器末尾的那部分 padding 以 0 填充，保证整条记录之后能被再次解码。
    /// 记录的 `offset` 更新为头部写入位置。不检查与其他记录是否重叠。
    pub fn encode<D: ContainerDevice>(&mut self, container: &mut Container<D>) -> Result<()> {
        let offset = container.position();

        let mut header = [0u8; FREE_HEADER_SIZE as usize];
        LittleEndian::write_u32(&mut header[0..4], self.length);
        header[4..8].copy_from_slice(&TAG_FREE);
        LittleEndian::write_i64(&mut header[8..16], self.next_free_offset.to_disk()?);
        container.write_all(&header)?;

        let end = offset + self.length as u64;
        let len = container.len();
        if end > len {
            let fill_start = len.max(container.position());
            container.seek(SeekFrom::Start(fill_start))?;
            container.write_all(&vec![0u8; (end - fill_start) as usize])?;
        }
        container.seek(SeekFrom::Start(end))?;

        self.offset = offset;
        trace!(
            "[FREE] encoded at {:#x}: length={} next={}",
            offset,
            self.length,
            self.next_free_offset
        );
        Ok(())
    }

    /// 记录起点
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 记录总长度（含头部）
    pub fn length(&self) -> u32 {
        self.length
    }

    /// 下一个空闲区的偏移
    pub fn next_free_offset(&self) -> FileOffset {
        self.next_free_offset
    }

    /// 记录结束位置
    pub fn end(&self) -> u64 {
        self.offset + self.length as u64
    }

    /// `next_free_offset` 字段的绝对位置
    pub fn next_field_offset(&self) -> u64 {
        self.offset + FREE_NEXT_OFFSET_FIELD
    }

    /// 只由链表维护操作调用
    pub(crate) fn set_next_free_offset(&mut self, next: FileOffset) {
        self.next_free_offset = next;
    }
}
