//! 回收区域并挂到空闲链表尾部

use log::debug;

use super::{chain::NodeHandle, list::FreeList};
use crate::{
    device::{Container, ContainerDevice, SeekFrom},
    error::{Error, ErrorKind, Result},
    record::FreeRecord,
    types::FileOffset,
};

impl FreeList {
    /// 把 `[offset, offset + length)` 标记为空闲区并追加到链表尾部
    ///
    /// 步骤：
    /// 1. 在 `offset` 处写入 `next_free_offset = 0` 的 `FREE` 头部，此时它尚不可达
    /// 2. 一次 8 字节写入，让原尾节点（链表为空时为根记录头指针）指向新记录
    /// 3. 追加到内存链
    ///
    /// 只检查与根记录、已有空闲区的重叠；与目录 / 文件记录是否重叠由分配器负责。
    ///
    /// # 错误
    ///
    /// * `InvalidInput` - `length` 小于 16，或区域与根记录重叠
    /// * `InvalidOperation` - 区域与链表中已有的空闲区重叠
    /// * `Io` - 写入失败；若失败发生在第 2 步之前，链表不受影响
    pub fn reclaim<D: ContainerDevice>(
        &mut self,
        container: &mut Container<D>,
        offset: u64,
        length: u32,
    ) -> Result<NodeHandle> {
        container.seek(SeekFrom::Start(offset))?;
        self.reclaim_at_cursor(container, length)
    }

    /// 在容器当前游标处回收 `length` 字节
    ///
    /// 成功后游标位于新记录之后。
    pub fn reclaim_at_cursor<D: ContainerDevice>(
        &mut self,
        container: &mut Container<D>,
        length: u32,
    ) -> Result<NodeHandle> {
        let offset = container.position();
        let root_start = self.root.offset();
        let root_end = root_start + self.root.length() as u64;
        let end = offset.saturating_add(length as u64);
        if offset < root_end && end > root_start {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "free region overlaps the root descriptor",
            ));
        }
        if self
            .chain
            .iter()
            .any(|(_, record)| offset < record.end() && end > record.offset())
        {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                "region overlaps a free region already in the chain",
            ));
        }

        let mut record = FreeRecord::new(length, FileOffset::NONE)?;
        record.encode(container)?;
        let cursor = container.position();

        let tail = self.chain.last();
        self.relink(container, tail, FileOffset::new(record.offset()))?;
        let handle = self.chain.push_back(record);

        container.seek(SeekFrom::Start(cursor))?;
        debug!(
            "[FREELIST] reclaim {:#x} (length={}), {} free regions",
            offset,
            length,
            self.chain.len()
        );
        Ok(handle)
    }
}
