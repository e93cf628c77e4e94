//! 磁盘链与内存链一致性检查
//!
//! 从磁盘头指针出发沿 `next_free_offset` 走一遍，访问到的偏移序列必须与内存链
//! 从头到尾的顺序完全相同，每个节点的长度和 next 指针也必须一致。

use alloc::{collections::BTreeSet, vec::Vec};
use log::warn;

use super::list::FreeList;
use crate::{
    device::{Container, ContainerDevice},
    error::{Error, ErrorKind, Result},
    record::FreeRecord,
};

impl FreeList {
    /// 按磁盘链顺序列出所有空闲区偏移
    ///
    /// 头指针从磁盘重新读取，不使用内存副本。链表成环时返回 `Corrupted`。
    pub fn disk_offsets<D: ContainerDevice>(&self, container: &mut Container<D>) -> Result<Vec<u64>> {
        let mut offsets = Vec::new();
        let mut visited = BTreeSet::new();
        let mut cursor = self.root.first_free_on_disk(container)?;

        while let Some(offset) = cursor.to_option() {
            if !visited.insert(offset) {
                warn!("[FREELIST] cycle detected at {:#x}", offset);
                return Err(Error::new(ErrorKind::Corrupted, "free chain contains a cycle"));
            }
            cursor = FreeRecord::read_at(container, offset)?.next_free_offset();
            offsets.push(offset);
        }

        Ok(offsets)
    }

    /// 检查磁盘链与内存链是否一致
    ///
    /// 发现任何差异都返回 `Corrupted`，不做修复。
    pub fn verify<D: ContainerDevice>(&self, container: &mut Container<D>) -> Result<()> {
        let disk_head = self.root.first_free_on_disk(container)?;
        if disk_head != self.head() {
            warn!(
                "[FREELIST] head mismatch: disk={} memory={}",
                disk_head,
                self.head()
            );
            return Err(Error::new(ErrorKind::Corrupted, "head pointer differs from disk"));
        }

        let mut cursor = disk_head;
        for (_, record) in self.chain.iter() {
            if cursor.get() != record.offset() {
                warn!(
                    "[FREELIST] order mismatch: disk={} memory={:#x}",
                    cursor,
                    record.offset()
                );
                return Err(Error::new(ErrorKind::Corrupted, "free chain order differs from disk"));
            }

            let on_disk = FreeRecord::read_at(container, record.offset())?;
            if on_disk.length() != record.length()
                || on_disk.next_free_offset() != record.next_free_offset()
            {
                warn!(
                    "[FREELIST] record mismatch at {:#x}: disk=({}, {}) memory=({}, {})",
                    record.offset(),
                    on_disk.length(),
                    on_disk.next_free_offset(),
                    record.length(),
                    record.next_free_offset()
                );
                return Err(Error::new(ErrorKind::Corrupted, "free record differs from disk"));
            }
            cursor = on_disk.next_free_offset();
        }

        if !cursor.is_none() {
            warn!("[FREELIST] disk chain continues at {} past memory tail", cursor);
            return Err(Error::new(
                ErrorKind::Corrupted,
                "disk free chain longer than memory chain",
            ));
        }

        Ok(())
    }
}
