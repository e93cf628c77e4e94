//! 从空闲链表摘除节点

use log::debug;

use super::{chain::NodeHandle, list::FreeList};
use crate::{
    device::{Container, ContainerDevice},
    error::Result,
    record::FreeRecord,
    types::FileOffset,
};

impl FreeList {
    /// 把 `handle` 对应的空闲区从磁盘链和内存链中摘除
    ///
    /// 根据前驱 / 后继是否存在分四种情况：
    ///
    /// | 前驱 | 后继 | 写入位置 | 写入值 |
    /// |------|------|----------|--------|
    /// | 无 | 无 | 根记录头指针 | 0 |
    /// | 有 | 无 | 前驱的 `next_free_offset` | 0 |
    /// | 无 | 有 | 根记录头指针 | 后继偏移 |
    /// | 有 | 有 | 前驱的 `next_free_offset` | 后继偏移 |
    ///
    /// 每次调用恰好一次 8 字节写入。写入成功后才从内存链摘除节点。
    ///
    /// # 错误
    ///
    /// * `InvalidOperation` - 句柄不在当前链表中（不做任何 I/O）
    /// * `Io` - 指针写入失败（含设备只读），磁盘与内存都保持调用前的状态
    ///
    /// # 返回
    ///
    /// 被摘除的记录。它在磁盘上的字节保持原样，直到分配器覆盖。
    pub fn remove<D: ContainerDevice>(
        &mut self,
        container: &mut Container<D>,
        handle: NodeHandle,
    ) -> Result<FreeRecord> {
        let target = self.chain.get(handle)?.offset();
        let previous = self.chain.prev(handle)?;
        let next = match self.chain.next(handle)? {
            Some(next) => FileOffset::new(self.chain.get(next)?.offset()),
            None => FileOffset::NONE,
        };

        self.relink(container, previous, next)?;
        let record = self.chain.remove(handle)?;

        debug!(
            "[FREELIST] remove {:#x} (length={}), predecessor now points to {}, {} left",
            target,
            record.length(),
            next,
            self.chain.len()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        device::MemoryDevice,
        error::ErrorKind,
        freelist::test_support::*,
        record::RootRecord,
    };
    use alloc::vec;

    fn two_node_chain() -> (Container<MemoryDevice>, FreeList) {
        let mut container = build_container(&[(100, 32, 200), (200, 16, 0)], 100);
        let list = FreeList::open(&mut container).unwrap();
        (container, list)
    }

    #[test]
    fn test_remove_head() {
        let (mut container, mut list) = two_node_chain();
        let r1 = list.chain().first().unwrap();

        let removed = list.remove(&mut container, r1).unwrap();
        assert_eq!(removed.offset(), 100);
        assert_eq!(list.head(), FileOffset::new(200));
        assert_eq!(memory_offsets(&list), vec![200]);
        assert_eq!(&container.device().as_slice()[20..28], &200i64.to_le_bytes());
        list.verify(&mut container).unwrap();
    }

    #[test]
    fn test_remove_tail() {
        let (mut container, mut list) = two_node_chain();
        let r1 = list.chain().first().unwrap();
        let r2 = list.chain().last().unwrap();

        list.remove(&mut container, r2).unwrap();
        assert_eq!(list.get(r1).unwrap().next_free_offset(), FileOffset::NONE);
        assert_eq!(&container.device().as_slice()[108..116], &0i64.to_le_bytes());
        assert_eq!(list.head(), FileOffset::new(100));
        list.verify(&mut container).unwrap();
    }

    #[test]
    fn test_remove_sole_node() {
        let mut container = build_container(&[(100, 16, 0)], 100);
        let mut list = FreeList::open(&mut container).unwrap();
        let r1 = list.chain().first().unwrap();

        list.remove(&mut container, r1).unwrap();
        assert!(list.is_empty());
        assert!(list.head().is_none());
        let root = RootRecord::read_at(&mut container, 0).unwrap();
        assert!(root.first_free_offset().is_none());
        list.verify(&mut container).unwrap();
    }

    #[test]
    fn test_remove_middle() {
        let mut container = build_container(&[(100, 16, 200), (200, 16, 300), (300, 16, 0)], 100);
        let mut list = FreeList::open(&mut container).unwrap();
        let middle = list.chain().find_by_offset(200).unwrap();

        list.remove(&mut container, middle).unwrap();
        assert_eq!(memory_offsets(&list), vec![100, 300]);
        assert_eq!(container.read_i64_at(108).unwrap(), 300);
        list.verify(&mut container).unwrap();
    }

    #[test]
    fn test_remove_single_field_write() {
        let mut container = build_container(&[(100, 16, 200), (200, 16, 300), (300, 16, 0)], 100);
        let mut list = FreeList::open(&mut container).unwrap();

        for offset in [200u64, 300, 100] {
            let handle = list.chain().find_by_offset(offset).unwrap();
            let writes = container.write_count();
            let bytes = container.bytes_written();

            list.remove(&mut container, handle).unwrap();
            assert_eq!(container.write_count() - writes, 1);
            assert_eq!(container.bytes_written() - bytes, 8);
        }
    }

    #[test]
    fn test_remove_unknown_handle() {
        let (mut container, mut list) = two_node_chain();
        let r1 = list.chain().first().unwrap();
        list.remove(&mut container, r1).unwrap();

        let before = container.device().as_slice().to_vec();
        let writes = container.write_count();

        let err = list.remove(&mut container, r1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(container.write_count(), writes);
        assert_eq!(container.device().as_slice(), &before[..]);
        assert_eq!(memory_offsets(&list), vec![200]);
    }

    #[test]
    fn test_remove_handle_from_other_list() {
        let (mut container, mut list) = two_node_chain();
        let (_, other) = two_node_chain();
        let foreign = other.chain().first().unwrap();

        let err = list.remove(&mut container, foreign).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(list.len(), 2);
        list.verify(&mut container).unwrap();
    }

    #[test]
    fn test_remove_on_read_only_device() {
        let (mut container, mut list) = two_node_chain();
        let r1 = list.chain().first().unwrap();
        container.device_mut().set_read_only(true);

        let err = list.remove(&mut container, r1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(list.head(), FileOffset::new(100));
        assert_eq!(memory_offsets(&list), vec![100, 200]);

        container.device_mut().set_read_only(false);
        list.verify(&mut container).unwrap();
    }

    #[test]
    fn test_remove_write_failure_keeps_state() {
        let device = FaultyDevice::new(build_device(&[(100, 32, 200), (200, 16, 0)], 100));
        let mut container = Container::new(device);
        let mut list = FreeList::open(&mut container).unwrap();
        let r1 = list.chain().first().unwrap();
        let r2 = list.chain().last().unwrap();

        container.device_mut().fail_writes = true;
        let err = list.remove(&mut container, r2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(list.get(r1).unwrap().next_free_offset(), FileOffset::new(200));
        assert!(list.chain().contains(r2));

        let err = list.remove(&mut container, r1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(list.head(), FileOffset::new(100));

        container.device_mut().fail_writes = false;
        list.verify(&mut container).unwrap();
        assert_eq!(memory_offsets(&list), vec![100, 200]);
    }
}
