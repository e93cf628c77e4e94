//! 空闲区链表的内存镜像
//!
//! 使用槽位数组 + 显式前驱/后继下标实现的双向链表。
//! 节点句柄携带链表 ID 和槽位代数，因此：
//! - 给定句柄可以 O(1) 定位并摘除节点
//! - 已摘除节点的旧句柄、其他链表的句柄都会被拒绝（`InvalidOperation`）

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::{
    error::{Error, ErrorKind, Result},
    record::FreeRecord,
};

static NEXT_CHAIN_ID: AtomicU32 = AtomicU32::new(1);

/// 链表节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    chain: u32,
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    record: FreeRecord,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// 空闲区链表
///
/// 节点顺序即磁盘上 `next_free_offset` 链的顺序。
#[derive(Debug)]
pub struct FreeChain {
    id: u32,
    slots: Vec<Slot>,
    /// 可复用的空槽位
    vacant: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl FreeChain {
    /// 创建空链表
    pub fn new() -> Self {
        Self {
            id: NEXT_CHAIN_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            vacant: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// 节点数量
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 句柄是否指向本链表中仍然存在的节点
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.node(handle).is_ok()
    }

    /// 获取句柄对应的记录
    pub fn get(&self, handle: NodeHandle) -> Result<&FreeRecord> {
        self.node(handle).map(|node| &node.record)
    }

    pub(crate) fn get_mut(&mut self, handle: NodeHandle) -> Result<&mut FreeRecord> {
        let index = self.check(handle)?;
        match self.slots[index as usize].node.as_mut() {
            Some(node) => Ok(&mut node.record),
            None => Err(stale_handle()),
        }
    }

    /// 首节点
    pub fn first(&self) -> Option<NodeHandle> {
        self.head.map(|index| self.handle_of(index))
    }

    /// 尾节点
    pub fn last(&self) -> Option<NodeHandle> {
        self.tail.map(|index| self.handle_of(index))
    }

    /// 前驱节点
    pub fn prev(&self, handle: NodeHandle) -> Result<Option<NodeHandle>> {
        Ok(self.node(handle)?.prev.map(|index| self.handle_of(index)))
    }

    /// 后继节点
    pub fn next(&self, handle: NodeHandle) -> Result<Option<NodeHandle>> {
        Ok(self.node(handle)?.next.map(|index| self.handle_of(index)))
    }

    /// 追加到尾部
    pub fn push_back(&mut self, record: FreeRecord) -> NodeHandle {
        let node = Node {
            record,
            prev: self.tail,
            next: None,
        };

        let index = match self.vacant.pop() {
            Some(index) => {
                self.slots[index as usize].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                (self.slots.len() - 1) as u32
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.slots[tail as usize].node.as_mut() {
                    tail_node.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        self.handle_of(index)
    }

    /// 摘除节点，O(1)
    ///
    /// 摘除后该句柄失效；槽位代数递增，复用槽位不会让旧句柄复活。
    /// 代数到达 `u32::MAX` 的槽位不再复用。
    pub fn remove(&mut self, handle: NodeHandle) -> Result<FreeRecord> {
        let index = self.check(handle)?;
        let slot = &mut self.slots[index as usize];
        let node = slot.node.take().ok_or_else(stale_handle)?;
        let retired = slot.generation == u32::MAX;
        if !retired {
            slot.generation += 1;
        }

        match node.prev {
            Some(prev) => {
                if let Some(prev_node) = self.slots[prev as usize].node.as_mut() {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(next_node) = self.slots[next as usize].node.as_mut() {
                    next_node.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        if !retired {
            self.vacant.push(index);
        }
        self.len -= 1;
        Ok(node.record)
    }

    /// 按记录偏移查找节点（线性）
    pub fn find_by_offset(&self, offset: u64) -> Option<NodeHandle> {
        self.iter()
            .find(|(_, record)| record.offset() == offset)
            .map(|(handle, _)| handle)
    }

    /// 按链表顺序遍历
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    // 内部辅助方法

    fn handle_of(&self, index: u32) -> NodeHandle {
        NodeHandle {
            chain: self.id,
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// 校验句柄，返回槽位下标
    fn check(&self, handle: NodeHandle) -> Result<u32> {
        if handle.chain != self.id {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                "node handle belongs to another free chain",
            ));
        }
        match self.slots.get(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation && slot.node.is_some() => {
                Ok(handle.index)
            }
            _ => Err(stale_handle()),
        }
    }

    fn node(&self, handle: NodeHandle) -> Result<&Node> {
        let index = self.check(handle)?;
        self.slots[index as usize].node.as_ref().ok_or_else(stale_handle)
    }
}

impl Default for FreeChain {
    fn default() -> Self {
        Self::new()
    }
}

fn stale_handle() -> Error {
    Error::new(ErrorKind::InvalidOperation, "node handle not in free chain")
}

/// 链表迭代器
pub struct Iter<'a> {
    chain: &'a FreeChain,
    cursor: Option<u32>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeHandle, &'a FreeRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let chain = self.chain;
        let index = self.cursor?;
        let node = chain.slots[index as usize].node.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((chain.handle_of(index), &node.record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileOffset;
    use alloc::vec;

    fn record(offset: u64) -> FreeRecord {
        FreeRecord::with_offset(offset, 16, FileOffset::NONE).unwrap()
    }

    fn offsets(chain: &FreeChain) -> Vec<u64> {
        chain.iter().map(|(_, r)| r.offset()).collect()
    }

    #[test]
    fn test_push_and_iterate() {
        let mut chain = FreeChain::new();
        let a = chain.push_back(record(100));
        let b = chain.push_back(record(200));
        let c = chain.push_back(record(300));

        assert_eq!(chain.len(), 3);
        assert_eq!(offsets(&chain), vec![100, 200, 300]);
        assert_eq!(chain.first(), Some(a));
        assert_eq!(chain.last(), Some(c));
        assert_eq!(chain.prev(b).unwrap(), Some(a));
        assert_eq!(chain.next(b).unwrap(), Some(c));
        assert_eq!(chain.prev(a).unwrap(), None);
        assert_eq!(chain.next(c).unwrap(), None);
        assert_eq!(chain.iter().len(), 3);
    }

    #[test]
    fn test_remove_middle_head_tail() {
        let mut chain = FreeChain::new();
        let a = chain.push_back(record(100));
        let b = chain.push_back(record(200));
        let c = chain.push_back(record(300));

        assert_eq!(chain.remove(b).unwrap().offset(), 200);
        assert_eq!(offsets(&chain), vec![100, 300]);
        assert_eq!(chain.next(a).unwrap(), Some(c));

        chain.remove(a).unwrap();
        assert_eq!(chain.first(), Some(c));
        assert_eq!(chain.prev(c).unwrap(), None);

        chain.remove(c).unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.first(), None);
        assert_eq!(chain.last(), None);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut chain = FreeChain::new();
        let a = chain.push_back(record(100));
        chain.remove(a).unwrap();

        // 槽位被复用，旧句柄仍然无效
        let b = chain.push_back(record(200));
        assert_ne!(a, b);
        assert!(!chain.contains(a));
        assert_eq!(chain.remove(a).unwrap_err().kind(), ErrorKind::InvalidOperation);
        assert_eq!(chain.get(b).unwrap().offset(), 200);
    }

    #[test]
    fn test_exhausted_slot_retired() {
        let mut chain = FreeChain::new();
        chain.push_back(record(100));
        chain.slots[0].generation = u32::MAX;
        let old = chain.first().unwrap();

        chain.remove(old).unwrap();
        assert!(chain.vacant.is_empty());

        // 新节点使用新槽位，旧句柄仍然无效
        let fresh = chain.push_back(record(200));
        assert_ne!(fresh.index, old.index);
        assert!(!chain.contains(old));
        assert_eq!(chain.remove(old).unwrap_err().kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut first = FreeChain::new();
        let mut second = FreeChain::new();
        let handle = first.push_back(record(100));
        second.push_back(record(100));

        let err = second.remove(handle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_find_by_offset() {
        let mut chain = FreeChain::new();
        chain.push_back(record(100));
        let b = chain.push_back(record(200));

        assert_eq!(chain.find_by_offset(200), Some(b));
        assert_eq!(chain.find_by_offset(300), None);
    }
}
