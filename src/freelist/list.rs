//! 空闲链表与根记录头指针的绑定

use alloc::collections::BTreeSet;
use log::{debug, warn};

use super::chain::{FreeChain, Iter, NodeHandle};
use crate::{
    consts::ROOT_RECORD_OFFSET,
    device::{Container, ContainerDevice},
    error::{Error, ErrorKind, Result},
    record::{FreeRecord, RootRecord},
    types::FileOffset,
};

/// 空闲链表
///
/// 持有内存链表和根记录（头指针）的副本，负责让两者与磁盘保持一致。
///
/// # 示例
///
/// ```rust,ignore
/// let mut container = Container::new(FileDevice::open("content.ggpk")?);
/// let mut free_list = FreeList::open(&mut container)?;
///
/// // 回收一段区域
/// let handle = free_list.reclaim(&mut container, 4096, 512)?;
///
/// // 分配器取走该区域
/// free_list.remove(&mut container, handle)?;
/// ```
#[derive(Debug)]
pub struct FreeList {
    pub(super) chain: FreeChain,
    pub(super) root: RootRecord,
}

impl FreeList {
    /// 创建空链表（不做 I/O）
    pub fn new(root: RootRecord) -> Self {
        Self {
            chain: FreeChain::new(),
            root,
        }
    }

    /// 读取容器起始处的根记录并加载空闲链表
    pub fn open<D: ContainerDevice>(container: &mut Container<D>) -> Result<Self> {
        let root = RootRecord::read_at(container, ROOT_RECORD_OFFSET)?;
        Self::load(container, root)
    }

    /// 从根记录的头指针出发，沿 `next_free_offset` 加载整条链
    ///
    /// 任何一个节点解码失败都会中止加载并返回该错误；
    /// 重复访问同一偏移说明链表成环，返回 `Corrupted`。
    pub fn load<D: ContainerDevice>(container: &mut Container<D>, root: RootRecord) -> Result<Self> {
        let mut list = Self::new(root);
        let mut visited = BTreeSet::new();
        let mut cursor = list.root.first_free_offset();

        while let Some(offset) = cursor.to_option() {
            if !visited.insert(offset) {
                warn!("[FREELIST] cycle detected at {:#x}", offset);
                return Err(Error::new(ErrorKind::Corrupted, "free chain contains a cycle"));
            }

            let record = FreeRecord::read_at(container, offset).map_err(|err| {
                warn!("[FREELIST] free region at {:#x} failed to decode: {}", offset, err);
                err
            })?;
            cursor = record.next_free_offset();
            list.register(record);
        }

        debug!(
            "[FREELIST] loaded {} free regions, head={}",
            list.len(),
            list.head()
        );
        Ok(list)
    }

    /// 登记一个已存在于磁盘上的空闲区（只修改内存）
    ///
    /// 供启动扫描使用：按磁盘链顺序依次登记。
    pub fn register(&mut self, record: FreeRecord) -> NodeHandle {
        self.chain.push_back(record)
    }

    /// 第一个长度不小于 `min_len` 的空闲区
    ///
    /// 只做查询，实际占用由分配器调用 [`remove`](Self::remove) 完成。
    pub fn find_fit(&self, min_len: u32) -> Option<NodeHandle> {
        self.chain
            .iter()
            .find(|(_, record)| record.length() >= min_len)
            .map(|(handle, _)| handle)
    }

    /// 链表头指针（内存副本）
    pub fn head(&self) -> FileOffset {
        self.root.first_free_offset()
    }

    /// 根记录
    pub fn root(&self) -> &RootRecord {
        &self.root
    }

    /// 内存链表
    pub fn chain(&self) -> &FreeChain {
        &self.chain
    }

    /// 句柄对应的记录
    pub fn get(&self, handle: NodeHandle) -> Result<&FreeRecord> {
        self.chain.get(handle)
    }

    /// 空闲区数量
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// 是否没有空闲区
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// 按链表顺序遍历
    pub fn iter(&self) -> Iter<'_> {
        self.chain.iter()
    }

    /// 所有空闲区的总字节数
    pub fn total_free_bytes(&self) -> u64 {
        self.chain.iter().map(|(_, record)| record.length() as u64).sum()
    }

    /// 把 `prev`（为 None 时即根记录头指针）指向 `target`
    ///
    /// 唯一一次 8 字节写入成功后才修改内存。
    pub(super) fn relink<D: ContainerDevice>(
        &mut self,
        container: &mut Container<D>,
        prev: Option<NodeHandle>,
        target: FileOffset,
    ) -> Result<()> {
        match prev {
            None => self.root.write_first_free(container, target),
            Some(prev) => {
                let field = self.chain.get(prev)?.next_field_offset();
                container.write_i64_at(field, target.to_disk()?)?;
                self.chain.get_mut(prev)?.set_next_free_offset(target);
                Ok(())
            }
        }
    }
}
