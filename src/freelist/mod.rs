//! 空闲区链表管理
//!
//! 空闲链表同时存在两份表示：
//!
//! 1. **磁盘**：根记录的 `first_free_offset` + 每个 `FREE` 记录的 `next_free_offset`
//! 2. **内存**：[`FreeChain`]，节点顺序与磁盘链一致
//!
//! 所有修改都遵循同一个顺序：先完成唯一一次 8 字节指针写入，再修改内存结构。
//! 写入失败时两份表示都保持调用前的状态；崩溃时磁盘是权威，重新扫描即可重建内存链。
//!
//! 本模块不做任何同步，调用者需要把 `Container` 和 [`FreeList`] 作为一个整体串行访问。
//! 也不合并相邻空闲区、不收缩文件。

mod chain;
mod list;
mod reclaim;
mod remove;
mod verify;

#[cfg(test)]
mod test_support;

pub use chain::{FreeChain, Iter, NodeHandle};
pub use list::FreeList;
