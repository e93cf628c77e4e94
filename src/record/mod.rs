//! 容器记录
//!
//! 容器由变长、带标签的记录组成，每条记录以 `length: u32` 和 4 字节 ASCII 标签开头。
//! 本模块只解释两类记录：
//!
//! - [`FreeRecord`] - 已回收的空闲区（`FREE`）
//! - [`RootRecord`] - 根描述记录（`GGPK`），持有空闲链表的头指针
//!
//! 目录（`PDIR`）和文件（`FILE`）记录只参与标签分派，内容由上层解释。

mod header;
mod free;
mod root;

pub use header::{RecordHeader, RecordTag};
pub use free::FreeRecord;
pub use root::RootRecord;
