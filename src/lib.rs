//! ggpk_core: 追加写入、按偏移寻址的打包容器的空闲区管理
//!
//! 容器是单个文件，由变长、带标签的记录组成（目录、文件数据、空闲区）。
//! 删除或替换数据时不收缩、不重写文件，而是把腾出的区域标记为空闲区，
//! 挂到嵌在文件里的单向空闲链表上。本库提供：
//! - 空闲区记录的编码 / 解码
//! - 空闲链表的内存镜像（O(1) 按句柄摘除）
//! - 保持磁盘链与内存链一致的摘除 / 回收算法
//!
//! # 示例
//!
//! ```rust,ignore
//! use ggpk_core::{Container, FreeList, MemoryDevice, Result};
//!
//! fn main() -> Result<()> {
//!     let mut container = Container::new(MemoryDevice::from_vec(bytes));
//!     let mut free_list = FreeList::open(&mut container)?;
//!
//!     // 找一个足够大的空闲区交给分配器
//!     if let Some(handle) = free_list.find_fit(4096) {
//!         let region = free_list.remove(&mut container, handle)?;
//!         // ... 在 region.offset() 处写入新记录 ...
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`device`] - 容器句柄（设备抽象和游标 I/O）
//! - [`consts`] - 磁盘布局常量
//! - [`types`] - 偏移类型
//! - [`record`] - 记录头部、空闲区记录、根记录
//! - [`freelist`] - 空闲链表

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 容器句柄
pub mod device;

/// 常量定义
pub mod consts;

/// 数据类型定义
pub mod types;

/// 记录编解码
pub mod record;

/// 空闲链表
pub mod freelist;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 容器句柄
pub use device::{Container, ContainerDevice, MemoryDevice, SeekFrom};
#[cfg(feature = "std")]
pub use device::FileDevice;

// 类型
pub use types::FileOffset;

// 记录
pub use record::{FreeRecord, RecordHeader, RecordTag, RootRecord};

// 空闲链表
pub use freelist::{FreeChain, FreeList, NodeHandle};
