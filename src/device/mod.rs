//! 容器句柄
//!
//! 提供容器设备接口和基于游标的随机读写。
//! device/container.rs 定义设备 trait 以及持有游标的 `Container` 包装器

//! device/io.rs 提供基于游标的定长整数、标签和原始字节读写，所有整数均为小端序

//! device/memory.rs 和 device/file.rs 是两种设备实现（内存、std 文件）

mod container;
mod io;
mod memory;
#[cfg(feature = "std")]
mod file;

pub use container::{Container, ContainerDevice, SeekFrom};
pub use memory::MemoryDevice;
#[cfg(feature = "std")]
pub use file::FileDevice;
