//! 容器设备核心类型

use crate::error::{Error, ErrorKind, Result};

/// 容器设备接口
///
/// 实现此 trait 以提供底层的按字节随机访问。
///
/// # 示例
///
/// ```rust,ignore
/// use ggpk_core::{ContainerDevice, Result};
///
/// struct MyDevice {
///     // ...
/// }
///
/// impl ContainerDevice for MyDevice {
///     fn len(&self) -> u64 {
///         self.size
///     }
///
///     fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
///         // 实现读取
///         Ok(buf.len())
///     }
///
///     fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
///         // 实现写入
///         Ok(buf.len())
///     }
/// }
/// ```
pub trait ContainerDevice {
    /// 当前容器长度（字节）
    fn len(&self) -> u64;

    /// 从绝对偏移读取
    ///
    /// # 返回
    ///
    /// 成功返回实际读取的字节数
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// 向绝对偏移写入
    ///
    /// 写入位置超过当前末尾时，设备应当扩展。
    ///
    /// # 返回
    ///
    /// 成功返回实际写入的字节数
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize>;

    /// 刷新缓存
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// 是否只读
    fn is_read_only(&self) -> bool {
        false
    }

    /// 容器是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 游标定位方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    /// 相对容器起点
    Start(u64),
    /// 相对当前位置
    Current(i64),
    /// 相对容器末尾
    End(i64),
}

/// 容器句柄
///
/// 独占持有底层设备，并维护一个读写游标。
///
/// # 并发使用
///
/// Container 本身不包含内部锁。所有修改操作都需要 `&mut Container`，
/// 多线程环境下应由调用者在外部串行化：
///
/// ```rust,ignore
/// use std::sync::{Arc, Mutex};
///
/// let shared = Arc::new(Mutex::new((container, free_list)));
/// ```
pub struct Container<D> {
    /// 底层设备
    device: D,
    /// 游标位置（绝对偏移）
    position: u64,
    /// 读取调用次数
    read_count: u64,
    /// 写入调用次数
    write_count: u64,
    /// 累计写入字节数
    bytes_written: u64,
}

impl<D: ContainerDevice> Container<D> {
    /// 创建新的容器句柄，游标位于 0
    pub fn new(device: D) -> Self {
        Self::with_position(device, 0)
    }

    /// 创建容器句柄并设置初始游标
    pub fn with_position(device: D, position: u64) -> Self {
        Self {
            device,
            position,
            read_count: 0,
            write_count: 0,
            bytes_written: 0,
        }
    }

    /// 获取底层设备的引用
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 获取底层设备的可变引用
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// 取回底层设备
    pub fn into_inner(self) -> D {
        self.device
    }

    /// 容器长度
    pub fn len(&self) -> u64 {
        self.device.len()
    }

    /// 容器是否为空
    pub fn is_empty(&self) -> bool {
        self.device.is_empty()
    }

    /// 当前游标位置
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 游标到末尾剩余的字节数
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position)
    }

    /// 移动游标
    ///
    /// 允许越过末尾（后续写入会扩展容器），但不允许落到 0 之前。
    ///
    /// # 返回
    ///
    /// 成功返回新的游标位置
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let (base, delta) = match pos {
            SeekFrom::Start(offset) => {
                self.position = offset;
                return Ok(offset);
            }
            SeekFrom::Current(delta) => (self.position, delta),
            SeekFrom::End(delta) => (self.len(), delta),
        };

        let new_pos = base
            .checked_add_signed(delta)
            .ok_or(Error::new(ErrorKind::InvalidInput, "seek before start of container"))?;
        self.position = new_pos;
        Ok(new_pos)
    }

    /// 向前跳过 `count` 字节，不做任何 I/O
    pub fn skip(&mut self, count: u64) -> Result<u64> {
        self.position = self
            .position
            .checked_add(count)
            .ok_or(Error::new(ErrorKind::InvalidInput, "skip overflows cursor"))?;
        Ok(self.position)
    }

    /// 获取读取调用次数
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// 获取写入调用次数
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// 获取累计写入字节数
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// 是否只读
    pub fn is_read_only(&self) -> bool {
        self.device.is_read_only()
    }

    /// 刷新底层设备
    pub fn flush(&mut self) -> Result<()> {
        self.device.flush()
    }

    // 内部辅助方法

    /// 增加读计数
    pub(super) fn inc_read_count(&mut self) {
        self.read_count += 1;
    }

    /// 增加写计数
    pub(super) fn inc_write_count(&mut self, bytes: usize) {
        self.write_count += 1;
        self.bytes_written += bytes as u64;
    }

    /// 游标前移（I/O 成功后调用）
    pub(super) fn advance(&mut self, count: usize) {
        self.position += count as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryDevice;

    #[test]
    fn test_seek_variants() {
        let mut container = Container::new(MemoryDevice::with_len(100));

        assert_eq!(container.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert_eq!(container.seek(SeekFrom::Current(5)).unwrap(), 15);
        assert_eq!(container.seek(SeekFrom::Current(-15)).unwrap(), 0);
        assert_eq!(container.seek(SeekFrom::End(-4)).unwrap(), 96);
        assert_eq!(container.remaining(), 4);

        // 允许越过末尾
        assert_eq!(container.seek(SeekFrom::End(8)).unwrap(), 108);
        assert_eq!(container.remaining(), 0);
    }

    #[test]
    fn test_seek_before_start() {
        let mut container = Container::new(MemoryDevice::with_len(16));
        container.seek(SeekFrom::Start(4)).unwrap();

        let err = container.seek(SeekFrom::Current(-5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        // 失败时游标不变
        assert_eq!(container.position(), 4);
    }

    #[test]
    fn test_skip() {
        let mut container = Container::with_position(MemoryDevice::new(), 8);
        assert_eq!(container.skip(16).unwrap(), 24);
        assert_eq!(container.read_count(), 0);
        assert_eq!(container.write_count(), 0);
    }
}
