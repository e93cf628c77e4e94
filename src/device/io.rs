//! 基于游标的容器 I/O
//!
//! 所有定长整数均为小端序。

use byteorder::{ByteOrder, LittleEndian};

use super::{Container, ContainerDevice, SeekFrom};
use crate::error::{Error, ErrorKind, Result};

impl<D: ContainerDevice> Container<D> {
    /// 从游标处读取恰好 `buf.len()` 字节
    ///
    /// 读取范围越过容器末尾时返回 `Io` 错误，游标不变。
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        if (len as u64) > self.remaining() {
            return Err(Error::new(ErrorKind::Io, "read past end of container"));
        }

        let pos = self.position();
        self.inc_read_count();
        let n = self.device_mut().read_at(pos, buf)?;
        if n < len {
            return Err(Error::new(ErrorKind::Io, "short read from device"));
        }

        self.advance(len);
        Ok(())
    }

    /// 在游标处写入全部字节
    ///
    /// 设备只读或写入失败时返回 `Io` 错误，游标不变。
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::new(ErrorKind::Io, "container is read-only"));
        }

        let len = buf.len();
        let pos = self.position();
        self.inc_write_count(len);
        let n = self.device_mut().write_at(pos, buf)?;
        if n < len {
            return Err(Error::new(ErrorKind::Io, "short write to device"));
        }

        self.advance(len);
        Ok(())
    }

    /// 读取 u32
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    /// 读取 i64
    pub fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_i64(&buf))
    }

    /// 读取 4 字节记录标签
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let mut tag = [0u8; 4];
        self.read_exact(&mut tag)?;
        Ok(tag)
    }

    /// 写入 u32
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.write_all(&buf)
    }

    /// 写入 i64
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let mut buf = [0u8; 8];
        LittleEndian::write_i64(&mut buf, value);
        self.write_all(&buf)
    }

    /// 写入 4 字节记录标签
    pub fn write_tag(&mut self, tag: &[u8; 4]) -> Result<()> {
        self.write_all(tag)
    }

    /// 从绝对偏移读取字节
    ///
    /// 游标停在读取范围之后。
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let mut buf = [0u8; 16];
    /// container.read_bytes_at(100, &mut buf)?;
    /// ```
    pub fn read_bytes_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_exact(buf)
    }

    /// 向绝对偏移写入字节
    ///
    /// 游标停在写入范围之后。
    pub fn write_bytes_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.write_all(buf)
    }

    /// 从绝对偏移读取 i64
    pub fn read_i64_at(&mut self, offset: u64) -> Result<i64> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_i64()
    }

    /// 向绝对偏移写入 i64
    ///
    /// 单次 8 字节写入，用于更新链表指针字段。
    pub fn write_i64_at(&mut self, offset: u64, value: i64) -> Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.write_i64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryDevice;

    #[test]
    fn test_integers_little_endian() {
        let mut container = Container::new(MemoryDevice::new());
        container.write_u32(0x1122_3344).unwrap();
        container.write_i64(-2).unwrap();
        assert_eq!(container.position(), 12);

        let bytes = container.device().as_slice();
        assert_eq!(&bytes[..4], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[4..12], &[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        container.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(container.read_u32().unwrap(), 0x1122_3344);
        assert_eq!(container.read_i64().unwrap(), -2);
    }

    #[test]
    fn test_tag_roundtrip() {
        let mut container = Container::new(MemoryDevice::new());
        container.write_tag(b"FREE").unwrap();
        container.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(&container.read_tag().unwrap(), b"FREE");
    }

    #[test]
    fn test_read_past_end() {
        let mut container = Container::new(MemoryDevice::with_len(6));
        container.seek(SeekFrom::Start(2)).unwrap();

        let err = container.read_i64().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(container.position(), 2);
    }

    #[test]
    fn test_write_extends_device() {
        let mut container = Container::new(MemoryDevice::with_len(4));
        container.write_i64_at(8, 200).unwrap();
        assert_eq!(container.len(), 16);
        assert_eq!(container.position(), 16);
        assert_eq!(container.read_i64_at(8).unwrap(), 200);
    }

    #[test]
    fn test_write_read_only() {
        let mut device = MemoryDevice::with_len(16);
        device.set_read_only(true);
        let mut container = Container::new(device);

        let err = container.write_i64_at(0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(container.write_count(), 0);
    }

    #[test]
    fn test_io_statistics() {
        let mut container = Container::new(MemoryDevice::with_len(32));
        container.write_bytes_at(0, &[1, 2, 3]).unwrap();
        container.write_i64_at(8, 7).unwrap();
        let mut buf = [0u8; 3];
        container.read_bytes_at(0, &mut buf).unwrap();

        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(container.write_count(), 2);
        assert_eq!(container.bytes_written(), 11);
        assert_eq!(container.read_count(), 1);
    }
}
