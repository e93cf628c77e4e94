//! 容器文件常量定义
//!
//! 这个模块包含了容器磁盘布局的所有常量定义，包括：
//! - 记录头部布局
//! - 记录标签
//! - 根记录（GGPK）字段偏移

//=============================================================================
// 记录头部
//=============================================================================

/// 记录长度字段大小（u32）
pub const RECORD_LENGTH_SIZE: u64 = 4;

/// 记录标签大小（4 字节 ASCII）
pub const RECORD_TAG_SIZE: u64 = 4;

/// 通用记录头部大小：length + tag
pub const RECORD_HEADER_SIZE: u64 = RECORD_LENGTH_SIZE + RECORD_TAG_SIZE;

/// 偏移字段大小（i64）
pub const OFFSET_FIELD_SIZE: u64 = 8;

//=============================================================================
// 记录标签
//=============================================================================

/// 根记录标签
pub const TAG_ROOT: [u8; 4] = *b"GGPK";

/// 目录记录标签
pub const TAG_DIRECTORY: [u8; 4] = *b"PDIR";

/// 文件记录标签
pub const TAG_FILE: [u8; 4] = *b"FILE";

/// 空闲区记录标签
pub const TAG_FREE: [u8; 4] = *b"FREE";

//=============================================================================
// 空闲区记录（FREE）
//=============================================================================

/// 空闲区记录头部大小：length(4) + tag(4) + next_free_offset(8)
pub const FREE_HEADER_SIZE: u64 = RECORD_HEADER_SIZE + OFFSET_FIELD_SIZE;

/// `next_free_offset` 字段相对记录起点的偏移
pub const FREE_NEXT_OFFSET_FIELD: u64 = RECORD_HEADER_SIZE;

//=============================================================================
// 根记录（GGPK）
//=============================================================================

/// 根记录总长度：length(4) + tag(4) + version(4) + root_dir(8) + first_free(8)
pub const ROOT_RECORD_SIZE: u64 = RECORD_HEADER_SIZE + 4 + OFFSET_FIELD_SIZE * 2;

/// 根目录偏移字段相对根记录起点的偏移
pub const ROOT_DIRECTORY_FIELD: u64 = RECORD_HEADER_SIZE + 4;

/// 首个空闲区偏移字段（链表头指针）相对根记录起点的偏移
pub const ROOT_FIRST_FREE_FIELD: u64 = ROOT_DIRECTORY_FIELD + OFFSET_FIELD_SIZE;

/// 根记录通常位于文件起始处
pub const ROOT_RECORD_OFFSET: u64 = 0;

/// 默认根记录版本号
pub const ROOT_DEFAULT_VERSION: u32 = 3;
