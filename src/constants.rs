pub const MIN_PAGE_BITS: u32 = 11;
pub const MAX_PAGE_BITS: u32 = 14;

pub const MIN_PAGE_SIZE: u32 = 1 << MIN_PAGE_BITS;
pub const MAX_PAGE_SIZE: u32 = 1 << MAX_PAGE_BITS;

// 64 MiB
pub const DEFAULT_MEMORY_SIZE: u32 = 67_108_864;
pub const STACK_SIZE: u32 = 65_536;

pub const FIRST_PID: u32 = 1024;

pub const FREE_SPACE_NAME: &str = "<FREE_SPACE>";
pub const TEXT_NAME: &str = "<TEXT>";
pub const GLOBALS_NAME: &str = "<GLOBALS>";
pub const STACK_NAME: &str = "<STACK>";

/// Elements shown by `print <pid>:<name>` before the list is elided
pub const PRINT_ELEMENT_LIMIT: usize = 4;
