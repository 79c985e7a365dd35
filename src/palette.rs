//! # 调色板编组模块
//!
//! ## 设计思路
//!
//! HBITMAP 构造路径需要把调色板交给本地调用。本地侧期望一块连续内存：
//!
//! ```text
//! offset 0      4      8            8 + 4n
//!        ┌──────┬──────┬────────────┐
//!        │flags │count │entries[n]  │   每个字段 4 字节，本机字节序
//!        └──────┴──────┴────────────┘
//! ```
//!
//! ## 实现思路
//!
//! - `ColorPalette` 是纯值对象，`encode` 生成同样布局的 `Vec<u8>` 便于检查。
//! - `PaletteBuffer` 在 `NativeHeap` 上分配并写入，`Drop` 时归还，
//!   因此无论本地调用成功与否都会释放。

use std::ptr::NonNull;

use crate::interop::NativeHeap;
use crate::BitmapError;

const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 4;

/// 调色板标志位。
pub struct PaletteFlags;

impl PaletteFlags {
    /// 条目包含 Alpha 信息。
    pub const HAS_ALPHA: u32 = 0x0001;
    /// 灰度调色板。
    pub const GRAY_SCALE: u32 = 0x0002;
    /// 半色调调色板。
    pub const HALFTONE: u32 = 0x0004;
}

/// 32 位 ARGB 颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn from_u32(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn to_argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// 调色板值：标志位 + 有序颜色条目。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorPalette {
    pub flags: u32,
    pub entries: Vec<Color>,
}

impl ColorPalette {
    pub fn new(flags: u32, entries: Vec<Color>) -> Self {
        Self { flags, entries }
    }

    /// 本地布局所需字节数：`4 + 4 + 4 × count`。
    pub fn native_len(&self) -> usize {
        HEADER_LEN + ENTRY_LEN * self.entries.len()
    }

    /// 生成本地布局的字节副本。
    pub fn encode(&self) -> Result<Vec<u8>, BitmapError> {
        let mut out = vec![0u8; self.native_len()];
        self.write_into(&mut out)?;
        Ok(out)
    }

    fn entry_count(&self) -> Result<u32, BitmapError> {
        u32::try_from(self.entries.len()).map_err(|_| {
            BitmapError::InvalidLayout(format!("调色板条目过多: {}", self.entries.len()))
        })
    }

    fn write_into(&self, out: &mut [u8]) -> Result<(), BitmapError> {
        let count = self.entry_count()?;
        out[0..4].copy_from_slice(&self.flags.to_ne_bytes());
        out[4..8].copy_from_slice(&count.to_ne_bytes());
        for (slot, color) in out[HEADER_LEN..]
            .chunks_exact_mut(ENTRY_LEN)
            .zip(&self.entries)
        {
            slot.copy_from_slice(&color.to_argb().to_ne_bytes());
        }
        Ok(())
    }
}

/// 本地堆上的调色板缓冲，离开作用域时释放。
pub struct PaletteBuffer<'h> {
    ptr: NonNull<u8>,
    len: usize,
    heap: &'h dyn NativeHeap,
}

impl<'h> PaletteBuffer<'h> {
    /// 分配 `palette.native_len()` 字节并写入本地布局。
    pub fn marshal(heap: &'h dyn NativeHeap, palette: &ColorPalette) -> Result<Self, BitmapError> {
        let len = palette.native_len();
        let ptr = heap.allocate(len)?;
        // 先交给守卫，后续写入失败也能释放
        let mut buffer = Self { ptr, len, heap };
        palette.write_into(buffer.as_bytes_mut())?;

        log::debug!(
            "🎨 调色板已编组 - flags=0x{:X} entries={} bytes={}",
            palette.flags,
            palette.entries.len(),
            len
        );
        Ok(buffer)
    }

    /// 本地地址，作为调色板句柄传给本地调用。
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// 字节数，至少为头部的 8 字节。
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: ptr/len 来自 heap.allocate(len)，在 Drop 释放前一直有效
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: 同上，且 &mut self 保证独占
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for PaletteBuffer<'_> {
    fn drop(&mut self) {
        // SAFETY: ptr/len 来自同一个 heap 的 allocate(len)，Drop 只运行一次
        unsafe { self.heap.free(self.ptr, self.len) };
    }
}
