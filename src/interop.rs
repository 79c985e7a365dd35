//! # 平台互操作模块
//!
//! ## 设计思路
//!
//! 把“本地堆分配/释放”和“GDI 对象删除”收拢到一个显式模块：
//! - `NativeHeap`：调色板缓冲使用的本地堆，可注入以便测试追踪分配
//! - `GlobalHeap`：默认实现，Windows 上为 `GlobalAlloc` / `GlobalFree`
//! - `DibSource`：能够生成 DIB 句柄并提供调色板的平台位图对象
//! - `delete_object`：`DeleteObject` 的薄封装（仅 Windows）
//!
//! 模块不持有任何进程级状态。

use std::ptr::NonNull;

use crate::palette::ColorPalette;
use crate::BitmapError;

/// 本地堆。
///
/// 返回的地址至少 4 字节对齐，且在 `free` 之前保持有效。
pub trait NativeHeap {
    fn allocate(&self, len: usize) -> Result<NonNull<u8>, BitmapError>;

    /// 释放 `allocate` 返回的地址。
    ///
    /// # Safety
    /// `ptr` 必须来自同一个堆的 `allocate(len)`，且只能释放一次。
    unsafe fn free(&self, ptr: NonNull<u8>, len: usize);
}

/// 平台默认本地堆。
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalHeap;

#[cfg(windows)]
impl NativeHeap for GlobalHeap {
    fn allocate(&self, len: usize) -> Result<NonNull<u8>, BitmapError> {
        use windows::Win32::System::Memory::{GlobalAlloc, GMEM_FIXED};

        // GMEM_FIXED 时返回的 HGLOBAL 就是内存地址
        let hglobal = unsafe { GlobalAlloc(GMEM_FIXED, len) }.map_err(|e| {
            log::warn!("GlobalAlloc 失败: len={} err={:?}", len, e);
            BitmapError::Allocation(len)
        })?;

        NonNull::new(hglobal.0 as *mut u8).ok_or(BitmapError::Allocation(len))
    }

    unsafe fn free(&self, ptr: NonNull<u8>, _len: usize) {
        use windows::Win32::Foundation::{GlobalFree, HGLOBAL};

        // SAFETY: ptr 来自 GlobalAlloc(GMEM_FIXED)，调用方保证只释放一次
        let result = unsafe { GlobalFree(Some(HGLOBAL(ptr.as_ptr().cast()))) };
        if let Some(handle) = global_free_leftover(result) {
            log::warn!("GlobalFree 失败: 句柄 {:?} 未释放", handle.0);
        }
    }
}

/// `GlobalFree` 成功时返回 NULL，被 windows-rs 映射为 `Err`；
/// 返回原句柄 (`Ok`) 才表示释放失败。
#[cfg(windows)]
fn global_free_leftover(
    result: windows::core::Result<windows::Win32::Foundation::HGLOBAL>,
) -> Option<windows::Win32::Foundation::HGLOBAL> {
    result.ok().filter(|handle| !handle.is_invalid())
}

#[cfg(not(windows))]
impl NativeHeap for GlobalHeap {
    fn allocate(&self, len: usize) -> Result<NonNull<u8>, BitmapError> {
        let layout = heap_layout(len)?;
        NonNull::new(unsafe { std::alloc::alloc(layout) }).ok_or(BitmapError::Allocation(len))
    }

    unsafe fn free(&self, ptr: NonNull<u8>, len: usize) {
        if let Ok(layout) = heap_layout(len) {
            // SAFETY: allocate 使用同一个 heap_layout(len)
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}

#[cfg(not(windows))]
fn heap_layout(len: usize) -> Result<std::alloc::Layout, BitmapError> {
    // 零长度分配对 std::alloc 是未定义行为
    std::alloc::Layout::from_size_align(len.max(4), 4).map_err(|_| BitmapError::Allocation(len))
}

/// 能够生成 DIB 句柄的平台位图对象。
pub trait DibSource {
    /// 平台 DIB 句柄类型（Windows 上为 `HBITMAP`）。
    type Dib: Copy;

    /// 生成一个新的 DIB 句柄，所有权转移给调用方。
    fn create_dib(&self) -> Result<Self::Dib, BitmapError>;

    fn palette(&self) -> &ColorPalette;

    /// 删除 `create_dib` 返回的句柄，成功返回 `true`。
    fn delete_dib(&self, dib: Self::Dib) -> bool;
}

/// 删除 GDI 对象，成功返回 `true`。
#[cfg(windows)]
pub fn delete_object(object: windows::Win32::Graphics::Gdi::HGDIOBJ) -> bool {
    unsafe { windows::Win32::Graphics::Gdi::DeleteObject(object) }.as_bool()
}

/// DIB 句柄的作用域守卫：离开作用域时删除句柄。
pub(crate) struct DibGuard<'a, B: DibSource> {
    source: &'a B,
    dib: B::Dib,
}

impl<'a, B: DibSource> DibGuard<'a, B> {
    pub(crate) fn acquire(source: &'a B) -> Result<Self, BitmapError> {
        let dib = source.create_dib()?;
        Ok(Self { source, dib })
    }

    pub(crate) fn dib(&self) -> B::Dib {
        self.dib
    }
}

impl<B: DibSource> Drop for DibGuard<'_, B> {
    fn drop(&mut self) {
        if !self.source.delete_dib(self.dib) {
            log::warn!("⚠️ 删除 DIB 句柄失败");
        }
    }
}
