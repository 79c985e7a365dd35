//! # 本地成像工厂抽象
//!
//! ## 设计思路
//!
//! `ImagingFactory` 把 `IWICImagingFactory` 的六个 create-bitmap 调用抽象成 trait，
//! 让 `Bitmap` 的构造函数对后端泛型：Windows 上由 `WicFactory` 实现，
//! 测试中由记录型 mock 实现。
//!
//! 每个方法都是一次阻塞的本地调用，要么返回已初始化的句柄，要么返回错误。

use crate::format::PixelFormat;
use crate::options::{AlphaChannelOption, CacheOption};
use crate::palette::PaletteBuffer;
use crate::BitmapError;

/// 本地位图句柄能报告的基本信息。
pub trait BitmapHandle {
    fn size(&self) -> Result<(u32, u32), BitmapError>;
    fn pixel_format(&self) -> Result<PixelFormat, BitmapError>;
}

/// 本地成像工厂。
pub trait ImagingFactory {
    /// 创建出的位图句柄，`Drop` 时释放本地资源。
    type Bitmap: BitmapHandle;
    /// 可被物化为位图的抽象图像源。
    type Source;
    /// 平台图标句柄，调用方持有。
    type Icon: Copy;
    /// 平台 DIB 句柄。
    type Dib: Copy;

    fn create_bitmap(
        &self,
        width: u32,
        height: u32,
        format: &PixelFormat,
        option: CacheOption,
    ) -> Result<Self::Bitmap, BitmapError>;

    /// `buffer.len()` 即传给本地调用的缓冲区大小。
    fn create_bitmap_from_memory(
        &self,
        width: u32,
        height: u32,
        format: &PixelFormat,
        stride: u32,
        buffer: &[u8],
    ) -> Result<Self::Bitmap, BitmapError>;

    fn create_bitmap_from_source(
        &self,
        source: &Self::Source,
        option: CacheOption,
    ) -> Result<Self::Bitmap, BitmapError>;

    fn create_bitmap_from_source_rect(
        &self,
        source: &Self::Source,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Self::Bitmap, BitmapError>;

    fn create_bitmap_from_hicon(&self, icon: Self::Icon) -> Result<Self::Bitmap, BitmapError>;

    fn create_bitmap_from_hbitmap(
        &self,
        dib: Self::Dib,
        palette: &PaletteBuffer<'_>,
        option: AlphaChannelOption,
    ) -> Result<Self::Bitmap, BitmapError>;
}
