//! # 位图构造门面
//!
//! ## 设计思路
//!
//! `Bitmap` 只拥有一个本地位图句柄。每种来源对应一个具名构造函数，
//! 各自只调用一次工厂方法：
//!
//! | 构造函数 | 本地调用 |
//! |----------|----------|
//! | `new` | `CreateBitmap` |
//! | `from_memory` | `CreateBitmapFromMemory` |
//! | `from_source` | `CreateBitmapFromSource` |
//! | `from_source_rect` | `CreateBitmapFromSourceRect` |
//! | `from_icon` | `CreateBitmapFromHICON` |
//! | `from_dib` / `from_dib_in` | `CreateBitmapFromHBITMAP` |
//!
//! ## 实现思路
//!
//! - 句柄只在工厂调用成功后才被包装，失败时不存在半初始化对象。
//! - 不重试、不转换像素，本地错误原样上抛。
//! - DIB 路径用 `DibGuard` + `PaletteBuffer` 两个 RAII 守卫，
//!   任何退出路径都会删除 DIB 并释放调色板缓冲。

use crate::factory::{BitmapHandle, ImagingFactory};
use crate::format::PixelFormat;
use crate::interop::{DibGuard, DibSource, GlobalHeap, NativeHeap};
use crate::options::{AlphaChannelOption, CacheOption, DataRectangle, Rect};
use crate::palette::PaletteBuffer;
use crate::BitmapError;

/// 拥有一个本地位图句柄的位图对象。
#[derive(Debug)]
pub struct Bitmap<H> {
    handle: H,
}

fn log_failure<T>(operation: &str, result: Result<T, BitmapError>) -> Result<T, BitmapError> {
    if let Err(err) = &result {
        log::warn!("❌ {} 失败: {}", operation, err);
    }
    result
}

impl<H: BitmapHandle> Bitmap<H> {
    /// 创建指定尺寸与格式的空白位图。
    pub fn new<F>(
        factory: &F,
        width: u32,
        height: u32,
        format: PixelFormat,
        option: CacheOption,
    ) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
    {
        log::debug!(
            "🖼️ CreateBitmap - {}x{} format={} cache={}",
            width,
            height,
            format,
            option.as_str()
        );
        let handle = log_failure(
            "CreateBitmap",
            factory.create_bitmap(width, height, &format, option),
        )?;
        Ok(Self { handle })
    }

    /// 从调用方内存创建位图。
    ///
    /// 传给本地调用的缓冲区大小恒为 `height × pitch`，本地调用同步拷贝，
    /// 返回后 `data` 即可释放。
    pub fn from_memory<F>(
        factory: &F,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: DataRectangle<'_>,
    ) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
    {
        let buffer = data.rows(height)?;
        log::debug!(
            "🖼️ CreateBitmapFromMemory - {}x{} format={} stride={} bytes={}",
            width,
            height,
            format,
            data.pitch(),
            buffer.len()
        );
        let handle = log_failure(
            "CreateBitmapFromMemory",
            factory.create_bitmap_from_memory(width, height, &format, data.pitch(), buffer),
        )?;
        Ok(Self { handle })
    }

    /// 将已有图像源物化为位图。
    pub fn from_source<F>(
        factory: &F,
        source: &F::Source,
        option: CacheOption,
    ) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
    {
        log::debug!("🖼️ CreateBitmapFromSource - cache={}", option.as_str());
        let handle = log_failure(
            "CreateBitmapFromSource",
            factory.create_bitmap_from_source(source, option),
        )?;
        Ok(Self { handle })
    }

    /// 将图像源的子矩形物化为位图。越界不裁剪，由本地调用报错。
    pub fn from_source_rect<F>(
        factory: &F,
        source: &F::Source,
        rect: Rect,
    ) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
    {
        log::debug!(
            "🖼️ CreateBitmapFromSourceRect - x={} y={} {}x{}",
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
        let handle = log_failure(
            "CreateBitmapFromSourceRect",
            factory.create_bitmap_from_source_rect(source, rect.x, rect.y, rect.width, rect.height),
        )?;
        Ok(Self { handle })
    }

    /// 从平台图标创建位图。图标仍归调用方所有，这里不销毁。
    pub fn from_icon<F>(factory: &F, icon: F::Icon) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
    {
        log::debug!("🖼️ CreateBitmapFromHICON");
        let handle = log_failure("CreateBitmapFromHICON", factory.create_bitmap_from_hicon(icon))?;
        Ok(Self { handle })
    }

    /// 从平台位图对象创建位图，调色板缓冲分配在 `GlobalHeap` 上。
    pub fn from_dib<F, B>(
        factory: &F,
        bitmap: &B,
        option: AlphaChannelOption,
    ) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
        B: DibSource<Dib = F::Dib>,
    {
        Self::from_dib_in(factory, &GlobalHeap, bitmap, option)
    }

    /// 同 `from_dib`，调色板缓冲分配在指定的本地堆上。
    pub fn from_dib_in<F, B>(
        factory: &F,
        heap: &dyn NativeHeap,
        bitmap: &B,
        option: AlphaChannelOption,
    ) -> Result<Self, BitmapError>
    where
        F: ImagingFactory<Bitmap = H>,
        B: DibSource<Dib = F::Dib>,
    {
        let dib = DibGuard::acquire(bitmap)?;
        let palette = PaletteBuffer::marshal(heap, bitmap.palette())?;
        log::debug!(
            "🖼️ CreateBitmapFromHBITMAP - palette_bytes={} alpha={}",
            palette.len(),
            option.as_str()
        );
        let handle = log_failure(
            "CreateBitmapFromHBITMAP",
            factory.create_bitmap_from_hbitmap(dib.dib(), &palette, option),
        )?;
        Ok(Self { handle })
    }

    /// 本地位图报告的宽高。
    pub fn size(&self) -> Result<(u32, u32), BitmapError> {
        self.handle.size()
    }

    pub fn pixel_format(&self) -> Result<PixelFormat, BitmapError> {
        self.handle.pixel_format()
    }
}

impl<H> Bitmap<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// 取出句柄，由调用方接管释放。
    pub fn into_inner(self) -> H {
        self.handle
    }
}
