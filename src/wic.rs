//! # Windows WIC 后端
//!
//! ## 设计思路
//!
//! - `ComApartment`：COM 初始化的 RAII 守卫，构造时 `CoInitializeEx`，`Drop` 时 `CoUninitialize`
//! - `WicFactory`：持有 `IWICImagingFactory`，实现 `ImagingFactory`
//! - `GdiBitmap`：自持 BGRA 像素与调色板的平台位图，按需用 GDI 生成 `HBITMAP`
//!
//! ## 实现思路
//!
//! 每个工厂方法只做类型映射后调用一次本地方法，
//! `windows::core::Error` 统一转为带操作名的 `BitmapError::Native`。
//! 线程模型由调用方选择的 COM 套间决定，这里不做额外约束。

use std::ffi::c_void;

use windows::core::GUID;
use windows::Win32::Foundation::GetLastError;
use windows::Win32::Graphics::Gdi::{CreateBitmap, HBITMAP, HPALETTE};
use windows::Win32::Graphics::Imaging::{
    CLSID_WICImagingFactory, IWICBitmap, IWICBitmapSource, IWICImagingFactory,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED,
};
use windows::Win32::UI::WindowsAndMessaging::HICON;

use crate::factory::{BitmapHandle, ImagingFactory};
use crate::format::PixelFormat;
use crate::interop::{self, DibSource};
use crate::options::{AlphaChannelOption, CacheOption};
use crate::palette::{ColorPalette, PaletteBuffer};
use crate::BitmapError;

/// 当前线程的 COM 套间，离开作用域时反初始化。
pub struct ComApartment {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ComApartment {
    pub fn initialize() -> Result<Self, BitmapError> {
        unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) }
            .ok()
            .map_err(|e| BitmapError::from_win("CoInitializeEx", &e))?;
        log::debug!("COM 套间已初始化 (MTA)");
        Ok(Self {
            _not_send: std::marker::PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// WIC 成像工厂。
#[derive(Clone)]
pub struct WicFactory {
    factory: IWICImagingFactory,
}

impl WicFactory {
    /// 创建进程内 WIC 工厂，调用前当前线程需已初始化 COM。
    pub fn new() -> Result<Self, BitmapError> {
        let factory: IWICImagingFactory =
            unsafe { CoCreateInstance(&CLSID_WICImagingFactory, None, CLSCTX_INPROC_SERVER) }
                .map_err(|e| BitmapError::from_win("CoCreateInstance(WICImagingFactory)", &e))?;
        Ok(Self { factory })
    }

    pub fn from_raw(factory: IWICImagingFactory) -> Self {
        Self { factory }
    }

    pub fn raw(&self) -> &IWICImagingFactory {
        &self.factory
    }
}

impl BitmapHandle for IWICBitmap {
    fn size(&self) -> Result<(u32, u32), BitmapError> {
        let mut width = 0;
        let mut height = 0;
        unsafe { self.GetSize(&mut width, &mut height) }
            .map_err(|e| BitmapError::from_win("GetSize", &e))?;
        Ok((width, height))
    }

    fn pixel_format(&self) -> Result<PixelFormat, BitmapError> {
        unsafe { self.GetPixelFormat() }
            .map(PixelFormat::from)
            .map_err(|e| BitmapError::from_win("GetPixelFormat", &e))
    }
}

impl ImagingFactory for WicFactory {
    type Bitmap = IWICBitmap;
    type Source = IWICBitmapSource;
    type Icon = HICON;
    type Dib = HBITMAP;

    fn create_bitmap(
        &self,
        width: u32,
        height: u32,
        format: &PixelFormat,
        option: CacheOption,
    ) -> Result<IWICBitmap, BitmapError> {
        let guid = GUID::from(*format);
        unsafe { self.factory.CreateBitmap(width, height, &guid, option.into()) }
            .map_err(|e| BitmapError::from_win("CreateBitmap", &e))
    }

    fn create_bitmap_from_memory(
        &self,
        width: u32,
        height: u32,
        format: &PixelFormat,
        stride: u32,
        buffer: &[u8],
    ) -> Result<IWICBitmap, BitmapError> {
        let guid = GUID::from(*format);
        unsafe {
            self.factory
                .CreateBitmapFromMemory(width, height, &guid, stride, buffer)
        }
        .map_err(|e| BitmapError::from_win("CreateBitmapFromMemory", &e))
    }

    fn create_bitmap_from_source(
        &self,
        source: &IWICBitmapSource,
        option: CacheOption,
    ) -> Result<IWICBitmap, BitmapError> {
        unsafe { self.factory.CreateBitmapFromSource(source, option.into()) }
            .map_err(|e| BitmapError::from_win("CreateBitmapFromSource", &e))
    }

    fn create_bitmap_from_source_rect(
        &self,
        source: &IWICBitmapSource,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<IWICBitmap, BitmapError> {
        unsafe {
            self.factory
                .CreateBitmapFromSourceRect(source, x, y, width, height)
        }
        .map_err(|e| BitmapError::from_win("CreateBitmapFromSourceRect", &e))
    }

    fn create_bitmap_from_hicon(&self, icon: HICON) -> Result<IWICBitmap, BitmapError> {
        unsafe { self.factory.CreateBitmapFromHICON(icon) }
            .map_err(|e| BitmapError::from_win("CreateBitmapFromHICON", &e))
    }

    fn create_bitmap_from_hbitmap(
        &self,
        dib: HBITMAP,
        palette: &PaletteBuffer<'_>,
        option: AlphaChannelOption,
    ) -> Result<IWICBitmap, BitmapError> {
        let hpalette = HPALETTE(palette.as_ptr().cast::<c_void>());
        unsafe {
            self.factory
                .CreateBitmapFromHBITMAP(dib, hpalette, option.into())
        }
        .map_err(|e| BitmapError::from_win("CreateBitmapFromHBITMAP", &e))
    }
}

/// 自持像素的 32 位 GDI 位图。
#[derive(Debug, Clone)]
pub struct GdiBitmap {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
    palette: ColorPalette,
}

impl GdiBitmap {
    /// `bgra` 必须恰好为 `width × height × 4` 字节（自上而下，BGRA）。
    pub fn new(
        width: u32,
        height: u32,
        bgra: Vec<u8>,
        palette: ColorPalette,
    ) -> Result<Self, BitmapError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| BitmapError::InvalidLayout("位图尺寸溢出".to_string()))?;

        if bgra.len() != expected {
            return Err(BitmapError::InvalidLayout(format!(
                "像素长度不匹配: 期望 {} 实际 {}",
                expected,
                bgra.len()
            )));
        }

        let width = i32::try_from(width)
            .map_err(|_| BitmapError::InvalidLayout(format!("宽度超出范围: {}", width)))?;
        let height = i32::try_from(height)
            .map_err(|_| BitmapError::InvalidLayout(format!("高度超出范围: {}", height)))?;

        Ok(Self {
            width,
            height,
            pixels: bgra,
            palette,
        })
    }
}

impl DibSource for GdiBitmap {
    type Dib = HBITMAP;

    fn create_dib(&self) -> Result<HBITMAP, BitmapError> {
        let hbitmap = unsafe {
            CreateBitmap(
                self.width,
                self.height,
                1,
                32,
                Some(self.pixels.as_ptr().cast::<c_void>()),
            )
        };
        if hbitmap.is_invalid() {
            let hr = unsafe { GetLastError() }.to_hresult();
            return Err(BitmapError::native("CreateBitmap(GDI)", hr.0, "GDI 返回空句柄"));
        }
        Ok(hbitmap)
    }

    fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    fn delete_dib(&self, dib: HBITMAP) -> bool {
        interop::delete_object(dib.into())
    }
}
