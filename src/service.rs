//! # 服务层
//!
//! `BitmapService` 借用一个工厂并携带 `BitmapConfig`，
//! 在门面需要缓存/Alpha 策略的地方填入配置值，其余参数原样透传。

use crate::bitmap::Bitmap;
use crate::config::BitmapConfig;
use crate::factory::ImagingFactory;
use crate::format::PixelFormat;
use crate::interop::DibSource;
use crate::options::{DataRectangle, Rect};
use crate::BitmapError;

/// 带默认参数的位图构造入口。
pub struct BitmapService<'f, F: ImagingFactory> {
    factory: &'f F,
    config: BitmapConfig,
}

impl<'f, F: ImagingFactory> BitmapService<'f, F> {
    pub fn new(factory: &'f F, config: BitmapConfig) -> Self {
        Self { factory, config }
    }

    pub fn with_defaults(factory: &'f F) -> Self {
        Self::new(factory, BitmapConfig::default())
    }

    pub fn config(&self) -> &BitmapConfig {
        &self.config
    }

    pub fn factory(&self) -> &'f F {
        self.factory
    }

    pub fn create(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Bitmap<F::Bitmap>, BitmapError> {
        Bitmap::new(self.factory, width, height, format, self.config.cache_option)
    }

    pub fn from_memory(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: DataRectangle<'_>,
    ) -> Result<Bitmap<F::Bitmap>, BitmapError> {
        Bitmap::from_memory(self.factory, width, height, format, data)
    }

    pub fn from_source(&self, source: &F::Source) -> Result<Bitmap<F::Bitmap>, BitmapError> {
        Bitmap::from_source(self.factory, source, self.config.cache_option)
    }

    pub fn from_source_rect(
        &self,
        source: &F::Source,
        rect: Rect,
    ) -> Result<Bitmap<F::Bitmap>, BitmapError> {
        Bitmap::from_source_rect(self.factory, source, rect)
    }

    pub fn from_icon(&self, icon: F::Icon) -> Result<Bitmap<F::Bitmap>, BitmapError> {
        Bitmap::from_icon(self.factory, icon)
    }

    pub fn from_dib<B>(&self, bitmap: &B) -> Result<Bitmap<F::Bitmap>, BitmapError>
    where
        B: DibSource<Dib = F::Dib>,
    {
        Bitmap::from_dib(self.factory, bitmap, self.config.alpha_option)
    }
}
