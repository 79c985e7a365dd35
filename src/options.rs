//! # 构造参数值类型
//!
//! ## 设计思路
//!
//! 本地调用需要的枚举与矩形在此以平台无关的形式定义，
//! Windows 后端再各自映射为 `WICBitmapCreateCacheOption` 等本地类型。
//! 两个枚举的 `parse` / `as_str` 供配置文件使用，保持字符串稳定。

use serde::{Deserialize, Serialize};

use crate::BitmapError;

/// 位图缓存策略，数值与 `WICBitmapCreateCacheOption` 一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOption {
    /// 不缓存，每次访问都回到源。
    #[serde(rename = "none", alias = "no_cache")]
    NoCache = 0,
    /// 首次访问时缓存。
    OnDemand = 1,
    /// 创建时立即缓存。
    OnLoad = 2,
}

impl CacheOption {
    /// 从外部字符串解析。
    ///
    /// # 示例
    /// ```
    /// use wic_bitmap::CacheOption;
    ///
    /// assert_eq!(CacheOption::parse(" On_Load ")?, CacheOption::OnLoad);
    /// # Ok::<(), wic_bitmap::BitmapError>(())
    /// ```
    pub fn parse(value: &str) -> Result<Self, BitmapError> {
        match value.trim().to_lowercase().as_str() {
            "none" | "no_cache" => Ok(Self::NoCache),
            "on_demand" => Ok(Self::OnDemand),
            "on_load" => Ok(Self::OnLoad),
            other => Err(BitmapError::Config(format!(
                "未知缓存策略：{}（可选：none / on_demand / on_load）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoCache => "none",
            Self::OnDemand => "on_demand",
            Self::OnLoad => "on_load",
        }
    }
}

/// HBITMAP 转换时的 Alpha 通道处理，数值与 `WICBitmapAlphaChannelOption` 一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaChannelOption {
    UseAlpha = 0,
    #[serde(rename = "premultiplied", alias = "use_premultiplied_alpha")]
    UsePremultipliedAlpha = 1,
    IgnoreAlpha = 2,
}

impl AlphaChannelOption {
    pub fn parse(value: &str) -> Result<Self, BitmapError> {
        match value.trim().to_lowercase().as_str() {
            "use_alpha" => Ok(Self::UseAlpha),
            "premultiplied" | "use_premultiplied_alpha" => Ok(Self::UsePremultipliedAlpha),
            "ignore_alpha" => Ok(Self::IgnoreAlpha),
            other => Err(BitmapError::Config(format!(
                "未知 Alpha 策略：{}（可选：use_alpha / premultiplied / ignore_alpha）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UseAlpha => "use_alpha",
            Self::UsePremultipliedAlpha => "premultiplied",
            Self::IgnoreAlpha => "ignore_alpha",
        }
    }
}

/// 源图像中的子矩形（像素坐标）。
///
/// 不做任何裁剪，越界由本地调用报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// 调用方持有的原始像素内存：数据 + 行跨度。
///
/// 借用保证内存活到本地调用结束；本地调用同步拷贝，调用返回后即可释放。
#[derive(Debug, Clone, Copy)]
pub struct DataRectangle<'a> {
    data: &'a [u8],
    pitch: u32,
}

impl<'a> DataRectangle<'a> {
    pub fn new(data: &'a [u8], pitch: u32) -> Self {
        Self { data, pitch }
    }

    /// 由裸指针构造。
    ///
    /// # Safety
    /// `ptr` 必须在 `'a` 内指向至少 `len` 个可读字节。
    pub unsafe fn from_raw_parts(ptr: *const u8, len: usize, pitch: u32) -> Self {
        Self {
            // SAFETY: 调用方保证 ptr 在 'a 内指向至少 len 个可读字节
            data: unsafe { std::slice::from_raw_parts(ptr, len) },
            pitch,
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    /// 计算 `height × pitch`，并返回恰好这么长的切片。
    ///
    /// 乘法溢出 `u32` 或切片不足时返回 `InvalidLayout`。
    pub(crate) fn rows(&self, height: u32) -> Result<&'a [u8], BitmapError> {
        let size = height.checked_mul(self.pitch).ok_or_else(|| {
            BitmapError::InvalidLayout(format!(
                "缓冲区大小溢出: height={} pitch={}",
                height, self.pitch
            ))
        })?;

        self.data.get(..size as usize).ok_or_else(|| {
            BitmapError::InvalidLayout(format!(
                "缓冲区长度不足: 期望 {} 实际 {}",
                size,
                self.data.len()
            ))
        })
    }
}

#[cfg(windows)]
mod native {
    use super::{AlphaChannelOption, CacheOption};
    use windows::Win32::Graphics::Imaging::{
        WICBitmapAlphaChannelOption, WICBitmapCacheOnDemand, WICBitmapCacheOnLoad,
        WICBitmapCreateCacheOption, WICBitmapIgnoreAlpha, WICBitmapNoCache,
        WICBitmapUseAlpha, WICBitmapUsePremultipliedAlpha,
    };

    impl From<CacheOption> for WICBitmapCreateCacheOption {
        fn from(option: CacheOption) -> Self {
            match option {
                CacheOption::NoCache => WICBitmapNoCache,
                CacheOption::OnDemand => WICBitmapCacheOnDemand,
                CacheOption::OnLoad => WICBitmapCacheOnLoad,
            }
        }
    }

    impl From<AlphaChannelOption> for WICBitmapAlphaChannelOption {
        fn from(option: AlphaChannelOption) -> Self {
            match option {
                AlphaChannelOption::UseAlpha => WICBitmapUseAlpha,
                AlphaChannelOption::UsePremultipliedAlpha => WICBitmapUsePremultipliedAlpha,
                AlphaChannelOption::IgnoreAlpha => WICBitmapIgnoreAlpha,
            }
        }
    }
}
