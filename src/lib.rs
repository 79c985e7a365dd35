//! # WIC 位图构造库 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  BitmapService (config 默认参数)                         │
//! │        ↓                                                │
//! │  Bitmap::{new, from_memory, from_source,                │
//! │          from_source_rect, from_icon, from_dib}         │
//! │        ↓ 每个构造函数只调用一次                          │
//! │  ImagingFactory (trait)                                 │
//! │    ├─ WicFactory ── IWICImagingFactory   (Windows)      │
//! │    └─ 测试中的记录型 mock                               │
//! │                                                         │
//! │  from_dib 额外依赖:                                      │
//! │    ├─ interop::DibSource   DIB 句柄 (DibGuard RAII)     │
//! │    └─ palette::PaletteBuffer  本地堆调色板 (Drop 释放)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `BitmapError` |
//! | [`bitmap`] | 位图构造门面，持有唯一本地句柄 |
//! | [`factory`] | 本地成像工厂 trait |
//! | [`palette`] | 调色板值对象与本地布局编组 |
//! | [`interop`] | 本地堆、DIB 来源、`DeleteObject` |
//! | [`format`] | 像素格式 GUID |
//! | [`options`] | 缓存 / Alpha 策略、矩形、内存描述 |
//! | [`config`] | 默认参数配置 |
//! | [`service`] | 带配置的构造入口 |
//! | `wic` | Windows 后端（仅 Windows） |

pub mod bitmap;
pub mod config;
pub mod error;
pub mod factory;
pub mod format;
pub mod interop;
pub mod options;
pub mod palette;
pub mod service;
#[cfg(windows)]
pub mod wic;

pub use bitmap::Bitmap;
pub use config::BitmapConfig;
pub use error::BitmapError;
pub use factory::{BitmapHandle, ImagingFactory};
pub use format::PixelFormat;
pub use interop::{DibSource, GlobalHeap, NativeHeap};
pub use options::{AlphaChannelOption, CacheOption, DataRectangle, Rect};
pub use palette::{Color, ColorPalette, PaletteBuffer, PaletteFlags};
pub use service::BitmapService;
