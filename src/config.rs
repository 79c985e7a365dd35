//! # 配置模块
//!
//! ## 设计思路
//!
//! 门面的构造函数要求显式传入缓存/Alpha 策略。`BitmapConfig` 把这两个默认值
//! 集中起来，供 `BitmapService` 使用，也允许从 JSON 文件加载。
//!
//! ## 实现思路
//!
//! - `Default` 给出与 WIC 常见用法一致的组合：`on_load` + `use_alpha`。
//! - 字段带 `#[serde(default)]`，配置文件可只写其中一项。
//! - 配置文件不存在时回退默认值，内容损坏时返回 `BitmapError::Config`。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::options::{AlphaChannelOption, CacheOption};
use crate::BitmapError;

/// 位图构造默认参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitmapConfig {
    /// `new` / `from_source` 使用的缓存策略。
    pub cache_option: CacheOption,
    /// `from_dib` 使用的 Alpha 策略。
    pub alpha_option: AlphaChannelOption,
}

impl Default for BitmapConfig {
    fn default() -> Self {
        Self {
            cache_option: CacheOption::OnLoad,
            alpha_option: AlphaChannelOption::UseAlpha,
        }
    }
}

impl BitmapConfig {
    pub fn from_json_str(content: &str) -> Result<Self, BitmapError> {
        serde_json::from_str(content)
            .map_err(|e| BitmapError::Config(format!("解析配置失败: {}", e)))
    }

    /// 从文件加载；文件不存在时返回默认配置。
    pub fn load(path: &Path) -> Result<Self, BitmapError> {
        if !path.exists() {
            log::debug!("配置文件不存在，使用默认配置: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| BitmapError::Config(format!("读取配置文件失败: {}", e)))?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, BitmapError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BitmapError::Config(format!("序列化配置失败: {}", e)))
    }
}
