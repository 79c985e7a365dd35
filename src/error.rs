//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 本库只做参数编组与一次本地调用，因此失败来源很少：
//! - 本地工厂调用失败（携带原始 HRESULT，不再细分）
//! - 内存布局在进入本地调用前就已不合法（溢出、切片长度不足）
//! - 本地堆分配失败
//! - 配置文件解析失败
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 本地失败的消息统一由 `format_native_error_message` 生成，
//!   固定携带 `hr` / `code` / `hint` / `detail` 字段，便于日志检索。

/// 位图构造错误
#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    /// 本地工厂调用失败
    #[error("{message}")]
    Native {
        /// 失败的本地操作名（如 `CreateBitmapFromMemory`）
        operation: &'static str,
        /// 原始 HRESULT
        hr: i32,
        message: String,
    },

    /// 内存布局无效（尺寸溢出、缓冲区长度不足、调色板条目过多）
    #[error("内存布局无效: {0}")]
    InvalidLayout(String),

    /// 本地堆拒绝分配
    #[error("本地内存分配失败: {0} 字节")]
    Allocation(usize),

    /// 配置读取或解析失败
    #[error("配置错误: {0}")]
    Config(String),
}

impl BitmapError {
    /// 由本地调用的 HRESULT 构造错误。
    pub fn native(operation: &'static str, hr: i32, detail: &str) -> Self {
        Self::Native {
            operation,
            hr,
            message: format_native_error_message(operation, hr, detail),
        }
    }

    /// 本地失败时返回原始 HRESULT，其余分支返回 `None`。
    pub fn hresult(&self) -> Option<i32> {
        match self {
            Self::Native { hr, .. } => Some(*hr),
            _ => None,
        }
    }
}

#[cfg(windows)]
impl BitmapError {
    pub(crate) fn from_win(operation: &'static str, err: &windows::core::Error) -> Self {
        Self::native(operation, err.code().0, &err.message())
    }
}

pub(crate) const E_INVALIDARG: u32 = 0x8007_0057;
pub(crate) const E_OUTOFMEMORY: u32 = 0x8007_000E;
pub(crate) const WINCODEC_ERR_WRONGSTATE: u32 = 0x8898_2F04;
pub(crate) const WINCODEC_ERR_VALUEOUTOFRANGE: u32 = 0x8898_2F05;
pub(crate) const WINCODEC_ERR_NOTINITIALIZED: u32 = 0x8898_2F0C;
pub(crate) const WINCODEC_ERR_COMPONENTNOTFOUND: u32 = 0x8898_2F50;
pub(crate) const WINCODEC_ERR_UNSUPPORTEDPIXELFORMAT: u32 = 0x8898_2F80;

/// 从 `0x8007xxxx` 形式的 HRESULT 中取出 Win32 错误码。
pub(crate) fn hresult_to_win32_code(hr: i32) -> Option<u32> {
    let value = hr as u32;
    if (value & 0xFFFF_0000) == 0x8007_0000 {
        Some(value & 0xFFFF)
    } else {
        None
    }
}

fn native_error_hint(hr: i32) -> &'static str {
    match hr as u32 {
        E_INVALIDARG => "参数无效（常见于矩形越界或尺寸为 0）",
        E_OUTOFMEMORY => "内存不足",
        WINCODEC_ERR_WRONGSTATE => "组件状态错误",
        WINCODEC_ERR_VALUEOUTOFRANGE => "数值超出范围",
        WINCODEC_ERR_NOTINITIALIZED => "组件未初始化",
        WINCODEC_ERR_COMPONENTNOTFOUND => "未找到对应的 WIC 组件",
        WINCODEC_ERR_UNSUPPORTEDPIXELFORMAT => "不支持的像素格式",
        _ if hresult_to_win32_code(hr).is_some() => "未分类 Win32 错误",
        _ => "未分类 HRESULT",
    }
}

pub(crate) fn format_native_error_message(operation: &str, hr: i32, detail: &str) -> String {
    let code_str = hresult_to_win32_code(hr)
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "{}失败: hr=0x{:08X} code={} hint={} detail={}",
        operation,
        hr as u32,
        code_str,
        native_error_hint(hr),
        detail
    )
}
