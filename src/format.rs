//! 像素格式标识
//!
//! `PixelFormat` 只是 128 位 GUID 的透传载体，本库从不解释其含义。
//! 常量取自 WIC 头文件中的 `GUID_WICPixelFormat*`。

use std::fmt;

/// WIC 像素格式 GUID。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat(u128);

impl PixelFormat {
    pub const DONT_CARE: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc900);
    pub const BPP1_INDEXED: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc901);
    pub const BPP8_INDEXED: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc904);
    pub const BPP8_GRAY: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc908);
    pub const BPP24_BGR: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc90c);
    pub const BPP32_BGR: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc90e);
    pub const BPP32_BGRA: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc90f);
    pub const BPP32_PBGRA: Self = Self::from_u128(0x6fddc324_4e03_4bfe_b185_3d77768dc910);

    /// 由 GUID 的 128 位大端表示构造（与 `windows::core::GUID::from_u128` 一致）。
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn to_u128(self) -> u128 {
        self.0
    }
}

impl fmt::Display for PixelFormat {
    /// 按注册表格式输出：`{6fddc324-4e03-4bfe-b185-3d77768dc90f}`。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:04x}-{:012x}}}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xFFFF_FFFF_FFFF
        )
    }
}

#[cfg(windows)]
impl From<PixelFormat> for windows::core::GUID {
    fn from(format: PixelFormat) -> Self {
        windows::core::GUID::from_u128(format.0)
    }
}

#[cfg(windows)]
impl From<windows::core::GUID> for PixelFormat {
    fn from(guid: windows::core::GUID) -> Self {
        Self(guid.to_u128())
    }
}
