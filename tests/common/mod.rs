//! 集成测试共用的记录型工厂、追踪堆与 DIB 来源。
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

use wic_bitmap::{
    AlphaChannelOption, BitmapError, BitmapHandle, CacheOption, ColorPalette, DibSource,
    GlobalHeap, ImagingFactory, NativeHeap, PaletteBuffer, PixelFormat,
};

pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockBitmap {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl BitmapHandle for MockBitmap {
    fn size(&self) -> Result<(u32, u32), BitmapError> {
        Ok((self.width, self.height))
    }

    fn pixel_format(&self) -> Result<PixelFormat, BitmapError> {
        Ok(self.format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSource {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl MockSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::BPP32_BGRA,
            pixels: (0..width * height * 4).map(|v| v as u8).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockIcon {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        width: u32,
        height: u32,
        format: PixelFormat,
        option: CacheOption,
    },
    FromMemory {
        width: u32,
        height: u32,
        stride: u32,
        buffer_len: usize,
    },
    FromSource {
        option: CacheOption,
    },
    FromSourceRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    FromIcon {
        id: u32,
    },
    FromHbitmap {
        dib: u32,
        palette: Vec<u8>,
        option: AlphaChannelOption,
    },
}

/// 记录每次调用；`fail_next` 设置后下一次调用返回该 HRESULT。
#[derive(Default)]
pub struct MockFactory {
    pub calls: RefCell<Vec<Call>>,
    pub fail_next: Cell<Option<i32>>,
}

impl MockFactory {
    pub fn failing(hr: i32) -> Self {
        let factory = Self::default();
        factory.fail_next.set(Some(hr));
        factory
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), BitmapError> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.take() {
            Some(hr) => Err(BitmapError::native(operation, hr, "mock")),
            None => Ok(()),
        }
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.borrow().last().cloned()
    }
}

impl ImagingFactory for MockFactory {
    type Bitmap = MockBitmap;
    type Source = MockSource;
    type Icon = MockIcon;
    type Dib = u32;

    fn create_bitmap(
        &self,
        width: u32,
        height: u32,
        format: &PixelFormat,
        option: CacheOption,
    ) -> Result<MockBitmap, BitmapError> {
        self.record(
            "CreateBitmap",
            Call::Create {
                width,
                height,
                format: *format,
                option,
            },
        )?;
        Ok(MockBitmap {
            width,
            height,
            format: *format,
        })
    }

    fn create_bitmap_from_memory(
        &self,
        width: u32,
        height: u32,
        format: &PixelFormat,
        stride: u32,
        buffer: &[u8],
    ) -> Result<MockBitmap, BitmapError> {
        self.record(
            "CreateBitmapFromMemory",
            Call::FromMemory {
                width,
                height,
                stride,
                buffer_len: buffer.len(),
            },
        )?;
        Ok(MockBitmap {
            width,
            height,
            format: *format,
        })
    }

    fn create_bitmap_from_source(
        &self,
        source: &MockSource,
        option: CacheOption,
    ) -> Result<MockBitmap, BitmapError> {
        self.record("CreateBitmapFromSource", Call::FromSource { option })?;
        Ok(MockBitmap {
            width: source.width,
            height: source.height,
            format: source.format,
        })
    }

    fn create_bitmap_from_source_rect(
        &self,
        source: &MockSource,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<MockBitmap, BitmapError> {
        self.record(
            "CreateBitmapFromSourceRect",
            Call::FromSourceRect {
                x,
                y,
                width,
                height,
            },
        )?;

        let fits_x = x.checked_add(width).is_some_and(|right| right <= source.width);
        let fits_y = y.checked_add(height).is_some_and(|bottom| bottom <= source.height);
        if !fits_x || !fits_y {
            return Err(BitmapError::native(
                "CreateBitmapFromSourceRect",
                E_INVALIDARG,
                "rect outside source",
            ));
        }

        Ok(MockBitmap {
            width,
            height,
            format: source.format,
        })
    }

    fn create_bitmap_from_hicon(&self, icon: MockIcon) -> Result<MockBitmap, BitmapError> {
        self.record("CreateBitmapFromHICON", Call::FromIcon { id: icon.id })?;
        Ok(MockBitmap {
            width: icon.width,
            height: icon.height,
            format: PixelFormat::BPP32_BGRA,
        })
    }

    fn create_bitmap_from_hbitmap(
        &self,
        dib: u32,
        palette: &PaletteBuffer<'_>,
        option: AlphaChannelOption,
    ) -> Result<MockBitmap, BitmapError> {
        self.record(
            "CreateBitmapFromHBITMAP",
            Call::FromHbitmap {
                dib,
                palette: palette.as_bytes().to_vec(),
                option,
            },
        )?;
        Ok(MockBitmap {
            width: 8,
            height: 8,
            format: PixelFormat::BPP32_BGRA,
        })
    }
}

/// 委托 `GlobalHeap`，并统计分配 / 释放次数。
#[derive(Default)]
pub struct TrackingHeap {
    pub allocations: Cell<usize>,
    pub frees: Cell<usize>,
    pub live_bytes: Cell<usize>,
    pub refuse: Cell<bool>,
}

impl TrackingHeap {
    pub fn refusing() -> Self {
        let heap = Self::default();
        heap.refuse.set(true);
        heap
    }

    pub fn is_balanced(&self) -> bool {
        self.allocations.get() == self.frees.get() && self.live_bytes.get() == 0
    }
}

impl NativeHeap for TrackingHeap {
    fn allocate(&self, len: usize) -> Result<NonNull<u8>, BitmapError> {
        if self.refuse.get() {
            return Err(BitmapError::Allocation(len));
        }
        let ptr = GlobalHeap.allocate(len)?;
        self.allocations.set(self.allocations.get() + 1);
        self.live_bytes.set(self.live_bytes.get() + len);
        Ok(ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, len: usize) {
        self.frees.set(self.frees.get() + 1);
        self.live_bytes.set(self.live_bytes.get() - len);
        unsafe { GlobalHeap.free(ptr, len) };
    }
}

/// 记录 DIB 生成与删除的平台位图。
pub struct MockDibSource {
    pub palette: ColorPalette,
    pub created: Cell<u32>,
    pub deleted: RefCell<Vec<u32>>,
    pub fail_create: bool,
}

impl MockDibSource {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            palette,
            created: Cell::new(0),
            deleted: RefCell::new(Vec::new()),
            fail_create: false,
        }
    }
}

impl DibSource for MockDibSource {
    type Dib = u32;

    fn create_dib(&self) -> Result<u32, BitmapError> {
        if self.fail_create {
            return Err(BitmapError::native("CreateBitmap(GDI)", E_FAIL, "mock"));
        }
        let next = self.created.get() + 1;
        self.created.set(next);
        Ok(100 + next)
    }

    fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    fn delete_dib(&self, dib: u32) -> bool {
        self.deleted.borrow_mut().push(dib);
        true
    }
}
