//! # wic-bitmap-probe
//!
//! 依次走一遍全部位图构造路径并输出结果，用于在目标机器上确认 WIC 可用。
//!
//! ```text
//! wic-bitmap-probe [--config bitmap.json] [image.png]
//! ```
//!
//! 未指定图片时使用内置的 4x4 渐变。

use std::path::PathBuf;

use wic_bitmap::BitmapConfig;

struct ProbeArgs {
    config: Option<PathBuf>,
    image: Option<PathBuf>,
}

fn parse_args() -> Result<ProbeArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut parsed = ProbeArgs {
        config: None,
        image: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config 缺少路径参数")?;
                parsed.config = Some(PathBuf::from(path));
            }
            other if parsed.image.is_none() => parsed.image = Some(PathBuf::from(other)),
            other => return Err(format!("无法识别的参数: {}", other)),
        }
    }

    Ok(parsed)
}

/// 载入图片并转换为自上而下的 BGRA 字节。
fn load_bgra(image: Option<&PathBuf>) -> Result<(u32, u32, Vec<u8>), image::ImageError> {
    let Some(path) = image else {
        let gradient = image::RgbaImage::from_fn(4, 4, |x, y| {
            image::Rgba([(x * 64) as u8, (y * 64) as u8, 0x80, 0xFF])
        });
        return Ok((4, 4, rgba_to_bgra(gradient.into_raw())));
    };

    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("📂 已载入图片 {} ({}x{})", path.display(), width, height);
    Ok((width, height, rgba_to_bgra(rgba.into_raw())))
}

fn rgba_to_bgra(mut bytes: Vec<u8>) -> Vec<u8> {
    for pixel in bytes.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    bytes
}

#[cfg(windows)]
fn run(args: ProbeArgs, config: BitmapConfig) -> Result<(), Box<dyn std::error::Error>> {
    use windows::core::Interface;
    use windows::Win32::Graphics::Imaging::IWICBitmapSource;
    use windows::Win32::UI::WindowsAndMessaging::{LoadIconW, IDI_APPLICATION};

    use wic_bitmap::wic::{ComApartment, GdiBitmap, WicFactory};
    use wic_bitmap::{BitmapService, ColorPalette, DataRectangle, PixelFormat, Rect};

    let _apartment = ComApartment::initialize()?;
    let factory = WicFactory::new()?;
    let service = BitmapService::new(&factory, config);

    let blank = service.create(64, 64, PixelFormat::BPP32_BGRA)?;
    log::info!("✅ new: {:?} {}", blank.size()?, blank.pixel_format()?);

    let (width, height, bgra) = load_bgra(args.image.as_ref())?;
    let stride = width * 4;
    let from_memory =
        service.from_memory(width, height, PixelFormat::BPP32_BGRA, DataRectangle::new(&bgra, stride))?;
    log::info!("✅ from_memory: {:?}", from_memory.size()?);

    let source: IWICBitmapSource = from_memory.handle().cast()?;
    let copied = service.from_source(&source)?;
    log::info!("✅ from_source: {:?}", copied.size()?);

    let rect = Rect::new(0, 0, (width / 2).max(1), (height / 2).max(1));
    let cropped = service.from_source_rect(&source, rect)?;
    log::info!("✅ from_source_rect: {:?}", cropped.size()?);

    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;
    let from_icon = service.from_icon(icon)?;
    log::info!("✅ from_icon: {:?}", from_icon.size()?);

    let gdi = GdiBitmap::new(width, height, bgra, ColorPalette::default())?;
    let from_dib = service.from_dib(&gdi)?;
    log::info!("✅ from_dib: {:?} {}", from_dib.size()?, from_dib.pixel_format()?);

    Ok(())
}

#[cfg(not(windows))]
fn run(args: ProbeArgs, config: BitmapConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height, _) = load_bgra(args.image.as_ref())?;
    log::info!(
        "输入 {}x{}，配置 cache={} alpha={}",
        width,
        height,
        config.cache_option.as_str(),
        config.alpha_option.as_str()
    );
    Err("当前平台没有 WIC 后端".into())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(2);
        }
    };

    let config = match args.config.as_deref().map(BitmapConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args, config) {
        log::error!("❌ 探测失败: {}", err);
        std::process::exit(1);
    }
}
