// imageクレートによる標準バックエンド実装

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageError, ImageFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::core::error::ImagingError;
use crate::core::traits::ImagingBackend;
use crate::core::types::OutputFormat;

/// JPEG出力時の品質（高品質固定）
const JPEG_QUALITY: u8 = 95;

/// ローカルファイル用の標準画像バックエンド
#[derive(Debug, Default, Clone)]
pub struct StandardImagingBackend;

impl StandardImagingBackend {
    pub fn new() -> Self {
        Self
    }

    fn image_format(format: OutputFormat) -> ImageFormat {
        match format {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Webp => ImageFormat::WebP,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }

    fn io_error(err: std::io::Error) -> ImagingError {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            ImagingError::AccessDenied
        } else {
            ImagingError::Io(err.to_string())
        }
    }
}

impl ImagingBackend for StandardImagingBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ImagingError> {
        image::open(path).map_err(|err| match err {
            ImageError::IoError(io) => Self::io_error(io),
            other => ImagingError::Corrupt(other.to_string()),
        })
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), ImagingError> {
        match format {
            OutputFormat::Jpeg => {
                let file = File::create(path).map_err(Self::io_error)?;
                let mut writer = BufWriter::new(file);
                let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
                image
                    .write_with_encoder(encoder)
                    .map_err(|err| match err {
                        ImageError::IoError(io) => Self::io_error(io),
                        other => ImagingError::Encode(other.to_string()),
                    })
            }
            _ => image
                .save_with_format(path, Self::image_format(format))
                .map_err(|err| match err {
                    ImageError::IoError(io) => Self::io_error(io),
                    other => ImagingError::Encode(other.to_string()),
                }),
        }
    }

    /// ピクセルデータを同一カラーモードの新規バッファへコピーする
    ///
    /// 元画像に付随していたメタデータブロックは新バッファに引き継がれない
    fn strip_metadata(&self, image: &DynamicImage) -> DynamicImage {
        match image.color() {
            ColorType::L8 => DynamicImage::ImageLuma8(image.to_luma8()),
            ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
            ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
            ColorType::Rgba8 => DynamicImage::ImageRgba8(image.to_rgba8()),
            ColorType::L16 => DynamicImage::ImageLuma16(image.to_luma16()),
            ColorType::La16 => DynamicImage::ImageLumaA16(image.to_luma_alpha16()),
            ColorType::Rgb16 => DynamicImage::ImageRgb16(image.to_rgb16()),
            ColorType::Rgba16 => DynamicImage::ImageRgba16(image.to_rgba16()),
            ColorType::Rgb32F => DynamicImage::ImageRgb32F(image.to_rgb32f()),
            ColorType::Rgba32F => DynamicImage::ImageRgba32F(image.to_rgba32f()),
            _ => DynamicImage::ImageRgba8(image.to_rgba8()),
        }
    }
}
