//! Texture storage and nearest-neighbour sampling.

use std::path::Path;

use image::DynamicImage;

use crate::colors;
use crate::error::LoadError;

/// Layout of the raw texel bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 bytes per texel, opaque.
    Rgb8,
    /// 4 bytes per texel, straight alpha.
    Rgba8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Represents a 2D texture for texture mapping.
///
/// Texels are stored row-major with row 0 at the top of the image, so
/// `v = 0` samples the top row.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Texture {
    /// Wraps a raw texel buffer, checking its size against the dimensions.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self, LoadError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if width == 0 || height == 0 || data.len() != expected {
            return Err(LoadError::TextureSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Load a texture from an image file (PNG, JPG, etc.)
    ///
    /// RGB8 and RGBA8 images are kept as decoded. Other layouts are
    /// converted to RGBA8 if they carry alpha, RGB8 otherwise.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let texture = Self::from_image(image::open(path)?)?;
        log::info!(
            "loaded texture {} ({}x{}, {:?})",
            path.display(),
            texture.width,
            texture.height,
            texture.format
        );
        Ok(texture)
    }

    /// Converts a decoded image.
    pub fn from_image(img: DynamicImage) -> Result<Self, LoadError> {
        let (width, height) = (img.width(), img.height());
        match img {
            DynamicImage::ImageRgb8(buf) => Self::new(width, height, PixelFormat::Rgb8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => {
                Self::new(width, height, PixelFormat::Rgba8, buf.into_raw())
            }
            other if other.color().has_alpha() => {
                log::debug!("converting {:?} texture to RGBA8", other.color());
                Self::new(width, height, PixelFormat::Rgba8, other.to_rgba8().into_raw())
            }
            other => {
                log::debug!("converting {:?} texture to RGB8", other.color());
                Self::new(width, height, PixelFormat::Rgb8, other.to_rgb8().into_raw())
            }
        }
    }

    /// Generates an opaque two-colour checkerboard, `cells` squares per side.
    pub fn checkerboard(size: u32, cells: u32, light: u32, dark: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut data = Vec::with_capacity(size as usize * size as usize * 3);
        for y in 0..size {
            for x in 0..size {
                let color = if ((x / cell) + (y / cell)) % 2 == 0 {
                    light
                } else {
                    dark
                };
                let [_, r, g, b] = colors::unpack_argb(color);
                data.extend_from_slice(&[r, g, b]);
            }
        }
        Self {
            width: size,
            height: size,
            format: PixelFormat::Rgb8,
            data,
        }
    }

    /// Maps UV to texel coordinates with wrap-around addressing.
    ///
    /// Each axis is `abs(trunc(t * extent)) % extent`, so `u = 1.2` and
    /// `u = 0.2` land on the same column.
    #[inline]
    pub fn texel_coords(&self, u: f32, v: f32) -> (u32, u32) {
        let wrap = |t: f32, extent: u32| ((t * extent as f32) as i32).unsigned_abs() % extent;
        (wrap(u, self.width), wrap(v, self.height))
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// Returns ARGB8888; RGB8 texels are fully opaque.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let (x, y) = self.texel_coords(u, v);
        let bpp = self.format.bytes_per_pixel();
        let i = (y as usize * self.width as usize + x as usize) * bpp;
        let px = &self.data[i..i + bpp];
        match self.format {
            PixelFormat::Rgb8 => colors::pack_argb(0xFF, px[0], px[1], px[2]),
            PixelFormat::Rgba8 => colors::pack_argb(px[3], px[0], px[1], px[2]),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }
}
