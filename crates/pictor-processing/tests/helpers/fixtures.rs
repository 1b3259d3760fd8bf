//! Test fixtures: in-memory rasters encoded as JPEG/PNG/WebP, plus hand-built
//! GIF and BMP payloads for formats the pipeline refuses.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Gradient raster so encoders have something to compress.
pub fn create_test_image(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbaImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
    }
    DynamicImage::ImageRgba8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img.clone()
    };
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode fixture");
    buf
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&create_test_image(width, height), ImageFormat::Jpeg)
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(&create_test_image(width, height), ImageFormat::Png)
}

pub fn create_test_webp(width: u32, height: u32) -> Vec<u8> {
    encode(&create_test_image(width, height), ImageFormat::WebP)
}

/// Two-frame, looping 1x1 GIF.
pub fn create_test_animated_gif() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"GIF89a");
    // Logical screen 1x1 with a two-entry global palette
    buf.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0xF0, 0x00, 0x00]);
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]);
    buf.extend_from_slice(&[0x21, 0xFF, 0x0B]);
    buf.extend_from_slice(b"NETSCAPE2.0");
    buf.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);
    for _ in 0..2 {
        buf.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]);
        buf.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        buf.extend_from_slice(&[0x02, 0x02, 0x44, 0x01, 0x00]);
    }
    buf.push(0x3B);
    buf
}

/// Uncompressed 24-bit BMP.
pub fn create_test_bmp(width: u32, height: u32) -> Vec<u8> {
    let row = (width * 3 + 3) & !3;
    let pixels = row * height;
    let mut buf = Vec::new();
    buf.extend_from_slice(b"BM");
    buf.extend_from_slice(&(54 + pixels).to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&54u32.to_le_bytes());
    buf.extend_from_slice(&40u32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&24u16.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&pixels.to_le_bytes());
    buf.extend_from_slice(&2835u32.to_le_bytes());
    buf.extend_from_slice(&2835u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.resize(buf.len() + pixels as usize, 0x80);
    buf
}
