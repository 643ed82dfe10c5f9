//! 24-bit uncompressed BMP codec.
//!
//! Only one layout is accepted: a 14-byte file header, a 40-byte
//! `BITMAPINFOHEADER`, then bottom-up rows of blue/green/red triplets, each row
//! zero-padded to a multiple of 4 bytes. Anything else is rejected while the
//! headers are read, before any pixel data is touched.
//!
//! Decoded row `0` holds the last row stored in the file; encoding writes rows
//! from last to first, so decode followed by encode reproduces the input.

use std::io::{Read, Write};

use ndarray::Zip;
use rayon::prelude::*;
use tracing::debug;

use crate::color::Pixel;
use crate::error::{Error, Result};
use crate::image::Image;

/// `"BM"` read as a little-endian `u16`.
pub const BMP_SIGNATURE: u16 = 0x4D42;
pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
pub const HEADERS_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

const BIT_COUNT: u16 = 24;
const COMPRESSION_NONE: u32 = 0;
const BYTES_PER_PIXEL: usize = 3;
const ROW_ALIGN: usize = 4;
/// 2835 px/m is 72 DPI, the customary default.
const DEFAULT_PPM: u32 = 2835;

// ============================================================================
// Headers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub pixel_offset: u32,
}

impl FileHeader {
    fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let tag = read_bytes(reader, 2)?;
        let signature = le_u16(&tag, 0);
        if signature != BMP_SIGNATURE {
            return Err(Error::Format);
        }

        let rest = read_bytes(reader, FILE_HEADER_SIZE - 2)?;
        Ok(Self {
            signature,
            file_size: le_u32(&rest, 0),
            reserved1: le_u16(&rest, 4),
            reserved2: le_u16(&rest, 6),
            pixel_offset: le_u32(&rest, 8),
        })
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.signature.to_le_bytes());
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved1.to_le_bytes());
        out.extend_from_slice(&self.reserved2.to_le_bytes());
        out.extend_from_slice(&self.pixel_offset.to_le_bytes());
    }
}

/// `BITMAPINFOHEADER` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: u32,
    pub height: u32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: u32,
    pub y_pixels_per_meter: u32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl InfoHeader {
    /// Read and validate the info header.
    ///
    /// Checks run in field order: header size, bit depth, compression, then
    /// the sign of the dimensions.
    fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let size = read_bytes(reader, 4)?;
        let header_size = le_u32(&size, 0);
        if header_size as usize != INFO_HEADER_SIZE {
            return Err(Error::HeaderSize);
        }

        let b = read_bytes(reader, INFO_HEADER_SIZE - 4)?;
        let header = Self {
            header_size,
            width: le_u32(&b, 0),
            height: le_u32(&b, 4),
            planes: le_u16(&b, 8),
            bit_count: le_u16(&b, 10),
            compression: le_u32(&b, 12),
            image_size: le_u32(&b, 16),
            x_pixels_per_meter: le_u32(&b, 20),
            y_pixels_per_meter: le_u32(&b, 24),
            colors_used: le_u32(&b, 28),
            colors_important: le_u32(&b, 32),
        };

        if header.bit_count != BIT_COUNT {
            return Err(Error::BitDepth);
        }
        if header.compression != COMPRESSION_NONE {
            return Err(Error::Compression);
        }
        // Negative height marks a top-down bitmap.
        if (header.width as i32) < 0 || (header.height as i32) < 0 {
            return Err(Error::TopDown);
        }
        Ok(header)
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_important.to_le_bytes());
    }
}

// ============================================================================
// Bitmap
// ============================================================================

/// A decoded bitmap: the header pair as read plus the pixel buffer.
///
/// The headers' size and dimension fields are re-derived from `image` on
/// encode; every other field is written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub file_header: FileHeader,
    pub info_header: InfoHeader,
    pub image: Image,
}

impl Bitmap {
    /// Wrap an image with freshly synthesized headers.
    pub fn new(image: Image) -> Self {
        let (width, height) = (image.width(), image.height());
        let stride = row_stride(width);
        Self {
            file_header: FileHeader {
                signature: BMP_SIGNATURE,
                file_size: 0,
                reserved1: 0,
                reserved2: 0,
                pixel_offset: HEADERS_SIZE as u32,
            },
            info_header: InfoHeader {
                header_size: INFO_HEADER_SIZE as u32,
                width: width as u32,
                height: height as u32,
                planes: 1,
                bit_count: BIT_COUNT,
                compression: COMPRESSION_NONE,
                image_size: (stride * height) as u32,
                x_pixels_per_meter: DEFAULT_PPM,
                y_pixels_per_meter: DEFAULT_PPM,
                colors_used: 0,
                colors_important: 0,
            },
            image,
        }
    }

    /// Decode a bitmap from `reader`.
    ///
    /// Fails on the first header violation; truncated pixel data is an
    /// error as well, so a returned bitmap is always fully populated.
    pub fn decode<R: Read>(mut reader: R) -> Result<Self> {
        let file_header = FileHeader::read(&mut reader)?;
        let info_header = InfoHeader::read(&mut reader)?;

        let width = info_header.width as usize;
        let height = info_header.height as usize;
        let stride = row_stride(width);
        let expected = stride.checked_mul(height).ok_or(Error::Truncated {
            expected: usize::MAX,
            actual: 0,
        })?;
        let data = read_bytes(&mut reader, expected)?;

        let mut image = Image::new(width, height);
        Zip::indexed(image.view_mut()).par_for_each(|(row, col), px| {
            let start = (height - 1 - row) * stride + col * BYTES_PER_PIXEL;
            *px = Pixel::from_bgr([data[start], data[start + 1], data[start + 2]]);
        });

        debug!(width, height, "decoded bitmap");
        Ok(Self {
            file_header,
            info_header,
            image,
        })
    }

    /// Serialize the headers and pixel data into a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (width, height) = (self.image.width(), self.image.height());
        let stride = row_stride(width);

        let mut info_header = self.info_header;
        info_header.width = width as u32;
        info_header.height = height as u32;
        let mut file_header = self.file_header;
        file_header.file_size = (HEADERS_SIZE + BYTES_PER_PIXEL * width * height) as u32;

        let mut out = Vec::with_capacity(HEADERS_SIZE + stride * height);
        file_header.write_to(&mut out);
        info_header.write_to(&mut out);

        let mut data = vec![0u8; stride * height];
        if stride > 0 {
            let view = self.image.view();
            data.par_chunks_mut(stride)
                .enumerate()
                .for_each(|(k, chunk)| {
                    let row = view.row(height - 1 - k);
                    for (dst, px) in chunk.chunks_exact_mut(BYTES_PER_PIXEL).zip(row.iter()) {
                        dst.copy_from_slice(&px.to_bgr());
                    }
                });
        }
        out.extend_from_slice(&data);
        out
    }

    /// Encode to `writer` in a single write.
    pub fn encode<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.to_bytes();
        writer.write_all(&bytes)?;
        writer.flush()?;
        debug!(bytes = bytes.len(), "encoded bitmap");
        Ok(())
    }
}

/// Zero bytes appended to each row to reach 4-byte alignment.
pub fn row_padding(width: usize) -> usize {
    (ROW_ALIGN - (width * BYTES_PER_PIXEL) % ROW_ALIGN) % ROW_ALIGN
}

/// Bytes per stored row including padding.
pub fn row_stride(width: usize) -> usize {
    width * BYTES_PER_PIXEL + row_padding(width)
}

/// Read exactly `len` bytes, reporting how many arrived if the stream ends early.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(Error::Truncated {
            expected: len,
            actual: buf.len(),
        });
    }
    Ok(buf)
}

#[inline]
fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
