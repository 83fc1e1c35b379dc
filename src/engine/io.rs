//! Bitmap file I/O for Strata
//!
//! Reads and writes uncompressed 32-bit BMP files. Only the fields the
//! compositor needs are read on import:
//!
//! ```text
//! 0x00  2  magic "BM"
//! 0x0A  4  pixel data offset (u32 LE)
//! 0x12  4  width  (i32 LE)
//! 0x16  4  height (i32 LE)
//! ....     width * height * 4 bytes BGRA, bottom-up rows
//! ```
//!
//! Files store rows bottom-up; images in memory are top-down. Decoding and
//! encoding each flip the row order exactly once.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::engine::image::{buffer_len, Image, BYTES_PER_PIXEL};
use crate::error::{Result, StrataError};

/// Magic bytes at the start of every bitmap file
pub const MAGIC: [u8; 2] = *b"BM";

const PIXEL_OFFSET_FIELD: u64 = 0x0A;
const WIDTH_FIELD: u64 = 0x12;
const HEIGHT_FIELD: u64 = 0x16;

/// File header (14 bytes) plus BITMAPINFOHEADER (40 bytes)
pub const HEADER_SIZE: u32 = 54;
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 32;

/// Decode a bitmap file into a top-down image
///
/// # Errors
/// * `CannotOpen` - If the file cannot be opened
/// * `InvalidFile` - If the magic bytes are wrong, the dimensions are not
///   positive, or the file is shorter than its header claims
/// * `OutOfMemory` - If the pixel buffer cannot be allocated
pub fn decode(path: &Path) -> Result<Image> {
    let file = File::open(path).map_err(|e| StrataError::CannotOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let invalid = |reason: String| StrataError::InvalidFile {
        path: path.to_path_buf(),
        reason,
    };

    let mut magic = [0u8; 2];
    reader
        .read_exact(&mut magic)
        .map_err(|_| invalid("file is shorter than the magic number".to_string()))?;
    if magic != MAGIC {
        return Err(invalid(format!("bad magic bytes {:02x?}", magic)));
    }

    let pixel_offset = read_u32_at(&mut reader, PIXEL_OFFSET_FIELD)
        .map_err(|_| invalid("truncated header".to_string()))?;
    let width = read_i32_at(&mut reader, WIDTH_FIELD)
        .map_err(|_| invalid("truncated header".to_string()))?;
    let height = read_i32_at(&mut reader, HEIGHT_FIELD)
        .map_err(|_| invalid("truncated header".to_string()))?;

    if width <= 0 || height <= 0 {
        return Err(invalid(format!("unsupported dimensions {}x{}", width, height)));
    }
    let (width, height) = (width as u32, height as u32);

    let len = buffer_len(width, height)
        .ok_or_else(|| invalid(format!("dimensions {}x{} overflow", width, height)))?;
    if u64::from(pixel_offset).saturating_add(len as u64) > file_len {
        return Err(invalid(format!(
            "{}x{} pixels need {} bytes past offset {}, file has {}",
            width, height, len, pixel_offset, file_len
        )));
    }

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|e| StrataError::out_of_memory("bitmap pixels", e))?;
    pixels.resize(len, 0);

    reader
        .seek(SeekFrom::Start(u64::from(pixel_offset)))
        .map_err(|_| invalid(format!("cannot seek to pixel data at {}", pixel_offset)))?;
    reader
        .read_exact(&mut pixels)
        .map_err(|_| invalid(format!("pixel data shorter than {} bytes", len)))?;

    // Length was checked against the dimensions above.
    let mut image = Image::from_pixels(width, height, pixels)
        .ok_or_else(|| invalid("pixel buffer size mismatch".to_string()))?;
    image.flip_rows();

    debug!(
        "Decoded {} ({}x{}, pixel data at {:#x})",
        path.display(),
        width,
        height,
        pixel_offset
    );

    Ok(image)
}

/// Encode a top-down image as a bitmap file
///
/// Writes a 54-byte header followed by the rows bottom-up.
///
/// # Errors
/// * `InvalidFilePath` - If the file cannot be created or written
pub fn encode(path: &Path, image: &Image) -> Result<()> {
    let invalid_path = |e: std::io::Error| StrataError::InvalidFilePath {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(invalid_path)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(&header(image.width(), image.height()))
        .map_err(invalid_path)?;
    for y in (0..image.height()).rev() {
        writer.write_all(image.row(y)).map_err(invalid_path)?;
    }
    writer.flush().map_err(invalid_path)?;

    debug!(
        "Encoded {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );

    Ok(())
}

/// Build the default header for a `width` x `height` 32-bit bitmap
pub fn header(width: u32, height: u32) -> [u8; HEADER_SIZE as usize] {
    let image_size = (width as usize * height as usize * BYTES_PER_PIXEL) as u32;
    let file_size = HEADER_SIZE.wrapping_add(image_size);

    let mut buf = [0u8; HEADER_SIZE as usize];

    // BITMAPFILEHEADER
    buf[0..2].copy_from_slice(&MAGIC);
    buf[2..6].copy_from_slice(&file_size.to_le_bytes());
    // 6..10 reserved
    buf[10..14].copy_from_slice(&HEADER_SIZE.to_le_bytes());

    // BITMAPINFOHEADER
    buf[14..18].copy_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    buf[18..22].copy_from_slice(&(width as i32).to_le_bytes());
    buf[22..26].copy_from_slice(&(height as i32).to_le_bytes());
    buf[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    buf[28..30].copy_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    // 30..34 compression (0 = BI_RGB)
    buf[34..38].copy_from_slice(&image_size.to_le_bytes());
    // 38..54 resolution and palette counts (all 0)

    buf
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn read_u32_at<R: Read + Seek>(reader: &mut R, offset: u64) -> std::io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.seek(SeekFrom::Start(offset))?;
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_i32_at<R: Read + Seek>(reader: &mut R, offset: u64) -> std::io::Result<i32> {
    let mut bytes = [0u8; 4];
    reader.seek(SeekFrom::Start(offset))?;
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// A bottom-up 2x2 file: bottom row blue/green, top row red/white.
    fn sample_file_bytes() -> Vec<u8> {
        let mut bytes = header(2, 2).to_vec();
        bytes.extend_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);
        bytes.extend_from_slice(&[0, 0, 255, 255, 255, 255, 255, 255]);
        bytes
    }

    #[test]
    fn test_header_fields() {
        let h = header(3, 5);
        assert_eq!(&h[0..2], b"BM");
        assert_eq!(u32::from_le_bytes([h[2], h[3], h[4], h[5]]), 54 + 3 * 5 * 4);
        assert_eq!(u32::from_le_bytes([h[10], h[11], h[12], h[13]]), 54);
        assert_eq!(i32::from_le_bytes([h[18], h[19], h[20], h[21]]), 3);
        assert_eq!(i32::from_le_bytes([h[22], h[23], h[24], h[25]]), 5);
        assert_eq!(u16::from_le_bytes([h[28], h[29]]), 32);
    }

    #[test]
    fn test_decode_flips_to_top_down() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.bmp");
        std::fs::write(&path, sample_file_bytes()).unwrap();

        let image = decode(&path).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
        // Top-left is the first pixel of the last row on disk.
        assert_eq!(image.pixel(0, 0), [0, 0, 255, 255]);
        assert_eq!(image.pixel(1, 0), [255, 255, 255, 255]);
        assert_eq!(image.pixel(0, 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_honours_pixel_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.bmp");

        let mut bytes = header(1, 1).to_vec();
        bytes[10..14].copy_from_slice(&60u32.to_le_bytes());
        bytes.extend_from_slice(&[0xAA; 6]);
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        std::fs::write(&path, bytes).unwrap();

        let image = decode(&path).unwrap();
        assert_eq!(image.pixel(0, 0), [1, 2, 3, 4]);
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.bmp");
        let target = dir.path().join("out.bmp");
        std::fs::write(&source, sample_file_bytes()).unwrap();

        let image = decode(&source).unwrap();
        encode(&target, &image).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), sample_file_bytes());
        assert_eq!(decode(&target).unwrap(), image);
    }

    #[test]
    fn test_decode_nonexistent_file() {
        match decode(Path::new("/nonexistent/path/image.bmp")) {
            Err(StrataError::CannotOpen { path, .. }) => {
                assert!(path.display().to_string().contains("nonexistent"));
            }
            other => panic!("Expected CannotOpen error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_wrong_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.bmp");
        let mut bytes = sample_file_bytes();
        bytes[0] = b'P';
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(decode(&path), Err(StrataError::InvalidFile { .. })));
    }

    #[test]
    fn test_decode_rejects_truncated_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bmp");
        let mut bytes = sample_file_bytes();
        bytes.truncate(bytes.len() - 1);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(decode(&path), Err(StrataError::InvalidFile { .. })));
    }

    #[test]
    fn test_decode_rejects_oversized_header_before_allocating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.bmp");
        std::fs::write(&path, header(1_000_000, 1_000_000)).unwrap();

        match decode(&path) {
            Err(StrataError::InvalidFile { reason, .. }) => {
                assert!(reason.contains("1000000x1000000"), "{}", reason);
            }
            other => panic!("Expected InvalidFile error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_offset_past_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.bmp");
        let mut bytes = sample_file_bytes();
        bytes[10..14].copy_from_slice(&58u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(decode(&path), Err(StrataError::InvalidFile { .. })));
    }

    #[test]
    fn test_decode_rejects_negative_height() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topdown.bmp");
        let mut bytes = sample_file_bytes();
        bytes[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(decode(&path), Err(StrataError::InvalidFile { .. })));
    }

    #[test]
    fn test_encode_to_missing_directory() {
        let image = Image::filled(1, 1, [0, 0, 0, 255]).unwrap();
        let result = encode(Path::new("/nonexistent/dir/out.bmp"), &image);
        assert!(matches!(result, Err(StrataError::InvalidFilePath { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_encode_write_failure_is_invalid_path() {
        let image = Image::filled(64, 64, [0, 0, 0, 255]).unwrap();
        let result = encode(Path::new("/dev/full"), &image);
        assert!(matches!(result, Err(StrataError::InvalidFilePath { .. })));
    }
}
