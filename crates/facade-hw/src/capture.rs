//! Still-image capture policies and JPEG encoding.
//!
//! A capture takes the current frame and produces a compressed blob for
//! backend submission. The blob is transient: encoded, sent, dropped.

use crate::frame::{self, Frame};
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

/// How to turn a live frame into the submitted still image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePolicy {
    /// Full frame, mirrored to match the operator-facing preview.
    Full,
    /// Fixed-size center square, unmirrored (mirroring is preview-only
    /// under this policy).
    CenterCrop(u32),
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("empty frame")]
    EmptyFrame,
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Extract a centered square of side `size` (clamped to the frame).
pub fn center_crop(frame: &Frame, size: u32) -> Frame {
    let side = size.min(frame.width).min(frame.height);
    let x0 = ((frame.width - side) / 2) as usize;
    let y0 = ((frame.height - side) / 2) as usize;
    let w = frame.width as usize;
    let s = side as usize;

    let mut data = Vec::with_capacity(s * s * 3);
    for row in y0..y0 + s {
        let start = (row * w + x0) * 3;
        data.extend_from_slice(&frame.data[start..start + s * 3]);
    }

    Frame {
        data,
        width: side,
        height: side,
        timestamp: frame.timestamp,
        sequence: frame.sequence,
    }
}

/// Encode a frame as a JPEG blob under the given policy.
pub fn to_jpeg(frame: &Frame, policy: CapturePolicy, quality: u8) -> Result<Vec<u8>, CaptureError> {
    if frame.data.is_empty() || frame.width == 0 || frame.height == 0 {
        return Err(CaptureError::EmptyFrame);
    }

    let (data, width, height) = match policy {
        CapturePolicy::Full => {
            let mut mirrored = frame.data.clone();
            frame::mirror_rgb(&mut mirrored, frame.width, frame.height);
            (mirrored, frame.width, frame.height)
        }
        CapturePolicy::CenterCrop(size) => {
            let cropped = center_crop(frame, size);
            (cropped.data, cropped.width, cropped.height)
        }
    };

    let img: image::RgbImage =
        image::ImageBuffer::from_raw(width, height, data).ok_or(CaptureError::EmptyFrame)?;
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(&img)?;
    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        Frame {
            data: rgb
                .iter()
                .copied()
                .cycle()
                .take((width * height * 3) as usize)
                .collect(),
            width,
            height,
            timestamp: std::time::Instant::now(),
            sequence: 0,
        }
    }

    #[test]
    fn test_center_crop_dimensions() {
        let frame = solid_frame(640, 480, [10, 20, 30]);
        let crop = center_crop(&frame, 300);
        assert_eq!(crop.width, 300);
        assert_eq!(crop.height, 300);
        assert_eq!(crop.data.len(), 300 * 300 * 3);
    }

    #[test]
    fn test_center_crop_picks_the_middle() {
        // 4x4 frame, all black except the center 2x2 block
        let mut frame = solid_frame(4, 4, [0, 0, 0]);
        for row in 1..3usize {
            for col in 1..3usize {
                frame.data[(row * 4 + col) * 3] = 255;
            }
        }
        let crop = center_crop(&frame, 2);
        assert_eq!(crop.width, 2);
        assert!(crop.data.chunks(3).all(|px| px == [255, 0, 0]));
    }

    #[test]
    fn test_center_crop_clamps_to_frame() {
        let frame = solid_frame(8, 6, [1, 2, 3]);
        let crop = center_crop(&frame, 300);
        assert_eq!(crop.width, 6);
        assert_eq!(crop.height, 6);
    }

    #[test]
    fn test_to_jpeg_produces_jpeg_magic() {
        let frame = solid_frame(16, 16, [80, 80, 80]);
        let jpeg = to_jpeg(&frame, CapturePolicy::CenterCrop(8), 92).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_to_jpeg_full_frame() {
        let frame = solid_frame(16, 8, [200, 100, 50]);
        assert!(to_jpeg(&frame, CapturePolicy::Full, 92).is_ok());
    }

    #[test]
    fn test_to_jpeg_empty_frame() {
        let frame = Frame {
            data: Vec::new(),
            width: 0,
            height: 0,
            timestamp: std::time::Instant::now(),
            sequence: 0,
        };
        assert!(matches!(
            to_jpeg(&frame, CapturePolicy::Full, 92),
            Err(CaptureError::EmptyFrame)
        ));
    }
}
