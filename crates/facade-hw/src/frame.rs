//! Frame type and pixel conversion — YUYV to RGB, MJPG decode, mirroring.

/// A captured RGB camera frame.
#[derive(Clone)]
pub struct Frame {
    /// Packed RGB pixel data (width * height * 3 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: std::time::Instant,
    pub sequence: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid YUYV length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("JPEG decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Convert packed YUYV (4:2:2) to packed RGB using BT.601 integer math.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V]; the chroma pair is
/// shared by both pixels. Width must be even, as with any YUYV source.
pub fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let expected = (width * height * 2) as usize;
    if yuyv.len() < expected || width % 2 != 0 {
        return Err(FrameError::InvalidLength {
            expected,
            actual: yuyv.len(),
        });
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for quad in yuyv[..expected].chunks_exact(4) {
        let y0 = quad[0] as i32;
        let u = quad[1] as i32 - 128;
        let y1 = quad[2] as i32;
        let v = quad[3] as i32 - 128;

        for y in [y0, y1] {
            let c = 298 * (y - 16);
            rgb.push(clamp_u8((c + 409 * v + 128) >> 8));
            rgb.push(clamp_u8((c - 100 * u - 208 * v + 128) >> 8));
            rgb.push(clamp_u8((c + 516 * u + 128) >> 8));
        }
    }
    Ok(rgb)
}

/// Decode an MJPG buffer to packed RGB, returning the decoded dimensions.
///
/// MJPG cameras emit standalone JPEG images per frame, so the `image`
/// crate's JPEG path handles them directly.
pub fn decode_mjpg(mjpg: &[u8]) -> Result<(Vec<u8>, u32, u32), FrameError> {
    let decoded = image::load_from_memory_with_format(mjpg, image::ImageFormat::Jpeg)?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width, height))
}

/// Mirror packed RGB pixel data horizontally, in place.
pub fn mirror_rgb(rgb: &mut [u8], width: u32, height: u32) {
    let w = width as usize;
    let h = height as usize;
    if rgb.len() < w * h * 3 {
        return;
    }
    for row in 0..h {
        let base = row * w * 3;
        for col in 0..w / 2 {
            let left = base + col * 3;
            let right = base + (w - 1 - col) * 3;
            for ch in 0..3 {
                rgb.swap(left + ch, right + ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_to_rgb_mid_gray() {
        // Y=128, U=V=128 (neutral chroma) → R=G=B=130 under BT.601
        let yuyv = vec![128, 128, 128, 128];
        let rgb = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        assert_eq!(rgb, vec![130, 130, 130, 130, 130, 130]);
    }

    #[test]
    fn test_yuyv_to_rgb_black_and_white() {
        // Y=16 is video black, Y=235 is video white
        let yuyv = vec![16, 128, 235, 128];
        let rgb = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        assert_eq!(&rgb[..3], &[0, 0, 0]);
        assert_eq!(&rgb[3..], &[255, 255, 255]);
    }

    #[test]
    fn test_yuyv_length() {
        let rgb = yuyv_to_rgb(&(0..16).collect::<Vec<u8>>(), 4, 2).unwrap();
        assert_eq!(rgb.len(), 4 * 2 * 3);
    }

    #[test]
    fn test_yuyv_invalid_length() {
        let yuyv = vec![100, 128]; // too short for 2x1
        assert!(yuyv_to_rgb(&yuyv, 2, 1).is_err());
    }

    #[test]
    fn test_yuyv_odd_width_rejected() {
        let yuyv = vec![0u8; 6];
        assert!(yuyv_to_rgb(&yuyv, 3, 1).is_err());
    }

    #[test]
    fn test_mirror_row() {
        // 3x1 RGB: red, green, blue → blue, green, red
        let mut rgb = vec![255, 0, 0, 0, 255, 0, 0, 0, 255];
        mirror_rgb(&mut rgb, 3, 1);
        assert_eq!(rgb, vec![0, 0, 255, 0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn test_mirror_involution() {
        let orig: Vec<u8> = (0..4 * 2 * 3).collect();
        let mut rgb = orig.clone();
        mirror_rgb(&mut rgb, 4, 2);
        assert_ne!(rgb, orig);
        mirror_rgb(&mut rgb, 4, 2);
        assert_eq!(rgb, orig);
    }

    #[test]
    fn test_decode_mjpg_rejects_garbage() {
        assert!(decode_mjpg(&[0u8; 64]).is_err());
    }
}
