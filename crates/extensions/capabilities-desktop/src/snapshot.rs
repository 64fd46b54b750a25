//! Post-action snapshots: downscale to a pixel budget, then JPEG-encode.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::backend::{BackendError, Frame};

pub const JPEG_MIME: &str = "image/jpeg";

/// How snapshots are taken and compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotPolicy {
    /// Attach a snapshot to the result of mutating input operations.
    pub after_action: bool,
    /// Pixel-area budget; larger frames are scaled down.
    pub max_pixels: u64,
    pub jpeg_quality: u8,
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self {
            after_action: true,
            max_pixels: 1_000_000,
            jpeg_quality: 75,
        }
    }
}

impl SnapshotPolicy {
    pub fn disabled() -> Self {
        Self {
            after_action: false,
            ..Self::default()
        }
    }
}

/// An encoded snapshot.
#[derive(Debug, Clone)]
pub struct EncodedSnapshot {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Size of the frame before scaling.
    pub source: (u32, u32),
}

impl EncodedSnapshot {
    pub fn was_scaled(&self) -> bool {
        self.source != (self.width, self.height)
    }
}

/// Largest size with the same aspect ratio whose area fits `max_pixels`.
pub fn fit_within(width: u32, height: u32, max_pixels: u64) -> (u32, u32) {
    let area = u64::from(width) * u64::from(height);
    if area <= max_pixels || area == 0 {
        return (width, height);
    }
    let scale = (max_pixels as f64 / area as f64).sqrt();
    let w = ((f64::from(width) * scale).floor() as u32).max(1);
    let h = ((f64::from(height) * scale).floor() as u32).max(1);
    (w, h)
}

pub fn encode_frame(frame: Frame, policy: &SnapshotPolicy) -> Result<EncodedSnapshot, BackendError> {
    let source = (frame.width, frame.height);
    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.rgba).ok_or_else(|| {
        BackendError::EncodingFailed(format!(
            "pixel buffer does not match {}x{}",
            source.0, source.1
        ))
    })?;

    let (width, height) = fit_within(source.0, source.1, policy.max_pixels);
    let mut image = DynamicImage::ImageRgba8(rgba);
    if (width, height) != source {
        image = image.resize_exact(width, height, FilterType::Triangle);
    }

    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, policy.jpeg_quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::EncodingFailed(e.to_string()))?;

    Ok(EncodedSnapshot {
        bytes,
        width,
        height,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_keeps_small_frames() {
        assert_eq!(fit_within(800, 600, 1_000_000), (800, 600));
    }

    #[test]
    fn test_fit_within_preserves_aspect_ratio() {
        let (w, h) = fit_within(2560, 1440, 1_000_000);
        assert!(u64::from(w) * u64::from(h) <= 1_000_000);
        let ratio = f64::from(w) / f64::from(h);
        assert!((ratio - 16.0 / 9.0).abs() < 0.01);
        assert!(w > 1300);
    }

    #[test]
    fn test_encode_frame_produces_jpeg() {
        let snap = encode_frame(Frame::solid(64, 32, [255, 0, 0, 255]), &SnapshotPolicy::default())
            .unwrap();
        assert_eq!(&snap.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!((snap.width, snap.height), (64, 32));
        assert!(!snap.was_scaled());
    }

    #[test]
    fn test_encode_frame_scales_down() {
        let policy = SnapshotPolicy {
            max_pixels: 100,
            ..SnapshotPolicy::default()
        };
        let snap = encode_frame(Frame::solid(40, 20, [0, 0, 0, 255]), &policy).unwrap();
        assert!(snap.was_scaled());
        assert_eq!((snap.width, snap.height), (14, 7));
    }

    #[test]
    fn test_encode_frame_rejects_short_buffer() {
        let frame = Frame {
            width: 10,
            height: 10,
            rgba: vec![0; 12],
        };
        let err = encode_frame(frame, &SnapshotPolicy::default()).unwrap_err();
        assert!(matches!(err, BackendError::EncodingFailed(_)));
    }
}
