//! Image boundary: decode, pair up, encode.
//!
//! The engine works on flat pixel sets. This module turns [`RgbImage`]s into
//! [`PixelSet`]s (row-major) and back, and makes two images pairable when their
//! pixel counts differ.

use crate::{Error, PixelSet, Result};
use image::{imageops, RgbImage};
use std::path::Path;

/// What to do when target and source have different pixel counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reconcile {
    /// Fail with [`Error::PixelCountMismatch`].
    #[default]
    Reject,
    /// Crop both images around their centers to the common width and height.
    CropCenter,
}

/// Decode any supported image file as 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

/// Encode `img`; the format follows the file extension.
pub fn save_rgb(img: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    img.save(path)?;
    Ok(())
}

/// Pixels of `img` in row-major order.
pub fn pixels_from_image(img: &RgbImage) -> PixelSet {
    let px: Vec<[u8; 3]> = img.pixels().map(|p| p.0).collect();
    PixelSet::from_rgb(&px)
}

/// Lay `pixels` out row by row as a `width × height` image.
///
/// # Errors
///
/// [`Error::LengthMismatch`] if `pixels.len() != width * height`.
pub fn image_from_pixels(pixels: &PixelSet, width: u32, height: u32) -> Result<RgbImage> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(Error::LengthMismatch(expected, pixels.len()));
    }
    let raw: Vec<u8> = pixels.to_rgb().into_iter().flatten().collect();
    // Length was checked above.
    RgbImage::from_raw(width, height, raw).ok_or(Error::LengthMismatch(expected, pixels.len()))
}

/// Make `target` and `source` pairable pixel for pixel.
///
/// Images with equal pixel counts pass through untouched, whatever their
/// shapes. Otherwise `policy` decides.
pub fn reconcile(target: RgbImage, source: RgbImage, policy: Reconcile) -> Result<(RgbImage, RgbImage)> {
    let (tw, th) = target.dimensions();
    let (sw, sh) = source.dimensions();
    if u64::from(tw) * u64::from(th) == u64::from(sw) * u64::from(sh) {
        return Ok((target, source));
    }

    match policy {
        Reconcile::Reject => Err(Error::PixelCountMismatch {
            target_dims: (tw, th),
            source_dims: (sw, sh),
        }),
        Reconcile::CropCenter => {
            let (w, h) = (tw.min(sw), th.min(sh));
            log::info!("cropping target {tw}x{th} and source {sw}x{sh} to {w}x{h}");
            Ok((crop_center(&target, w, h), crop_center(&source, w, h)))
        }
    }
}

fn crop_center(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    let left = (img.width() - width) / 2;
    let top = (img.height() - height) / 2;
    imageops::crop_imm(img, left, top, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn ramp(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([x as u8, y as u8, (x + y) as u8]))
    }

    #[test]
    fn pixels_are_row_major() {
        let img = ramp(3, 2);
        let p = pixels_from_image(&img);
        assert_eq!(p.len(), 6);
        assert_eq!(p.pixel(1), [1.0, 0.0, 1.0]);
        assert_eq!(p.pixel(3), [0.0, 1.0, 1.0]);
    }

    #[test]
    fn image_round_trip() {
        let img = ramp(4, 3);
        let back = image_from_pixels(&pixels_from_image(&img), 4, 3).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn image_from_pixels_checks_size() {
        let p = pixels_from_image(&ramp(2, 2));
        assert!(matches!(
            image_from_pixels(&p, 3, 2),
            Err(Error::LengthMismatch(6, 4))
        ));
    }

    #[test]
    fn equal_counts_pass_through() {
        let (t, s) = reconcile(ramp(2, 8), ramp(4, 4), Reconcile::Reject).unwrap();
        assert_eq!(t.dimensions(), (2, 8));
        assert_eq!(s.dimensions(), (4, 4));
    }

    #[test]
    fn reject_reports_both_shapes() {
        let err = reconcile(ramp(3, 3), ramp(4, 4), Reconcile::Reject).unwrap_err();
        match err {
            Error::PixelCountMismatch {
                target_dims,
                source_dims,
            } => {
                assert_eq!(target_dims, (3, 3));
                assert_eq!(source_dims, (4, 4));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn crop_center_takes_common_box() {
        let (t, s) = reconcile(ramp(6, 3), ramp(4, 5), Reconcile::CropCenter).unwrap();
        assert_eq!(t.dimensions(), (4, 3));
        assert_eq!(s.dimensions(), (4, 3));
        // 6 -> 4 drops one column on each side.
        assert_eq!(t.get_pixel(0, 0), &Rgb([1, 0, 1]));
        // 5 -> 3 drops one row on each side.
        assert_eq!(s.get_pixel(0, 0), &Rgb([0, 1, 1]));
    }

    #[test]
    fn save_and_load_png() {
        let dir = std::env::temp_dir().join(format!("sortxfer-raster-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ramp.png");

        let img = ramp(5, 4);
        save_rgb(&img, &path).unwrap();
        assert_eq!(load_rgb(&path).unwrap(), img);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file_is_an_image_error() {
        let err = load_rgb("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
