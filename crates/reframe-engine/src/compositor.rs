//! Portrait frame compositing.
//!
//! Geometry and pixel work for the three layouts:
//!
//! - **Tracking**: full-height crop around the camera center, scaled to the
//!   portrait width.
//! - **Cinematic**: wider crop (transition/zoom-out), scaled down to the
//!   portrait width and centered over a blurred, darkened background.
//! - **Split**: two vertically centered bands, one per subject, stacked.

use crate::config::{BackgroundStyle, ReframeConfig};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use reframe_models::{CropRect, FrameLayout, FrameSize, ViewState};

/// Left edge of a `crop_w` wide crop centered on `center`, clamped so the
/// crop stays inside `[0, src_w]`.
pub fn crop_left(center: f64, crop_w: u32, src_w: u32) -> u32 {
    let crop_w = crop_w.min(src_w);
    let max_left = (src_w - crop_w) as f64;
    let left = (center - crop_w as f64 / 2.0).floor();
    if left.is_nan() {
        return 0;
    }
    left.clamp(0.0, max_left) as u32
}

/// Renders portrait frames for one source size.
#[derive(Debug, Clone)]
pub struct Compositor {
    source: FrameSize,
    target: FrameSize,
    split_zoom: f64,
    margin: f64,
    downscale: u32,
    blur_sigma: f32,
    darken: f64,
    style: BackgroundStyle,
}

impl Compositor {
    pub fn new(config: &ReframeConfig, source: FrameSize) -> Self {
        Self {
            source,
            target: source.portrait(),
            split_zoom: config.split_zoom,
            margin: config.cinematic_margin,
            downscale: config.background_downscale.max(1),
            blur_sigma: config.background_blur_sigma,
            darken: config.background_darken,
            style: config.background_style,
        }
    }

    /// Output frame size.
    pub fn target(&self) -> FrameSize {
        self.target
    }

    /// Foreground crop for a single-subject view.
    ///
    /// The crop width widens from the portrait width toward the full frame
    /// with `view.transition`, then further with `view.zoom_out`; the center
    /// drifts from `camera_x` toward the frame center with the transition.
    pub fn single_crop(&self, camera_x: f64, view: ViewState) -> CropRect {
        let src_w = self.source.width as f64;
        let tw = self.target.width as f64;

        let base_w = tw + (src_w - tw) * view.transition;
        let view_w = base_w + (src_w - base_w) * view.zoom_out;
        let center = camera_x + (src_w / 2.0 - camera_x) * view.transition;

        let crop_w = (view_w.round() as u32).clamp(1, self.source.width);
        CropRect::new(
            crop_left(center, crop_w, self.source.width),
            0,
            crop_w,
            self.source.height,
        )
    }

    /// Band crops for split layout, centered on `top_x` and `bottom_x`.
    pub fn split_crops(&self, top_x: f64, bottom_x: f64) -> (CropRect, CropRect) {
        let (top_h, _) = self.split_heights();
        let band_h = ((self.source.height as f64 * self.split_zoom).round() as u32)
            .clamp(1, self.source.height);
        let crop_w = ((band_h as f64 * self.target.width as f64 / top_h as f64).round() as u32)
            .clamp(1, self.source.width);
        let top = (self.source.height - band_h) / 2;

        let rect = |center: f64| {
            CropRect::new(crop_left(center, crop_w, self.source.width), top, crop_w, band_h)
        };
        (rect(top_x), rect(bottom_x))
    }

    /// Render a single-subject frame.
    pub fn render_single(
        &self,
        frame: &RgbImage,
        camera_x: f64,
        view: ViewState,
    ) -> (FrameLayout, RgbImage) {
        let crop = self.single_crop(camera_x, view);
        let (tw, th) = (self.target.width, self.target.height);

        let cropped = imageops::crop_imm(frame, crop.left, crop.top, crop.width, crop.height).to_image();
        let new_h = ((crop.height as f64 * tw as f64 / crop.width as f64).round() as u32).max(1);
        let scaled = if (crop.width, crop.height) == (tw, new_h) {
            cropped
        } else {
            imageops::resize(&cropped, tw, new_h, FilterType::Triangle)
        };

        let (image, background) = if new_h >= th {
            let top = (new_h - th) / 2;
            let image = if new_h == th {
                scaled
            } else {
                imageops::crop_imm(&scaled, 0, top, tw, th).to_image()
            };
            (image, false)
        } else {
            let mut canvas = self.background(frame);
            let y = ((th - new_h) / 2) as i64;
            imageops::replace(&mut canvas, &scaled, 0, y);
            (canvas, true)
        };

        let layout = FrameLayout::Single {
            camera_x,
            crop,
            view,
            background,
        };
        (layout, image)
    }

    /// Render a split frame: `top_x` subject on the upper half, `bottom_x`
    /// on the lower half.
    pub fn render_split(&self, frame: &RgbImage, top_x: f64, bottom_x: f64) -> (FrameLayout, RgbImage) {
        let (top, bottom) = self.split_crops(top_x, bottom_x);
        let (top_h, bottom_h) = self.split_heights();
        let tw = self.target.width;

        let half = |rect: &CropRect, height: u32| {
            let band = imageops::crop_imm(frame, rect.left, rect.top, rect.width, rect.height).to_image();
            imageops::resize(&band, tw, height, FilterType::Triangle)
        };

        let mut canvas = RgbImage::new(tw, self.target.height);
        imageops::replace(&mut canvas, &half(&top, top_h), 0, 0);
        imageops::replace(&mut canvas, &half(&bottom, bottom_h), 0, top_h as i64);

        let layout = FrameLayout::Split {
            top_x,
            bottom_x,
            top,
            bottom,
        };
        (layout, canvas)
    }

    fn split_heights(&self) -> (u32, u32) {
        let top_h = (self.target.height / 2).max(1);
        (top_h, self.target.height.saturating_sub(top_h).max(1))
    }

    /// Full-bleed background at the output size.
    fn background(&self, frame: &RgbImage) -> RgbImage {
        match self.style {
            BackgroundStyle::Blur => self.blurred_background(frame),
            BackgroundStyle::AverageColor => {
                let [r, g, b] = average_color(frame);
                let dim = |c: f64| (c * 0.3).round() as u8;
                RgbImage::from_pixel(
                    self.target.width,
                    self.target.height,
                    Rgb([dim(r), dim(g), dim(b)]),
                )
            }
        }
    }

    fn blurred_background(&self, frame: &RgbImage) -> RgbImage {
        let (w, h) = frame.dimensions();
        let (tw, th) = (self.target.width, self.target.height);

        // Trim the margins, then take the widest region with the output aspect.
        let mx = (w as f64 * self.margin) as u32;
        let my = (h as f64 * self.margin) as u32;
        let (rw, rh) = ((w - 2 * mx).max(1), (h - 2 * my).max(1));
        let aspect = tw as f64 / th as f64;
        let (bw, bh) = if rw as f64 / rh as f64 > aspect {
            (((rh as f64 * aspect).round() as u32).clamp(1, rw), rh)
        } else {
            (rw, ((rw as f64 / aspect).round() as u32).clamp(1, rh))
        };
        let region =
            imageops::crop_imm(frame, mx + (rw - bw) / 2, my + (rh - bh) / 2, bw, bh).to_image();

        let small_w = (bw / self.downscale).max(1);
        let small_h = (bh / self.downscale).max(1);
        let small = imageops::resize(&region, small_w, small_h, FilterType::Nearest);
        let mut small = if self.blur_sigma > 0.0 {
            imageops::blur(&small, self.blur_sigma)
        } else {
            small
        };

        for pixel in small.pixels_mut() {
            for c in pixel.0.iter_mut() {
                *c = (*c as f64 * self.darken).round().clamp(0.0, 255.0) as u8;
            }
        }

        imageops::resize(&small, tw, th, FilterType::Triangle)
    }
}

/// Mean color of an image.
pub fn average_color(frame: &RgbImage) -> [f64; 3] {
    let count = (frame.width() as u64 * frame.height() as u64).max(1) as f64;
    let mut sum = [0u64; 3];
    for pixel in frame.pixels() {
        for (s, c) in sum.iter_mut().zip(pixel.0) {
            *s += c as u64;
        }
    }
    sum.map(|s| s as f64 / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compositor(w: u32, h: u32) -> Compositor {
        Compositor::new(&ReframeConfig::default(), FrameSize::new(w, h))
    }

    #[test]
    fn test_crop_left_clamps() {
        assert_eq!(crop_left(960.0, 608, 1920), 656);
        assert_eq!(crop_left(-500.0, 608, 1920), 0);
        assert_eq!(crop_left(5000.0, 608, 1920), 1312);
        assert_eq!(crop_left(f64::NAN, 608, 1920), 0);
        // Wider than the source: pinned to the left edge.
        assert_eq!(crop_left(100.0, 4000, 1920), 0);
    }

    #[test]
    fn test_tracking_crop_is_portrait_width() {
        let c = compositor(1920, 1080);
        assert_eq!(c.target(), FrameSize::new(608, 1080));
        let crop = c.single_crop(1200.0, ViewState::default());
        assert_eq!(crop, CropRect::new(896, 0, 608, 1080));
    }

    #[test]
    fn test_full_transition_is_full_frame() {
        let c = compositor(1920, 1080);
        let view = ViewState {
            transition: 1.0,
            zoom_out: 0.0,
        };
        let crop = c.single_crop(200.0, view);
        assert_eq!(crop, CropRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn test_zoom_out_widens_crop() {
        let c = compositor(1920, 1080);
        let view = ViewState {
            transition: 0.0,
            zoom_out: 0.5,
        };
        let crop = c.single_crop(960.0, view);
        assert_eq!(crop.width, 1264);
        assert!(crop.fits_within(FrameSize::new(1920, 1080)));
    }

    #[test]
    fn test_render_tracking_has_no_background() {
        let c = compositor(320, 180);
        let frame = RgbImage::from_pixel(320, 180, Rgb([200, 10, 10]));
        let (layout, image) = c.render_single(&frame, 160.0, ViewState::default());
        assert_eq!(image.dimensions(), (102, 180));
        assert!(matches!(layout, FrameLayout::Single { background: false, .. }));
        assert_eq!(image.get_pixel(50, 90), &Rgb([200, 10, 10]));
    }

    #[test]
    fn test_render_cinematic_composites_background() {
        let c = compositor(320, 180);
        let frame = RgbImage::from_pixel(320, 180, Rgb([200, 100, 50]));
        let view = ViewState {
            transition: 1.0,
            zoom_out: 0.0,
        };
        let (layout, image) = c.render_single(&frame, 160.0, view);
        assert_eq!(image.dimensions(), (102, 180));
        assert!(matches!(layout, FrameLayout::Single { background: true, .. }));

        // Background corner is darkened, foreground center is untouched.
        let corner = image.get_pixel(0, 0);
        assert!(corner[0] < 200 && corner[0] > 0);
        assert_eq!(image.get_pixel(51, 90), &Rgb([200, 100, 50]));
    }

    #[test]
    fn test_average_color_background() {
        let config = ReframeConfig {
            background_style: BackgroundStyle::AverageColor,
            ..Default::default()
        };
        let c = Compositor::new(&config, FrameSize::new(320, 180));
        let frame = RgbImage::from_pixel(320, 180, Rgb([100, 200, 0]));
        let view = ViewState {
            transition: 1.0,
            zoom_out: 0.0,
        };
        let (_, image) = c.render_single(&frame, 160.0, view);
        assert_eq!(image.get_pixel(0, 0), &Rgb([30, 60, 0]));
    }

    #[test]
    fn test_split_geometry_1080p() {
        let c = compositor(1920, 1080);
        let (top, bottom) = c.split_crops(400.0, 1500.0);
        assert_eq!(top, CropRect::new(35, 216, 730, 648));
        assert_eq!(bottom, CropRect::new(1135, 216, 730, 648));
    }

    #[test]
    fn test_render_split_stacks_halves() {
        let c = compositor(320, 180);
        let mut frame = RgbImage::from_pixel(320, 180, Rgb([0, 0, 255]));
        for y in 0..180 {
            for x in 160..320 {
                frame.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let (layout, image) = c.render_split(&frame, 60.0, 260.0);
        assert_eq!(image.dimensions(), (102, 180));
        assert!(matches!(layout, FrameLayout::Split { .. }));
        assert_eq!(image.get_pixel(51, 45), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(51, 135), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_average_color() {
        let mut frame = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        frame.put_pixel(1, 0, Rgb([100, 50, 255]));
        assert_eq!(average_color(&frame), [50.0, 25.0, 127.5]);
    }
}
