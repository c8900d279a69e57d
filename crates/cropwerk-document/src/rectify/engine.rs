// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification engine — warps the crop quadrilateral into an upright
// rectangle using two affine-mapped triangles.

use cropwerk_core::config::CropConfig;
use cropwerk_core::error::Result;
use cropwerk_core::geometry::{Affine, Point};
use cropwerk_core::quad::{PixelQuad, Quad};
use cropwerk_core::types::{Corner, Edge, RectifiedImage};
use image::RgbaImage;
use tracing::{debug, info, instrument, warn};

use crate::preview::data_uri;
use crate::rectify::canvas::{Canvas, SoftwareCanvas};
use crate::source::SourceImage;

const JPEG_MIME: &str = "image/jpeg";

/// One source triangle and the output triangle it lands on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrianglePair {
    pub source: [Point; 3],
    pub dest: [Point; 3],
}

/// What happened while drawing the two triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Triangles composited onto the canvas.
    pub drawn: usize,
    /// Triangles skipped because their source was degenerate.
    pub skipped: usize,
}

/// Output size for a pixel-space quad.
///
/// Width is the longer of the top and bottom edges, height the longer of the
/// left and right edges, rounded to whole pixels and never below 1.
pub fn output_size(quad: &PixelQuad) -> (u32, u32) {
    let width = quad.edge_length(Edge::Top).max(quad.edge_length(Edge::Bottom));
    let height = quad.edge_length(Edge::Left).max(quad.edge_length(Edge::Right));
    let to_px = |v: f64| -> u32 { (v.round() as u32).max(1) };
    (to_px(width), to_px(height))
}

/// Split the quad along the top-right/bottom-left diagonal.
///
/// Triangle A is `(top-left, top-right, bottom-left)` onto
/// `((0,0), (W,0), (0,H))`; triangle B is `(bottom-right, top-right,
/// bottom-left)` onto `((W,H), (W,0), (0,H))`. The vertex order decides which
/// physical corner lands where.
pub fn triangle_pairs(quad: &PixelQuad, width: u32, height: u32) -> [TrianglePair; 2] {
    let (w, h) = (width as f64, height as f64);
    let tl = quad.corner(Corner::TopLeft);
    let tr = quad.corner(Corner::TopRight);
    let br = quad.corner(Corner::BottomRight);
    let bl = quad.corner(Corner::BottomLeft);
    [
        TrianglePair {
            source: [tl, tr, bl],
            dest: [Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(0.0, h)],
        },
        TrianglePair {
            source: [br, tr, bl],
            dest: [Point::new(w, h), Point::new(w, 0.0), Point::new(0.0, h)],
        },
    ]
}

/// Draw both triangles of `quad` from `source` onto `canvas`.
///
/// The canvas is expected to already have the output size. A triangle whose
/// source points are collinear is skipped and its region keeps the
/// background.
pub fn draw_quad<C: Canvas>(canvas: &mut C, source: &RgbaImage, quad: &PixelQuad) -> RenderReport {
    let (width, height) = canvas.dimensions();
    canvas.clear_rect(0, 0, width, height);

    let mut report = RenderReport::default();
    for (index, pair) in triangle_pairs(quad, width, height).iter().enumerate() {
        let Some(transform) = Affine::from_triangles(&pair.source, &pair.dest) else {
            warn!(index, source = ?pair.source, "degenerate triangle skipped");
            report.skipped += 1;
            continue;
        };
        debug!(index, ?transform, "triangle affine solved");
        canvas.reset();
        canvas.clip_to_path(&pair.dest);
        canvas.apply_affine(transform);
        canvas.draw_image(source);
        report.drawn += 1;
    }
    canvas.reset();
    report
}

/// Turns a source photo and a crop quad into an upright page image.
#[derive(Debug, Clone, Default)]
pub struct Rectifier {
    config: CropConfig,
}

impl Rectifier {
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Warp the region under `quad` into a new image.
    ///
    /// Fails fast with `ImageNotReady` if `source` has not been decoded.
    #[instrument(skip_all, fields(uri = %source.uri()))]
    pub fn render(&self, source: &SourceImage, quad: &Quad) -> Result<(RgbaImage, RenderReport)> {
        let (canvas, report) = self.paint(source, quad)?;
        Ok((canvas.into_image(), report))
    }

    /// Rectify and encode: JPEG blob plus a data-URI preview of the same bytes.
    #[instrument(skip_all, fields(uri = %source.uri(), quality = self.config.jpeg_quality))]
    pub fn rectify(&self, source: &SourceImage, quad: &Quad) -> Result<RectifiedImage> {
        let (canvas, report) = self.paint(source, quad)?;
        let (width, height) = canvas.dimensions();
        let blob = canvas.encode(self.config.jpeg_quality)?;

        info!(
            width,
            height,
            drawn = report.drawn,
            skipped = report.skipped,
            bytes = blob.len(),
            "Rectification complete"
        );

        Ok(RectifiedImage {
            preview_uri: data_uri(JPEG_MIME, &blob),
            blob,
            mime_type: JPEG_MIME.to_string(),
            dimensions: Some((width, height)),
            rectified: true,
        })
    }

    fn paint(&self, source: &SourceImage, quad: &Quad) -> Result<(SoftwareCanvas, RenderReport)> {
        let pixels = source.pixels()?;
        let (src_w, src_h) = pixels.dimensions();
        let pixel_quad = quad.to_pixel_space(src_w, src_h);
        let (width, height) = output_size(&pixel_quad);
        debug!(src_w, src_h, width, height, corners = ?pixel_quad.corners(), "output size computed");

        let mut canvas = SoftwareCanvas::new(
            width,
            height,
            self.config.background,
            self.config.interpolation,
        );
        let report = draw_quad(&mut canvas, pixels, &pixel_quad);
        Ok((canvas, report))
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cropwerk_core::error::CropwerkError;
    use cropwerk_core::geometry::triangle_contains;
    use image::{DynamicImage, Rgba};

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn quad(points: [(f64, f64); 4]) -> Quad {
        Quad::new(points.map(Point::from))
    }

    fn patterned(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    /// Records calls so the triangulation order can be checked without pixels.
    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<String>,
    }

    impl Canvas for RecordingCanvas {
        fn dimensions(&self) -> (u32, u32) {
            (100, 50)
        }
        fn clear_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
            self.calls.push(format!("clear {x} {y} {w} {h}"));
        }
        fn clip_to_path(&mut self, t: &[Point; 3]) {
            self.calls.push(format!(
                "clip ({},{}) ({},{}) ({},{})",
                t[0].x, t[0].y, t[1].x, t[1].y, t[2].x, t[2].y
            ));
        }
        fn apply_affine(&mut self, _transform: Affine) {
            self.calls.push("affine".into());
        }
        fn draw_image(&mut self, _source: &RgbaImage) {
            self.calls.push("draw".into());
        }
        fn reset(&mut self) {
            self.calls.push("reset".into());
        }
        fn encode(&self, _quality: u8) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn identity_quad_reproduces_source() {
        let pixels = patterned(37, 23);
        let source = SourceImage::from_dynamic("mem:id", DynamicImage::ImageRgba8(pixels.clone()));
        let (out, report) = Rectifier::default().render(&source, &Quad::full()).unwrap();
        assert_eq!(out.dimensions(), (37, 23));
        assert_eq!(report, RenderReport { drawn: 2, skipped: 0 });
        assert_eq!(out, pixels);
    }

    #[test]
    fn identity_holds_with_nearest_sampling() {
        let pixels = patterned(20, 31);
        let source = SourceImage::from_dynamic("mem:id", DynamicImage::ImageRgba8(pixels.clone()));
        let config = CropConfig {
            interpolation: cropwerk_core::config::Interpolation::Nearest,
            ..CropConfig::default()
        };
        let (out, _) = Rectifier::new(config).render(&source, &Quad::full()).unwrap();
        assert_eq!(out, pixels);
    }

    #[test]
    fn symmetric_trapezoid_output_size() {
        let q = quad([(10.0, 10.0), (90.0, 15.0), (85.0, 90.0), (15.0, 85.0)]);
        let px = q.to_pixel_space(1000, 1000);
        let (w, h) = output_size(&px);
        // top: |(100,100)-(900,150)| ≈ 801.6, bottom: |(850,900)-(150,850)| ≈ 701.8
        assert_eq!(w, 802);
        // left: |(150,850)-(100,100)| ≈ 751.7, right: |(900,150)-(850,900)| ≈ 751.7
        assert_eq!(h, 752);
        for pair in triangle_pairs(&px, w, h) {
            assert!(!cropwerk_core::geometry::is_degenerate(&pair.source));
        }
    }

    #[test]
    fn symmetric_trapezoid_renders_both_triangles() {
        let source = SourceImage::from_dynamic(
            "mem:trap",
            DynamicImage::ImageRgba8(patterned(200, 200)),
        );
        let q = quad([(10.0, 10.0), (90.0, 15.0), (85.0, 90.0), (15.0, 85.0)]);
        let (out, report) = Rectifier::default().render(&source, &q).unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(out.dimensions(), (160, 150));
        // Output corners sample the quad corners.
        assert_eq!(out.get_pixel(0, 0), patterned(200, 200).get_pixel(20, 20));
    }

    #[test]
    fn triangles_tile_the_output_rectangle() {
        let q = quad([(12.0, 8.0), (88.0, 14.0), (80.0, 92.0), (18.0, 84.0)]);
        let px = q.to_pixel_space(640, 480);
        let (w, h) = output_size(&px);
        let [a, b] = triangle_pairs(&px, w, h);
        for y in 0..h {
            for x in 0..w {
                let c = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let (in_a, in_b) = (triangle_contains(&a.dest, c), triangle_contains(&b.dest, c));
                assert!(in_a || in_b, "gap at ({x}, {y})");
                if in_a && in_b {
                    // Overlap only on the shared diagonal x/W + y/H = 1.
                    let on_diagonal = (c.x / w as f64 + c.y / h as f64 - 1.0).abs() < 1e-9;
                    assert!(on_diagonal, "overlap off the diagonal at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn triangulation_uses_top_right_bottom_left_diagonal() {
        let px = quad([(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]).to_pixel_space(100, 50);
        let mut canvas = RecordingCanvas::default();
        let report = draw_quad(&mut canvas, &RgbaImage::new(100, 50), &px);
        assert_eq!(report.drawn, 2);
        assert_eq!(
            canvas.calls,
            vec![
                "clear 0 0 100 50",
                "reset",
                "clip (0,0) (100,0) (0,50)",
                "affine",
                "draw",
                "reset",
                "clip (100,50) (100,0) (0,50)",
                "affine",
                "draw",
                "reset",
            ]
        );
    }

    #[test]
    fn collinear_triangle_is_skipped_and_left_blank() {
        // Top-left, top-right and bottom-left all on y = 0: triangle A is degenerate.
        let q = quad([(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        let source = SourceImage::from_dynamic(
            "mem:flat",
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]))),
        );
        let (out, report) = Rectifier::default().render(&source, &q).unwrap();
        assert_eq!(report, RenderReport { drawn: 1, skipped: 1 });
        // Well inside triangle A's destination: untouched background.
        assert_eq!(out.get_pixel(1, 1).0, WHITE);
        // Triangle B's far corner is drawn from the black source.
        let (w, h) = out.dimensions();
        assert_eq!(out.get_pixel(w - 1, h - 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn nan_corner_drag_leaves_render_unchanged() {
        let source = SourceImage::from_dynamic("mem:nan", DynamicImage::ImageRgba8(patterned(60, 40)));
        let dragged = Quad::default().set_corner(Corner::TopLeft, Point::new(f64::NAN, 20.0));
        let (out, report) = Rectifier::default().render(&source, &dragged).unwrap();
        let (expected, _) = Rectifier::default().render(&source, &Quad::default()).unwrap();
        assert_eq!(report, RenderReport { drawn: 2, skipped: 0 });
        assert_eq!(out, expected);
        assert_ne!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn top_row_collinear_quad_still_rectifies() {
        let q = quad([(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (50.0, 50.0)]);
        let source = SourceImage::from_dynamic("mem:row", DynamicImage::ImageRgba8(patterned(80, 80)));
        let result = Rectifier::default().rectify(&source, &q).unwrap();
        assert!(result.rectified);
        assert!(!result.blob.is_empty());
    }

    #[test]
    fn rectify_requires_decoded_source() {
        let err = Rectifier::default()
            .rectify(&SourceImage::pending("mem:loading"), &Quad::default())
            .unwrap_err();
        assert!(matches!(err, CropwerkError::ImageNotReady));
    }

    #[test]
    fn rectify_emits_jpeg_blob_and_matching_preview() {
        let source = SourceImage::from_dynamic("mem:page", DynamicImage::ImageRgba8(patterned(64, 48)));
        let out = Rectifier::default().rectify(&source, &Quad::default()).unwrap();
        assert_eq!(out.mime_type, "image/jpeg");
        assert_eq!(&out.blob[..2], &[0xFF, 0xD8]);
        assert_eq!(out.preview_uri, data_uri("image/jpeg", &out.blob));
        let decoded = image::load_from_memory(&out.blob).unwrap();
        assert_eq!(Some((decoded.width(), decoded.height())), out.dimensions);
    }

    #[test]
    fn fully_collapsed_quad_yields_one_pixel_background() {
        let q = quad([(40.0, 40.0); 4]);
        let source = SourceImage::from_dynamic("mem:dot", DynamicImage::ImageRgba8(patterned(10, 10)));
        let (out, report) = Rectifier::default().render(&source, &q).unwrap();
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(report.skipped, 2);
        assert_eq!(out.get_pixel(0, 0).0, WHITE);
    }
}
