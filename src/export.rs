//! Report capture and PNG export
//!
//! Turns the rendered report region into a downloadable PNG. The display
//! surface describes what it painted as a [`CaptureRegion`] (rectangles of
//! solid fill or photo content, in paint order); the exporter fetches every
//! photo, waits for all of them, composes an opaque raster at capture scale,
//! encodes PNG and writes `authentication-report-<id>.png`. The pipeline
//! runs only on explicit user action and fails only into the log: nothing
//! here may crash the screen that triggered it.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use image::{DynamicImage, Rgba, RgbaImage, imageops};

use crate::config::ExportConfig;
use crate::error::{Error, ExportError, Result};
use crate::types::AppraisalResult;

/// Fixed quality multiplier applied on top of the device pixel ratio.
pub const EXPORT_QUALITY_FACTOR: f32 = 2.0;

/// Background color of the report canvas (#f7f7f7), fully opaque.
pub const REPORT_BACKGROUND: Rgba<u8> = Rgba([0xF7, 0xF7, 0xF7, 0xFF]);

/// Banner fill behind a passed verdict (#eafdf5).
const BANNER_PASS: Rgba<u8> = Rgba([0xEA, 0xFD, 0xF5, 0xFF]);

/// Banner fill behind a failed or counterfeit verdict (#fff5f5).
const BANNER_FAIL: Rgba<u8> = Rgba([0xFF, 0xF5, 0xF5, 0xFF]);

/// White card panel the photo grid sits on.
const PANEL_BACKGROUND: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

/// Placeholder fill under each photo tile (#f2f2f2).
const TILE_BACKGROUND: Rgba<u8> = Rgba([0xF2, 0xF2, 0xF2, 0xFF]);

// Standard card layout, in layout pixels. Two 345px columns plus three 20px
// gutters fill the 750px card exactly.
const CARD_WIDTH: u32 = 750;
const BANNER_HEIGHT: u32 = 160;
const GRID_TOP: u32 = 200;
const TILE_SIZE: u32 = 345;
const GRID_GUTTER: u32 = 20;
const CARD_BOTTOM_PADDING: u32 = 40;

/// What a region element paints
#[derive(Clone, Debug, PartialEq)]
pub enum ElementContent {
    /// A solid fill
    Fill(Rgba<u8>),
    /// A photo fetched from a URL, scaled to fit the element rectangle
    Photo {
        /// Source URL of the photo
        url: String,
    },
}

/// One rectangle of the rendered report region
#[derive(Clone, Debug, PartialEq)]
pub struct RegionElement {
    /// Left edge in layout pixels
    pub x: u32,

    /// Top edge in layout pixels
    pub y: u32,

    /// Width in layout pixels
    pub width: u32,

    /// Height in layout pixels
    pub height: u32,

    /// What the element paints
    pub content: ElementContent,

    /// Marked elements never appear in the capture; the export control marks
    /// itself so the screenshot cannot contain its own button
    pub skip_capture: bool,
}

/// Declarative description of the rendered report region
///
/// Elements paint in order over the opaque background, so later elements
/// cover earlier ones, exactly like the screen they mirror.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureRegion {
    /// Region width in layout pixels
    pub width: u32,

    /// Region height in layout pixels
    pub height: u32,

    /// Elements in paint order
    pub elements: Vec<RegionElement>,
}

impl CaptureRegion {
    /// Create an empty region of the given layout size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Append an element; paint order is insertion order
    pub fn push(&mut self, element: RegionElement) {
        self.elements.push(element);
    }

    /// Build the standard report card layout for a record
    ///
    /// A full-width verdict banner (green for a pass, red otherwise) over a
    /// two-column photo grid, one tile per report photograph in server
    /// order. This mirrors the card the screen renders, so the exported file
    /// looks like the page it came from.
    #[must_use]
    pub fn from_report(result: &AppraisalResult) -> Self {
        let banner = if result.is_pass() {
            BANNER_PASS
        } else {
            BANNER_FAIL
        };

        let rows = (result.image_list.len() as u32).div_ceil(2);
        let grid_height = if rows == 0 {
            0
        } else {
            rows * TILE_SIZE + (rows - 1) * GRID_GUTTER
        };
        let height = GRID_TOP + grid_height + CARD_BOTTOM_PADDING;
        let mut region = Self::new(CARD_WIDTH, height);

        region.push(RegionElement {
            x: 0,
            y: 0,
            width: CARD_WIDTH,
            height: BANNER_HEIGHT,
            content: ElementContent::Fill(banner),
            skip_capture: false,
        });
        region.push(RegionElement {
            x: 0,
            y: BANNER_HEIGHT,
            width: CARD_WIDTH,
            height: height - BANNER_HEIGHT,
            content: ElementContent::Fill(PANEL_BACKGROUND),
            skip_capture: false,
        });

        for (index, photo) in result.image_list.iter().enumerate() {
            let column = (index % 2) as u32;
            let row = (index / 2) as u32;
            let x = GRID_GUTTER + column * (TILE_SIZE + GRID_GUTTER);
            let y = GRID_TOP + row * (TILE_SIZE + GRID_GUTTER);

            region.push(RegionElement {
                x,
                y,
                width: TILE_SIZE,
                height: TILE_SIZE,
                content: ElementContent::Fill(TILE_BACKGROUND),
                skip_capture: false,
            });
            region.push(RegionElement {
                x,
                y,
                width: TILE_SIZE,
                height: TILE_SIZE,
                content: ElementContent::Photo {
                    url: photo.image.clone(),
                },
                skip_capture: false,
            });
        }

        region
    }
}

/// Build the download filename for an export
///
/// `authentication-report-<id>.png`, or the generic
/// `authentication-report-scan.png` when no report id is available.
#[must_use]
pub fn export_file_name(report_id: Option<&str>) -> String {
    match report_id {
        Some(id) if !id.is_empty() => format!("authentication-report-{id}.png"),
        _ => "authentication-report-scan.png".to_string(),
    }
}

/// Photo pixels or fill color resolved for one element, pre-composition
enum ResolvedContent {
    Fill(Rgba<u8>),
    Photo(DynamicImage),
}

/// Exports a rendered report region to a PNG file
///
/// The exporter is responsible for:
/// - Fetching every photo element and waiting for all of them
/// - Composing the opaque capture raster at device-pixel-ratio x 2 scale
/// - Encoding PNG and writing the download file
///
/// Every failure in that pipeline is caught at the
/// [`export_as_image`](Self::export_as_image) boundary and logged; the
/// export is skipped and nothing propagates.
#[derive(Debug)]
pub struct ReportExporter {
    /// HTTP client for fetching report photos
    http: reqwest::Client,

    /// Output and scale options
    options: ExportConfig,
}

impl ReportExporter {
    /// Create an exporter from export options
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the device pixel ratio is not a positive
    ///   finite number
    /// - [`Error::Network`] if the photo-fetch client cannot be created
    pub fn new(options: ExportConfig) -> Result<Self> {
        if !options.device_pixel_ratio.is_finite() || options.device_pixel_ratio <= 0.0 {
            return Err(Error::Config {
                message: format!(
                    "device pixel ratio must be a positive number, got {}",
                    options.device_pixel_ratio
                ),
                key: Some("device_pixel_ratio".into()),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(options.photo_timeout)
            .build()?;

        Ok(Self { http, options })
    }

    /// The effective raster scale: device pixel ratio times
    /// [`EXPORT_QUALITY_FACTOR`]
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.options.device_pixel_ratio * EXPORT_QUALITY_FACTOR
    }

    /// Capture `region` and write the PNG download file
    ///
    /// The file lands in the configured output directory under the name from
    /// [`export_file_name`]. Returns the written path, or `None` when the
    /// export failed; failures are logged here and never propagate, so the
    /// triggering screen stays functional no matter what went wrong.
    pub async fn export_as_image(
        &self,
        region: &CaptureRegion,
        report_id: Option<&str>,
    ) -> Option<PathBuf> {
        let path = self.options.output_dir.join(export_file_name(report_id));

        match self.render_to_file(region, &path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "report exported");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    category = %e.category(),
                    error = %e,
                    "report export skipped"
                );
                None
            }
        }
    }

    /// Capture the standard card for a record
    ///
    /// Convenience wrapper: builds [`CaptureRegion::from_report`] and exports
    /// it under the record's own id.
    pub async fn export_report(&self, result: &AppraisalResult) -> Option<PathBuf> {
        let region = CaptureRegion::from_report(result);
        self.export_as_image(&region, Some(&result.id)).await
    }

    /// The fallible pipeline behind [`export_as_image`](Self::export_as_image)
    async fn render_to_file(&self, region: &CaptureRegion, path: &Path) -> Result<()> {
        let png = self.render_png(region).await?;
        tokio::fs::write(path, png).await?;
        Ok(())
    }

    /// Compose the capture raster and encode it as PNG bytes
    async fn render_png(&self, region: &CaptureRegion) -> Result<Vec<u8>> {
        let elements: Vec<&RegionElement> = region
            .elements
            .iter()
            .filter(|e| !e.skip_capture)
            .collect();

        let scale = self.scale();
        let canvas_width = scale_length(region.width, scale);
        let canvas_height = scale_length(region.height, scale);
        if canvas_width == 0 || canvas_height == 0 {
            return Err(ExportError::EmptyRegion {
                width: region.width,
                height: region.height,
            }
            .into());
        }

        // Resolve all photos before painting anything; capture waits for
        // every in-view image, and one refused photo fails the capture.
        let contents: Vec<ResolvedContent> =
            join_all(elements.iter().map(|e| self.resolve_content(e)))
                .await
                .into_iter()
                .collect::<Result<_>>()?;

        let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, REPORT_BACKGROUND);
        for (element, content) in elements.iter().zip(&contents) {
            let x = scale_length(element.x, scale);
            let y = scale_length(element.y, scale);
            let width = scale_length(element.width, scale);
            let height = scale_length(element.height, scale);
            match content {
                ResolvedContent::Fill(color) => {
                    paint_fill(&mut canvas, x, y, width, height, *color);
                }
                ResolvedContent::Photo(photo) => {
                    paint_photo(&mut canvas, photo, x, y, width, height);
                }
            }
        }

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(ExportError::Encode)?;
        Ok(png)
    }

    /// Resolve one element into paintable content
    async fn resolve_content(&self, element: &RegionElement) -> Result<ResolvedContent> {
        match &element.content {
            ElementContent::Fill(color) => Ok(ResolvedContent::Fill(*color)),
            ElementContent::Photo { url } => Ok(ResolvedContent::Photo(self.fetch_photo(url).await?)),
        }
    }

    /// Fetch and decode one report photo
    async fn fetch_photo(&self, url: &str) -> Result<DynamicImage> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ExportError::PhotoFetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::PhotoFetch {
                url: url.to_string(),
                reason: format!("HTTP status {status}"),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| ExportError::PhotoFetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let photo = image::load_from_memory(&bytes).map_err(|e| ExportError::PhotoDecode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(url = %url, width = photo.width(), height = photo.height(), "photo loaded");
        Ok(photo)
    }
}

/// Scale a layout length into raster pixels
fn scale_length(layout: u32, scale: f32) -> u32 {
    (layout as f32 * scale).round() as u32
}

/// Paint an axis-aligned filled rectangle, clipped to the canvas
fn paint_fill(canvas: &mut RgbaImage, x0: u32, y0: u32, width: u32, height: u32, color: Rgba<u8>) {
    // The rect corner can sit anywhere in the u32 coordinate space
    let x1 = x0.saturating_add(width).min(canvas.width());
    let y1 = y0.saturating_add(height).min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Paint a photo aspect-fit and centered in the rect, clipped to the canvas
fn paint_photo(
    canvas: &mut RgbaImage,
    photo: &DynamicImage,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
) {
    if width == 0 || height == 0 || photo.width() == 0 || photo.height() == 0 {
        return;
    }
    if x0 >= canvas.width() || y0 >= canvas.height() {
        return;
    }

    // Pixels past the canvas edge never land, so the fit rect caps there
    // and the resize target stays canvas-bounded
    let width = width.min(canvas.width() - x0);
    let height = height.min(canvas.height() - y0);

    let ratio = (width as f32 / photo.width() as f32).min(height as f32 / photo.height() as f32);
    let scaled_w = ((photo.width() as f32 * ratio).round() as u32).clamp(1, width);
    let scaled_h = ((photo.height() as f32 * ratio).round() as u32).clamp(1, height);
    let resized = imageops::resize(photo, scaled_w, scaled_h, imageops::FilterType::Triangle);

    let dx = x0.saturating_add((width - scaled_w) / 2);
    let dy = y0.saturating_add((height - scaled_h) / 2);
    imageops::overlay(canvas, &resized, i64::from(dx), i64::from(dy));
}
