//! Page tiling — ticket images on print pages, with cut marks

use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{LayoutError, LayoutResult};

/// Permitted columns and rows per page
pub const GRID_RANGE: RangeInclusive<u32> = 1..=100;

const MM_PER_INCH: f64 = 25.4;

/// Page grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilingConfig {
    pub columns: u32,
    pub rows: u32,
    /// Size of one ticket image in pixels
    pub tile_width: u32,
    pub tile_height: u32,
    pub dpi: u32,
    pub cut_marks: bool,
    /// Cut mark length in millimetres
    pub cut_mark_length_mm: u32,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            rows: 2,
            tile_width: 0,
            tile_height: 0,
            dpi: 300,
            cut_marks: false,
            cut_mark_length_mm: 5,
        }
    }
}

impl TilingConfig {
    pub fn new(columns: u32, rows: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            columns,
            rows,
            tile_width,
            tile_height,
            ..Default::default()
        }
    }

    /// Enable cut marks of the given length
    pub fn with_cut_marks(mut self, length_mm: u32) -> Self {
        self.cut_marks = true;
        self.cut_mark_length_mm = length_mm;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Saturates; [`validate`](Self::validate) rejects pages that do not fit in `u32`
    pub fn page_width(&self) -> u32 {
        self.tile_width.saturating_mul(self.columns)
    }

    pub fn page_height(&self) -> u32 {
        self.tile_height.saturating_mul(self.rows)
    }

    /// Cut mark length converted to pixels at the configured DPI
    pub fn cut_mark_pixels(&self) -> u32 {
        (f64::from(self.cut_mark_length_mm) * f64::from(self.dpi) / MM_PER_INCH).round() as u32
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !GRID_RANGE.contains(&self.columns) || !GRID_RANGE.contains(&self.rows) {
            return Err(LayoutError::InvalidGrid(format!(
                "columns and rows must be between {} and {}",
                GRID_RANGE.start(),
                GRID_RANGE.end()
            )));
        }
        if self.per_page() == 1 {
            return Err(LayoutError::InvalidGrid(
                "there must be more than one image on page".into(),
            ));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(LayoutError::InvalidGrid("tile size must not be zero".into()));
        }
        if self.tile_width.checked_mul(self.columns).is_none()
            || self.tile_height.checked_mul(self.rows).is_none()
        {
            return Err(LayoutError::InvalidGrid(format!(
                "{} x {} tiles of {} x {} px exceed the maximum page size",
                self.columns, self.rows, self.tile_width, self.tile_height
            )));
        }
        if self.dpi == 0 {
            return Err(LayoutError::InvalidGrid("DPI must not be zero".into()));
        }
        Ok(())
    }
}

/// One ticket image on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub image: String,
    pub column: u32,
    pub row: u32,
    pub x: u32,
    pub y: u32,
}

/// Straight cut mark line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Segment {
    const fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// One output page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    pub file_name: String,
    pub placements: Vec<Placement>,
}

/// Complete tiling plan handed to the rendering stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub config: TilingConfig,
    pub page_width: u32,
    pub page_height: u32,
    pub pages: Vec<Page>,
    /// Identical on every page
    pub cut_marks: Vec<Segment>,
}

impl PagePlan {
    /// Lay out `images` row by row, `columns * rows` per page
    pub fn new(images: &[String], config: TilingConfig) -> LayoutResult<Self> {
        config.validate()?;

        let per_page = config.per_page();
        let extension = images
            .first()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let pages: Vec<Page> = images
            .chunks(per_page)
            .enumerate()
            .map(|(index, chunk)| Page {
                index,
                file_name: format!("page-{:04}{}", index, extension),
                placements: chunk
                    .iter()
                    .enumerate()
                    .map(|(slot, image)| {
                        let column = (slot % config.columns as usize) as u32;
                        let row = (slot / config.columns as usize) as u32;
                        Placement {
                            image: image.clone(),
                            column,
                            row,
                            x: column * config.tile_width,
                            y: row * config.tile_height,
                        }
                    })
                    .collect(),
            })
            .collect();

        log::info!(
            "{} images on {} pages of {} x {} px",
            images.len(),
            pages.len(),
            config.page_width(),
            config.page_height()
        );

        Ok(Self {
            page_width: config.page_width(),
            page_height: config.page_height(),
            cut_marks: if config.cut_marks {
                cut_marks(&config)
            } else {
                Vec::new()
            },
            config,
            pages,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> LayoutResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Edge marks on every inner grid line plus centred crosses at inner intersections
fn cut_marks(config: &TilingConfig) -> Vec<Segment> {
    let len = i64::from(config.cut_mark_pixels());
    let half = len / 2;
    let width = i64::from(config.page_width());
    let height = i64::from(config.page_height());
    let tile_w = i64::from(config.tile_width);
    let tile_h = i64::from(config.tile_height);
    let mut marks = Vec::new();

    for r in 1..i64::from(config.rows) {
        let y = r * tile_h;
        marks.push(Segment::new(0, y, len, y));
        marks.push(Segment::new(width - len, y, width, y));
        for c in 1..i64::from(config.columns) {
            marks.push(Segment::new(tile_w * c - half, y, tile_w * c + half, y));
        }
    }

    for c in 1..i64::from(config.columns) {
        let x = c * tile_w;
        marks.push(Segment::new(x, 0, x, len));
        marks.push(Segment::new(x, height - len, x, height));
        for r in 1..i64::from(config.rows) {
            marks.push(Segment::new(x, tile_h * r - half, x, tile_h * r + half));
        }
    }

    marks
}
