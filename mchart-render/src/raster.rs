use crate::chart::{ChartDescription, ChartStroke, Point};
use anyhow::{Result, anyhow};
use mchart_core::{AngleScale, DashPattern};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

/// Anything that can put a [`ChartDescription`] on screen.
pub trait ChartPainter {
    fn paint_into(&self, pixmap: &mut Pixmap, description: &ChartDescription) -> Result<()>;

    fn paint(&self, width: u32, height: u32, description: &ChartDescription) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("Failed to create {width}×{height} pixmap"))?;
        self.paint_into(&mut pixmap, description)?;
        Ok(pixmap)
    }
}

/// Software rasterizer: black strokes on white, equal aspect, y axis up.
#[derive(Debug, Clone)]
pub struct SkiaChartPainter {
    stroke_width: f32,
    /// Pixels per dash-pattern unit.
    pattern_scale: f32,
    background: Color,
    ink: Color,
}

impl Default for SkiaChartPainter {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            pattern_scale: 2.0,
            background: Color::WHITE,
            ink: Color::BLACK,
        }
    }
}

impl SkiaChartPainter {
    /// Chooses the dash unit for `scale`: abstract patterns are measured in
    /// stroke widths, physical ones are already in pixels.
    pub fn for_scale(scale: &AngleScale) -> Self {
        let painter = Self::default();
        let pattern_scale = if scale.is_physical() {
            1.0
        } else {
            painter.stroke_width
        };
        Self {
            pattern_scale,
            ..painter
        }
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        if self.pattern_scale == self.stroke_width {
            self.pattern_scale = width;
        }
        self.stroke_width = width;
        self
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn pattern_scale(&self) -> f32 {
        self.pattern_scale
    }

    pub fn encode_png(
        &self,
        width: u32,
        height: u32,
        description: &ChartDescription,
    ) -> Result<Vec<u8>> {
        let pixmap = self.paint(width, height, description)?;
        Ok(pixmap.encode_png()?)
    }

    fn stroke_style(&self, pattern: &DashPattern) -> Result<Stroke> {
        let dash = match pattern.intervals() {
            None => None,
            Some([on, off]) => {
                let intervals = vec![
                    on as f32 * self.pattern_scale,
                    off as f32 * self.pattern_scale,
                ];
                Some(
                    StrokeDash::new(intervals, 0.0)
                        .ok_or_else(|| anyhow!("Unusable dash pattern {on}/{off}"))?,
                )
            }
        };
        Ok(Stroke {
            width: self.stroke_width,
            dash,
            ..Default::default()
        })
    }

    fn draw_stroke(
        &self,
        pixmap: &mut Pixmap,
        mapping: &Mapping,
        paint: &Paint,
        stroke: &ChartStroke,
    ) -> Result<()> {
        let (x0, y0) = mapping.to_pixels(stroke.segment.from);
        let (x1, y1) = mapping.to_pixels(stroke.segment.to);

        let mut path = PathBuilder::new();
        path.move_to(x0, y0);
        path.line_to(x1, y1);
        let path = path
            .finish()
            .ok_or_else(|| anyhow!("Degenerate chart line at ({x0}, {y0})"))?;

        let style = self.stroke_style(&stroke.pattern)?;
        pixmap.stroke_path(&path, paint, &style, Transform::identity(), None);
        Ok(())
    }
}

impl ChartPainter for SkiaChartPainter {
    fn paint_into(&self, pixmap: &mut Pixmap, description: &ChartDescription) -> Result<()> {
        pixmap.fill(self.background);

        let mapping = Mapping::fit(description, pixmap.width(), pixmap.height())?;
        let mut paint = Paint::default();
        paint.set_color(self.ink);
        paint.anti_alias = true;

        for stroke in &description.strokes {
            self.draw_stroke(pixmap, &mapping, &paint, stroke)?;
        }
        Ok(())
    }
}

/// Chart units to pixel coordinates, centred, y flipped.
struct Mapping {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Mapping {
    fn fit(description: &ChartDescription, width: u32, height: u32) -> Result<Self> {
        if !(description.width > 0.0 && description.height > 0.0) {
            return Err(anyhow!(
                "Chart extent {}×{} is empty",
                description.width,
                description.height
            ));
        }
        let (w, h) = (width as f64, height as f64);
        let scale = (w / description.width).min(h / description.height);
        Ok(Self {
            scale,
            offset_x: (w - description.width * scale) / 2.0,
            offset_y: (h - description.height * scale) / 2.0,
            height: h,
        })
    }

    fn to_pixels(&self, p: Point) -> (f32, f32) {
        let x = self.offset_x + p.x * self.scale;
        let y = self.height - (self.offset_y + p.y * self.scale);
        (x as f32, y as f32)
    }
}
