use mchart_core::{ChartFrame, DashPattern, DashPatternResolver, MChartError, Orientation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }
}

/// One line to paint and the pattern to paint it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStroke {
    pub orientation: Orientation,
    pub segment: LineSegment,
    pub pattern: DashPattern,
}

/// Everything a paint routine needs, in chart units with y pointing up.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDescription {
    pub width: f64,
    pub height: f64,
    pub strokes: Vec<ChartStroke>,
}

/// Fixed geometry of the M-Chart, independent of the measured angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Side length of the square chart area.
    pub extent: f64,
    /// Number of parallel lines in grid frames.
    pub line_count: usize,
    /// First and last line position, also the span each line covers.
    pub span: (f64, f64),
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            extent: 10.0,
            line_count: 9,
            span: (1.0, 9.0),
        }
    }
}

impl ChartLayout {
    pub fn new(extent: f64, line_count: usize, span: (f64, f64)) -> Result<Self, MChartError> {
        let layout = Self {
            extent,
            line_count,
            span,
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), MChartError> {
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(MChartError::Configuration(format!(
                "chart extent must be positive, got {}",
                self.extent
            )));
        }
        if self.line_count == 0 {
            return Err(MChartError::Configuration(
                "chart needs at least one line".to_string(),
            ));
        }
        let (start, end) = self.span;
        if !(0.0 <= start && start < end && end <= self.extent) {
            return Err(MChartError::Configuration(format!(
                "line span {start}..{end} must lie inside 0..{}",
                self.extent
            )));
        }
        Ok(())
    }

    /// `line_count` evenly spaced positions from `span.0` to `span.1` inclusive.
    pub fn line_positions(&self) -> Vec<f64> {
        let (start, end) = self.span;
        match self.line_count {
            0 => return Vec::new(),
            1 => return vec![start],
            _ => {}
        }
        let step = (end - start) / (self.line_count - 1) as f64;
        (0..self.line_count)
            .map(|i| start + i as f64 * step)
            .collect()
    }

    pub fn center(&self) -> f64 {
        (self.span.0 + self.span.1) / 2.0
    }

    fn line(&self, orientation: Orientation, position: f64) -> LineSegment {
        let (start, end) = self.span;
        match orientation {
            Orientation::Horizontal => LineSegment {
                from: Point::new(start, position),
                to: Point::new(end, position),
            },
            Orientation::Vertical => LineSegment {
                from: Point::new(position, start),
                to: Point::new(position, end),
            },
        }
    }

    /// Projects the current frame onto drawable strokes.
    ///
    /// Only the patterns depend on the frame's angles; extent and line
    /// placement come from the layout alone.
    pub fn describe(
        &self,
        frame: &ChartFrame,
        resolver: &DashPatternResolver,
    ) -> Result<ChartDescription, MChartError> {
        self.validate()?;
        let strokes = match *frame {
            ChartFrame::Grid { orientation, angle } => {
                let pattern = resolver.resolve_angle(angle)?;
                self.line_positions()
                    .into_iter()
                    .map(|position| ChartStroke {
                        orientation,
                        segment: self.line(orientation, position),
                        pattern,
                    })
                    .collect()
            }
            ChartFrame::Cross {
                vertical,
                horizontal,
            } => vec![
                ChartStroke {
                    orientation: Orientation::Vertical,
                    segment: self.line(Orientation::Vertical, self.center()),
                    pattern: resolver.resolve_angle(vertical)?,
                },
                ChartStroke {
                    orientation: Orientation::Horizontal,
                    segment: self.line(Orientation::Horizontal, self.center()),
                    pattern: resolver.resolve_angle(horizontal)?,
                },
            ],
        };

        Ok(ChartDescription {
            width: self.extent,
            height: self.extent,
            strokes,
        })
    }
}
