use crate::angle::VisualAngle;
use crate::orientation::Orientation;

/// What the chart shows at a given moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartFrame {
    /// Evenly spaced parallel lines, all drawn at the same angle.
    Grid {
        orientation: Orientation,
        angle: VisualAngle,
    },
    /// One vertical and one horizontal line crossing at the centre.
    Cross {
        vertical: VisualAngle,
        horizontal: VisualAngle,
    },
}

impl ChartFrame {
    /// `(orientation, angle)` for every line family in the frame.
    pub fn lines(&self) -> Vec<(Orientation, VisualAngle)> {
        match *self {
            ChartFrame::Grid { orientation, angle } => vec![(orientation, angle)],
            ChartFrame::Cross {
                vertical,
                horizontal,
            } => vec![
                (Orientation::Vertical, vertical),
                (Orientation::Horizontal, horizontal),
            ],
        }
    }

    pub fn angle_for(&self, orientation: Orientation) -> Option<VisualAngle> {
        self.lines()
            .into_iter()
            .find(|(o, _)| *o == orientation)
            .map(|(_, angle)| angle)
    }
}
