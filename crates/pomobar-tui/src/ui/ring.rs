use ratatui::prelude::*;
use std::f64::consts::TAU;

/// Radial countdown: a ring lit clockwise from twelve o'clock for the
/// fraction of the phase still left.
pub struct Ring {
    fraction: f64,
    color: Color,
}

impl Ring {
    pub fn new(fraction: f64, color: Color) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            color,
        }
    }
}

impl Widget for Ring {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 5 || area.height < 3 {
            return;
        }

        let cx = area.width as f64 / 2.0;
        let cy = area.height as f64 / 2.0;

        // Cells are roughly twice as tall as they are wide, so x distances
        // are halved to keep the ring round.
        let radius = (cx / 2.0).min(cy) - 0.5;
        let thickness = (radius * 0.2).max(0.6);

        for row in 0..area.height {
            for col in 0..area.width {
                let dx = (col as f64 + 0.5 - cx) / 2.0;
                let dy = row as f64 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();

                if (dist - radius).abs() > thickness {
                    continue;
                }

                let turn = (dx.atan2(-dy) / TAU).rem_euclid(1.0);
                let lit = turn < self.fraction;

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    if lit {
                        cell.set_char('█').set_fg(self.color);
                    } else {
                        cell.set_char('░').set_fg(Color::DarkGray);
                    }
                }
            }
        }
    }
}
