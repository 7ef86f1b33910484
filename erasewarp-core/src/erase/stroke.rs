use crate::foundation::core::{DisplayTransform, Point, Vec2};
use crate::raster::buffer::PixelBuffer;

// Sub-pixel floor on stamp spacing; keeps the step count finite for tiny radii.
const MIN_STAMP_SPACING: f64 = 1.0 / 64.0;

/// Evenly spaced stamp centers from `previous` to `current`.
///
/// Spacing is roughly `radius / 2`; the segment is split into
/// `round(length / (radius / 2))` steps and both endpoints are included.
/// Without a previous point, or when the segment is too short to split,
/// the result is the single point `current`.
///
/// The sequence is lazy, so a very long segment costs nothing until iterated.
pub fn interpolate_stroke(previous: Option<Point>, current: Point, radius: f64) -> StrokeStamps {
    let single = StrokeStamps {
        previous: current,
        current,
        delta: Vec2::ZERO,
        steps: 0,
        next: Some(0),
        last: 0,
    };
    let Some(previous) = previous else {
        return single;
    };

    let delta = current - previous;
    let steps = if radius.is_finite() && radius > 0.0 {
        (delta.hypot() / (radius / 2.0).max(MIN_STAMP_SPACING)).round()
    } else {
        0.0
    };
    if !(steps.is_finite() && steps >= 1.0) {
        return single;
    }

    let steps = steps as usize;
    StrokeStamps {
        previous,
        current,
        delta,
        steps,
        next: Some(0),
        last: steps,
    }
}

/// Iterator over the stamp centers of one stroke segment, in path order.
#[derive(Clone, Debug)]
pub struct StrokeStamps {
    previous: Point,
    current: Point,
    delta: Vec2,
    steps: usize,
    next: Option<usize>,
    last: usize,
}

impl StrokeStamps {
    /// Restrict to the stamps whose part of the segment crosses `0..=width × 0..=height`.
    ///
    /// The result may still hold a stamp just past the edge; callers bounds-check.
    pub fn within(mut self, width: f64, height: f64) -> Self {
        if self.steps == 0 {
            return self;
        }
        let (Some((t0, t1)), Some((s0, s1))) = (
            clip_segment(self.previous, self.delta, width, height),
            clip_segment(self.current, -self.delta, width, height),
        ) else {
            self.next = None;
            return self;
        };

        // Index each end of the window from the nearer endpoint.
        let n = self.steps as f64;
        let lo = if t0 <= 0.5 {
            (t0 * n).floor()
        } else {
            n - (s1 * n).ceil()
        };
        let hi = if t1 <= 0.5 {
            (t1 * n).ceil()
        } else {
            n - (s0 * n).floor()
        };
        let lo = lo.max(0.0) as usize;
        let hi = (hi.max(0.0) as usize).min(self.steps);
        if lo > hi {
            self.next = None;
        } else {
            self.next = Some(lo);
            self.last = hi;
        }
        self
    }

    fn point(&self, i: usize) -> Point {
        if self.steps == 0 {
            return self.current;
        }
        let n = self.steps as f64;
        if i <= self.steps / 2 {
            self.previous + self.delta * (i as f64 / n)
        } else {
            self.current - self.delta * ((self.steps - i) as f64 / n)
        }
    }
}

impl Iterator for StrokeStamps {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let i = self.next?;
        self.next = (i < self.last).then(|| i + 1);
        Some(self.point(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            None => (0, Some(0)),
            Some(i) => {
                let n = (self.last - i).checked_add(1);
                (n.unwrap_or(usize::MAX), n)
            }
        }
    }
}

/// Parametric window `[t0, t1]` of `origin + dir * t` inside the rect, or `None`.
fn clip_segment(origin: Point, dir: Vec2, width: f64, height: f64) -> Option<(f64, f64)> {
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dir.x, origin.x),
        (dir.x, width - origin.x),
        (-dir.y, origin.y),
        (dir.y, height - origin.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

/// Turns a pointer drag into a dense sequence of in-bounds stamp centers.
///
/// Only the previous image-space position is retained between samples.
#[derive(Clone, Debug, Default)]
pub struct StrokeInterpolator {
    previous: Option<Point>,
}

impl StrokeInterpolator {
    /// Interpolator with no previous position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last image-space position seen, if a stroke is in progress.
    pub fn previous(&self) -> Option<Point> {
        self.previous
    }

    /// Forget the previous position (pointer release, mode switch).
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Feed one display-space pointer sample.
    ///
    /// `radius` is in image pixels. Returns the image-space stamp centers that
    /// land on `image` (far edges inclusive), in path order.
    pub fn advance(
        &mut self,
        display: Point,
        transform: &DisplayTransform,
        radius: f64,
        image: &PixelBuffer,
    ) -> Vec<Point> {
        let current = transform.to_image(display);
        let stamps = interpolate_stroke(self.previous, current, radius)
            .within(f64::from(image.width()), f64::from(image.height()));
        self.previous = Some(current);

        let kept = stamps.filter(|&p| image.contains(p)).collect::<Vec<_>>();
        tracing::trace!(
            x = current.x,
            y = current.y,
            kept = kept.len(),
            "stroke sample"
        );
        kept
    }
}

#[cfg(test)]
#[path = "../../tests/unit/erase/stroke.rs"]
mod tests;
