//! Marching squares iso-line extraction.
//!
//! Extracts the polylines where a 2D scalar field crosses a single level.
//! Crossing points live on grid edges, so segments from neighbouring cells are
//! stitched by shared edge identity rather than by comparing coordinates.

use glam::Vec2;

/// A single iso-line, in grid-index space (`x` = column, `y` = row).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    /// Ordered vertices. A closed contour does not repeat its first vertex.
    pub points: Vec<Vec2>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl Contour {
    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the contour has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the line segments, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = if self.closed && self.points.len() > 2 {
            self.points.last().copied().zip(self.points.first().copied())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Mean of the vertices.
    #[must_use]
    pub fn centroid(&self) -> Vec2 {
        if self.points.is_empty() {
            return Vec2::ZERO;
        }
        self.points.iter().copied().sum::<Vec2>() / self.points.len() as f32
    }
}

/// All iso-lines of one field at one level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContourSet {
    /// The iso-level.
    pub level: f32,
    /// Open contours first, then closed ones, each group in scan order.
    pub contours: Vec<Contour>,
}

impl ContourSet {
    /// Number of contours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Returns true if the level is never crossed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Number of closed contours.
    #[must_use]
    pub fn num_closed(&self) -> usize {
        self.contours.iter().filter(|c| c.closed).count()
    }

    /// Iterates over the contours.
    pub fn iter(&self) -> std::slice::Iter<'_, Contour> {
        self.contours.iter()
    }
}

const NONE: usize = usize::MAX;

/// Extracts the iso-lines of `field` at `level`.
///
/// # Arguments
/// * `field` - Row-major values: `(x, y)` is stored at `y * width + x`.
/// * `level` - Corners with `value >= level` are inside.
/// * `width`, `height` - Grid dimensions.
///
/// Cells with a NaN corner are skipped. Saddle cells are resolved by the
/// average of their four corners. Grids narrower than 2 in either axis have
/// no cells and yield an empty set.
///
/// # Panics
/// Panics if `field.len() != width * height`.
#[must_use]
pub fn marching_squares(field: &[f32], level: f32, width: usize, height: usize) -> ContourSet {
    assert!(
        field.len() == width * height,
        "Field size {} does not match dimensions {}x{} = {}",
        field.len(),
        width,
        height,
        width * height
    );

    let mut set = ContourSet {
        level,
        contours: Vec::new(),
    };
    if width < 2 || height < 2 {
        return set;
    }

    let mut graph = EdgeGraph::new(width, height);

    for y in 0..height - 1 {
        for x in 0..width - 1 {
            // Corners in cell order: top-left, top-right, bottom-right, bottom-left
            let vs = [
                field[y * width + x],
                field[y * width + x + 1],
                field[(y + 1) * width + x + 1],
                field[(y + 1) * width + x],
            ];
            if vs.iter().any(|v| v.is_nan()) {
                continue;
            }

            let config = usize::from(vs[0] >= level)
                | (usize::from(vs[1] >= level) << 1)
                | (usize::from(vs[2] >= level) << 2)
                | (usize::from(vs[3] >= level) << 3);

            let segments: &[[usize; 2]] = match config {
                5 | 10 => {
                    let center = (vs[0] + vs[1] + vs[2] + vs[3]) * 0.25;
                    if (config == 5) == (center >= level) {
                        SADDLE_CUT_TR_BL
                    } else {
                        SADDLE_CUT_TL_BR
                    }
                }
                n => CASE_SEGMENTS[n],
            };

            for &[a, b] in segments {
                let ea = graph.edge_vertex(field, level, x, y, a);
                let eb = graph.edge_vertex(field, level, x, y, b);
                graph.link(ea, eb);
            }
        }
    }

    set.contours = graph.stitch();
    set
}

/// Saddle segments isolating the top-right and bottom-left corners.
const SADDLE_CUT_TR_BL: &[[usize; 2]] = &[[0, 1], [2, 3]];
/// Saddle segments isolating the top-left and bottom-right corners.
const SADDLE_CUT_TL_BR: &[[usize; 2]] = &[[3, 0], [1, 2]];

/// Edge pairs per cell configuration. Local edges: 0 top, 1 right, 2 bottom, 3 left.
/// Saddle configurations 5 and 10 are resolved separately.
#[rustfmt::skip]
static CASE_SEGMENTS: [&[[usize; 2]]; 16] = [
    &[],
    &[[3, 0]],
    &[[0, 1]],
    &[[3, 1]],
    &[[1, 2]],
    &[],
    &[[0, 2]],
    &[[3, 2]],
    &[[2, 3]],
    &[[0, 2]],
    &[],
    &[[1, 2]],
    &[[3, 1]],
    &[[0, 1]],
    &[[3, 0]],
    &[],
];

/// Crossing points keyed by grid edge, with at most two links each.
///
/// Horizontal edge `(x, y)-(x+1, y)` has id `y * (width - 1) + x`; vertical edge
/// `(x, y)-(x, y+1)` has id `h_count + y * width + x`.
struct EdgeGraph {
    width: usize,
    h_count: usize,
    points: Vec<Vec2>,
    links: Vec<[usize; 2]>,
    order: Vec<usize>,
}

impl EdgeGraph {
    fn new(width: usize, height: usize) -> Self {
        let h_count = (width - 1) * height;
        let v_count = width * (height - 1);
        Self {
            width,
            h_count,
            points: vec![Vec2::ZERO; h_count + v_count],
            links: vec![[NONE; 2]; h_count + v_count],
            order: Vec::new(),
        }
    }

    /// Returns the id of a cell's local edge, computing its crossing point on first use.
    fn edge_vertex(
        &mut self,
        field: &[f32],
        level: f32,
        x: usize,
        y: usize,
        local: usize,
    ) -> usize {
        // Endpoints (x0, y0) -> (x1, y1)
        let (x0, y0, x1, y1) = match local {
            0 => (x, y, x + 1, y),
            1 => (x + 1, y, x + 1, y + 1),
            2 => (x, y + 1, x + 1, y + 1),
            _ => (x, y, x, y + 1),
        };
        let id = if y0 == y1 {
            y0 * (self.width - 1) + x0
        } else {
            self.h_count + y0 * self.width + x0
        };

        if self.links[id] == [NONE; 2] {
            let va = field[y0 * self.width + x0];
            let vb = field[y1 * self.width + x1];
            // Endpoints straddle the level, so va != vb
            let t = ((level - va) / (vb - va)).clamp(0.0, 1.0);
            let a = Vec2::new(x0 as f32, y0 as f32);
            let b = Vec2::new(x1 as f32, y1 as f32);
            self.points[id] = a.lerp(b, t);
            self.order.push(id);
        }
        id
    }

    fn link(&mut self, a: usize, b: usize) {
        Self::push_link(&mut self.links[a], b);
        Self::push_link(&mut self.links[b], a);
    }

    fn push_link(slot: &mut [usize; 2], other: usize) {
        if slot[0] == NONE {
            slot[0] = other;
        } else {
            debug_assert_eq!(slot[1], NONE, "grid edge crossed more than twice");
            slot[1] = other;
        }
    }

    fn degree(&self, id: usize) -> usize {
        self.links[id].iter().filter(|&&n| n != NONE).count()
    }

    /// Walks every chain: open chains from their ends first, then the remaining loops.
    fn stitch(&self) -> Vec<Contour> {
        let mut visited = vec![false; self.links.len()];
        let mut contours = Vec::new();

        for &start in &self.order {
            if !visited[start] && self.degree(start) == 1 {
                contours.push(self.walk(start, &mut visited, false));
            }
        }
        for &start in &self.order {
            if !visited[start] {
                contours.push(self.walk(start, &mut visited, true));
            }
        }
        contours
    }

    fn walk(&self, start: usize, visited: &mut [bool], closed: bool) -> Contour {
        let mut points = vec![self.points[start]];
        visited[start] = true;
        let mut cur = start;
        while let Some(&next) = self.links[cur].iter().find(|&&n| n != NONE && !visited[n]) {
            visited[next] = true;
            points.push(self.points[next]);
            cur = next;
        }
        Contour { points, closed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(n: usize, center: Vec2, radius: f32) -> Vec<f32> {
        let mut field = vec![0.0_f32; n * n];
        for y in 0..n {
            for x in 0..n {
                if Vec2::new(x as f32, y as f32).distance(center) <= radius {
                    field[y * n + x] = 1.0;
                }
            }
        }
        field
    }

    #[test]
    fn test_constant_field_is_empty() {
        let field = vec![0.3; 16];
        assert!(marching_squares(&field, 0.5, 4, 4).is_empty());
        let field = vec![0.7; 16];
        assert!(marching_squares(&field, 0.5, 4, 4).is_empty());
    }

    #[test]
    fn test_single_peak_is_diamond() {
        let mut field = vec![0.0_f32; 9];
        field[4] = 1.0;
        let set = marching_squares(&field, 0.5, 3, 3);
        assert_eq!(set.len(), 1);
        let contour = &set.contours[0];
        assert!(contour.closed);
        assert_eq!(contour.len(), 4);
        for p in &contour.points {
            assert!((p.distance(Vec2::new(1.0, 1.0)) - 0.5).abs() < 1e-6);
        }
        assert!((contour.length() - 4.0 * 0.5_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_disc_gives_one_closed_circle() {
        let n = 64;
        let center = Vec2::splat(31.5);
        let radius = 20.0;
        let set = marching_squares(&disc(n, center, radius), 0.5, n, n);

        assert_eq!(set.len(), 1);
        assert_eq!(set.num_closed(), 1);
        let contour = &set.contours[0];
        assert!(contour.centroid().distance(center) < 0.5);
        for p in &contour.points {
            assert!(
                (p.distance(center) - radius).abs() < 1.0,
                "vertex {p:?} is off the circle"
            );
        }
        let circumference = 2.0 * std::f32::consts::PI * radius;
        assert!((contour.length() - circumference).abs() / circumference < 0.12);
    }

    #[test]
    fn test_two_blobs() {
        let n = 32;
        let mut field = disc(n, Vec2::new(8.0, 8.0), 4.0);
        let other = disc(n, Vec2::new(22.0, 22.0), 5.0);
        for (a, b) in field.iter_mut().zip(other) {
            *a = a.max(b);
        }
        let set = marching_squares(&field, 0.5, n, n);
        assert_eq!(set.len(), 2);
        assert_eq!(set.num_closed(), 2);
        // Scan order puts the upper blob first
        assert!(set.contours[0].centroid().y < set.contours[1].centroid().y);
    }

    #[test]
    fn test_ramp_gives_open_line() {
        let (w, h) = (5, 4);
        let field: Vec<f32> = (0..w * h).map(|i| (i % w) as f32).collect();
        let set = marching_squares(&field, 2.5, w, h);
        assert_eq!(set.len(), 1);
        let contour = &set.contours[0];
        assert!(!contour.closed);
        assert_eq!(contour.len(), h);
        for p in &contour.points {
            assert!((p.x - 2.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_saddle_resolved_by_center() {
        // tl and br inside, center average 0.5 >= 0.5 joins them
        let field = [1.0, 0.0, 0.0, 1.0];
        let set = marching_squares(&field, 0.5, 2, 2);
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|c| !c.closed && c.len() == 2));

        let set = marching_squares(&field, 0.6, 2, 2);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_nan_cells_skipped() {
        let mut field = vec![0.0_f32; 9];
        field[4] = 1.0;
        field[0] = f32::NAN;
        let set = marching_squares(&field, 0.5, 3, 3);
        assert_eq!(set.len(), 1);
        assert!(!set.contours[0].closed);
        assert_eq!(set.contours[0].len(), 4);
    }

    #[test]
    fn test_deterministic() {
        let field = disc(40, Vec2::new(17.3, 21.1), 11.0);
        let a = marching_squares(&field, 0.5, 40, 40);
        let b = marching_squares(&field, 0.5, 40, 40);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_grid() {
        let set = marching_squares(&[0.0, 1.0, 0.0], 0.5, 3, 1);
        assert!(set.is_empty());
        assert_eq!(set.level, 0.5);
    }

    #[test]
    #[should_panic(expected = "Field size")]
    fn test_wrong_field_size() {
        let _ = marching_squares(&[0.0; 5], 0.5, 3, 3);
    }
}
