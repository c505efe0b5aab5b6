//! Region quadtree over point positions.
//!
//! Built fresh each step by the many-body and collision forces. Cells are
//! stored in one vector with children always after their parent, so
//! aggregates can be computed bottom-up by walking the vector in reverse.

/// Cells deeper than this keep all of their points in one leaf.
const MAX_DEPTH: usize = 32;

/// One square cell of the tree.
#[derive(Clone, Debug)]
pub struct Quad {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	/// Child cells by quadrant: bit 0 set = right half, bit 1 set = bottom half.
	pub children: [Option<usize>; 4],
	/// Point indices, only populated for leaves.
	pub points: Vec<usize>,
	/// Sum of point weights inside the cell.
	pub value: f64,
	/// Weight-centered position of the points inside the cell.
	pub cx: f64,
	pub cy: f64,
	/// Largest point radius inside the cell.
	pub r: f64,
}

impl Quad {
	fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
		Self {
			x0,
			y0,
			x1,
			y1,
			children: [None; 4],
			points: Vec::new(),
			value: 0.0,
			cx: 0.0,
			cy: 0.0,
			r: 0.0,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	pub fn width(&self) -> f64 {
		self.x1 - self.x0
	}
}

#[derive(Clone, Debug, Default)]
pub struct QuadTree {
	quads: Vec<Quad>,
}

impl QuadTree {
	/// Build a tree over `points`. Non-finite points end up in the deepest
	/// leaf of the first quadrant and are otherwise harmless.
	pub fn build(points: &[(f64, f64)]) -> Self {
		let mut tree = Self {
			quads: Vec::with_capacity(points.len() * 2),
		};
		if points.is_empty() {
			return tree;
		}

		let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for &(x, y) in points.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		if x0 > x1 {
			(x0, y0, x1, y1) = (0.0, 0.0, 1.0, 1.0);
		}
		// Square cells keep the Barnes-Hut size test meaningful on both axes.
		let side = (x1 - x0).max(y1 - y0).max(1.0);

		tree.subdivide((0..points.len()).collect(), points, (x0, y0, x0 + side, y0 + side), 0);
		tree
	}

	fn subdivide(
		&mut self,
		indices: Vec<usize>,
		points: &[(f64, f64)],
		(x0, y0, x1, y1): (f64, f64, f64, f64),
		depth: usize,
	) -> usize {
		let id = self.quads.len();
		self.quads.push(Quad::new(x0, y0, x1, y1));

		let first = points[indices[0]];
		let coincident = indices.iter().all(|&i| points[i] == first);
		if indices.len() <= 1 || coincident || depth >= MAX_DEPTH {
			self.quads[id].points = indices;
			return id;
		}

		let (xm, ym) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		let mut buckets: [Vec<usize>; 4] = Default::default();
		for i in indices {
			let (x, y) = points[i];
			let quadrant = ((y >= ym) as usize) << 1 | (x >= xm) as usize;
			buckets[quadrant].push(i);
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			let (bx0, bx1) = if quadrant & 1 == 1 { (xm, x1) } else { (x0, xm) };
			let (by0, by1) = if quadrant & 2 == 2 { (ym, y1) } else { (y0, ym) };
			let child = self.subdivide(bucket, points, (bx0, by0, bx1, by1), depth + 1);
			self.quads[id].children[quadrant] = Some(child);
		}
		id
	}

	/// Compute `value` and the centroid of every cell from per-point weights.
	/// The centroid is weighted by absolute weight so mixed signs stay inside
	/// the cell.
	pub fn accumulate_weights(&mut self, points: &[(f64, f64)], weights: &[f64]) {
		for id in (0..self.quads.len()).rev() {
			let (mut value, mut total, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
			let mut add = |w: f64, x: f64, y: f64| {
				value += w;
				total += w.abs();
				sx += w.abs() * x;
				sy += w.abs() * y;
			};

			let quad = &self.quads[id];
			if quad.is_leaf() {
				for &p in &quad.points {
					add(weights[p], points[p].0, points[p].1);
				}
			} else {
				for child in quad.children.iter().flatten() {
					let c = &self.quads[*child];
					add(c.value, c.cx, c.cy);
				}
			}

			let quad = &mut self.quads[id];
			quad.value = value;
			if total > 0.0 {
				quad.cx = sx / total;
				quad.cy = sy / total;
			} else {
				quad.cx = (quad.x0 + quad.x1) / 2.0;
				quad.cy = (quad.y0 + quad.y1) / 2.0;
			}
		}
	}

	/// Compute the largest radius inside every cell.
	pub fn accumulate_radii(&mut self, radii: &[f64]) {
		for id in (0..self.quads.len()).rev() {
			let quad = &self.quads[id];
			let r = if quad.is_leaf() {
				quad.points.iter().map(|&p| radii[p]).fold(0.0, f64::max)
			} else {
				quad.children
					.iter()
					.flatten()
					.map(|&c| self.quads[c].r)
					.fold(0.0, f64::max)
			};
			self.quads[id].r = r;
		}
	}

	/// Visit cells depth-first from the root. Returning `true` from `f`
	/// skips the cell's children.
	pub fn visit(&self, mut f: impl FnMut(&Quad) -> bool) {
		if self.quads.is_empty() {
			return;
		}
		let mut stack = vec![0];
		while let Some(id) = stack.pop() {
			let quad = &self.quads[id];
			if f(quad) {
				continue;
			}
			stack.extend(quad.children.iter().rev().flatten().copied());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaves(tree: &QuadTree) -> Vec<Vec<usize>> {
		let mut out = Vec::new();
		tree.visit(|q| {
			if q.is_leaf() {
				out.push(q.points.clone());
			}
			false
		});
		out
	}

	#[test]
	fn every_point_lands_in_exactly_one_leaf() {
		let points = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (3.0, 7.0)];
		let tree = QuadTree::build(&points);

		let mut seen: Vec<usize> = leaves(&tree).into_iter().flatten().collect();
		seen.sort_unstable();
		assert_eq!(seen, vec![0, 1, 2, 3, 4]);
	}

	#[test]
	fn coincident_points_share_a_leaf() {
		let points = [(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)];
		let tree = QuadTree::build(&points);

		assert_eq!(leaves(&tree), vec![vec![0, 1, 2]]);
	}

	#[test]
	fn root_aggregates_total_weight_and_centroid() {
		let points = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
		let mut tree = QuadTree::build(&points);
		tree.accumulate_weights(&points, &[-1.0; 4]);

		let mut root = None;
		tree.visit(|q| {
			root.get_or_insert((q.value, q.cx, q.cy));
			true
		});
		let (value, cx, cy) = root.unwrap();
		assert_eq!(value, -4.0);
		assert!((cx - 5.0).abs() < 1e-9);
		assert!((cy - 5.0).abs() < 1e-9);
	}

	#[test]
	fn radii_propagate_maximum_upward() {
		let points = [(0.0, 0.0), (100.0, 100.0)];
		let mut tree = QuadTree::build(&points);
		tree.accumulate_radii(&[3.0, 42.0]);

		let mut max_r = 0.0;
		tree.visit(|q| {
			max_r = q.r;
			true
		});
		assert_eq!(max_r, 42.0);
	}

	#[test]
	fn non_finite_points_do_not_hang() {
		let points = [(f64::NAN, 0.0), (1.0, 1.0), (f64::INFINITY, f64::NAN)];
		let tree = QuadTree::build(&points);
		assert_eq!(leaves(&tree).into_iter().flatten().count(), 3);
	}
}
