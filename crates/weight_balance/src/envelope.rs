//! CG envelope polygons with inclusive boundaries.

use serde::Serialize;
use vfr_config::WeightBalanceProfile;

use crate::WeightBalanceError;

/// Distance (in the mixed inch/pound plane) within which a point counts as on an edge.
const BOUNDARY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvelopePoint {
    pub cg_in: f64,
    pub weight_lb: f64,
}

/// A named closed polygon of (CG, weight) vertices in sequence order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub name: String,
    pub vertices: Vec<EnvelopePoint>,
}

impl Envelope {
    /// Build from profile limits, ordering vertices by `sequence`. A trailing
    /// vertex that repeats the first one is dropped.
    pub fn from_profile(
        profile_id: u32,
        source: &WeightBalanceProfile,
    ) -> Result<Self, WeightBalanceError> {
        let mut limits = source.limits.clone();
        limits.sort_by_key(|limit| limit.sequence);

        let mut vertices: Vec<EnvelopePoint> = limits
            .iter()
            .map(|limit| EnvelopePoint {
                cg_in: limit.cg_location_in,
                weight_lb: limit.weight_lb,
            })
            .collect();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices
            .iter()
            .any(|v| !v.cg_in.is_finite() || !v.weight_lb.is_finite())
        {
            return Err(WeightBalanceError::IncompleteProfile {
                profile_id,
                reason: format!("envelope '{}' has a non-finite vertex", source.name),
            });
        }
        if vertices.len() < 3 {
            return Err(WeightBalanceError::IncompleteProfile {
                profile_id,
                reason: format!(
                    "envelope '{}' needs at least 3 vertices, found {}",
                    source.name,
                    vertices.len()
                ),
            });
        }

        Ok(Self {
            name: source.name.clone(),
            vertices,
        })
    }

    /// Point-in-polygon test; points on a vertex or edge are inside.
    pub fn contains(&self, cg_in: f64, weight_lb: f64) -> bool {
        if !cg_in.is_finite() || !weight_lb.is_finite() {
            return false;
        }
        let point = EnvelopePoint { cg_in, weight_lb };
        if self.edges().any(|(a, b)| on_segment(a, b, point)) {
            return true;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.weight_lb > weight_lb) != (b.weight_lb > weight_lb) {
                let crossing =
                    (b.cg_in - a.cg_in) * (weight_lb - a.weight_lb) / (b.weight_lb - a.weight_lb)
                        + a.cg_in;
                if cg_in < crossing {
                    inside = !inside;
                }
            }
        }
        inside
    }

    pub fn max_weight_lb(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.weight_lb)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn edges(&self) -> impl Iterator<Item = (EnvelopePoint, EnvelopePoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

fn on_segment(a: EnvelopePoint, b: EnvelopePoint, p: EnvelopePoint) -> bool {
    let dx = b.cg_in - a.cg_in;
    let dy = b.weight_lb - a.weight_lb;
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.cg_in - a.cg_in) * dx + (p.weight_lb - a.weight_lb) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let nearest_cg = a.cg_in + t * dx;
    let nearest_weight = a.weight_lb + t * dy;
    (p.cg_in - nearest_cg).hypot(p.weight_lb - nearest_weight) <= BOUNDARY_TOLERANCE
}
