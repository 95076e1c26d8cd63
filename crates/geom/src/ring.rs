use crate::latlng::LatLng;

/// Single outer ring of a polygon, vertices in `[lng, lat]` wire order.
///
/// Notes:
/// - The ring is treated as implicitly closed; a duplicated closing vertex
///   is accepted and does not change containment results.
/// - Holes are not modeled. Callers with multi-ring geometry keep the
///   outer ring only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    vertices: Vec<[f64; 2]>,
}

impl Ring {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Even-odd ray-casting containment test.
    ///
    /// A point exactly on an edge may land on either side; the candidates
    /// this filters are not expected to sit on an isochrone boundary.
    pub fn contains(&self, p: LatLng) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let (px, py) = (p.lng, p.lat);
        let mut inside = false;
        let mut j = self.vertices.len() - 1;
        for i in 0..self.vertices.len() {
            let [xi, yi] = self.vertices[i];
            let [xj, yj] = self.vertices[j];
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Vertex-average centroid, skipping non-finite vertices.
    pub fn centroid(&self) -> Option<LatLng> {
        centroid(&self.vertices)
    }
}

/// Vertex-average centroid of a raw `[lng, lat]` vertex list.
pub fn centroid(vertices: &[[f64; 2]]) -> Option<LatLng> {
    let mut sum_lng = 0.0;
    let mut sum_lat = 0.0;
    let mut count = 0.0_f64;
    for [lng, lat] in vertices {
        if lng.is_finite() && lat.is_finite() {
            sum_lng += lng;
            sum_lat += lat;
            count += 1.0;
        }
    }
    if count <= 0.0 {
        return None;
    }
    Some(LatLng::new(sum_lat / count, sum_lng / count))
}
