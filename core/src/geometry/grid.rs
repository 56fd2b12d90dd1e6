use crate::geodata::SampleFeature;
use geo::Rect;
use std::collections::HashMap;

/// Uniform lng/lat hash grid over the sample set. Queries return candidate
/// sample indices for a bounding rectangle; callers still run the exact
/// polygon test, so the grid only prunes and never changes results.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    cell_deg: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SampleGrid {
    pub fn build(samples: &[SampleFeature], cell_deg: f64) -> Self {
        let cell_deg = if cell_deg.is_finite() && cell_deg > 0.0 {
            cell_deg
        } else {
            1.0
        };
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (index, sample) in samples.iter().enumerate() {
            let key = (
                cell_index(sample.coord.lng, cell_deg),
                cell_index(sample.coord.lat, cell_deg),
            );
            cells.entry(key).or_default().push(index);
        }
        Self { cell_deg, cells }
    }

    /// Candidate sample indices for `rect`, ascending and deduplicated.
    pub fn candidates(&self, rect: &Rect<f64>) -> Vec<usize> {
        let x0 = cell_index(rect.min().x, self.cell_deg);
        let x1 = cell_index(rect.max().x, self.cell_deg);
        let y0 = cell_index(rect.min().y, self.cell_deg);
        let y1 = cell_index(rect.max().y, self.cell_deg);

        let mut indices = Vec::new();
        for x in x0..=x1 {
            for y in y0..=y1 {
                if let Some(cell) = self.cells.get(&(x, y)) {
                    indices.extend_from_slice(cell);
                }
            }
        }
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn cell_index(value: f64, cell_deg: f64) -> i64 {
    (value / cell_deg).floor() as i64
}
