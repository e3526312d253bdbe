use rand::RngExt;
use rgb::RGB;

/// Display color with every channel in `[0, 1]`.
pub type Color = RGB<f32>;

/// One color per cluster, regenerated on every initialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap(Vec<Color>);

impl ColorMap {
    pub fn random(rng: &mut impl RngExt, k: usize) -> Self {
        Self(
            (0..k)
                .map(|_| RGB::new(rng.random(), rng.random(), rng.random()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, cluster: usize) -> Option<Color> {
        self.0.get(cluster).copied()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.0
    }
}

/// Color of a single point, a pure function of its assignment.
pub fn color_of(assignments: &[usize], color_map: &ColorMap, point: usize) -> Option<Color> {
    assignments.get(point).and_then(|&j| color_map.get(j))
}

pub fn point_colors(assignments: &[usize], color_map: &ColorMap) -> Vec<Color> {
    assignments
        .iter()
        .filter_map(|&j| color_map.get(j))
        .collect()
}
