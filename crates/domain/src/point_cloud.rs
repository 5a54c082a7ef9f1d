use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCloudInfo {
    pub exists: bool,
    #[serde(default)]
    pub num_points: Option<u64>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl PointCloudInfo {
    pub fn file_size_mb(&self) -> Option<f64> {
        self.file_size.map(|bytes| bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Raw coordinates for the scatter viewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    #[serde(default)]
    pub points: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds3 {
    pub fn center(&self) -> [f32; 3] {
        [0, 1, 2].map(|axis| (self.min[axis] + self.max[axis]) * 0.5)
    }

    pub fn extent(&self) -> f32 {
        [0, 1, 2]
            .map(|axis| self.max[axis] - self.min[axis])
            .into_iter()
            .fold(0.0_f32, f32::max)
    }
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        let mut points = self
            .points
            .iter()
            .filter(|point| point.iter().all(|value| value.is_finite()));
        let first = *points.next()?;
        let mut bounds = Bounds3 {
            min: first,
            max: first,
        };
        for point in points {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(point[axis]);
                bounds.max[axis] = bounds.max[axis].max(point[axis]);
            }
        }
        Some(bounds)
    }
}
