//! Bounding volumes over point clouds.

use crate::Vec3;

/// Sphere centred on the mean of the points, enclosing all of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Returns `None` for an empty point set.
    ///
    /// The radius is the largest distance from the mean centre; squared
    /// distances are compared and a single square root is taken at the end.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();

        let mut sum = Vec3::ZERO;
        let mut count = 0usize;
        for p in points.clone() {
            sum += p;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let center = sum / count as f32;

        let radius_sq = points
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max);

        Some(Self {
            center,
            radius: radius_sq.sqrt(),
        })
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Returns `None` for an empty point set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter().peekable();
        points.peek()?;

        let (min, max) = points.fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(p), max.max(p)),
        );
        Some(Self { min, max })
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Per-axis size: x = width, y = height, z = length.
    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn sphere_of_empty_set_is_none() {
        assert!(BoundingSphere::from_points(Vec::<Vec3>::new()).is_none());
    }

    #[test]
    fn sphere_radius_is_measured_from_mean() {
        // Offset far from the origin so a radius measured from (0,0,0) would differ.
        let pts = vec![vec3(10.0, 0.0, 0.0), vec3(12.0, 0.0, 0.0)];
        let s = BoundingSphere::from_points(pts).expect("sphere");
        assert_eq!(s.center, vec3(11.0, 0.0, 0.0));
        assert!((s.radius - 1.0).abs() < 1e-6);
    }

    #[test]
    fn box_extents_and_center() {
        let pts = [
            vec3(-1.0, 2.0, 0.5),
            vec3(3.0, -2.0, 1.5),
            vec3(0.0, 0.0, -0.5),
        ];
        let b = BoundingBox::from_points(pts).expect("box");
        assert_eq!(b.min, vec3(-1.0, -2.0, -0.5));
        assert_eq!(b.max, vec3(3.0, 2.0, 1.5));
        assert_eq!(b.center(), vec3(1.0, 0.0, 0.5));
        assert_eq!(b.extents(), vec3(4.0, 4.0, 2.0));
    }

    #[test]
    fn box_of_negative_only_points() {
        // All coordinates negative: the max must not get stuck at a positive seed.
        let b = BoundingBox::from_points([vec3(-3.0, -3.0, -3.0), vec3(-1.0, -2.0, -1.0)])
            .expect("box");
        assert_eq!(b.max, vec3(-1.0, -2.0, -1.0));
    }
}
