use glam::Vec3;

/// One branch: a straight line from a parent position to a child position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

/// Bitwise key of a segment, usable for sorting and exact comparison.
pub type SegmentKey = [u32; 6];

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Exact bit pattern of both end points.
    ///
    /// `-0.0` is folded into `0.0` so geometrically equal segments compare
    /// equal.
    pub fn key(&self) -> SegmentKey {
        let bits = |v: f32| (v + 0.0).to_bits();
        [
            bits(self.start.x),
            bits(self.start.y),
            bits(self.start.z),
            bits(self.end.x),
            bits(self.end.y),
            bits(self.end.z),
        ]
    }
}

/// Sorted keys of `segments`: an order-independent multiset.
///
/// Two outputs describe the same geometry, ignoring traversal order, iff
/// their sorted keys are equal.
pub fn sorted_keys(segments: &[Segment]) -> Vec<SegmentKey> {
    let mut keys: Vec<SegmentKey> = segments.iter().map(Segment::key).collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_euclidean() {
        let s = Segment::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert_eq!(s.length(), 5.0);
    }

    #[test]
    fn key_folds_negative_zero() {
        let a = Segment::new(Vec3::new(-0.0, 0.0, 0.0), Vec3::Z);
        let b = Segment::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn sorted_keys_ignore_order_but_keep_multiplicity() {
        let a = Segment::new(Vec3::ZERO, Vec3::Z);
        let b = Segment::new(Vec3::Z, Vec3::new(0.0, 1.0, 2.0));

        assert_eq!(sorted_keys(&[a, b]), sorted_keys(&[b, a]));
        assert_ne!(sorted_keys(&[a, b]), sorted_keys(&[a, b, b]));
    }
}
