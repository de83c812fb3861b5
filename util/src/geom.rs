use glam::IVec2;

/// 4 directions, in west, east, north, south order.
///
/// Grid neighbor iteration uses this order, so searches that break ties by
/// discovery order depend on it staying fixed.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([-1, 0]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, -1]),
    IVec2::from_array([0, 1]),
];

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Vec points to an adjacent cell, left, right, up or down.
    fn is_adjacent(&self) -> bool {
        self.taxi_len() == 1
    }
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self[0].abs() + self[1].abs()
    }
}
