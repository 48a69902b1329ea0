//! Triangle mesh data.

pub const TRIANGLE_POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]];

pub const TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

pub fn position_bytes() -> Vec<u8> {
    bytemuck::cast_slice(&TRIANGLE_POSITIONS).to_vec()
}

pub fn index_bytes() -> Vec<u8> {
    bytemuck::cast_slice(&TRIANGLE_INDICES).to_vec()
}

/// Compute bounding box for positions
pub(crate) fn compute_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for pos in positions {
        for i in 0..3 {
            min[i] = min[i].min(pos[i]);
            max[i] = max[i].max(pos[i]);
        }
    }

    (min, max)
}
