/// Row-major / column-major conversion at the graphics API boundary
///
/// Matrices are reasoned about in row-major order: linear offset `k` is row
/// `k / 4`, column `k % 4`. OpenGL-style uniform uploads (with the transpose
/// flag off) expect the columns laid out one after another instead.
use nalgebra::Matrix4;

/// Flatten `m` in row-major order
pub fn row_major(m: &Matrix4<f32>) -> [f32; 16] {
    let mut out = [0.0; 16];
    for row in 0..4 {
        for col in 0..4 {
            out[row * 4 + col] = m[(row, col)];
        }
    }
    out
}

/// Build a matrix from a row-major array
pub fn from_row_major(values: &[f32; 16]) -> Matrix4<f32> {
    Matrix4::from_row_slice(values)
}

/// Repack a row-major array into column-major order.
///
/// `out[col * 4 + row] = input[row * 4 + col]`. Applying it twice returns the
/// original array.
pub fn to_column_major(input: &[f32; 16]) -> [f32; 16] {
    let mut out = [0.0; 16];
    for row in 0..4 {
        for col in 0..4 {
            out[col * 4 + row] = input[row * 4 + col];
        }
    }
    out
}

/// Column-major array ready for `uniformMatrix4fv(location, false, ..)`
pub fn gl_matrix(m: &Matrix4<f32>) -> [f32; 16] {
    to_column_major(&row_major(m))
}
