//! Problem-assembly helpers shared by both solver stages.

use std::time::Instant;

use clarabel::algebra::CscMatrix;
use nalgebra::DMatrix;

/// Convert a dense nalgebra matrix to Clarabel CSC form.
pub(crate) fn dense_to_csc(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut colptr = vec![0usize; ncols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for j in 0..ncols {
        for i in 0..nrows {
            let v = m[(i, j)];
            if v.abs() > 1e-15 {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr[j + 1] = rowval.len();
    }

    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}

/// Convert a symmetric dense matrix to upper-triangular CSC form, as
/// Clarabel expects for the quadratic cost term.
pub(crate) fn dense_to_csc_upper(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut colptr = vec![0usize; ncols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for j in 0..ncols {
        for i in 0..=j.min(nrows - 1) {
            let v = m[(i, j)];
            if v.abs() > 1e-15 {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr[j + 1] = rowval.len();
    }

    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}

/// Microseconds since `start`, saturating.
pub(crate) fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csc_conversion_preserves_entries() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 2.0, 0.0, -3.0, 0.0]);
        let csc = dense_to_csc(&m);
        assert_eq!(csc.nnz(), 3);
        assert_eq!(csc.m, 2);
        assert_eq!(csc.n, 3);
    }

    #[test]
    fn upper_tri_drops_lower_entries() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let csc = dense_to_csc_upper(&m);
        // (0,0), (0,1), (1,1) only
        assert_eq!(csc.nnz(), 3);
    }
}
