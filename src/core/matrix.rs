use super::types::Float;

#[derive(Debug, Copy, Clone)]
pub struct Matrix4x4 {
    pub m: [[Float;4]; 4]
}

impl Matrix4x4 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t00: Float,
        t01: Float,
        t02: Float,
        t03: Float,
        t10: Float,
        t11: Float,
        t12: Float,
        t13: Float,
        t20: Float,
        t21: Float,
        t22: Float,
        t23: Float,
        t30: Float,
        t31: Float,
        t32: Float,
        t33: Float
    ) -> Matrix4x4 {
        Matrix4x4{
            m: [
                [t00, t01, t02, t03],
                [t10, t11, t12, t13],
                [t20, t21, t22, t23],
                [t30, t31, t32, t33]
            ]
        }
    }

    /// Build a matrix from row-major rows.
    pub fn from_rows(m: [[Float; 4]; 4]) -> Matrix4x4 {
        Matrix4x4 { m }
    }

    /// Transpose the Matrix4x4
    #[inline]
    pub fn transpose(&self) -> Matrix4x4 {
        Matrix4x4 {
            m: [
                [self.m[0][0], self.m[1][0], self.m[2][0], self.m[3][0]],
                [self.m[0][1], self.m[1][1], self.m[2][1], self.m[3][1]],
                [self.m[0][2], self.m[1][2], self.m[2][2], self.m[3][2]],
                [self.m[0][3], self.m[1][3], self.m[2][3], self.m[3][3]],
            ]
        }
    }

    /// Multiply two Matrix4x4
    pub fn mul(&self, m2: &Matrix4x4) -> Matrix4x4 {
        let mut r = Matrix4x4 { m: [[0.0; 4]; 4] };
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[i][0] * m2.m[0][j] + self.m[i][1] * m2.m[1][j] +
                    self.m[i][2] * m2.m[2][j] + self.m[i][3] * m2.m[3][j];
            }
        }
        r
    }

    /// Return the inverse of the Matrix4x4, or `None` when it is singular.
    ///
    /// Gauss-Jordan elimination with full pivoting.
    pub fn inverse(&self) -> Option<Matrix4x4> {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_u32; 4];
        let mut minv = *self;
        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;
            // choose pivot
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for k in 0..4 {
                        if ipiv[k] == 0 {
                            let abs: Float = minv.m[j][k].abs();
                            if abs >= big {
                                big = abs;
                                irow = j;
                                icol = k;
                            }
                        } else if ipiv[k] > 1 {
                            debug!("Singular matrix in Matrix4x4::inverse");
                            return None;
                        }
                    }
                }
            }
            ipiv[icol] += 1;
            // swap rows _irow_ and _icol_ for pivot
            if irow != icol {
                minv.m.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv.m[icol][icol] == 0.0 {
                debug!("Singular matrix in Matrix4x4::inverse");
                return None;
            }
            // set $m[icol][icol]$ to one by scaling row _icol_ appropriately
            let pivinv: Float = 1.0 / minv.m[icol][icol];
            minv.m[icol][icol] = 1.0;
            for j in 0..4 {
                minv.m[icol][j] *= pivinv;
            }
            // subtract this row from others to zero out their columns
            for j in 0..4 {
                if j != icol {
                    let save: Float = minv.m[j][icol];
                    minv.m[j][icol] = 0.0;
                    for k in 0..4 {
                        minv.m[j][k] -= minv.m[icol][k] * save;
                    }
                }
            }
        }
        // swap columns to reflect permutation
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for k in 0..4 {
                    minv.m[k].swap(indxr[j], indxc[j]);
                }
            }
        }
        Some(minv)
    }
}

/// Default is the identity matrix.
impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4{
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0]
            ]
        }
    }
}

impl PartialEq for Matrix4x4 {
    fn eq(&self, rhs: &Matrix4x4) -> bool {
        self.m == rhs.m
    }
}
