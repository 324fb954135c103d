//! Orthonormal 8x8 DCT-II and its inverse.
//!
//! Scaling matches the conventional image-processing definition: the DC
//! coefficient of a flat block equals `8 * value`, and `inverse(forward(b))`
//! reproduces `b` up to floating-point error.

use std::f64::consts::PI;

pub const BLOCK_SIZE: usize = 8;

pub type Block = [[f64; BLOCK_SIZE]; BLOCK_SIZE];

/// `basis[k][n] = c(k) * cos((2n + 1) * k * pi / 16)`.
fn basis() -> Block {
    let mut table = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    let n = BLOCK_SIZE as f64;
    for (k, row) in table.iter_mut().enumerate() {
        let scale = if k == 0 {
            (1.0 / n).sqrt()
        } else {
            (2.0 / n).sqrt()
        };
        for (i, cell) in row.iter_mut().enumerate() {
            *cell = scale * (((2 * i + 1) as f64) * (k as f64) * PI / (2.0 * n)).cos();
        }
    }
    table
}

pub fn forward(block: &Block) -> Block {
    let c = basis();
    // C * X * C^T
    let mut tmp = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for u in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            tmp[u][y] = (0..BLOCK_SIZE).map(|x| c[u][x] * block[x][y]).sum();
        }
    }
    let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for u in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            out[u][v] = (0..BLOCK_SIZE).map(|y| tmp[u][y] * c[v][y]).sum();
        }
    }
    out
}

pub fn inverse(coeffs: &Block) -> Block {
    let c = basis();
    // C^T * Y * C
    let mut tmp = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for x in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            tmp[x][v] = (0..BLOCK_SIZE).map(|u| c[u][x] * coeffs[u][v]).sum();
        }
    }
    let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            out[x][y] = (0..BLOCK_SIZE).map(|v| tmp[x][v] * c[v][y]).sum();
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/dct_tests.rs"]
mod tests;
