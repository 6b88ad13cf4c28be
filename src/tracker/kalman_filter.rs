//! Constant-velocity Kalman filter for bounding boxes in XYSR space, using
//! ndarray for the algebra and nalgebra for the 4x4 inverse.
//!
//! State is `[cx, cy, s, r, vx, vy, vs]`; the aspect ratio `r` is assumed
//! constant and carries no velocity term. Measurements are `[cx, cy, s, r]`.

use ndarray::{Array1, Array2};

use crate::tracker::error::FilterError;

pub const STATE_DIM: usize = 7;
pub const MEASUREMENT_DIM: usize = 4;

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    process_noise: Array2<f64>,
    measurement_noise: Array2<f64>,
    initial_covariance: Array2<f64>,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        Self::with_noise(
            [1.0, 1.0, 1.0, 1.0, 1e-2, 1e-2, 1e-4],
            [1.0, 1.0, 10.0, 10.0],
            [10.0, 10.0, 10.0, 10.0, 1e4, 1e4, 1e4],
        )
    }

    /// Build a filter from the diagonals of the process noise, measurement
    /// noise and birth covariance.
    pub fn with_noise(
        process_noise: [f64; STATE_DIM],
        measurement_noise: [f64; MEASUREMENT_DIM],
        initial_covariance: [f64; STATE_DIM],
    ) -> Self {
        let mut motion_mat = Array2::eye(STATE_DIM);
        for i in 0..3 {
            motion_mat[[i, MEASUREMENT_DIM + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((MEASUREMENT_DIM, STATE_DIM));
        for i in 0..MEASUREMENT_DIM {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            process_noise: Array2::from_diag(&Array1::from_vec(process_noise.to_vec())),
            measurement_noise: Array2::from_diag(&Array1::from_vec(measurement_noise.to_vec())),
            initial_covariance: Array2::from_diag(&Array1::from_vec(initial_covariance.to_vec())),
        }
    }

    /// Create the state for a freshly observed box: zero velocity, wide
    /// uncertainty on the unobserved velocity components.
    pub fn initiate(&self, measurement: [f64; MEASUREMENT_DIM]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(STATE_DIM);
        for i in 0..MEASUREMENT_DIM {
            mean[i] = measurement[i];
        }
        (mean, self.initial_covariance.clone())
    }

    /// Advance the state by one frame.
    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let new_mean = self.motion_mat.dot(mean);
        let new_covariance =
            self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + &self.process_noise;

        (new_mean, new_covariance)
    }

    /// Project the state distribution into measurement space.
    pub fn project(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let mean_proj = self.update_mat.dot(mean);
        let covariance_proj =
            self.update_mat.dot(covariance).dot(&self.update_mat.t()) + &self.measurement_noise;

        (mean_proj, covariance_proj)
    }

    /// Correct the state with an observed box.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; MEASUREMENT_DIM],
    ) -> Result<(Array1<f64>, Array2<f64>), FilterError> {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let measurement_arr = Array1::from_vec(measurement.to_vec());
        let innovation = measurement_arr - projected_mean;

        // K = P * H^T * S^-1
        let s_inv = invert_4x4(&projected_cov)?;
        let pht = covariance.dot(&self.update_mat.t()); // 7x4
        let kalman_gain = pht.dot(&s_inv); // 7x4

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let new_covariance = covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        Ok((new_mean, new_covariance))
    }
}

fn invert_4x4(m: &Array2<f64>) -> Result<Array2<f64>, FilterError> {
    let mut nm = nalgebra::Matrix4::zeros();
    for i in 0..MEASUREMENT_DIM {
        for j in 0..MEASUREMENT_DIM {
            nm[(i, j)] = m[[i, j]];
        }
    }
    let inv = nm.try_inverse().ok_or(FilterError::SingularInnovation)?;
    let mut res = Array2::zeros((MEASUREMENT_DIM, MEASUREMENT_DIM));
    for i in 0..MEASUREMENT_DIM {
        for j in 0..MEASUREMENT_DIM {
            res[[i, j]] = inv[(i, j)];
        }
    }
    Ok(res)
}
