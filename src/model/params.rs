//! Layout of the flat parameter vector θ and its structured view.
//!
//! θ is laid out block by block:
//!
//! | block         | length                     | notes                             |
//! |---------------|----------------------------|-----------------------------------|
//! | scale         | 3 or 4                     | `[logpop, sx, fx, (gx)]`          |
//! | `log_basepop` | `n_ages`                   |                                   |
//! | `logit_sx`    | `(n_ages + 1) * n_periods` | column-major                      |
//! | `log_fx`      | `n_fx * n_periods`         | column-major                      |
//! | `gx`          | `n_ages * n_periods`       | column-major, estimated migration |
//!
//! The scale entries are either log-precisions or log standard deviations
//! depending on [`PriorScale`](crate::model::options::PriorScale); the
//! layout is the same for both.
use crate::{
    model::{
        data::ModelData,
        errors::{ModelError, ModelResult},
        options::MigrationMode,
    },
    optimization::loglik_optimizer::Theta,
    projection::{core::ProjectionShape, flat::reshape_col_major},
};
use ndarray::{Array1, Array2, s};

/// Offsets of each block inside θ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    shape: ProjectionShape,
    migration: MigrationMode,
    n_scale: usize,
}

impl ParamLayout {
    pub fn new(shape: ProjectionShape, migration: MigrationMode) -> Self {
        let n_scale = if migration.is_estimated() { 4 } else { 3 };
        ParamLayout { shape, migration, n_scale }
    }

    pub fn n_scale(&self) -> usize {
        self.n_scale
    }

    fn n_basepop(&self) -> usize {
        self.shape.n_ages
    }

    fn n_sx(&self) -> usize {
        self.shape.n_sx() * self.shape.n_periods
    }

    fn n_fx(&self) -> usize {
        self.shape.n_fx * self.shape.n_periods
    }

    fn n_gx(&self) -> usize {
        if self.migration.is_estimated() { self.shape.n_ages * self.shape.n_periods } else { 0 }
    }

    /// Total length of θ.
    pub fn len(&self) -> usize {
        self.n_scale + self.n_basepop() + self.n_sx() + self.n_fx() + self.n_gx()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check length and finiteness of `theta`.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] for a wrong length.
    /// - [`ModelError::NonFiniteTheta`] for the first NaN or ±inf entry.
    pub fn check(&self, theta: &Theta) -> ModelResult<()> {
        if theta.len() != self.len() {
            return Err(ModelError::ThetaLengthMismatch {
                expected: self.len(),
                actual: theta.len(),
            });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteTheta { index, value });
        }
        Ok(())
    }

    /// Split a checked θ into its latent blocks.
    ///
    /// # Errors
    /// - Same as [`ParamLayout::check`].
    pub fn unpack(&self, theta: &Theta) -> ModelResult<LatentParams> {
        self.check(theta)?;
        let ProjectionShape { n_ages, n_periods, n_fx, .. } = self.shape;

        let mut start = 0;
        let mut take = |len: usize| {
            let block = theta.slice(s![start..start + len]).to_vec();
            start += len;
            block
        };

        let scale = Array1::from(take(self.n_scale));
        let log_basepop = Array1::from(take(self.n_basepop()));
        let logit_sx = reshape_col_major("logit_sx", &take(self.n_sx()), n_ages + 1, n_periods)?;
        let log_fx = reshape_col_major("log_fx", &take(self.n_fx()), n_fx, n_periods)?;
        let gx = match self.migration {
            MigrationMode::Estimated => {
                Some(reshape_col_major("gx", &take(self.n_gx()), n_ages, n_periods)?)
            }
            MigrationMode::Zero => None,
        };

        Ok(LatentParams { scale, log_basepop, logit_sx, log_fx, gx })
    }

    /// Flatten latent blocks back into θ.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] if the blocks do not fill the
    ///   layout exactly.
    pub fn pack(&self, params: &LatentParams) -> ModelResult<Theta> {
        let mut flat = Vec::with_capacity(self.len());
        flat.extend(params.scale.iter());
        flat.extend(params.log_basepop.iter());
        flat.extend(params.logit_sx.t().iter());
        flat.extend(params.log_fx.t().iter());
        if self.migration.is_estimated() {
            if let Some(gx) = &params.gx {
                flat.extend(gx.t().iter());
            }
        }
        if flat.len() != self.len() {
            return Err(ModelError::ThetaLengthMismatch { expected: self.len(), actual: flat.len() });
        }
        Ok(Array1::from(flat))
    }

    /// θ at the prior means with every scale entry at zero.
    pub fn initial_theta(&self, data: &ModelData) -> ModelResult<Theta> {
        let priors = data.priors();
        let params = LatentParams {
            scale: Array1::zeros(self.n_scale),
            log_basepop: priors.log_basepop.clone(),
            logit_sx: priors.logit_sx.clone(),
            log_fx: priors.log_fx.clone(),
            gx: self.migration.is_estimated().then(|| priors.gx.clone()),
        };
        self.pack(&params)
    }
}

/// Structured view of θ.
///
/// `scale` holds `[logpop, sx, fx, (gx)]`; `gx` is `None` when migration is
/// fixed at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentParams {
    pub scale: Array1<f64>,
    pub log_basepop: Array1<f64>,
    pub logit_sx: Array2<f64>,
    pub log_fx: Array2<f64>,
    pub gx: Option<Array2<f64>>,
}
