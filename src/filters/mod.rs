//! Image space reconstruction filters.
pub mod redistribution;

pub use self::redistribution::{
    compute_importance_weight, compute_redistribution_weight, gaussian_kernel, RedistributionFilter
};
