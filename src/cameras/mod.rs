//! Camera side tracing.
pub mod bidirectional;

pub use self::bidirectional::{
    coc_to_pixel_radius, thin_lens_coc, trace_backward_polynomial, trace_backward_thin_lens,
    CocResult, PolynomialTraceOptions
};
