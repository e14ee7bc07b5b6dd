//! Numerical-stability constants shared by every Numal operation and, through
//! it, by collision and navigation. These are load-bearing: changing any of
//! them changes which branch a CCD routine or a colinearity test takes.

/// Squared-length threshold below which a vector is treated as the zero vector.
pub const EPS_LEN2: f32 = 1.0e-12;

/// Length threshold below which a vector is treated as having zero length.
pub const EPS_LEN: f32 = 1.0e-6;

/// Relative epsilon used by [`crate::numal::vec3::nearly_equal`] and friends:
/// `|a-b| <= eps * max(1, |a|, |b|)`.
pub const FLOAT_EQUAL_EPS: f32 = 1.0e-5;

/// Default cosine threshold for [`crate::numal::vec3::nearly_colinear`]
/// (`cos(2.56 deg) ~= 0.999`).
pub const COLINEAR_COS_DEFAULT: f32 = 0.999;

/// Hard clamp applied to every [`crate::numal::transform::Transform`] position
/// component on every setter/translate.
pub const XFORM_POS_MIN: f32 = -99_999.0;
pub const XFORM_POS_MAX: f32 = 99_999.0;
