//! FIR high-pass design and application.
//!
//! - [`design`]: Hamming-windowed sinc high-pass design.
//! - [`apply`]: overlap-add zero-phase convolution over `[T, N]` columns.

pub mod apply;
pub mod design;

pub use design::{auto_trans_bandwidth, auto_filter_length, design_highpass, firwin, hamming};
pub use apply::{apply_fir_zero_phase, filter_1d};
