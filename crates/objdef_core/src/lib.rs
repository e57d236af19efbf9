//! Public library API for describing and manipulating dynamically typed values.

/// Type descriptors, runtime values, field paths and the evaluation protocol.
pub mod calc;
