//! Numeric aliases shared by the minimizer layer.
//!
//! `Theta` is the flat weight vector of a log-linear model (entry
//! `f * num_classes + c` is the weight of feature `f` for class `c`), and
//! `Cost` is the value being minimized: a negative log-likelihood plus the
//! prior penalty. The solver aliases pin argmin's generics to these shapes.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

pub type Theta = Array1<f64>;

/// Same shape as [`Theta`].
pub type Grad = Array1<f64>;

pub type Cost = f64;

/// argmin's evaluation counters (`"cost_count"`, `"gradient_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when `MinimizerOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 15;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS over [`Theta`] with line search `LS`.
pub type Lbfgs<LS> = LBFGS<LS, Theta, Grad, Cost>;
