//! Whitelisted `math.*` functions
//!
//! Names and semantics follow the usual C/Go math library; every function
//! maps `f64` to `f64` and lets IEEE special values propagate.

use std::fmt;

/// Namespace every call must be qualified with
pub const NAMESPACE: &str = "math";

/// A whitelisted function of one argument
#[derive(Clone, Copy)]
pub struct UnaryFunction {
    name: &'static str,
    apply: fn(f64) -> f64,
}

/// A whitelisted function of two arguments
#[derive(Clone, Copy)]
pub struct BinaryFunction {
    name: &'static str,
    apply: fn(f64, f64) -> f64,
}

const UNARY_FUNCTIONS: &[UnaryFunction] = &[
    UnaryFunction::new("Abs", f64::abs),
    UnaryFunction::new("Acos", f64::acos),
    UnaryFunction::new("Acosh", f64::acosh),
    UnaryFunction::new("Asin", f64::asin),
    UnaryFunction::new("Asinh", f64::asinh),
    UnaryFunction::new("Atan", f64::atan),
    UnaryFunction::new("Atanh", f64::atanh),
    UnaryFunction::new("Cbrt", f64::cbrt),
    UnaryFunction::new("Ceil", f64::ceil),
    UnaryFunction::new("Cos", f64::cos),
    UnaryFunction::new("Cosh", f64::cosh),
    UnaryFunction::new("Erf", libm::erf),
    UnaryFunction::new("Erfc", libm::erfc),
    UnaryFunction::new("Exp", f64::exp),
    UnaryFunction::new("Exp2", f64::exp2),
    UnaryFunction::new("Expm1", f64::exp_m1),
    UnaryFunction::new("Floor", f64::floor),
    UnaryFunction::new("Gamma", libm::tgamma),
    UnaryFunction::new("J0", libm::j0),
    UnaryFunction::new("J1", libm::j1),
    UnaryFunction::new("Log", f64::ln),
    UnaryFunction::new("Log10", f64::log10),
    UnaryFunction::new("Log1p", f64::ln_1p),
    UnaryFunction::new("Log2", f64::log2),
    UnaryFunction::new("Logb", logb),
    UnaryFunction::new("Sin", f64::sin),
    UnaryFunction::new("Sinh", f64::sinh),
    UnaryFunction::new("Sqrt", f64::sqrt),
    UnaryFunction::new("Tan", f64::tan),
    UnaryFunction::new("Tanh", f64::tanh),
    UnaryFunction::new("Trunc", f64::trunc),
    UnaryFunction::new("Y0", libm::y0),
    UnaryFunction::new("Y1", libm::y1),
];

const BINARY_FUNCTIONS: &[BinaryFunction] = &[
    BinaryFunction::new("Atan2", f64::atan2),
    BinaryFunction::new("Copysign", f64::copysign),
    BinaryFunction::new("Dim", libm::fdim),
    BinaryFunction::new("Hypot", f64::hypot),
    BinaryFunction::new("Max", max),
    BinaryFunction::new("Min", min),
    BinaryFunction::new("Mod", libm::fmod),
    BinaryFunction::new("Nextafter", libm::nextafter),
    BinaryFunction::new("Pow", f64::powf),
    BinaryFunction::new("Remainder", libm::remainder),
];

impl UnaryFunction {
    const fn new(name: &'static str, apply: fn(f64) -> f64) -> Self {
        Self { name, apply }
    }

    /// Look up `name` (without namespace) in the unary whitelist
    pub fn lookup(name: &str) -> Option<Self> {
        UNARY_FUNCTIONS.iter().find(|f| f.name == name).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        (self.apply)(x)
    }
}

impl BinaryFunction {
    const fn new(name: &'static str, apply: fn(f64, f64) -> f64) -> Self {
        Self { name, apply }
    }

    /// Look up `name` (without namespace) in the binary whitelist
    pub fn lookup(name: &str) -> Option<Self> {
        BINARY_FUNCTIONS.iter().find(|f| f.name == name).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> f64 {
        (self.apply)(x, y)
    }
}

// Identity is the name; the function pointer carries no extra meaning.
impl PartialEq for UnaryFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl PartialEq for BinaryFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", NAMESPACE, self.name)
    }
}

impl fmt::Debug for BinaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", NAMESPACE, self.name)
    }
}

/// Binary exponent of `x`
fn logb(x: f64) -> f64 {
    if x == 0.0 {
        f64::NEG_INFINITY
    } else if x.is_infinite() {
        f64::INFINITY
    } else if x.is_nan() {
        x
    } else {
        f64::from(libm::ilogb(x))
    }
}

// NaN-propagating, unlike f64::max / f64::min.
fn max(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        f64::NAN
    } else if x == 0.0 && y == 0.0 {
        if x.is_sign_negative() {
            y
        } else {
            x
        }
    } else {
        x.max(y)
    }
}

fn min(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        f64::NAN
    } else if x == 0.0 && y == 0.0 {
        if x.is_sign_negative() {
            x
        } else {
            y
        }
    } else {
        x.min(y)
    }
}
