pub mod compiler;
pub mod derivative;
pub mod derivative1;
pub mod derivative2;
mod elementary;
pub mod error;
pub mod field;
pub mod gradient;
pub mod linalg;
pub mod multi_index;
pub mod structure;
pub mod taylor_map;
mod traits;
pub mod univariate;

#[cfg(feature = "nalgebra")]
pub mod nalgebra_support;

pub use compiler::Compiler;
pub use derivative::Derivative;
pub use derivative1::UnivariateDerivative1;
pub use derivative2::UnivariateDerivative2;
pub use error::{DsError, Result};
pub use field::Field;
pub use gradient::Gradient;
pub use linalg::{LinearDecomposer, LuDecomposer};
pub use multi_index::MultiIndex;
pub use structure::{DerivativeStructure, DsFactory};
pub use taylor_map::TaylorMap;

#[cfg(feature = "nalgebra")]
pub use nalgebra_support::{jacobian_nalgebra, NalgebraLu};

/// Type alias for derivative structures over `f64`.
pub type DerivativeStructure64 = DerivativeStructure<f64>;
/// Type alias for derivative structures over `f32`.
pub type DerivativeStructure32 = DerivativeStructure<f32>;
/// Type alias for gradients over `f64`.
pub type Gradient64 = Gradient<f64>;
/// Type alias for first-order univariate derivatives over `f64`.
pub type UnivariateDerivative1_64 = UnivariateDerivative1<f64>;
/// Type alias for second-order univariate derivatives over `f64`.
pub type UnivariateDerivative2_64 = UnivariateDerivative2<f64>;
/// Type alias for Taylor maps over `f64`.
pub type TaylorMap64 = TaylorMap<f64>;
