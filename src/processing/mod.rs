pub mod extrema;
pub mod hover;
pub mod spline;
