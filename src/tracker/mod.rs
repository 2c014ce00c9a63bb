pub mod smooth;

pub use smooth::Smoother;
