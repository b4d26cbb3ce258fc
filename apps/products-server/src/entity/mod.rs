pub mod product;
pub mod vendor;
