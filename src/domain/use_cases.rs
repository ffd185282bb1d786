pub mod extractors;
pub mod gallery;
pub mod session;
pub mod visitors;
