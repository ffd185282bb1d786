pub mod action;
pub mod image;
pub mod session;
pub mod upload;
pub mod visitor;
