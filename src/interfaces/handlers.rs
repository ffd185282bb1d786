pub mod admin;
pub mod cache;
pub mod home;
pub mod images;
pub mod session;
pub mod system;
pub mod uploads;
