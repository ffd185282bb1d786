use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Name of the cookie carrying the admin session.
pub const ADMIN_COOKIE_NAME: &str = "admin_auth";
/// Sentinel value whose possession is the whole session.
pub const ADMIN_COOKIE_VALUE: &str = "authenticated";
/// 7 days.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Login entry point unauthenticated admin requests are redirected to.
pub const LOGIN_PATH: &str = "/admin";

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

pub const DEFAULT_UPLOAD_FOLDER: &str = "anonstreak";
pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";
