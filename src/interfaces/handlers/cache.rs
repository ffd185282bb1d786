use actix_web::http::header::{CacheControl, CacheDirective};

/// Listings are always read fresh from the store.
pub fn no_store() -> CacheControl {
    CacheControl(vec![CacheDirective::NoStore])
}
