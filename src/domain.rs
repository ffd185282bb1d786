pub mod entities;
pub mod preflight;
pub mod use_cases;
