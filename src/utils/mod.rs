pub mod shift_cache;
