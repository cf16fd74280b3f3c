mod hash_int_key;
pub use hash_int_key::hash_int_key;

mod hash_str_key;
pub use hash_str_key::hash_str_key;
