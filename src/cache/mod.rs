// Cache management module
// Author: kelexine (https://github.com/kelexine)

pub mod store;

pub use store::{make_key, CacheStore, MemoryCache};
