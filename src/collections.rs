//! Shared collection aliases, grounded on the teacher's `engine/types/zset.rs`
//! (`FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>`).

use rustc_hash::FxHasher;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

pub type FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;
