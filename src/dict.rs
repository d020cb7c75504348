use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Bucket count for dict literals and objects.
pub const DEFAULT_BUCKETS: usize = 16;
/// Bucket count for the builtin namespaces and the `timing()` result.
pub const SMALL_BUCKETS: usize = 8;

pub type SharedDict = Rc<RefCell<Dict>>;

/// String-keyed map with djb2 hashing and chained buckets. The bucket count
/// is fixed when the map is created and never changes.
#[derive(Debug, Clone)]
pub struct Dict {
    buckets: Vec<Vec<(String, Value)>>,
    count: usize,
}

pub fn djb2(key: &str) -> u64 {
    // Bytes are sign-extended, as C's `char` is on the platforms Tess targets.
    key.bytes().fold(5381u64, |hash, c| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(c as i8 as i64 as u64)
    })
}

impl Default for Dict {
    fn default() -> Self {
        Dict::with_buckets(DEFAULT_BUCKETS)
    }
}

impl Dict {
    pub fn new() -> Dict {
        Dict::default()
    }
    pub fn with_buckets(bucket_count: usize) -> Dict {
        Dict {
            buckets: vec![Vec::new(); bucket_count.max(1)],
            count: 0,
        }
    }
    pub fn shared(self) -> SharedDict {
        Rc::new(RefCell::new(self))
    }
    fn bucket(&self, key: &str) -> usize {
        (djb2(key) % self.buckets.len() as u64) as usize
    }
    /// Replaces the value of an existing key in place; otherwise chains a new
    /// entry in front of the bucket's older ones.
    pub fn insert(&mut self, key: &str, value: Value) {
        let index = self.bucket(key);
        let bucket = &mut self.buckets[index];
        match bucket.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => {
                bucket.push((key.to_string(), value));
                self.count += 1;
            }
        }
    }
    pub fn get(&self, key: &str) -> Option<Value> {
        self.buckets[self.bucket(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
    #[cfg(test)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets[self.bucket(key)].iter().any(|(k, _)| k == key)
    }
    pub fn len(&self) -> usize {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    #[cfg(test)]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
    /// Entries in bucket order, newest first within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().rev().map(|(k, v)| (k, v)))
    }
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }
    pub fn values(&self) -> Vec<Value> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}
