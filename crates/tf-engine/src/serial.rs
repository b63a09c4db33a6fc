//! Unique random serial numbers

use std::collections::HashSet;

use rand::Rng;

use tf_core::EngineConfig;

use crate::error::{EngineError, EngineResult};

/// Allocates serial numbers that are unique within one run (case-insensitive).
///
/// Owns the set of issued serials; create one per ticket set.
#[derive(Debug, Clone)]
pub struct SerialNumberAllocator {
    alphabet: Vec<char>,
    length: usize,
    prefix: String,
    /// Lowercased serials already issued
    allocated: HashSet<String>,
    /// Number of distinct serials this shape can produce, `None` if beyond u128
    capacity: Option<u128>,
    max_attempts: u32,
}

impl SerialNumberAllocator {
    pub fn new(config: &EngineConfig, max_attempts: u32) -> Self {
        let alphabet: Vec<char> = config.serial_alphabet.chars().collect();
        let distinct: HashSet<String> = alphabet.iter().map(|c| c.to_lowercase().collect()).collect();
        let capacity = u32::try_from(config.serial_length)
            .ok()
            .and_then(|len| (distinct.len() as u128).checked_pow(len));

        Self {
            alphabet,
            length: config.serial_length,
            prefix: config.serial_prefix.clone(),
            allocated: HashSet::new(),
            capacity,
            max_attempts,
        }
    }

    /// Number of serials issued so far
    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    /// Case-insensitive membership test
    pub fn contains(&self, serial: &str) -> bool {
        self.allocated.contains(&serial.to_lowercase())
    }

    /// Size of the serial space
    pub fn capacity(&self) -> Option<u128> {
        self.capacity
    }

    /// Draw a fresh serial and register it
    pub fn allocate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EngineResult<String> {
        if self.alphabet.is_empty() {
            return Err(EngineError::DegenerateEngine(
                "serial alphabet is empty".into(),
            ));
        }
        if let Some(capacity) = self.capacity {
            if self.allocated.len() as u128 >= capacity {
                return Err(EngineError::SerialSpaceExhausted { capacity });
            }
        }

        for _ in 0..self.max_attempts {
            let mut serial = String::with_capacity(self.prefix.len() + self.length);
            serial.push_str(&self.prefix);
            for _ in 0..self.length {
                serial.push(self.alphabet[rng.random_range(0..self.alphabet.len())]);
            }

            if self.allocated.insert(serial.to_lowercase()) {
                return Ok(serial);
            }
        }

        Err(EngineError::SerialRetryLimit {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(alphabet: &str, length: usize, prefix: &str) -> EngineConfig {
        EngineConfig::default()
            .with_serial_alphabet(alphabet)
            .with_serial_length(length)
            .with_serial_prefix(prefix)
    }

    #[test]
    fn test_shape_of_serial() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut allocator = SerialNumberAllocator::new(&config("XYZ", 6, "B1-"), 1000);

        let serial = allocator.allocate(&mut rng).unwrap();
        assert_eq!(serial.len(), 9);
        assert!(serial.starts_with("B1-"));
        assert!(serial[3..].chars().all(|c| "XYZ".contains(c)));
        assert!(allocator.contains(&serial.to_lowercase()));
        assert_eq!(allocator.len(), 1);
    }

    #[test]
    fn test_fills_whole_space_then_reports_exhaustion() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // 2^5 = 32 serials
        let mut allocator = SerialNumberAllocator::new(&config("AB", 5, ""), 1_000_000);
        assert_eq!(allocator.capacity(), Some(32));

        let mut seen = HashSet::new();
        for _ in 0..32 {
            assert!(seen.insert(allocator.allocate(&mut rng).unwrap()));
        }
        assert!(matches!(
            allocator.allocate(&mut rng),
            Err(EngineError::SerialSpaceExhausted { capacity: 32 })
        ));
    }

    #[test]
    fn test_case_insensitive_space() {
        // "a" and "A" fold to the same character
        let allocator = SerialNumberAllocator::new(&config("aAbB", 5, ""), 10);
        assert_eq!(allocator.capacity(), Some(32));
    }

    #[test]
    fn test_retry_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut allocator = SerialNumberAllocator::new(&config("0123456789", 5, ""), 0);
        assert!(matches!(
            allocator.allocate(&mut rng),
            Err(EngineError::SerialRetryLimit { attempts: 0 })
        ));
    }
}
