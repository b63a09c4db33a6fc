//! Field assignment — winning and losing hands by rejection sampling

use std::collections::{HashMap, HashSet};

use rand::Rng;

use tf_core::EngineConfig;

use crate::error::{EngineError, EngineResult};

/// One field during construction. The key only decides the final position;
/// win detection looks at `value` alone.
#[derive(Debug, Clone, Copy)]
struct FieldSlot<'a> {
    order: u32,
    value: &'a str,
}

/// Partially built hand with per-value occurrence counts
struct Hand<'a> {
    slots: Vec<FieldSlot<'a>>,
    counts: HashMap<&'a str, usize>,
}

impl<'a> Hand<'a> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            counts: HashMap::new(),
        }
    }

    fn push(&mut self, order: u32, value: &'a str) {
        self.slots.push(FieldSlot { order, value });
        *self.counts.entry(value).or_insert(0) += 1;
    }

    fn pop(&mut self) {
        if let Some(slot) = self.slots.pop() {
            if let Some(count) = self.counts.get_mut(slot.value) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(slot.value);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct values that reach the threshold
    fn winning_groups(&self, threshold: usize) -> usize {
        self.counts.values().filter(|&&n| n >= threshold).count()
    }

    fn into_fields(mut self) -> Vec<String> {
        self.slots.sort_by_key(|slot| slot.order);
        self.slots.into_iter().map(|slot| slot.value.to_string()).collect()
    }
}

/// Builds one ticket's field list for a given win rule
#[derive(Debug, Clone)]
pub struct FieldAssignmentEngine {
    field_count: usize,
    fields_to_win: usize,
    max_rejections: u32,
}

impl FieldAssignmentEngine {
    /// `fields_to_win` is clamped to `field_count`
    pub fn new(config: &EngineConfig, max_rejections: u32) -> Self {
        Self {
            field_count: config.field_count,
            fields_to_win: config.fields_to_win.min(config.field_count),
            max_rejections,
        }
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn fields_to_win(&self) -> usize {
        self.fields_to_win
    }

    /// Check that `pool` can complete a hand for `designated` at all.
    ///
    /// Every value other than the designated winner may appear at most
    /// `fields_to_win - 1` times, so the distinct usable values must cover the filler.
    pub fn check_feasible(&self, designated: Option<&str>, pool: &[String]) -> EngineResult<()> {
        if pool.is_empty() {
            return Err(EngineError::DegenerateEngine("prize pool is empty".into()));
        }

        let distinct: HashSet<&str> = pool
            .iter()
            .map(String::as_str)
            .filter(|value| Some(*value) != designated)
            .collect();
        let per_value = self.fields_to_win.saturating_sub(1);
        let needed = match designated {
            Some(_) => self.field_count.saturating_sub(self.fields_to_win),
            None => self.field_count,
        };

        if needed > 0 && distinct.len() * per_value < needed {
            let subject = match designated {
                Some(prize) => format!("winning ticket for {:?}", prize),
                None => "non-winning ticket".to_string(),
            };
            return Err(EngineError::DegenerateEngine(format!(
                "{} needs {} filler fields but only {} distinct prize(s) may fill them \
                 (at most {} each)",
                subject,
                needed,
                distinct.len(),
                per_value
            )));
        }
        Ok(())
    }

    /// Produce `field_count` values: a winning hand for `designated`, or a
    /// losing hand when `designated` is `None`.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        designated: Option<&str>,
        pool: &[String],
        rng: &mut R,
    ) -> EngineResult<Vec<String>> {
        self.check_feasible(designated, pool)?;

        let mut hand = Hand::with_capacity(self.field_count);
        if let Some(prize) = designated {
            for _ in 0..self.fields_to_win {
                hand.push(rng.random(), prize);
            }
        }

        let mut rejections = 0u32;
        while hand.len() < self.field_count {
            let value = pool[rng.random_range(0..pool.len())].as_str();
            let order = rng.random();

            let accepted = if Some(value) == designated {
                false
            } else {
                hand.push(order, value);
                let groups = hand.winning_groups(self.fields_to_win);
                let ok = match designated {
                    Some(_) => groups <= 1,
                    None => groups == 0,
                };
                if !ok {
                    hand.pop();
                }
                ok
            };

            if !accepted {
                rejections += 1;
                if rejections > self.max_rejections {
                    return Err(EngineError::FieldRetryLimit {
                        ticket: designated.map_or_else(
                            || "non-winning ticket".to_string(),
                            |p| format!("winning ticket for {:?}", p),
                        ),
                        rejections,
                    });
                }
            }
        }

        Ok(hand.into_fields())
    }
}
