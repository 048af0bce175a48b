use crate::{
    error::{Error, Result},
    parse::Fixed,
    report::{Station, Summary},
    scan::hash_key,
};

pub const DEFAULT_CAPACITY: usize = 16384;

/// Running min/max/sum/count for one key. Only ever built from a first observation, so
/// `count >= 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub min: Fixed,
    pub max: Fixed,
    pub sum: i64,
    pub count: u64,
}

impl Stats {
    #[inline]
    pub fn new(value: Fixed) -> Self {
        Self {
            min: value,
            max: value,
            sum: value as i64,
            count: 1,
        }
    }

    #[inline]
    pub fn insert(&mut self, value: Fixed) {
        self.count += 1;
        self.sum += value as i64;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[inline]
    pub fn merge(&mut self, other: &Stats) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Mean in tenths, rounded half away from zero.
    pub fn mean(&self) -> i64 {
        let count = self.count as i64;
        let half = count / 2;
        if self.sum < 0 {
            (self.sum - half) / count
        } else {
            (self.sum + half) / count
        }
    }
}

#[derive(Debug)]
struct Entry<'a> {
    key: &'a [u8],
    stats: Stats,
}

enum Slot {
    Vacant(usize),
    Occupied(usize),
}

/// Fixed-capacity open-addressing table with linear probing, keyed by slices of the input.
///
/// A slot is `None` until a key lands in it, so the empty key is a perfectly good key. Keys
/// compare by content, which is what lets two tables built from different parts of the
/// buffer be merged. The table never grows: once every slot is taken, a new key is a
/// [`Error::TableFull`].
pub struct AggTable<'a> {
    slots: Box<[Option<Entry<'a>>]>,
    len: usize,
}

impl<'a> AggTable<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            len: 0,
        }
    }

    /// Number of distinct keys.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    // the one place collisions get resolved. bounded by the capacity, so a full table can't
    // send us round in circles.
    #[inline]
    fn probe(&self, key: &[u8], hash: u64) -> Result<Slot> {
        let capacity = self.slots.len();
        for step in 0..capacity {
            let idx = ((hash % capacity as u64) as usize + step) % capacity;
            match &self.slots[idx] {
                None => return Ok(Slot::Vacant(idx)),
                Some(entry) if entry.key == key => return Ok(Slot::Occupied(idx)),
                Some(_) => {}
            }
        }
        Err(Error::TableFull { capacity })
    }

    /// Fold one measurement into the key's stats. `hash` must be [`hash_key`] of `key`.
    #[inline]
    pub fn upsert(&mut self, key: &'a [u8], hash: u64, value: Fixed) -> Result<()> {
        match self.probe(key, hash)? {
            Slot::Occupied(idx) => {
                if let Some(entry) = &mut self.slots[idx] {
                    entry.stats.insert(value);
                }
            }
            Slot::Vacant(idx) => {
                self.slots[idx] = Some(Entry {
                    key,
                    stats: Stats::new(value),
                });
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Fold already-aggregated stats for `key` into this table.
    pub fn merge_stats(&mut self, key: &'a [u8], hash: u64, stats: Stats) -> Result<()> {
        match self.probe(key, hash)? {
            Slot::Occupied(idx) => {
                if let Some(entry) = &mut self.slots[idx] {
                    entry.stats.merge(&stats);
                }
            }
            Slot::Vacant(idx) => {
                self.slots[idx] = Some(Entry { key, stats });
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Move every entry of `other` into `self`. Hashes are recomputed from the key bytes, so
    /// the two tables don't need the same capacity.
    pub fn merge(&mut self, other: AggTable<'a>) -> Result<()> {
        for Entry { key, stats } in other.slots.into_vec().into_iter().flatten() {
            self.merge_stats(key, hash_key(key), stats)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = (&'a [u8], &Stats)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (entry.key, &entry.stats))
    }

    /// Copy the keys out of the buffer and sort by key bytes. Slot order depends on hashing
    /// and on how the input was split, the sort is what makes the output deterministic.
    pub fn into_summary(self) -> Summary {
        let stations = self
            .slots
            .into_vec()
            .into_iter()
            .flatten()
            .map(|Entry { key, stats }| Station {
                name: key.into(),
                stats,
            })
            .collect();
        Summary::from_unsorted(stations)
    }
}
