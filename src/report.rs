use std::{fmt, io};

use crate::table::Stats;

/// A tenths value printed with exactly one decimal, e.g. `-5` is `-0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenths(pub i64);

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let v = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, v / 10, v % 10)
    }
}

/// Final statistics for one key. Owns its name, so it outlives the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: Box<[u8]>,
    pub stats: Stats,
}

impl Station {
    pub fn min(&self) -> Tenths {
        Tenths(self.stats.min as i64)
    }

    pub fn mean(&self) -> Tenths {
        Tenths(self.stats.mean())
    }

    pub fn max(&self) -> Tenths {
        Tenths(self.stats.max as i64)
    }
}

/// Every key's statistics, strictly ascending by key bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    stations: Vec<Station>,
}

impl Summary {
    /// Sorts by name. Names have to be unique already.
    pub fn from_unsorted(mut stations: Vec<Station>) -> Self {
        stations.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        debug_assert!(stations.windows(2).all(|w| w[0].name < w[1].name));
        Self { stations }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Total number of records that went into this summary.
    pub fn records(&self) -> u64 {
        self.stations.iter().map(|s| s.stats.count).sum()
    }

    /// `{name=min/mean/max<sep>name=min/mean/max}` and a newline. Names are written as the
    /// raw bytes they were in the input.
    pub fn write_to<W: io::Write>(&self, out: &mut W, separator: &str) -> io::Result<()> {
        out.write_all(b"{")?;
        for (i, station) in self.stations.iter().enumerate() {
            if i > 0 {
                out.write_all(separator.as_bytes())?;
            }
            out.write_all(&station.name)?;
            write!(
                out,
                "={}/{}/{}",
                station.min(),
                station.mean(),
                station.max()
            )?;
        }
        out.write_all(b"}\n")
    }

    /// Same layout as [`Summary::write_to`], with names decoded lossily as UTF-8.
    pub fn display<'s>(&'s self, separator: &'s str) -> Display<'s> {
        Display {
            summary: self,
            separator,
        }
    }

    pub fn render(&self, separator: &str) -> String {
        self.display(separator).to_string()
    }
}

pub struct Display<'s> {
    summary: &'s Summary,
    separator: &'s str,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, station) in self.summary.stations.iter().enumerate() {
            if i > 0 {
                f.write_str(self.separator)?;
            }
            write!(
                f,
                "{}={}/{}/{}",
                String::from_utf8_lossy(&station.name),
                station.min(),
                station.mean(),
                station.max()
            )?;
        }
        f.write_str("}\n")
    }
}
