use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::{
    error::Result,
    report::{Station, Summary},
    scan::Scanner,
    table::Stats,
};

pub type AggMap<'a> = FxHashMap<&'a [u8], Stats>;

/// The plain version: one thread, one general-purpose hash map. Same scanner and parser as the
/// fast paths, so it disagrees with them only if the table or the merge is wrong.
pub fn aggregate(bytes: &[u8]) -> Result<Summary> {
    let mut totals = AggMap::default();
    process_chunk(bytes, &mut totals)?;
    Ok(Summary::from_unsorted(
        totals
            .into_iter()
            .map(|(name, stats)| Station {
                name: name.into(),
                stats,
            })
            .collect(),
    ))
}

pub fn process_chunk<'a>(chunk: &'a [u8], totals: &mut AggMap<'a>) -> Result<()> {
    for record in Scanner::whole(chunk) {
        let record = record?;
        // the entry API lets us insert-or-update and only hash the key once
        match totals.entry(record.key) {
            Entry::Occupied(entry) => entry.into_mut().insert(record.value),
            Entry::Vacant(entry) => {
                entry.insert(Stats::new(record.value));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_process_chunk() {
        let input = "Gobernador Virasora;4.4\nBālgudar;-57.8\nFormigine;5.2\nTaraz;-43.3\nTaraz;1.3\n";
        let mut out = AggMap::default();
        process_chunk(input.as_bytes(), &mut out).unwrap();

        let mut v = out.into_iter().collect::<Vec<_>>();
        v.sort_by_key(|x| x.0);
        assert_eq!(
            v,
            vec![
                ("Bālgudar".as_bytes(), Stats::new(-578)),
                ("Formigine".as_bytes(), Stats::new(52)),
                ("Gobernador Virasora".as_bytes(), Stats::new(44)),
                (
                    "Taraz".as_bytes(),
                    Stats {
                        min: -433,
                        max: 13,
                        sum: -420,
                        count: 2
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_aggregate_end_to_end() {
        let input = b"Paris;12.3\nLondon;9.8\nParis;15.1\nLondon;9.8\n";
        assert_eq!(
            aggregate(input).unwrap().render(","),
            "{London=9.8/9.8/9.8,Paris=12.3/13.7/15.1}\n"
        );
    }

    #[test]
    fn test_aggregate_malformed() {
        assert!(matches!(
            aggregate(b"Paris;12.3\nLondon 9.8\n"),
            Err(Error::MalformedRecord { offset: 11 })
        ));
    }
}
