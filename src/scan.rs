use std::ops::Range;

use crate::{
    error::{Error, Result},
    parse::{read_fixed, Fixed},
};

/// One parsed line. `key` borrows straight out of the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    pub value: Fixed,
    pub hash: u64,
}

/// Multiplicative rolling hash over the key bytes. The scanner computes the same thing on the
/// fly while it looks for the `;`, this is for when all we have is the key.
#[inline]
pub fn hash_key(key: &[u8]) -> u64 {
    key.iter().fold(0, |h, &b| step(h, b))
}

#[inline(always)]
fn step(hash: u64, b: u8) -> u64 {
    hash.wrapping_mul(31).wrapping_add(b as u64)
}

/// Walks `bytes[range]` line by line, yielding `(key, value, hash)`.
///
/// The range has to start on a line boundary. The first malformed line yields an error and
/// ends the iteration, nothing after it is looked at.
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(bytes: &'a [u8], range: Range<usize>) -> Self {
        let end = range.end.min(bytes.len());
        Self {
            bytes,
            pos: range.start.min(end),
            end,
            done: false,
        }
    }

    pub fn whole(bytes: &'a [u8]) -> Self {
        Self::new(bytes, 0..bytes.len())
    }

    fn malformed(&mut self, offset: usize) -> Option<Result<Record<'a>>> {
        self.done = true;
        Some(Err(Error::MalformedRecord { offset }))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let bytes: &'a [u8] = self.bytes;
        let bytes = &bytes[..self.end];

        // blank lines and stray carriage returns between records
        while let Some(b'\n' | b'\r') = bytes.get(self.pos) {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            self.done = true;
            return None;
        }

        // hash the key in the same pass that finds the separator
        let start = self.pos;
        let mut hash = 0u64;
        let semicolon = loop {
            match bytes.get(self.pos) {
                Some(b';') => break self.pos,
                Some(b'\n') | None => return self.malformed(start),
                Some(&b) => {
                    hash = step(hash, b);
                    self.pos += 1;
                }
            }
        };

        // the last line of the input is allowed to go without a trailing newline
        let value_start = semicolon + 1;
        let newline = bytes[value_start..]
            .iter()
            .position(|&c| c == b'\n')
            .map_or(bytes.len(), |p| value_start + p);
        let mut value = &bytes[value_start..newline];
        if let [rest @ .., b'\r'] = value {
            value = rest;
        }

        let Some(value) = read_fixed(value) else {
            return self.malformed(start);
        };
        self.pos = newline + 1;

        Some(Ok(Record {
            key: &bytes[start..semicolon],
            value,
            hash,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<(&[u8], Fixed)> {
        Scanner::whole(input)
            .map(|r| r.map(|r| (r.key, r.value)))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_scan_lines() {
        let input = "Gobernador Virasora;4.4\nBālgudar;-57.8\nFormigine;5.2\nTaraz;-43.3\n";
        assert_eq!(
            collect(input.as_bytes()),
            vec![
                ("Gobernador Virasora".as_bytes(), 44),
                ("Bālgudar".as_bytes(), -578),
                ("Formigine".as_bytes(), 52),
                ("Taraz".as_bytes(), -433),
            ]
        );
    }

    #[test]
    fn test_hash_is_fused_into_scan() {
        let input = b"Craig;-3.5\nSt. John's;10.0\n";
        for record in Scanner::whole(input) {
            let record = record.unwrap();
            assert_eq!(record.hash, hash_key(record.key));
        }
        assert_eq!(hash_key(b""), 0);
        assert_eq!(hash_key(b"ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_scan_tolerates_blank_lines_and_crlf() {
        let input = b"\n\r\nOslo;1.0\r\n\nLima;-2.5\n\n";
        assert_eq!(collect(input), vec![(&b"Oslo"[..], 10), (&b"Lima"[..], -25)]);
    }

    #[test]
    fn test_scan_keeps_leading_spaces_in_key() {
        assert_eq!(collect(b" Oslo;1.0\n"), vec![(&b" Oslo"[..], 10)]);
    }

    #[test]
    fn test_scan_unterminated_last_line() {
        assert_eq!(collect(b"A;1.0\nB;2.0"), vec![(&b"A"[..], 10), (&b"B"[..], 20)]);
    }

    #[test]
    fn test_scan_empty_key() {
        assert_eq!(collect(b";1.0\n"), vec![(&b""[..], 10)]);
    }

    #[test]
    fn test_scan_respects_range() {
        let input = b"A;1.0\nB;2.0\nC;3.0\n";
        let got: Vec<_> = Scanner::new(input, 6..12)
            .map(|r| r.unwrap().key)
            .collect();
        assert_eq!(got, vec![&b"B"[..]]);
    }

    #[test]
    fn test_scan_malformed_is_reported_once() {
        let input = b"A;1.0\nno separator here\nB;2.0\n";
        let mut scanner = Scanner::whole(input);
        assert!(scanner.next().unwrap().is_ok());
        assert!(matches!(
            scanner.next(),
            Some(Err(Error::MalformedRecord { offset: 6 }))
        ));
        assert!(scanner.next().is_none());

        let input = b"A;1.0\nB;1.25\n";
        let results: Vec<_> = Scanner::whole(input).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[1], Err(Error::MalformedRecord { offset: 6 })));

        assert!(matches!(
            Scanner::whole(b"A;1.0\nB").nth(1),
            Some(Err(Error::MalformedRecord { offset: 6 }))
        ));
    }
}
