/// A measurement in tenths, so `-12.3` is `-123`.
pub type Fixed = i16;

// welcome to the janky custom float-to-integer parser!
//
// this only works if numbers are formatted exactly like `[-]d.d` or `[-]dd.d`, i.e. a value
// between -99.9 and 99.9 with exactly one decimal place. anything else gives back `None` so the
// caller can decide what a bad line means.
#[inline]
pub fn read_fixed(s: &[u8]) -> Option<Fixed> {
    let (sign, digits) = match s {
        [b'-', t @ ..] => (-1, t),
        t => (1, t),
    };
    read_unsigned(digits).map(|v| sign * v)
}

#[inline]
fn read_unsigned(s: &[u8]) -> Option<Fixed> {
    // the shape is picked by where the '.' sits, there's no scanning for it
    match *s {
        [u, b'.', d] => Some(digit(u)? * 10 + digit(d)?),
        [t, u, b'.', d] => Some(digit(t)? * 100 + digit(u)? * 10 + digit(d)?),
        _ => None,
    }
}

#[inline]
fn digit(c: u8) -> Option<Fixed> {
    c.is_ascii_digit().then(|| (c - b'0') as Fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed() {
        assert_eq!(read_fixed(b"5.3"), Some(53));
        assert_eq!(read_fixed(b"-5.3"), Some(-53));
        assert_eq!(read_fixed(b"12.0"), Some(120));
        assert_eq!(read_fixed(b"-0.1"), Some(-1));
        assert_eq!(read_fixed(b"-98.7"), Some(-987));
        assert_eq!(read_fixed(b"99.9"), Some(999));
        assert_eq!(read_fixed(b"0.0"), Some(0));
        assert_eq!(read_fixed(b"-0.0"), Some(0));
    }

    #[test]
    fn test_read_fixed_rejects_other_shapes() {
        assert_eq!(read_fixed(b""), None);
        assert_eq!(read_fixed(b"-"), None);
        assert_eq!(read_fixed(b"5"), None);
        assert_eq!(read_fixed(b"5.33"), None);
        assert_eq!(read_fixed(b"123.4"), None);
        assert_eq!(read_fixed(b"1,5"), None);
        assert_eq!(read_fixed(b"a.1"), None);
        assert_eq!(read_fixed(b"--1.0"), None);
        assert_eq!(read_fixed(b"+1.0"), None);
    }

    #[test]
    fn test_fixed_mean_matches_float_mean() {
        let values = ["12.3", "-4.5", "7.7", "0.1", "-0.1", "33.3"];
        let fixed_sum: i64 = values
            .iter()
            .map(|v| read_fixed(v.as_bytes()).unwrap() as i64)
            .sum();
        let float_sum: f64 = values.iter().map(|v| v.parse::<f64>().unwrap()).sum();
        let n = values.len() as f64;
        assert_eq!(
            format!("{:.1}", fixed_sum as f64 / 10. / n),
            format!("{:.1}", float_sum / n)
        );
    }
}
