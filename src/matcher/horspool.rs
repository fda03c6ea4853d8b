//! Boyer-Moore-Horspool / Horspool 算法
//!
//! Bad-character shift table keyed on the last character of each window.
//! Average case O(L/P), worst case O(L·P).

use super::Collector;

/// Shift for each byte value; defaults to the pattern length / 坏字符位移表
fn shift_table(pattern: &[u8]) -> [usize; 256] {
    let m = pattern.len();
    let mut shift = [m; 256];
    for (i, &c) in pattern[..m - 1].iter().enumerate() {
        shift[c as usize] = m - 1 - i;
    }
    shift
}

pub(crate) fn scan(text: &[u8], pattern: &[u8], allow_overlapping: bool, out: &mut Collector<'_>) {
    let n = text.len();
    let m = pattern.len();
    let shift = shift_table(pattern);

    let mut i = 0;
    while i + m <= n {
        if out.checkpoint().is_break() {
            return;
        }
        // Compare right to left, the last character is the most selective / 从右向左比较
        if text[i..i + m].iter().rev().eq(pattern.iter().rev()) {
            if out.push(i).is_break() {
                return;
            }
            if !allow_overlapping {
                i += m;
                continue;
            }
        }
        i += shift[text[i + m - 1] as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{Algorithm, Matcher};

    #[test]
    fn test_shift_table() {
        let shift = shift_table(b"ATCG");
        assert_eq!(shift[b'A' as usize], 3);
        assert_eq!(shift[b'T' as usize], 2);
        assert_eq!(shift[b'C' as usize], 1);
        // Last character only counts if it also occurs earlier / 末字符不计入
        assert_eq!(shift[b'G' as usize], 4);
        assert_eq!(shift[b'N' as usize], 4);
    }

    #[test]
    fn test_horspool_scan() {
        let matcher = Matcher::new(Algorithm::Horspool);
        assert_eq!(matcher.positions(b"AAAA", b"AA", true).0, vec![0, 1, 2]);
        assert_eq!(matcher.positions(b"AAAA", b"AA", false).0, vec![0, 2]);
        assert_eq!(matcher.positions(b"GGATCGGATCG", b"ATCG", true).0, vec![2, 7]);
        assert_eq!(matcher.positions(b"A", b"A", true).0, vec![0]);
    }
}
