//! Reference scan / 朴素扫描
//!
//! Compares the pattern at every alignment, O(L·P) worst case.

use super::Collector;

/// Report every occurrence of `pattern` in `text` to `out` / 查找所有匹配
///
/// Resumes one character after a match start when overlapping, otherwise
/// just past the matched span.
pub(crate) fn scan(text: &[u8], pattern: &[u8], allow_overlapping: bool, out: &mut Collector<'_>) {
    let n = text.len();
    let m = pattern.len();

    let mut i = 0;
    while i + m <= n {
        if out.checkpoint().is_break() {
            return;
        }
        if &text[i..i + m] == pattern {
            if out.push(i).is_break() {
                return;
            }
            i += if allow_overlapping { 1 } else { m };
        } else {
            i += 1;
        }
    }
}
