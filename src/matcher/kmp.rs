//! Knuth-Morris-Pratt / KMP 算法
//!
//! Builds a failure (longest proper prefix-suffix) table in O(P), then scans
//! in O(L). Overlap handling lives in the scan loop: after a match the state
//! falls back through the failure table when overlapping, or restarts from zero.

use super::Collector;

/// Failure table: `fail[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it / 失败函数表
pub fn failure_table(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut fail = vec![0usize; m];
    let mut k = 0usize;
    for i in 1..m {
        while k > 0 && pattern[k] != pattern[i] {
            k = fail[k - 1];
        }
        if pattern[k] == pattern[i] {
            k += 1;
        }
        fail[i] = k;
    }
    fail
}

pub(crate) fn scan(text: &[u8], pattern: &[u8], allow_overlapping: bool, out: &mut Collector<'_>) {
    let m = pattern.len();
    let fail = failure_table(pattern);

    let mut q = 0usize;
    for (i, &c) in text.iter().enumerate() {
        if out.checkpoint().is_break() {
            return;
        }
        while q > 0 && pattern[q] != c {
            q = fail[q - 1];
        }
        if pattern[q] == c {
            q += 1;
        }
        if q == m {
            if out.push(i + 1 - m).is_break() {
                return;
            }
            // Restarting from zero skips past the whole matched span / 从零开始即跳过整个匹配
            q = if allow_overlapping { fail[m - 1] } else { 0 };
        }
    }
}
