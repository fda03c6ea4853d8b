//! Matcher - exact pattern search over nucleotide sequences / 精确模式匹配
//!
//! Architecture principle: algorithms only report positions, the shared
//! [`Collector`] owns the match cap and cancellation / 架构原则
//! - naive: reference scan, O(L·P) worst case / 朴素扫描
//! - kmp: Knuth-Morris-Pratt with failure function, O(L+P) / KMP
//! - horspool: Boyer-Moore-Horspool bad-character shifts, sublinear on average / Horspool
//!
//! All three report identical position sets for identical input.

pub mod horspool;
pub mod kmp;
pub mod naive;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SearchError;
use crate::models::Match;

/// Characters of context on each side of a match / 匹配两侧的上下文长度
pub const CONTEXT_WINDOW: usize = 10;

/// Default cap on collected matches / 默认匹配数上限
pub const DEFAULT_MAX_MATCHES: usize = 100_000;

/// Scan steps between two cancel-flag reads / 取消标志检查间隔
const CANCEL_CHECK_INTERVAL: usize = 1 << 16;

/// Local matching algorithm / 本地匹配算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Reference scan (default) / 朴素扫描（默认）
    #[default]
    Naive,
    /// Knuth-Morris-Pratt / KMP
    Kmp,
    /// Boyer-Moore-Horspool / Horspool
    Horspool,
}

impl Algorithm {
    /// Short name used in configuration / 配置中的名称
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Kmp => "kmp",
            Algorithm::Horspool => "horspool",
        }
    }

    /// Label reported in `SearchOutcome::algorithm_used` / 结果中的算法标签
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Naive => "naive-local",
            Algorithm::Kmp => "kmp-local",
            Algorithm::Horspool => "horspool-local",
        }
    }

    fn scan(&self, text: &[u8], pattern: &[u8], allow_overlapping: bool, out: &mut Collector<'_>) {
        if pattern.is_empty() || pattern.len() > text.len() {
            return;
        }
        match self {
            Algorithm::Naive => naive::scan(text, pattern, allow_overlapping, out),
            Algorithm::Kmp => kmp::scan(text, pattern, allow_overlapping, out),
            Algorithm::Horspool => horspool::scan(text, pattern, allow_overlapping, out),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives positions from an algorithm scan / 收集扫描结果
///
/// Owns the match cap and the cancel flag so every algorithm stops the same way.
pub struct Collector<'a> {
    positions: Vec<usize>,
    limit: Option<usize>,
    cancel: Option<&'a AtomicBool>,
    steps: usize,
    truncated: bool,
    cancelled: bool,
}

impl<'a> Collector<'a> {
    fn new(limit: Option<usize>, cancel: Option<&'a AtomicBool>) -> Self {
        Self {
            positions: Vec::new(),
            limit,
            cancel,
            steps: 0,
            truncated: false,
            cancelled: false,
        }
    }

    /// Record a match; `Break` once the cap is exceeded / 记录匹配
    pub fn push(&mut self, position: usize) -> ControlFlow<()> {
        if let Some(limit) = self.limit {
            if self.positions.len() >= limit {
                self.truncated = true;
                return ControlFlow::Break(());
            }
        }
        self.positions.push(position);
        ControlFlow::Continue(())
    }

    /// Called once per scan step; `Break` once cancelled / 每步调用，检查取消
    pub fn checkpoint(&mut self) -> ControlFlow<()> {
        self.steps += 1;
        if self.steps % CANCEL_CHECK_INTERVAL == 0 {
            if let Some(flag) = self.cancel {
                if flag.load(Ordering::Relaxed) {
                    self.cancelled = true;
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }
}

/// Matches produced by one scan / 单次扫描结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchList {
    pub matches: Vec<Match>,
    pub truncated: bool,
}

/// In-process matcher: an algorithm plus a match cap / 本地匹配器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    algorithm: Algorithm,
    max_matches: Option<usize>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl Matcher {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            max_matches: Some(DEFAULT_MAX_MATCHES),
        }
    }

    /// Set the match cap, `None` for unbounded / 设置匹配上限
    pub fn with_max_matches(mut self, max_matches: Option<usize>) -> Self {
        self.max_matches = max_matches;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn max_matches(&self) -> Option<usize> {
        self.max_matches
    }

    pub fn label(&self) -> &'static str {
        self.algorithm.label()
    }

    /// Positions only, plus whether the cap truncated them / 仅返回位置
    pub fn positions(&self, sequence: &[u8], pattern: &[u8], allow_overlapping: bool) -> (Vec<usize>, bool) {
        let collector = self.collect(sequence, pattern, allow_overlapping, None);
        (collector.positions, collector.truncated)
    }

    /// Find every occurrence with context / 查找所有匹配
    pub fn find(&self, sequence: &str, pattern: &str, allow_overlapping: bool) -> MatchList {
        let collector = self.collect(sequence.as_bytes(), pattern.as_bytes(), allow_overlapping, None);
        build_list(sequence.as_bytes(), pattern.len(), collector)
    }

    /// Like [`Matcher::find`], abandoning the scan once `cancel` is set / 可取消的查找
    pub fn find_cancellable(
        &self,
        sequence: &str,
        pattern: &str,
        allow_overlapping: bool,
        cancel: &AtomicBool,
    ) -> Result<MatchList, SearchError> {
        if cancel.load(Ordering::Relaxed) {
            return Err(SearchError::Cancelled);
        }
        let collector = self.collect(sequence.as_bytes(), pattern.as_bytes(), allow_overlapping, Some(cancel));
        if collector.cancelled {
            return Err(SearchError::Cancelled);
        }
        Ok(build_list(sequence.as_bytes(), pattern.len(), collector))
    }

    fn collect<'a>(
        &self,
        sequence: &[u8],
        pattern: &[u8],
        allow_overlapping: bool,
        cancel: Option<&'a AtomicBool>,
    ) -> Collector<'a> {
        let mut collector = Collector::new(self.max_matches, cancel);
        self.algorithm.scan(sequence, pattern, allow_overlapping, &mut collector);
        collector
    }
}

fn build_list(sequence: &[u8], pattern_len: usize, collector: Collector<'_>) -> MatchList {
    let matches = collector
        .positions
        .iter()
        .map(|&pos| build_match(sequence, pos, pattern_len))
        .collect();
    MatchList {
        matches,
        truncated: collector.truncated,
    }
}

/// Build a match with up to [`CONTEXT_WINDOW`] characters on each side / 构造带上下文的匹配
pub fn build_match(sequence: &[u8], position: usize, pattern_len: usize) -> Match {
    let end = (position + pattern_len).min(sequence.len());
    let before_start = position.saturating_sub(CONTEXT_WINDOW);
    let after_end = (end + CONTEXT_WINDOW).min(sequence.len());
    Match {
        position,
        context_before: String::from_utf8_lossy(&sequence[before_start..position]).into_owned(),
        context_after: String::from_utf8_lossy(&sequence[end..after_end]).into_owned(),
    }
}
