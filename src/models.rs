//! Search result models / 搜索结果模型

use serde::{Deserialize, Serialize};

/// A single exact occurrence of the pattern / 单个匹配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Zero-based offset into the sequence / 匹配起始位置（从0开始）
    pub position: usize,
    /// Up to 10 characters preceding the match / 匹配前的上下文
    pub context_before: String,
    /// Up to 10 characters following the matched span / 匹配后的上下文
    pub context_after: String,
}

/// Result of one search, whichever backend served it / 搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Normalized pattern that was searched / 实际搜索的模式
    pub pattern: String,
    /// Algorithm that actually produced the matches / 实际使用的算法
    pub algorithm_used: String,
    /// Elapsed time of the scan in milliseconds / 搜索耗时（毫秒）
    pub search_time_ms: f64,
    /// Number of collected matches / 匹配数量
    pub total_matches: usize,
    /// Matches in ascending position order / 按位置升序排列的匹配
    pub matches: Vec<Match>,
    /// Collection stopped at the match cap / 是否因上限被截断
    #[serde(default)]
    pub truncated: bool,
}

impl SearchOutcome {
    /// Match positions in order / 匹配位置列表
    pub fn positions(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.position).collect()
    }
}
