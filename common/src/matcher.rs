//! アイテム名照合モジュール
//!
//! OCRで得たトークンを参照語彙と編集距離（レーベンシュタイン距離）で比較し、
//! 最も近い既知の名前を返す。
//!
//! ## 照合ルール
//! 1. 空トークンは `InvalidInput` エラー
//! 2. 列名ラベルと一致するトークンは未照合
//! 3. 全候補との距離を計算し最小のものを選ぶ
//! 4. 同距離の場合は辞書順で最小の候補を採用
//! 5. 最小距離が閾値以下なら一致、超えれば未照合

use crate::error::{Error, Result};
use crate::types::ItemName;
use crate::vocabulary::Vocabulary;
use std::borrow::Cow;

/// 照合結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched { name: String, distance: usize },
    Unmatched,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MatchOutcome::Matched { name, .. } => Some(name),
            MatchOutcome::Unmatched => None,
        }
    }

    pub fn distance(&self) -> Option<usize> {
        match self {
            MatchOutcome::Matched { distance, .. } => Some(*distance),
            MatchOutcome::Unmatched => None,
        }
    }

    pub fn into_item_name(self) -> ItemName {
        match self {
            MatchOutcome::Matched { name, .. } => ItemName::Known(name),
            MatchOutcome::Unmatched => ItemName::Unmatched,
        }
    }
}

/// 名前照合器
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    threshold: usize,
    case_insensitive: bool,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self {
            threshold: 5,
            case_insensitive: true,
        }
    }
}

impl NameMatcher {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// 大文字小文字を区別せずに距離を計算する
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// トークンを語彙と照合する
    pub fn match_token(&self, token: &str, vocabulary: &Vocabulary) -> Result<MatchOutcome> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::InvalidInput("空のトークンは照合できません".into()));
        }

        if vocabulary.is_column_label(token) {
            tracing::debug!("列名ラベルのため照合しません: {}", token);
            return Ok(MatchOutcome::Unmatched);
        }

        let outcome = if self.case_insensitive {
            let folded = token.to_lowercase();
            nearest(&folded, vocabulary.names(), self.threshold, |c| {
                Cow::Owned(c.to_lowercase())
            })
        } else {
            nearest(token, vocabulary.names(), self.threshold, Cow::Borrowed)
        };

        match &outcome {
            MatchOutcome::Matched { name, distance } => {
                tracing::debug!("照合: {:?} → {:?} (距離 {})", token, name, distance)
            }
            MatchOutcome::Unmatched => {
                tracing::debug!("照合なし: {:?} (閾値 {})", token, self.threshold)
            }
        }

        Ok(outcome)
    }
}

/// 候補一覧から最も近い文字列を探す
///
/// 語彙を介さずに任意の候補で照合したい場合に使う。大文字小文字は区別する。
pub fn closest_match<'a, I>(token: &str, candidates: I, threshold: usize) -> Result<MatchOutcome>
where
    I: IntoIterator<Item = &'a str>,
{
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::InvalidInput("空のトークンは照合できません".into()));
    }
    Ok(nearest(token, candidates, threshold, Cow::Borrowed))
}

fn nearest<'a, I, F>(token: &str, candidates: I, threshold: usize, fold: F) -> MatchOutcome
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&'a str) -> Cow<'a, str>,
{
    let mut best: Option<(usize, &'a str)> = None;

    for candidate in candidates {
        let distance = levenshtein(token, &fold(candidate));
        let better = match best {
            None => true,
            Some((best_distance, best_name)) => {
                distance < best_distance || (distance == best_distance && candidate < best_name)
            }
        };
        if better {
            best = Some((distance, candidate));
        }
    }

    match best {
        Some((distance, name)) if distance <= threshold => MatchOutcome::Matched {
            name: name.to_string(),
            distance,
        },
        _ => MatchOutcome::Unmatched,
    }
}

/// レーベンシュタイン距離を計算（文字単位）
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // 2行分のテーブルで計算
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
