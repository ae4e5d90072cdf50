//! Parsing and validation of reranker output.

use std::collections::HashSet;

use serde_json::Value;

use super::error::{RerankError, RerankResult};
use crate::retrieval::CandidateResult;

/// Parses a bare ordered list of ids.
///
/// Accepts a JSON array of strings or numbers, or a bracketed comma list of unquoted ids
/// (`[P1, P2]`). Any surrounding text, markdown fence or nested value is rejected.
pub fn parse_ranking(output: &str) -> RerankResult<Vec<String>> {
    let trimmed = output.trim();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Err(RerankError::Parse {
            reason: format!("expected a bracketed list, got {:?}", preview(trimmed)),
        });
    };

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
        return items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(RerankError::Parse {
                    reason: format!("unexpected list element {}", other),
                }),
            })
            .collect();
    }

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|token| {
            let id = token.trim().trim_matches(|c| c == '"' || c == '\'');
            if id.is_empty() || id.contains(['[', ']', '{', '}', '\n']) {
                Err(RerankError::Parse {
                    reason: format!("invalid id token {:?}", preview(token)),
                })
            } else {
                Ok(id.to_string())
            }
        })
        .collect()
}

/// Checks that `ranked` holds exactly the candidate ids, each once.
pub fn ensure_permutation(ranked: &[String], candidates: &[CandidateResult]) -> RerankResult<()> {
    if ranked.len() != candidates.len() {
        return Err(RerankError::NotPermutation {
            reason: format!("expected {} ids, got {}", candidates.len(), ranked.len()),
        });
    }

    let expected: HashSet<&str> = candidates.iter().map(|c| c.product_id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(ranked.len());
    for id in ranked {
        if !expected.contains(id.as_str()) {
            return Err(RerankError::NotPermutation {
                reason: format!("unknown id {:?}", id),
            });
        }
        if !seen.insert(id.as_str()) {
            return Err(RerankError::NotPermutation {
                reason: format!("duplicate id {:?}", id),
            });
        }
    }
    Ok(())
}

fn preview(s: &str) -> String {
    s.chars().take(80).collect()
}
