//! Token counting for stats display
//!
//! The result object always reports the fixed ceil(chars / 4) heuristic;
//! a precise count via tiktoken (cl100k_base or o200k_base) is available
//! for the CLI stats line.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Supported token models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// The fixed chars/4 heuristic (what results report)
    #[default]
    Approx,
    /// cl100k_base encoding (GPT-4, Claude 3)
    Cl100k,
    /// o200k_base encoding (GPT-4o native)
    O200k,
}

impl TokenModel {
    fn get_bpe(&self) -> Option<&'static CoreBPE> {
        match self {
            TokenModel::Approx => None,
            TokenModel::Cl100k => CL100K_BPE.as_ref().ok(),
            TokenModel::O200k => O200K_BPE.as_ref().ok(),
        }
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Approx => "approx",
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approx" | "heuristic" | "default" => Ok(TokenModel::Approx),
            "cl100k" | "cl100k_base" | "gpt4" | "claude" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" | "gpt4o" => Ok(TokenModel::O200k),
            _ => Err(format!(
                "Unknown token model: {}. Available: approx, cl100k, o200k",
                s
            )),
        }
    }
}

// Lazy-initialized BPE encodings (loaded once on first use)
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

/// The fixed heuristic: ceil(scalar-value count / 4)
pub fn approx_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Count tokens with the selected model, falling back to the heuristic
/// when the encoding is unavailable
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }

    match model.get_bpe() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => approx_tokens(text),
    }
}
