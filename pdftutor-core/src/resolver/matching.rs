use crate::config::ResolverConfig;
use crate::types::PageTextFragment;
use log::debug;
use serde::{Deserialize, Serialize};

/// Which rung of the fallback ladder produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    /// Fragment contains the whole phrase (case-insensitive)
    Exact,
    /// Fragment contains the first few characters of the phrase
    Prefix,
    /// Fragment contains at least one longer word of the phrase
    Word,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentMatch {
    pub tier: MatchTier,
    /// Indices into the fragment slice, each at most once
    pub indices: Vec<usize>,
}

/// Find the fragments a requested phrase refers to.
///
/// Each tier runs only when the previous one matched nothing. Later tiers
/// trade precision for recall: quoted text often differs from the rendered
/// text layer in whitespace, hyphenation or truncation.
pub fn match_fragments(
    phrase: &str,
    fragments: &[PageTextFragment],
    config: &ResolverConfig,
) -> Option<FragmentMatch> {
    let needle = phrase.to_lowercase();
    let needle = needle.trim();
    if needle.is_empty() || fragments.is_empty() {
        return None;
    }

    let haystacks: Vec<String> = fragments
        .iter()
        .map(|fragment| fragment.content.to_lowercase())
        .collect();

    // Tier 1: exact substring
    let indices = containing(&haystacks, needle);
    if !indices.is_empty() {
        return Some(FragmentMatch {
            tier: MatchTier::Exact,
            indices,
        });
    }

    // Tier 2: leading characters of the phrase
    if needle.chars().count() > config.min_prefix_phrase_chars {
        let prefix: String = needle.chars().take(config.prefix_chars).collect();
        let indices = containing(&haystacks, &prefix);
        if !indices.is_empty() {
            debug!("Prefix match on \"{}\"", prefix);
            return Some(FragmentMatch {
                tier: MatchTier::Prefix,
                indices,
            });
        }
    }

    // Tier 3: any longer word, each fragment once
    if needle.contains(char::is_whitespace) {
        let mut indices: Vec<usize> = Vec::new();
        for word in needle
            .split_whitespace()
            .filter(|word| word.chars().count() > config.min_word_chars)
        {
            for (index, haystack) in haystacks.iter().enumerate() {
                if haystack.contains(word) && !indices.contains(&index) {
                    debug!("Word match \"{}\": \"{}\"", word, fragments[index].content);
                    indices.push(index);
                }
            }
        }
        if !indices.is_empty() {
            return Some(FragmentMatch {
                tier: MatchTier::Word,
                indices,
            });
        }
    }

    None
}

fn containing(haystacks: &[String], needle: &str) -> Vec<usize> {
    haystacks
        .iter()
        .enumerate()
        .filter(|(_, haystack)| haystack.contains(needle))
        .map(|(index, _)| index)
        .collect()
}
