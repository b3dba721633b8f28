//! Repeated header/footer detection across pages (P3).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const HEADER_FOOTER_MAX_LEN: usize = 100;

static PAGE_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^page \d+ of \d+$").unwrap(),
        Regex::new(r"^[—-]\s*\d+\s*[—-]$").unwrap(),
        Regex::new(r"^\d+$").unwrap(),
        Regex::new(r"(?i)^\[page \d+\]$").unwrap(),
    ]
});

/// Minimal view of a block needed for header/footer detection.
pub struct BlockView<'a> {
    pub page: u32,
    pub text: &'a str,
}

/// Per-block flags produced by header/footer detection, indexed the same
/// as the input slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFooterFlags {
    pub is_header: bool,
    pub is_footer: bool,
}

fn normalized_key(text: &str) -> String {
    text.trim().split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn is_page_number(text: &str) -> bool {
    let trimmed = text.trim();
    PAGE_NUMBER_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

/// Detects repeated headers/footers across a document's blocks.
///
/// A short block's normalized key that repeats on `min_page_repetition`
/// or more distinct pages is "repeated". On each page, the first repeated
/// block is a header, the last a footer. Blocks matching a page-number
/// grammar are always footers.
pub fn detect(blocks: &[BlockView], min_page_repetition: usize) -> Vec<HeaderFooterFlags> {
    let mut key_pages: HashMap<String, Vec<u32>> = HashMap::new();
    for block in blocks {
        if block.text.len() <= HEADER_FOOTER_MAX_LEN {
            let key = normalized_key(block.text);
            let pages = key_pages.entry(key).or_default();
            if !pages.contains(&block.page) {
                pages.push(block.page);
            }
        }
    }

    let repeated_keys: std::collections::HashSet<String> = key_pages
        .into_iter()
        .filter(|(_, pages)| pages.len() >= min_page_repetition)
        .map(|(key, _)| key)
        .collect();

    let mut flags = vec![HeaderFooterFlags::default(); blocks.len()];

    // first/last repeated-key block per page
    let mut first_repeated_idx: HashMap<u32, usize> = HashMap::new();
    let mut last_repeated_idx: HashMap<u32, usize> = HashMap::new();

    for (i, block) in blocks.iter().enumerate() {
        if block.text.len() <= HEADER_FOOTER_MAX_LEN {
            let key = normalized_key(block.text);
            if repeated_keys.contains(&key) {
                first_repeated_idx.entry(block.page).or_insert(i);
                last_repeated_idx.insert(block.page, i);
            }
        }
        if is_page_number(block.text) {
            flags[i].is_footer = true;
        }
    }

    for (_, idx) in first_repeated_idx {
        flags[idx].is_header = true;
    }
    for (_, idx) in last_repeated_idx {
        flags[idx].is_footer = true;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_repeated_header_across_pages() {
        let blocks = vec![
            BlockView { page: 1, text: "CASE #2024-001" },
            BlockView { page: 1, text: "Witness statement body." },
            BlockView { page: 2, text: "CASE #2024-001" },
            BlockView { page: 2, text: "More body text." },
        ];
        let flags = detect(&blocks, 2);
        assert!(flags[0].is_header);
        assert!(flags[2].is_header);
        assert!(!flags[1].is_header);
    }

    #[test]
    fn flags_page_number_footer_unconditionally() {
        let blocks = vec![
            BlockView { page: 1, text: "Body text." },
            BlockView { page: 1, text: "Page 1 of 3" },
        ];
        let flags = detect(&blocks, 2);
        assert!(flags[1].is_footer);
    }

    #[test]
    fn non_repeated_short_block_is_not_flagged() {
        let blocks = vec![
            BlockView { page: 1, text: "Unique line A" },
            BlockView { page: 2, text: "Unique line B" },
        ];
        let flags = detect(&blocks, 2);
        assert!(!flags[0].is_header && !flags[0].is_footer);
        assert!(!flags[1].is_header && !flags[1].is_footer);
    }
}
