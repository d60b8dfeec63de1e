use unicode_normalization::UnicodeNormalization;

/// Fold a table caption into its canonical name: NFKD-decompose, keep
/// letters only, lowercase. "Clasificación" and "Clasificacion" both
/// become "clasificacion"; digits, spaces and punctuation are dropped.
pub fn fold_caption(raw: &str) -> String {
    raw.nfkd()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

// ── Tests ──
