//! Target-language detection
//!
//! Sinhala script is an absolute signal. Romanized Sinhala ("Singlish") has
//! no script marker, so it is separated from English by scoring two fixed
//! keyword lists against the query.

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

use renal_chat_core::Lang;

/// English function and medical words that mark an English query
static ENGLISH_MARKERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "what", "when", "where", "which", "how", "why", "who", "is", "are", "can", "could",
        "should", "would", "do", "does", "the", "my", "your", "a", "an", "and", "for", "with",
        "about", "have", "has", "need", "want", "take", "eat", "drink", "feel", "kidney",
        "kidneys", "dialysis", "creatinine", "pressure", "blood", "urine", "diet", "doctor",
        "medicine", "medication", "tablet", "pain", "swelling", "water", "salt", "protein",
        "potassium", "report", "test", "stage", "disease",
    ]
});

/// Romanized-Sinhala medical and colloquial words that mark a Singlish query
static SINGLISH_MARKERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "mata", "mage", "oya", "api", "mama", "eka", "ekak", "thiyenawa", "tiyenawa", "wenawa",
        "venava", "ridenawa", "rideno", "amaru", "amarui", "idimila", "idimuna", "kakkuma",
        "kakul", "bada", "oluwa", "papuwa", "wathura", "watura", "beheth", "behet", "vakugadu",
        "wakugadu", "mutra", "le", "lee", "kanna", "bonna", "puluwan", "puluwanda", "epa",
        "hondai", "hondada", "narakai", "dawasata", "rathriyata", "udeta", "keeyada", "mokada",
        "mokadda", "kohomada", "karanna", "ganna", "nathuwa", "thibba", "dan", "godak", "tikak",
        "hariyata",
    ]
});

/// Count occurrences of `word` in `haystack` as a whole word
///
/// Both sides are padded with spaces so partial-word hits ("le" inside
/// "tablet") do not count.
fn padded_count(haystack: &str, word: &str) -> usize {
    let needle = format!(" {} ", word);
    haystack.matches(&needle).count()
}

/// Lower-case and re-join on single spaces, stripping punctuation, so
/// padded matching sees "ckd" in "What is CKD?"
pub(crate) fn padded_haystack(text: &str) -> String {
    let words: Vec<&str> = text.unicode_words().collect();
    format!(" {} ", words.join(" ").to_lowercase())
}

/// True when any character falls in the Sinhala Unicode block (U+0D80–U+0DFF)
pub fn contains_sinhala(text: &str) -> bool {
    text.chars().any(|c| ('\u{0D80}'..='\u{0DFF}').contains(&c))
}

/// Classify a query as English or Sinhala output
///
/// Priority order: Sinhala script short-circuits; otherwise the keyword
/// scores decide, tied or unmatched queries default to English. Total
/// function, never fails.
pub fn detect_target_language(query: &str) -> Lang {
    if contains_sinhala(query) {
        return Lang::Si;
    }

    let padded = padded_haystack(query);

    let english_score: usize = ENGLISH_MARKERS
        .iter()
        .map(|w| padded_count(&padded, w))
        .sum();
    let singlish_score: usize = SINGLISH_MARKERS
        .iter()
        .map(|w| padded_count(&padded, w))
        .sum();

    let lang = if english_score > 0 && english_score >= singlish_score {
        Lang::En
    } else if singlish_score > 0 {
        Lang::Si
    } else {
        Lang::En
    };

    tracing::debug!(
        query = %query,
        english_score,
        singlish_score,
        lang = %lang,
        "language detected"
    );

    lang
}
