//! Static bilingual medical dictionary
//!
//! Three fixed tables back the bridge and style layers: romanized/Sinhala
//! terms mapped to English search terms, ambiguous colloquial terms with
//! their mandatory readings for the smart-path translation prompt, and
//! canonical Sinhala renderings for the style pass.

use once_cell::sync::Lazy;

use crate::detect::padded_haystack;

/// Romanized-Sinhala / Sinhala-script medical terms and their English
/// search equivalents
pub static MEDICAL_TERMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("vakugadu", "kidney"),
        ("wakugadu", "kidney"),
        ("වකුගඩු", "kidney"),
        ("mutra", "urine"),
        ("මුත්රා", "urine"),
        ("le", "blood"),
        ("lee", "blood"),
        ("ලේ", "blood"),
        ("kakul", "legs"),
        ("කකුල්", "legs"),
        ("bada", "stomach"),
        ("බඩ", "stomach"),
        ("oluwa", "head"),
        ("papuwa", "chest"),
        ("idimila", "swelling"),
        ("idimuna", "swelling"),
        ("ඉදිමිලා", "swelling"),
        ("ridenawa", "pain"),
        ("kakkuma", "ache"),
        ("amaru", "difficulty"),
        ("beheth", "medicine"),
        ("behet", "medicine"),
        ("බෙහෙත්", "medicine"),
        ("wathura", "water"),
        ("watura", "water"),
        ("වතුර", "water"),
        ("lunu", "salt"),
        ("ලුණු", "salt"),
        ("kanna", "eat"),
        ("bonna", "drink"),
        ("mahansiya", "fatigue"),
        ("kerakilla", "dizziness"),
        ("husma", "breathing"),
        ("presar", "blood pressure"),
        ("diyavadiyawa", "diabetes"),
    ]
});

/// Ambiguous colloquial terms whose reading must be pinned in the
/// smart-path translation prompt (severity adjectives, symptom nouns)
pub static AMBIGUOUS_TERMS: &[(&str, &str)] = &[
    ("amaru", "difficulty / discomfort (not: expensive)"),
    ("ridenawa", "it hurts / aching"),
    ("idimila", "swollen"),
    ("kakkuma", "dull ache"),
    ("danawanawa", "burning sensation"),
    ("hiri wetenawa", "numbness / tingling"),
    ("karakawilla", "dizziness"),
    ("le", "blood (the body fluid)"),
];

/// Canonical Sinhala renderings enforced during the style pass
pub static STYLE_GLOSSARY: &[(&str, &str)] = &[
    ("kidney", "වකුගඩුව"),
    ("kidneys", "වකුගඩු"),
    ("pain", "වේදනාව"),
    ("urine", "මුත්රා"),
    ("blood", "රුධිරය"),
    ("blood pressure", "රුධිර පීඩනය"),
    ("swelling", "ඉදිමීම"),
    ("medicine", "බෙහෙත්"),
    ("water", "වතුර"),
    ("salt", "ලුණු"),
    ("diet", "ආහාර වේල"),
    ("doctor", "වෛද්‍යවරයා"),
    ("dialysis", "රුධිර කාන්දුකරණය (dialysis)"),
];

/// Look up English hint terms for a raw query
///
/// Romanized terms match as whole words; Sinhala-script terms match as
/// substrings (Sinhala is written without reliable spacing around
/// inflections). First-seen order, deduplicated.
pub fn hint_terms(query: &str) -> Vec<&'static str> {
    let padded = padded_haystack(query);
    let mut hints = Vec::new();

    for (term, english) in MEDICAL_TERMS.iter() {
        let matched = if term.is_ascii() {
            padded.contains(&format!(" {} ", term))
        } else {
            query.contains(term)
        };
        if matched && !hints.contains(english) {
            hints.push(*english);
        }
    }

    hints
}

/// Render the ambiguous-term glossary for a translation prompt
pub fn ambiguous_glossary() -> String {
    AMBIGUOUS_TERMS
        .iter()
        .map(|(term, reading)| format!("- \"{}\" means {}", term, reading))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the canonical Sinhala glossary for a style prompt
pub fn style_glossary() -> String {
    STYLE_GLOSSARY
        .iter()
        .map(|(english, sinhala)| format!("- {} -> {}", english, sinhala))
        .collect::<Vec<_>>()
        .join("\n")
}
