//! Commercial vs. academic affiliation heuristic
//!
//! Keyword matching is plain substring search on the lowercased affiliation.
//! The order of the rules matters: a hit in [`COMPANY_KEYWORDS`] wins outright,
//! otherwise a short company indicator only counts when no academic keyword is
//! present. Strings carrying both an academic keyword and a short indicator
//! are therefore classified as academic.

/// Company names and commercial suffixes that classify an affiliation as
/// commercial on their own
pub const COMPANY_KEYWORDS: &[&str] = &[
    "pfizer",
    "roche",
    "novartis",
    "merck",
    "gsk",
    "glaxosmithkline",
    "sanofi",
    "astrazeneca",
    "bristol-myers",
    "squibb",
    "abbvie",
    "amgen",
    "gilead",
    "biogen",
    "celgene",
    "regeneron",
    "vertex",
    "moderna",
    "biontech",
    "illumina",
    "thermo fisher",
    "danaher",
    "abbott",
    "medtronic",
    "johnson & johnson",
    "j&j",
    "eli lilly",
    "boehringer ingelheim",
    "takeda",
    "bayer",
    "pharmaceutical",
    "biotechnology",
    "biotech",
    "pharma",
    "inc.",
    "ltd.",
    "corp.",
    "corporation",
    "limited",
    "incorporated",
];

/// Keywords marking an academic or clinical institution
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "hospital",
    "medical center",
    "research center",
    "laboratory",
    "department",
];

/// Short indicators of a company, only trusted without academic context
pub const COMPANY_INDICATORS: &[&str] = &["inc", "ltd", "corp", "llc", "pharmaceutical", "biotech"];

/// Decide whether a free-text affiliation denotes a commercial entity
///
/// # Example
///
/// ```
/// use pubmed_paper_fetcher::affiliation::is_company_affiliation;
///
/// assert!(is_company_affiliation("Pfizer Inc., New York, NY, USA"));
/// assert!(!is_company_affiliation("Department of Biology, Harvard University"));
/// ```
pub fn is_company_affiliation(affiliation: &str) -> bool {
    let lower = affiliation.to_lowercase();

    if contains_any(&lower, COMPANY_KEYWORDS) {
        return true;
    }

    let has_academic_keyword = contains_any(&lower, ACADEMIC_KEYWORDS);
    let has_company_indicator = contains_any(&lower, COMPANY_INDICATORS);

    has_company_indicator && !has_academic_keyword
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
