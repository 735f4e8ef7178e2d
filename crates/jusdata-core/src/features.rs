//! Feature-string construction shared by training and inference.
//!
//! The outcome classifier is fitted on strings built by
//! [`build_classifier_features`]. Inference must build its input the same way,
//! byte for byte, or the learned weights no longer line up with the vocabulary.

/// Stop words excluded by both TF-IDF vectorizers.
pub const STOP_WORDS: &[&str] = &["de", "a", "o", "que", "e", "do", "da", "em", "um"];

/// Separator placed between the claim text and the forum.
pub const FEATURE_SEPARATOR: &str = " ";

/// Combine a claim and its forum into the classifier's input text.
pub fn build_classifier_features(claim_text: &str, forum: &str) -> String {
    let mut out = String::with_capacity(claim_text.len() + FEATURE_SEPARATOR.len() + forum.len());
    out.push_str(claim_text);
    out.push_str(FEATURE_SEPARATOR);
    out.push_str(forum);
    out
}
