//! Type name to table name conversion

/// Convert a concatenation of capitalized words into its lower-case,
/// underscore-joined form.
///
/// Every upper-case letter becomes `_` plus its lower-case form; a leading
/// underscore produced by an initial capital is dropped. Input that is
/// already underscored passes through unchanged.
///
/// ```
/// use slimorm_core::naming::underscorify;
///
/// assert_eq!(underscorify("UserPosts"), "user_posts");
/// assert_eq!(underscorify("user_posts"), "user_posts");
/// ```
pub fn underscorify(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    match out.strip_prefix('_') {
        Some(rest) if name.starts_with(|c: char| c.is_ascii_uppercase()) => rest.to_string(),
        _ => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        assert_eq!(underscorify("Posts"), "posts");
    }

    #[test]
    fn test_multiple_words() {
        assert_eq!(underscorify("UserPosts"), "user_posts");
        assert_eq!(underscorify("BlogPostComments"), "blog_post_comments");
    }

    #[test]
    fn test_acronym_splits_every_capital() {
        assert_eq!(underscorify("HTTPLog"), "h_t_t_p_log");
    }

    #[test]
    fn test_lowercase_start_keeps_first_word() {
        assert_eq!(underscorify("userPosts"), "user_posts");
    }

    #[test]
    fn test_already_underscored_is_unchanged() {
        assert_eq!(underscorify("user_posts"), "user_posts");
    }

    #[test]
    fn test_explicit_leading_underscore_survives() {
        // only an underscore produced by an initial capital is stripped
        assert_eq!(underscorify("_meta"), "_meta");
    }

    #[test]
    fn test_empty() {
        assert_eq!(underscorify(""), "");
    }
}
