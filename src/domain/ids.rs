use uuid::Uuid;

/// Generates a prefixed document id such as `entry-9f8e4c…`.
///
/// Income and expense ids use distinct prefixes but their id spaces are
/// still treated as independent by every lookup.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::generate_id;

    #[test]
    fn ids_carry_prefix_and_are_unique() {
        let first = generate_id("entry");
        let second = generate_id("entry");
        assert!(first.starts_with("entry-"));
        assert_ne!(first, second);
    }
}
