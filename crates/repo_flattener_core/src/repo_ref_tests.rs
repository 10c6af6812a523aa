use super::*;

#[test]
fn test_parse_plain_url() {
    let repo = RepoRef::parse("https://github.com/octo/demo").unwrap();

    assert_eq!(repo.owner(), "octo");
    assert_eq!(repo.repo(), "demo");
    assert_eq!(repo.reference(), None);
    assert_eq!(repo.full_name(), "octo/demo");
}

#[test]
fn test_parse_tree_url_extracts_ref() {
    let repo = RepoRef::parse("https://github.com/octo/demo/tree/dev").unwrap();

    assert_eq!(repo.reference(), Some("dev"));
    assert_eq!(repo.to_string(), "octo/demo@dev");
}

#[test]
fn test_parse_takes_single_segment_after_tree() {
    let repo = RepoRef::parse("https://github.com/octo/demo/tree/feature/login").unwrap();

    assert_eq!(repo.reference(), Some("feature"));
}

#[test]
fn test_parse_nested_joins_segments_after_tree() {
    let repo = RepoRef::parse_nested("https://github.com/octo/demo/tree/feature/login").unwrap();

    assert_eq!(repo.reference(), Some("feature/login"));
}

#[test]
fn test_parse_strips_git_suffix() {
    let repo = RepoRef::parse("https://github.com/octo/demo.git").unwrap();

    assert_eq!(repo.repo(), "demo");
}

#[test]
fn test_parse_accepts_missing_scheme() {
    let repo = RepoRef::parse("github.com/octo/demo").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
}

#[test]
fn test_parse_ignores_trailing_slash_query_and_fragment() {
    let repo = RepoRef::parse("https://github.com/octo/demo/?tab=readme#usage").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
    assert_eq!(repo.reference(), None);
}

#[test]
fn test_parse_tree_without_ref_has_no_reference() {
    let repo = RepoRef::parse("https://github.com/octo/demo/tree").unwrap();

    assert_eq!(repo.reference(), None);
}

#[test]
fn test_parse_blob_url_has_no_reference() {
    let repo = RepoRef::parse("https://github.com/octo/demo/blob/main/README.md").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
    assert_eq!(repo.reference(), None);
}

#[test]
fn test_parse_decodes_percent_escapes() {
    let repo = RepoRef::parse("https://github.com/octo/demo/tree/release%2F1.0").unwrap();

    assert_eq!(repo.reference(), Some("release/1.0"));
}

#[test]
fn test_parse_rejects_single_segment() {
    let result = RepoRef::parse("https://github.com/octo");

    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_parse_rejects_empty_input() {
    assert!(matches!(RepoRef::parse("   "), Err(Error::InvalidUrl(_))));
}

#[test]
fn test_parse_rejects_bare_git_suffix() {
    assert!(matches!(
        RepoRef::parse("https://github.com/octo/.git"),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_new_rejects_empty_parts() {
    assert!(RepoRef::new("", "demo").is_err());
    assert!(RepoRef::new("octo", " ").is_err());
}

#[test]
fn test_with_empty_reference_is_cleared() {
    let repo = RepoRef::new("octo", "demo").unwrap().with_reference("");

    assert_eq!(repo.reference(), None);
}

#[test]
fn test_parse_accepts_bare_owner_and_repo() {
    let repo = RepoRef::parse("octo/demo").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
    assert_eq!(repo.reference(), None);
}

#[test]
fn test_parse_accepts_rooted_path() {
    let repo = RepoRef::parse("/octo/demo").unwrap();

    assert_eq!(repo.owner(), "octo");
    assert_eq!(repo.repo(), "demo");
}

#[test]
fn test_parse_rooted_path_with_tree_ref() {
    let repo = RepoRef::parse("/octo/demo/tree/dev").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
    assert_eq!(repo.reference(), Some("dev"));
}

#[test]
fn test_parse_bare_path_ignores_query() {
    let repo = RepoRef::parse("octo/demo?tab=readme").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
}

#[test]
fn test_parse_accepts_localhost_without_scheme() {
    let repo = RepoRef::parse("localhost:8080/octo/demo").unwrap();

    assert_eq!(repo.full_name(), "octo/demo");
}
