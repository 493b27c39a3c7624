use super::*;

#[test]
fn test_from_parts_complete() {
    let post = Post::from_parts(
        Some("1789".to_string()),
        Some("Founders should ship".to_string()),
        "https://twitter.com/i/status/1789",
    )
    .unwrap();
    assert_eq!(post.id, "1789");
    assert!(post.snapshot.is_none());
}

#[test]
fn test_from_parts_missing_id() {
    assert!(Post::from_parts(None, Some("text".to_string()), "").is_none());
}

#[test]
fn test_from_parts_blank_text() {
    assert!(Post::from_parts(Some("1".to_string()), Some("   ".to_string()), "").is_none());
}

#[test]
fn test_preview_counts_chars_not_bytes() {
    let post = Post::new("1", "héllo wörld", "");
    assert_eq!(post.preview(5), "héllo");
}

#[test]
fn test_snapshot_data_url() {
    let snap = Snapshot::png("AAAA");
    assert_eq!(snap.data_url(), "data:image/png;base64,AAAA");
}

#[test]
fn test_builder_sets_handle_and_snapshot() {
    let post = Post::new("1", "t", "u")
        .with_handle("vibey-3")
        .with_snapshot(Snapshot::png("BBBB"));
    assert_eq!(post.handle, "vibey-3");
    assert_eq!(post.snapshot.unwrap().data_base64, "BBBB");
}
