use super::hash::variant_hash;

#[test]
fn weekday_hashes() {
    let hashes: Vec<_> = ["monday", "tuesday", "saturday", "sunday"]
        .into_iter()
        .map(variant_hash)
        .collect();

    assert_eq!(hashes, vec![-949852400, 323181965, -29784519, 569248848]);
}

#[test]
fn short_tags_hash_to_their_bytes() {
    assert_eq!(variant_hash("x"), 120);
    assert_eq!(variant_hash("A"), 65);
    assert_eq!(variant_hash(""), 0);
}

#[test]
fn keywords_hash_negative() {
    assert_eq!(variant_hash("type"), -855051590);
    assert_eq!(variant_hash("module"), -1059900244);
}
