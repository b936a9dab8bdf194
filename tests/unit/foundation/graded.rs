use super::*;

#[test]
fn empty_graded_value_is_rejected() {
    let err = Graded::<u32>::new(vec![]).unwrap_err();
    assert!(matches!(err, PatternError::Construction(_)));
}

#[test]
fn display_collapses_equal_sizes() {
    assert_eq!(Graded::single(7u32).to_string(), "7");
    assert_eq!(Graded::new(vec![7u32, 7, 7]).unwrap().to_string(), "7");
    assert_eq!(
        Graded::new(vec![10u32, 12, 14]).unwrap().to_string(),
        "10 (12, 14)"
    );
}

#[test]
fn min_max_span_all_sizes() {
    let g = Graded::new(vec![15u32, 7, 21]).unwrap();
    assert_eq!(g.min(), 7);
    assert_eq!(g.max(), 21);
}

#[test]
fn elementwise_min_max() {
    let a = Graded::new(vec![1u32, 9, 5]).unwrap();
    let b = Graded::new(vec![4u32, 2, 5]).unwrap();
    assert_eq!(a.elementwise_min(&b).unwrap().values(), &[1, 2, 5]);
    assert_eq!(a.elementwise_max(&b).unwrap().values(), &[4, 9, 5]);
}

#[test]
fn zip_with_rejects_size_mismatch() {
    let a = Graded::new(vec![1u32, 2]).unwrap();
    let b = Graded::new(vec![1u32, 2, 3]).unwrap();
    assert!(matches!(
        a.zip_with(&b, |x, y| x + y),
        Err(PatternError::Broadcast(_))
    ));
}

#[test]
fn partial_order_is_elementwise() {
    let a = Graded::new(vec![1u32, 2]).unwrap();
    let b = Graded::new(vec![2u32, 3]).unwrap();
    let c = Graded::new(vec![0u32, 5]).unwrap();
    assert!(a < b);
    assert!(a <= a.clone());
    assert_eq!(a.partial_cmp(&c), None);
    assert_eq!(
        a.partial_cmp(&Graded::single(1u32)),
        None,
        "different size counts are incomparable"
    );
}

#[test]
fn context_value_collapses_to_scalar() {
    let same = Graded::new(vec![3u32, 3]).unwrap();
    assert_eq!(same.to_context_value().unwrap(), serde_json::json!(3));
    let differ = Graded::new(vec![3u32, 4]).unwrap();
    assert_eq!(differ.to_context_value().unwrap(), serde_json::json!([3, 4]));
}

#[test]
fn deserialize_enforces_non_empty() {
    let ok: Graded<u32> = serde_json::from_str("[1,2]").unwrap();
    assert_eq!(ok.len(), 2);
    assert!(serde_json::from_str::<Graded<u32>>("[]").is_err());
}
