use super::*;

fn gauge() -> Gauge {
    Gauge::new(5.0, 7.0).unwrap()
}

fn element(start: f64, height: ElementHeight) -> AdditionalDesignElement {
    AdditionalDesignElement {
        name: "Pocket".to_string(),
        start_location: StartLocation::AfterCastOn { inches: start },
        height,
        overlap_behavior: OverlapBehavior::Instructions,
        template: TemplateSource::new("Pocket", "<p>Pocket.</p>"),
    }
}

#[test]
fn start_rows_land_on_right_side_rows() {
    let g = gauge();
    assert_eq!(StartLocation::AfterCastOn { inches: 1.0 }.start_row(10.0, g), 7);
    assert_eq!(StartLocation::AfterCastOn { inches: 2.0 }.start_row(10.0, g), 15);
    assert_eq!(StartLocation::AfterCastOn { inches: 0.0 }.start_row(10.0, g), 1);
    assert_eq!(
        StartLocation::BeforeCapShaping { inches: 8.0 }.start_row(10.0, g),
        15
    );
    assert_eq!(
        StartLocation::BeforeCapShaping { inches: 12.0 }.start_row(10.0, g),
        1,
        "elements below the cast-on shift up to row 1"
    );
}

#[test]
fn inch_heights_round_to_even_rows() {
    let g = gauge();
    assert_eq!(ElementHeight::Inches { value: 2.0 }.in_rows(g), Some(14));
    assert_eq!(ElementHeight::Inches { value: 5.0 }.in_rows(g), Some(36));
    assert_eq!(ElementHeight::Inches { value: 0.1 }.in_rows(g), Some(2));
    assert_eq!(ElementHeight::Rows { value: 3 }.in_rows(g), Some(3));
    assert_eq!(ElementHeight::NoEnd.in_rows(g), None);
}

#[test]
fn overlap_behavior_flags() {
    assert!(OverlapBehavior::Instructions.interrupts_others());
    assert!(OverlapBehavior::Instructions.warn_if_interrupted());
    assert!(OverlapBehavior::StartOnly.interrupts_others());
    assert!(!OverlapBehavior::StartOnly.warn_if_interrupted());
    assert!(!OverlapBehavior::PurelyInformational.interrupts_others());
    assert!(!OverlapBehavior::PurelyInformational.warn_if_interrupted());
}

#[test]
fn validate_rejects_degenerate_elements() {
    assert!(element(1.0, ElementHeight::Inches { value: 2.0 }).validate().is_ok());
    assert!(element(1.0, ElementHeight::Inches { value: 0.0 }).validate().is_err());
    assert!(element(1.0, ElementHeight::Rows { value: 0 }).validate().is_err());
    assert!(element(-1.0, ElementHeight::NoEnd).validate().is_err());

    let mut unnamed = element(1.0, ElementHeight::NoEnd);
    unnamed.name = "  ".to_string();
    assert!(unnamed.validate().is_err());
}

#[test]
fn elements_deserialize_from_tagged_json() {
    let el: AdditionalDesignElement = serde_json::from_value(serde_json::json!({
        "name": "Stripe",
        "start_location": {"type": "before_cap_shaping", "inches": 2.5},
        "height": {"type": "no_end"},
        "overlap_behavior": "start_only",
        "template": {"name": "Stripe", "source": "<p>Stripe.</p>"}
    }))
    .unwrap();
    assert_eq!(el.start_location, StartLocation::BeforeCapShaping { inches: 2.5 });
    assert_eq!(el.height, ElementHeight::NoEnd);
    assert_eq!(el.overlap_behavior, OverlapBehavior::StartOnly);
}

#[test]
fn designer_comes_from_design_origin() {
    let mut src = SpecSource::default();
    assert!(src.designer().is_none());
    src.design_origin = Some(Arc::new(Design {
        name: "Cowl".to_string(),
        designer: Some(Designer {
            short_name: "Amy".to_string(),
            ..Designer::default()
        }),
        additional_elements: vec![],
    }));
    assert_eq!(src.designer().unwrap().short_name, "Amy");
}
