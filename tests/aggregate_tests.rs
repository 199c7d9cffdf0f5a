use platescope::aggregate::PlateAggregate;
use platescope::parser::PlateEvent;

fn ev(frame: u64, text: &str, confidence: f64) -> PlateEvent {
    PlateEvent { frame_number: frame, plate_text: text.to_string(), confidence }
}

#[test]
fn groups_events_by_exact_text_in_discovery_order() {
    let agg = PlateAggregate::from_events(vec![
        ev(1, "XYZ999", 60.0),
        ev(2, "ABC123", 70.0),
        ev(3, "XYZ999", 65.0),
        ev(4, "ABC124", 90.0),
    ]);
    let texts: Vec<&str> = agg.texts().collect();
    assert_eq!(texts, vec!["XYZ999", "ABC123", "ABC124"]);

    let xyz = agg.get("XYZ999").unwrap();
    assert_eq!(xyz.confidences, vec![60.0, 65.0]);
    assert_eq!(xyz.frames, vec![1, 3]);
    assert_eq!(xyz.detections(), 2);
    assert!((xyz.mean_confidence() - 62.5).abs() < 1e-12);
}

#[test]
fn matching_is_case_sensitive_and_unnormalized() {
    let agg: PlateAggregate = vec![ev(1, "ABC123", 70.0), ev(1, "abc123", 71.0), ev(2, "ABC 123", 72.0)]
        .into_iter()
        .collect();
    assert_eq!(agg.len(), 3);
}

#[test]
fn every_record_has_matching_nonempty_lists() {
    let events = vec![ev(1, "A1", 1.0), ev(2, "B2", 2.0), ev(3, "A1", 3.0), ev(3, "A1", 4.0)];
    let total = events.len();
    let agg = PlateAggregate::from_events(events);
    let mut seen = 0;
    for rec in &agg {
        assert!(!rec.frames.is_empty());
        assert_eq!(rec.confidences.len(), rec.frames.len());
        seen += rec.detections();
    }
    assert_eq!(seen, total);
}

#[test]
fn empty_input_builds_empty_aggregate() {
    let agg = PlateAggregate::from_events(Vec::new());
    assert!(agg.is_empty());
    assert!(agg.into_records().is_empty());
}

#[test]
fn contents_do_not_depend_on_event_order_within_a_text() {
    let forward = PlateAggregate::from_events(vec![ev(1, "A1", 10.0), ev(2, "A1", 20.0)]);
    let backward = PlateAggregate::from_events(vec![ev(2, "A1", 20.0), ev(1, "A1", 10.0)]);
    let (f, b) = (forward.get("A1").unwrap(), backward.get("A1").unwrap());
    let mut ff = f.frames.clone();
    let mut bf = b.frames.clone();
    ff.sort_unstable();
    bf.sort_unstable();
    assert_eq!(ff, bf);
    assert_eq!(f.mean_confidence(), b.mean_confidence());
}
