use platescope::aggregate::PlateAggregate;
use platescope::config::{SimilarityThreshold, SortOrder};
use platescope::export::{read_table, render_csv};
use platescope::grouping::group_similar;
use platescope::parser::{parse_lines, PlateEvent};
use platescope::similarity::similarity;
use platescope::summary::{build_rows, SummaryStats};
use proptest::prelude::*;

fn plate() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,8}"
}

fn events() -> impl Strategy<Value = Vec<PlateEvent>> {
    prop::collection::vec(
        (0u64..500, prop::sample::select(vec!["ABC123", "ABC124", "ABD124", "XYZ999", "XYZ998", "AI3NRU", "AI3NR0"]), 0u32..10_000),
        0..40,
    )
    .prop_map(|v| {
        v.into_iter()
            .map(|(f, t, c)| PlateEvent { frame_number: f, plate_text: t.to_string(), confidence: c as f64 / 100.0 })
            .collect()
    })
}

proptest! {
    #[test]
    fn plate_lines_without_frame_markers_yield_nothing(
        plates in prop::collection::vec((plate(), 0u32..100, 0u32..10_000), 0..20)
    ) {
        let lines: Vec<String> = plates
            .iter()
            .map(|(p, whole, frac)| format!("    - {p}\t confidence: {whole}.{frac}"))
            .collect();
        prop_assert_eq!(parse_lines(lines).count(), 0);
    }

    #[test]
    fn every_framed_plate_line_becomes_an_event(
        plates in prop::collection::vec((plate(), 0u32..100), 1..20)
    ) {
        let mut lines = vec!["Frame: 1".to_string()];
        lines.extend(plates.iter().map(|(p, c)| format!("  - {p} confidence: {c}")));
        let events: Vec<PlateEvent> = parse_lines(lines).collect();
        prop_assert_eq!(events.len(), plates.len());
        for (e, (p, c)) in events.iter().zip(&plates) {
            prop_assert_eq!(&e.plate_text, p);
            prop_assert_eq!(e.confidence, *c as f64);
        }
    }

    #[test]
    fn similarity_with_itself_is_100(s in "\\PC{0,20}") {
        prop_assert_eq!(similarity(&s, &s), 100.0);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded(a in "[A-Z0-9]{0,10}", b in "[A-Z0-9]{0,10}") {
        let ab = similarity(&a, &b);
        prop_assert_eq!(ab, similarity(&b, &a));
        prop_assert!((0.0..=100.0).contains(&ab));
    }

    #[test]
    fn aggregate_records_have_paired_nonempty_lists(evs in events()) {
        let total = evs.len();
        let agg = PlateAggregate::from_events(evs);
        let mut seen = 0;
        for rec in &agg {
            prop_assert!(!rec.frames.is_empty());
            prop_assert_eq!(rec.frames.len(), rec.confidences.len());
            seen += rec.frames.len();
        }
        prop_assert_eq!(seen, total);
    }

    #[test]
    fn grouping_partitions_distinct_texts(evs in events(), t in 0.0f64..=100.0) {
        let agg = PlateAggregate::from_events(evs.clone());
        let texts: Vec<String> = agg.texts().map(str::to_string).collect();
        let clusters = group_similar(agg, SimilarityThreshold::new(t).unwrap());
        for text in &texts {
            prop_assert_eq!(clusters.iter().filter(|c| c.contains(text)).count(), 1);
        }
        let detections: usize = clusters.iter().map(|c| c.frames.len()).sum();
        prop_assert_eq!(detections, evs.len());
        for c in &clusters {
            prop_assert_eq!(c.frames.len(), c.confidences.len());
        }
    }

    #[test]
    fn rows_are_ranked_and_survive_a_table_round_trip(evs in events()) {
        let clusters = group_similar(PlateAggregate::from_events(evs), SimilarityThreshold::default());
        let rows = build_rows(&clusters, SortOrder::Confidence);
        for pair in rows.windows(2) {
            prop_assert!(pair[0].confidence_level >= pair[1].confidence_level);
        }
        let reread = read_table(&render_csv(&rows, true)).unwrap();
        prop_assert_eq!(&reread, &rows);
        prop_assert_eq!(SummaryStats::from_rows(&reread), SummaryStats::from_rows(&rows));
    }
}
