use core_render::{RenderDelta, RenderScheduler};
use core_state::ScrollDelta;
use proptest::prelude::*;

fn any_delta() -> impl Strategy<Value = RenderDelta> {
    prop_oneof![
        Just(RenderDelta::Initial),
        Just(RenderDelta::Full),
        Just(RenderDelta::Scroll(ScrollDelta::Up)),
        Just(RenderDelta::Scroll(ScrollDelta::None)),
        Just(RenderDelta::Scroll(ScrollDelta::Down)),
        (0usize..50).prop_map(RenderDelta::Line),
        Just(RenderDelta::StatusLine),
        Just(RenderDelta::CursorOnly),
    ]
}

fn any_scroll() -> impl Strategy<Value = ScrollDelta> {
    prop_oneof![
        Just(ScrollDelta::Up),
        Just(ScrollDelta::None),
        Just(ScrollDelta::Down),
    ]
}

fn consume(marks: &[RenderDelta], scroll_region: bool) -> (RenderScheduler, core_render::Decision) {
    let mut s = RenderScheduler::new();
    for m in marks {
        s.mark(*m);
    }
    let d = s.consume(scroll_region);
    (s, d)
}

proptest! {
    #[test]
    fn consume_drains_the_queue(marks in prop::collection::vec(any_delta(), 0..20), region in any::<bool>()) {
        let (s, _) = consume(&marks, region);
        prop_assert!(!s.has_pending());
    }

    #[test]
    fn effective_never_scrolls_without_region(marks in prop::collection::vec(any_delta(), 0..20)) {
        let (_, d) = consume(&marks, false);
        prop_assert!(!matches!(d.effective, RenderDelta::Scroll(_)));
        if let RenderDelta::Scroll(_) = d.semantic {
            prop_assert_eq!(d.effective, RenderDelta::Full);
        } else {
            prop_assert_eq!(d.effective, d.semantic);
        }
    }

    #[test]
    fn effective_matches_semantic_with_region(marks in prop::collection::vec(any_delta(), 0..20)) {
        let (_, d) = consume(&marks, true);
        prop_assert_eq!(d.effective, d.semantic);
    }

    #[test]
    fn any_full_mark_wins(
        before in prop::collection::vec(any_delta(), 0..10),
        after in prop::collection::vec(any_delta(), 0..10),
    ) {
        let mut marks = before;
        marks.push(RenderDelta::Full);
        marks.extend(after);
        let (_, d) = consume(&marks, true);
        prop_assert_eq!(d.semantic, RenderDelta::Full);
    }

    #[test]
    fn scrolls_merge_by_net_rows(scrolls in prop::collection::vec(any_scroll(), 0..8)) {
        let marks: Vec<RenderDelta> = scrolls.iter().map(|s| RenderDelta::Scroll(*s)).collect();
        let net: i32 = scrolls.iter().map(|s| i32::from(s.rows())).sum();
        let (_, d) = consume(&marks, true);
        let expected = match net {
            0 => RenderDelta::CursorOnly,
            1 => RenderDelta::Scroll(ScrollDelta::Down),
            -1 => RenderDelta::Scroll(ScrollDelta::Up),
            _ => RenderDelta::Full,
        };
        prop_assert_eq!(d.semantic, expected);
    }
}
