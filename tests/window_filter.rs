// tests/window_filter.rs
use ai_social_curator::ingest::filter_window;
use ai_social_curator::ingest::types::{FetchWindow, Platform, RawPost};
use chrono::{DateTime, Duration, NaiveDate, Utc};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 22).unwrap()
}

fn post_at(ts: DateTime<Utc>) -> RawPost {
    RawPost {
        platform: Platform::Reddit,
        origin: "MachineLearning".to_string(),
        author: Some("someone".to_string()),
        title: Some("a post".to_string()),
        text: "body".to_string(),
        upvotes: Some(3),
        comments: Some(1),
        created_at: Some(ts),
        url: Some("https://example.test/post".to_string()),
    }
}

#[test]
fn window_bounds_are_inclusive() {
    let window = FetchWindow::for_day(day());
    let posts = vec![post_at(window.start), post_at(window.end)];
    let (kept, rejected) = filter_window(posts, &window);
    assert_eq!(kept.len(), 2, "posts at both window bounds should be retained");
    assert_eq!(rejected, 0);
}

#[test]
fn posts_outside_window_are_excluded() {
    let window = FetchWindow::for_day(day());
    let posts = vec![
        post_at(window.start - Duration::seconds(1)),
        post_at(window.end + Duration::milliseconds(1)),
    ];
    let (kept, rejected) = filter_window(posts, &window);
    assert!(kept.is_empty());
    assert_eq!(rejected, 2);
}

#[test]
fn midnight_boundary_scenario() {
    // yesterday 23:59:59, today 00:00:01, today 12:00:00 -> last two survive
    let window = FetchWindow::for_day(day());
    let posts = vec![
        post_at(window.start - Duration::seconds(1)),
        post_at(window.start + Duration::seconds(1)),
        post_at(window.start + Duration::hours(12)),
    ];
    let (kept, rejected) = filter_window(posts, &window);
    assert_eq!(kept.len(), 2);
    assert_eq!(rejected, 1);
    assert!(kept.iter().all(|r| r.created_at >= window.start));
}

#[test]
fn output_order_matches_input_order() {
    let window = FetchWindow::for_day(day());
    let mut posts = Vec::new();
    for (i, text) in ["first", "second", "third"].iter().enumerate() {
        let mut p = post_at(window.start + Duration::hours(i as i64));
        p.text = text.to_string();
        posts.push(p);
    }
    let (kept, _) = filter_window(posts, &window);
    let texts: Vec<_> = kept.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[test]
fn canonical_fields_map_through() {
    let window = FetchWindow::for_day(day());
    let (kept, _) = filter_window(vec![post_at(window.start)], &window);
    let rec = &kept[0];
    assert_eq!(rec.platform, Platform::Reddit);
    assert_eq!(rec.origin, "MachineLearning");
    assert_eq!(rec.author, "someone");
    assert_eq!(rec.title.as_deref(), Some("a post"));
    assert_eq!(rec.text, "body");
    assert_eq!(rec.upvotes, Some(3));
    assert_eq!(rec.comments, Some(1));
    assert_eq!(rec.url.as_deref(), Some("https://example.test/post"));
}

#[test]
fn deleted_author_maps_to_sentinel() {
    let window = FetchWindow::for_day(day());
    let mut post = post_at(window.start + Duration::hours(1));
    post.author = None;
    let (kept, _) = filter_window(vec![post], &window);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].author, "Deleted");
}
