//! Integration tests for the generations page.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use genscope::widgets::{SortDirection, TableRowClicked, TableSortChanged, TableStatus};
use genscope::{
    ChatMessage, DashboardConfig, DashboardError, Event, Generation, GenerationFilter,
    GenerationSource, GenerationsPage, MemorySource, MessageInput, MouseButton, PageRequest,
    Point, Rect,
};
use std::sync::atomic::{AtomicUsize, Ordering};

const MODELS: [&str; 3] = ["gpt-4", "gpt-3.5-turbo", "claude-2"];

fn generations(n: usize) -> Vec<Generation> {
    let base = Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let created_at = base + Duration::seconds(i as i64);
            Generation {
                id: format!("run-{i}"),
                created_at,
                ended_at: Some(created_at + Duration::milliseconds(500 + i as i64)),
                name: MODELS[i % MODELS.len()].to_string(),
                status: if i % 5 == 0 { "error" } else { "success" }.to_string(),
                prompt_tokens: i as u64,
                completion_tokens: 10,
                input: Some(MessageInput::Many(vec![
                    ChatMessage::new("system", "You are helpful"),
                    ChatMessage::new("user", format!("question {i}")),
                ])),
                output: Some(ChatMessage::new("ai", format!("answer {i}"))),
                error: None,
                tags: if i % 2 == 0 { vec!["even".into()] } else { Vec::new() },
                user: Some(format!("user-{}", i % 4)),
            }
        })
        .collect()
}

/// Counts fetches made through it.
struct CountingSource {
    inner: MemorySource,
    calls: AtomicUsize,
}

impl CountingSource {
    fn new(n: usize) -> Self {
        Self {
            inner: MemorySource::new(generations(n)),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GenerationSource for CountingSource {
    fn fetch(&self, request: &PageRequest) -> Result<Vec<Generation>, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(request)
    }
}

struct OfflineSource;

impl GenerationSource for OfflineSource {
    fn fetch(&self, _: &PageRequest) -> Result<Vec<Generation>, DashboardError> {
        Err(DashboardError::Source("backend unreachable".into()))
    }
}

/// Page with a 300px body (36px header) and 100-row pages.
fn mounted<S: GenerationSource>(source: S) -> GenerationsPage<S> {
    let mut page = GenerationsPage::new(source, &DashboardConfig::default()).unwrap();
    page.layout(Rect::new(0.0, 0.0, 650.0, 336.0));
    page.mount().unwrap();
    page
}

#[test]
fn test_mount_loads_first_page_newest_first() {
    let source = CountingSource::new(250);
    let page = mounted(&source);
    assert_eq!(source.calls(), 1);
    assert_eq!(page.feed().len(), 100);
    assert_eq!(page.table().row_count(), 100);
    assert_eq!(page.table().record_at(0).unwrap().id, "run-249");

    let view = page.table().view();
    assert_eq!(view.data_row_count(), 10);
    assert_eq!(view.status, None);
    assert!(!page.table().is_loading());
}

#[test]
fn test_short_first_page_stops_at_exhaustion() {
    let source = CountingSource::new(30);
    let page = mounted(&source);
    assert_eq!(page.feed().len(), 30);
    assert!(page.feed().is_exhausted());
    // The post-mount check asks again but the feed has nothing more to fetch
    assert_eq!(source.calls(), 1);
}

#[test]
fn test_scrolling_near_bottom_fetches_next_page() {
    let source = CountingSource::new(250);
    let mut page = mounted(&source);

    page.scroll_to(2000.0).unwrap();
    assert_eq!(page.feed().len(), 100);

    // 3036 - 2500 - 336 = 200 < 600
    page.scroll_to(2500.0).unwrap();
    assert_eq!(page.feed().len(), 200);
    assert_eq!(source.calls(), 2);
    assert_eq!(page.table().scroll_offset(), 2500.0);
}

#[test]
fn test_repeated_triggers_coalesce() {
    let source = CountingSource::new(1000);
    let mut page = mounted(&source);

    page.table_mut().scroll_to(2500.0);
    page.table_mut().handle_scroll();
    page.table_mut().handle_scroll();
    page.process_actions().unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(page.feed().len(), 200);
}

#[test]
fn test_scroll_to_end_drains_source() {
    let source = CountingSource::new(250);
    let mut page = mounted(&source);
    for _ in 0..10 {
        let max = page.table().viewport_metrics().scroll_height;
        page.scroll_to(max).unwrap();
    }
    assert_eq!(page.feed().len(), 250);
    assert!(page.feed().is_exhausted());
    assert_eq!(source.calls(), 3);
}

#[test]
fn test_row_click_opens_detail() {
    let mut page = mounted(MemorySource::new(generations(20)));
    let message = page
        .handle_event(&Event::MouseDown {
            position: Point::new(300.0, 36.0 + 40.0),
            button: MouseButton::Left,
        })
        .unwrap()
        .unwrap();
    let clicked = message.downcast_ref::<TableRowClicked>().unwrap();
    assert_eq!(clicked.position, 1);

    let detail = page.drawer().detail().unwrap();
    assert_eq!(detail.id, "run-18");
    assert_eq!(detail.messages.len(), 2);
    assert!(page.render_text().contains("Generation run-18"));

    page.close_detail();
    assert!(!page.drawer().is_open());
}

#[test]
fn test_header_click_sorts_by_tokens() {
    let mut page = mounted(MemorySource::new(generations(20)));
    // Columns: time 60, model 80, status 60, duration 25, tokens 25
    let message = page
        .handle_event(&Event::MouseDown {
            position: Point::new(60.0 + 80.0 + 60.0 + 25.0 + 5.0, 10.0),
            button: MouseButton::Left,
        })
        .unwrap()
        .unwrap();
    let sort = message.downcast_ref::<TableSortChanged>().unwrap();
    assert_eq!(sort.column, "tokens");
    assert_eq!(sort.direction, SortDirection::Ascending);
    assert_eq!(page.table().record_at(0).unwrap().id, "run-0");
}

#[test]
fn test_filter_refetches_matching_rows() {
    let source = CountingSource::new(60);
    let mut page = mounted(&source);
    page.set_filter(GenerationFilter::new().model("claude-2"))
        .unwrap();
    assert_eq!(page.feed().len(), 20);
    assert!(page.table().sorted_records().all(|g| g.name == "claude-2"));
    assert_eq!(page.table().scroll_offset(), 0.0);

    page.set_filter(GenerationFilter::new().search("question 7"))
        .unwrap();
    let ids: Vec<_> = page.table().sorted_records().map(|g| g.id.clone()).collect();
    assert_eq!(ids, vec!["run-7"]);
}

#[test]
fn test_filter_options() {
    let page = mounted(MemorySource::new(generations(8)));
    let options = page.filter_options();
    assert_eq!(options.models, vec!["claude-2", "gpt-3.5-turbo", "gpt-4"]);
    assert_eq!(options.statuses, vec!["error", "success"]);
    assert_eq!(options.tags, vec!["even"]);
    assert_eq!(options.users.len(), 4);
}

#[test]
fn test_empty_source_shows_no_data() {
    let page = mounted(MemorySource::default());
    assert_eq!(page.table().view().status, Some(TableStatus::NoData));
    assert!(page.render_text().ends_with("No data\n"));
}

#[test]
fn test_source_error_is_reported() {
    let mut page = GenerationsPage::new(OfflineSource, &DashboardConfig::default()).unwrap();
    page.layout(Rect::new(0.0, 0.0, 650.0, 336.0));
    let err = page.mount().unwrap_err();
    assert!(matches!(err, DashboardError::Source(_)));
    assert!(!page.table().is_loading());
    assert_eq!(page.feed().last_error(), Some("Source error: backend unreachable"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = DashboardConfig::default();
    config.table.row_height = 0.0;
    assert!(GenerationsPage::new(MemorySource::default(), &config).is_err());
}

#[test]
fn test_render_text_shows_window() {
    let page = mounted(MemorySource::new(generations(250)));
    let text = page.render_text();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Time ▼ | Model | Status | Duration | Total tokens | Prompt | Response")
    );
    assert!(text.contains("[gpt-4]"));
    assert!(text.contains("question 249 (view all 2)"));
    assert!(text.contains("~ 2700px ~"));
}
