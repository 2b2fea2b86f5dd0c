use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use async_trait::async_trait;
use outline_protocols::{ErrorCode, ItemData};
use tokio::sync::Notify;

use super::*;
use crate::dom::{LayoutMetrics, ViewportInfo};
use crate::error::ExtractError;
use crate::extractor::LandmarkExtractor;
use crate::page::PageContext;

const ARTICLE_PAGE: &str = "<html><head><title>Docs</title></head><body>\
    <nav><h2>Site menu</h2></nav>\
    <article><h1>Overview</h1><p>first</p><h3>Details</h3><h2>Overview</h2><p>second</p></article>\
    </body></html>";

fn page(html: &str) -> SharedPage {
    PageContext::from_html(
        "https://example.com/docs",
        html,
        &LayoutMetrics::default(),
        ViewportInfo::default(),
    )
    .shared()
}

fn analyzer(html: &str) -> PageAnalyzer {
    PageAnalyzer::new(page(html), AnalyzerConfig::default())
}

struct FailingExtractor;

#[async_trait]
impl ContentExtractor for FailingExtractor {
    async fn extract(&self, _document_html: &str) -> Result<Option<String>, ExtractError> {
        Err(ExtractError::Failed("boom".to_string()))
    }
}

#[derive(Default)]
struct GatedExtractor {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl ContentExtractor for GatedExtractor {
    async fn extract(&self, _document_html: &str) -> Result<Option<String>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(None)
    }
}

#[tokio::test]
async fn test_intro_details_more_levels() {
    let analyzer = analyzer("<body><h1>Intro</h1><h3>Details</h3><h2>More</h2></body>");
    let outline = analyzer.extract_outline().await.unwrap();
    let levels: Vec<u8> = outline.iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![1, 2, 2]);
    assert_eq!(analyzer.outline(), outline);
}

#[tokio::test]
async fn test_main_content_excludes_navigation() {
    let analyzer = analyzer(ARTICLE_PAGE).with_extractor(Arc::new(LandmarkExtractor::new()));
    let outline = analyzer.extract_outline().await.unwrap();
    let titles: Vec<&str> = outline.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Overview", "Details", "Overview"]);
    assert!(analyzer.analyzed_headings().iter().all(|h| !h.is_detached()));
}

#[tokio::test]
async fn test_extractor_failure_falls_back_to_full_page() {
    let analyzer = analyzer(ARTICLE_PAGE).with_extractor(Arc::new(FailingExtractor));
    let outline = analyzer.extract_outline().await.unwrap();
    assert_eq!(outline.len(), 4);
    assert_eq!(outline[0].title, "Site menu");
    assert!(OutlineEntry::is_normalized(&outline));
}

#[tokio::test]
async fn test_main_content_disabled_scans_full_page() {
    let config = AnalyzerConfig {
        use_main_content: false,
        ..AnalyzerConfig::default()
    };
    let analyzer = PageAnalyzer::new(page(ARTICLE_PAGE), config)
        .with_extractor(Arc::new(LandmarkExtractor::new()));
    let outline = analyzer.extract_outline().await.unwrap();
    assert_eq!(outline[0].title, "Site menu");
}

#[tokio::test]
async fn test_page_without_headings_is_empty() {
    let analyzer = analyzer("<body><p>Just text</p><h2>x</h2></body>");
    assert!(analyzer.extract_outline().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reentrant_extraction_is_rejected() {
    let extractor = Arc::new(GatedExtractor::default());
    let analyzer = Arc::new(
        analyzer("<body><h1>Alpha</h1><h2>Beta</h2></body>").with_extractor(extractor.clone()),
    );

    let first = tokio::spawn({
        let analyzer = Arc::clone(&analyzer);
        async move { analyzer.extract_outline().await }
    });
    extractor.entered.notified().await;
    assert!(analyzer.is_analyzing());

    let second = analyzer.handle(AnalyzerRequest::AnalyzePage).await;
    assert!(second.is_in_progress());
    assert_eq!(second.error.as_deref(), Some("Analysis already in progress"));

    extractor.release.notify_one();
    let outline = first.await.unwrap().unwrap();
    assert_eq!(outline.len(), 2);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    assert!(!analyzer.is_analyzing());
}

#[tokio::test]
async fn test_ids_are_stable_across_extractions() {
    let analyzer = analyzer("<body><h1>Alpha</h1><h2>Beta</h2></body>");
    let first = analyzer.extract_outline().await.unwrap();
    let second = analyzer.extract_outline().await.unwrap();
    assert_eq!(first, second);
    assert!(first[0].id.starts_with("outline-genie-"));
}

#[tokio::test]
async fn test_navigate_to_missing_id() {
    let analyzer = analyzer("<body><h1>Alpha</h1></body>");
    let response = analyzer
        .handle(AnalyzerRequest::ScrollToElement {
            item_data: ItemData::new("nowhere"),
        })
        .await;
    assert!(!response.success);
    assert_eq!(response.code, Some(ErrorCode::NotFound));
    assert_eq!(response.error.as_deref(), Some("Could not find element: nowhere"));
}

#[tokio::test]
async fn test_scroll_centers_element() {
    let filler = "<p>para</p>".repeat(100);
    let html = format!("<html><body>{}<h2 id=\"target\">Target</h2>{}</body></html>", filler, filler);
    let analyzer = analyzer(&html);

    let scroll = analyzer.locate_and_focus("target").unwrap();
    // Heading at y=2400 with height 24 in a 720px viewport.
    assert_eq!(scroll.top, 2052.0);
    assert_eq!(scroll.behavior, ScrollBehavior::Smooth);

    let page = analyzer.page().read();
    assert_eq!(page.last_scroll(), Some(scroll));
    assert_eq!(page.viewport().scroll_y, 2052.0);
}

#[tokio::test]
async fn test_scroll_target_is_clamped_at_top() {
    let analyzer = analyzer("<body><h1 id=\"top\">Top</h1><p>text</p></body>");
    let scroll = analyzer.locate_and_focus("top").unwrap();
    assert_eq!(scroll.top, 0.0);
}

#[tokio::test]
async fn test_highlight_style_is_inserted_once() {
    let analyzer = analyzer("<html><head></head><body><h1 id=\"a\">Alpha</h1></body></html>");
    analyzer.locate_and_focus("a").unwrap();
    analyzer.locate_and_focus("a").unwrap();

    let page = analyzer.page().read();
    let styles: Vec<_> = page
        .document()
        .elements()
        .filter(|n| page.document().element_id(*n) == Some("outline-genie-highlight-style"))
        .collect();
    assert_eq!(styles.len(), 1);
    let css = page.document().text_content(styles[0]);
    assert!(css.contains(".outline-genie-highlighted"));
}

#[tokio::test(start_paused = true)]
async fn test_highlight_clears_after_duration() {
    let analyzer = analyzer("<body><h1 id=\"a\">Alpha</h1></body>");
    analyzer.locate_and_focus("a").unwrap();

    let node = analyzer.page().read().document().get_element_by_id("a").unwrap();
    assert!(analyzer.page().read().document().has_class(node, "outline-genie-highlighted"));

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert!(analyzer.page().read().document().has_class(node, "outline-genie-highlighted"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!analyzer.page().read().document().has_class(node, "outline-genie-highlighted"));
    assert!(analyzer.page().read().highlighted().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_single_highlight_and_stale_timer() {
    let analyzer = analyzer("<body><h1 id=\"a\">Alpha</h1><h2 id=\"b\">Beta</h2></body>");
    let (a, b) = {
        let page = analyzer.page().read();
        (
            page.document().get_element_by_id("a").unwrap(),
            page.document().get_element_by_id("b").unwrap(),
        )
    };

    analyzer.locate_and_focus("a").unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    analyzer.locate_and_focus("b").unwrap();

    {
        let page = analyzer.page().read();
        assert_eq!(page.document().elements_with_class("outline-genie-highlighted"), vec![b]);
        assert!(!page.document().has_class(a, "outline-genie-highlighted"));
    }

    // The first timer fires here and must leave the newer highlight alone.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(analyzer.page().read().document().has_class(b, "outline-genie-highlighted"));

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(analyzer.page().read().document().elements_with_class("outline-genie-highlighted").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_removed_element_clear_is_noop() {
    let analyzer = analyzer("<body><h1 id=\"a\">Alpha</h1><p>rest</p></body>");
    analyzer.locate_and_focus("a").unwrap();

    {
        let mut page = analyzer.page().write();
        let node = page.document().get_element_by_id("a").unwrap();
        page.document_mut().remove_element(node);
    }
    tokio::time::sleep(Duration::from_millis(3500)).await;

    let response = analyzer
        .handle(AnalyzerRequest::ScrollToElement {
            item_data: ItemData::new("a"),
        })
        .await;
    assert_eq!(response.code, Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn test_second_overview_navigates_to_second_element() {
    let analyzer = analyzer(ARTICLE_PAGE).with_extractor(Arc::new(LandmarkExtractor::new()));
    let outline = analyzer.extract_outline().await.unwrap();
    assert_ne!(outline[0].id, outline[2].id);

    let response = analyzer.handle(AnalyzerRequest::scroll_to(&outline[2])).await;
    assert!(response.success);

    let page = analyzer.page().read();
    let live = page.document().headings();
    assert_eq!(page.highlighted(), Some(live[3]));
    assert_eq!(page.document().text_content(live[3]), "Overview");
}

#[tokio::test]
async fn test_ping_and_get_outline() {
    let analyzer = analyzer("<body><h1>Alpha</h1></body>");
    assert_eq!(analyzer.handle(AnalyzerRequest::Ping).await, AnalyzerResponse::ok());

    let before = analyzer.handle(AnalyzerRequest::GetOutline).await;
    assert_eq!(before.outline, Some(Vec::new()));

    analyzer.extract_outline().await.unwrap();
    let after = analyzer.handle(AnalyzerRequest::GetOutline).await;
    assert_eq!(after.outline.unwrap().len(), 1);
}

#[tokio::test]
async fn test_handle_json_unknown_and_malformed() {
    let analyzer = analyzer("<body><h1>Alpha</h1></body>");

    let unknown = analyzer.handle_json(r#"{"action":"summarize"}"#).await.unwrap();
    let unknown: AnalyzerResponse = serde_json::from_str(&unknown).unwrap();
    assert_eq!(unknown, AnalyzerResponse::unknown_action());

    let malformed = analyzer.handle_json("not json").await.unwrap();
    let malformed: AnalyzerResponse = serde_json::from_str(&malformed).unwrap();
    assert!(!malformed.success);
    assert_eq!(malformed.code, Some(ErrorCode::Internal));

    let analyzed = analyzer.handle_json(r#"{"action":"analyzePage"}"#).await.unwrap();
    assert!(analyzed.contains("\"title\":\"Alpha\""));
}
