use super::*;

fn entries(levels: &[u8]) -> Vec<OutlineEntry> {
    levels
        .iter()
        .enumerate()
        .map(|(i, level)| OutlineEntry::new(format!("e{}", i), *level, format!("Entry {}", i)))
        .collect()
}

fn levels(entries: &[OutlineEntry]) -> Vec<u8> {
    entries.iter().map(|e| e.level).collect()
}

fn scan(sequence: &AtomicU64) -> HeadingScan<'_> {
    HeadingScan {
        min_title_chars: 2,
        ids: IdGenerator {
            prefix: "og",
            sequence,
        },
    }
}

#[test]
fn test_normalize_intro_details_more() {
    let mut outline = entries(&[1, 3, 2]);
    normalize_levels(&mut outline);
    assert_eq!(levels(&outline), vec![1, 2, 2]);
}

#[test]
fn test_normalize_forces_first_to_one() {
    let mut outline = entries(&[3, 4, 6, 2]);
    normalize_levels(&mut outline);
    assert_eq!(levels(&outline), vec![1, 2, 3, 2]);
}

#[test]
fn test_normalize_never_raises() {
    let mut outline = entries(&[1, 2, 1, 1, 2]);
    normalize_levels(&mut outline);
    assert_eq!(levels(&outline), vec![1, 2, 1, 1, 2]);
}

#[test]
fn test_normalize_empty() {
    let mut outline: Vec<OutlineEntry> = Vec::new();
    normalize_levels(&mut outline);
    assert!(outline.is_empty());
}

#[test]
fn test_normalize_all_short_sequences() {
    // Every level sequence of length 1..=4 over h1..h6.
    let mut sequences: Vec<Vec<u8>> = (1..=6).map(|l| vec![l]).collect();
    let mut frontier = sequences.clone();
    for _ in 0..3 {
        let mut next = Vec::new();
        for seq in &frontier {
            for level in 1..=6 {
                let mut extended = seq.clone();
                extended.push(level);
                next.push(extended);
            }
        }
        sequences.extend(next.iter().cloned());
        frontier = next;
    }

    for seq in sequences {
        let mut outline = entries(&seq);
        normalize_levels(&mut outline);
        assert!(OutlineEntry::is_normalized(&outline), "{:?}", seq);
        for (normalized, original) in outline.iter().zip(&seq).skip(1) {
            assert!(normalized.level <= *original, "{:?}", seq);
        }
    }
}

#[test]
fn test_scan_live_skips_short_titles() {
    let mut doc = Document::parse(
        "<body><h1>Intro</h1><h2>A</h2><h2>   </h2><h3> ok </h3><h2>é</h2></body>",
    );
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_live(&mut doc);
    let titles: Vec<&str> = headings.iter().map(|h| h.entry.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "ok"]);
}

#[test]
fn test_scan_live_reuses_and_assigns_ids() {
    let mut doc = Document::parse("<body><h1 id=\"top\">Top</h1><h2>Second</h2></body>");
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_live(&mut doc);

    assert_eq!(headings[0].entry.id, "top");
    let generated = &headings[1].entry.id;
    assert!(generated.starts_with("og-"));
    assert_eq!(doc.get_element_by_id(generated), Some(doc.headings()[1]));
}

#[test]
fn test_scan_live_is_stable_across_runs() {
    let mut doc = Document::parse("<body><h1>One</h1><h2>Two</h2></body>");
    let sequence = AtomicU64::new(0);
    let first: Vec<String> = scan(&sequence)
        .scan_live(&mut doc)
        .into_iter()
        .map(|h| h.entry.id)
        .collect();
    let second: Vec<String> = scan(&sequence)
        .scan_live(&mut doc)
        .into_iter()
        .map(|h| h.entry.id)
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_scan_live_duplicate_author_ids_are_made_unique() {
    let mut doc = Document::parse("<body><h1 id=\"dup\">First</h1><h2 id=\"dup\">Second</h2></body>");
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_live(&mut doc);
    assert_eq!(headings[0].entry.id, "dup");
    assert_ne!(headings[1].entry.id, "dup");
    assert_eq!(
        doc.get_element_by_id(&headings[1].entry.id),
        Some(doc.headings()[1])
    );
}

#[test]
fn test_scan_fragment_maps_duplicates_in_order() {
    let mut live = Document::parse(
        "<body><nav><h2>Menu</h2></nav><article><h1>Overview</h1><p>x</p><h1>Overview</h1></article></body>",
    );
    let mut fragment = Document::parse_fragment("<h1>Overview</h1><p>x</p><h1>Overview</h1>");
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_fragment(&mut live, &mut fragment);

    assert_eq!(headings.len(), 2);
    assert_ne!(headings[0].entry.id, headings[1].entry.id);

    let live_headings = live.headings();
    assert_eq!(headings[0].handle, ElementHandle::Live(live_headings[1]));
    assert_eq!(headings[1].handle, ElementHandle::Live(live_headings[2]));
    assert_eq!(live.get_element_by_id(&headings[1].entry.id), Some(live_headings[2]));
}

#[test]
fn test_scan_fragment_keeps_existing_ids() {
    let mut live = Document::parse("<body><article><h1 id=\"story\">Story</h1></article></body>");
    let mut fragment = Document::parse_fragment("<h1 id=\"story\">Story</h1>");
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_fragment(&mut live, &mut fragment);
    assert_eq!(headings[0].entry.id, "story");
    assert!(!headings[0].is_detached());
}

#[test]
fn test_scan_fragment_unmatched_heading_stays_detached() {
    let mut live = Document::parse("<body><h1>Live title</h1></body>");
    let mut fragment = Document::parse_fragment("<h1>Rewritten title</h1>");
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_fragment(&mut live, &mut fragment);

    assert_eq!(headings.len(), 1);
    assert!(headings[0].is_detached());
    assert!(live.get_element_by_id(&headings[0].entry.id).is_none());
    assert!(fragment.get_element_by_id(&headings[0].entry.id).is_some());
}

#[test]
fn test_scan_fragment_ignores_id_owned_by_other_live_element() {
    let mut live = Document::parse("<body><p id=\"taken\">p</p><h2>Section</h2></body>");
    let mut fragment = Document::parse_fragment("<h2 id=\"taken\">Section</h2>");
    let sequence = AtomicU64::new(0);
    let headings = scan(&sequence).scan_fragment(&mut live, &mut fragment);

    assert_ne!(headings[0].entry.id, "taken");
    assert_eq!(
        live.get_element_by_id(&headings[0].entry.id),
        Some(live.headings()[0])
    );
}
