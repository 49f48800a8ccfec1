//! Integration tests for outline extraction.

use outlinerank::{
    extract_outline, extract_outline_with_options, outline_to_json, HeadingLevel, JsonFormat,
    LayoutOptions, OutlineExtractor, TextRun, TitleFallback,
};

fn body(page: u32, from: f32, count: usize) -> Vec<TextRun> {
    (0..count)
        .map(|i| {
            TextRun::new(page, format!("Regular paragraph text {} on page {}.", i, page), 12.0)
                .at(72.0, from + i as f32 * 14.0)
        })
        .collect()
}

fn travel_guide() -> Vec<TextRun> {
    let mut runs = vec![
        TextRun::new(1, "Travel Guide", 24.0).at(72.0, 50.0),
        TextRun::new(1, "1. Introduction", 16.0)
            .with_bold(true)
            .at(72.0, 100.0),
    ];
    runs.extend(body(1, 130.0, 8));
    runs.push(
        TextRun::new(2, "2. Activities", 16.0)
            .with_bold(true)
            .at(72.0, 60.0),
    );
    runs.extend(body(2, 90.0, 8));
    runs
}

fn headings(runs: &[TextRun]) -> Vec<(HeadingLevel, String, u32)> {
    extract_outline("doc.pdf", runs)
        .outline
        .into_iter()
        .map(|n| (n.level, n.text, n.page))
        .collect()
}

#[test]
fn test_travel_guide() {
    let outline = extract_outline("guide.pdf", &travel_guide());
    assert_eq!(outline.title, "Travel Guide");
    assert_eq!(
        headings(&travel_guide()),
        vec![
            (HeadingLevel::H1, "1. Introduction".to_string(), 1),
            (HeadingLevel::H1, "2. Activities".to_string(), 2),
        ]
    );
}

#[test]
fn test_travel_guide_minimal_runs() {
    let runs = vec![
        TextRun::new(1, "Travel Guide", 24.0).at(72.0, 50.0),
        TextRun::new(1, "1. Introduction", 18.0)
            .with_bold(true)
            .at(72.0, 100.0),
        TextRun::new(
            1,
            "The south of France offers beaches, vineyards and old hill towns.",
            12.0,
        )
        .at(72.0, 130.0),
        TextRun::new(2, "2. Activities", 18.0)
            .with_bold(true)
            .at(72.0, 60.0),
    ];

    let outline = extract_outline("guide.pdf", &runs);
    assert_eq!(outline.title, "Travel Guide");
    assert_eq!(
        headings(&runs),
        vec![
            (HeadingLevel::H1, "1. Introduction".to_string(), 1),
            (HeadingLevel::H1, "2. Activities".to_string(), 2),
        ]
    );
}

#[test]
fn test_first_page_heading_becomes_title() {
    let mut runs =
        vec![TextRun::new(1, "Prepared for internal circulation.", 12.0).at(72.0, 40.0)];
    runs.push(TextRun::new(1, "Safety Procedures", 15.0).with_bold(true).at(72.0, 90.0));
    runs.extend(body(1, 120.0, 6));

    let outline = extract_outline("safety.pdf", &runs);
    assert_eq!(outline.title, "Safety Procedures");
    assert!(outline.outline.is_empty());
}

#[test]
fn test_outline_json_shape() {
    let json = outline_to_json("guide.pdf", &travel_guide(), JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        concat!(
            r#"{"title":"Travel Guide","outline":["#,
            r#"{"level":"H1","text":"1. Introduction","page":1},"#,
            r#"{"level":"H1","text":"2. Activities","page":2}]}"#
        )
    );
}

#[test]
fn test_numbered_headings_nest() {
    let mut runs = vec![TextRun::new(1, "Operations Manual", 24.0).at(72.0, 40.0)];
    runs.extend(body(1, 80.0, 4));
    runs.push(TextRun::new(1, "3. Maintenance", 16.0).with_bold(true).at(72.0, 160.0));
    runs.extend(body(1, 190.0, 3));
    runs.push(TextRun::new(1, "3.1 Daily Checks", 16.0).with_bold(true).at(72.0, 250.0));
    runs.extend(body(1, 280.0, 3));
    runs.push(TextRun::new(1, "3.1.2 Filters", 16.0).with_bold(true).at(72.0, 340.0));
    runs.extend(body(1, 370.0, 3));

    let levels: Vec<HeadingLevel> = headings(&runs).into_iter().map(|(l, _, _)| l).collect();
    assert_eq!(levels, vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]);
}

#[test]
fn test_running_header_is_not_a_heading() {
    let mut runs = vec![TextRun::new(1, "Staff Handbook", 24.0).at(72.0, 60.0)];
    for page in 1..=4 {
        runs.push(TextRun::new(page, "ACME Internal", 14.0).with_bold(true).at(72.0, 20.0));
        runs.push(
            TextRun::new(page, format!("Chapter {}", page), 18.0)
                .with_bold(true)
                .at(72.0, 100.0),
        );
        runs.extend(body(page, 130.0, 5));
    }

    let outline = extract_outline("handbook.pdf", &runs);
    assert_eq!(outline.title, "Staff Handbook");
    assert!(outline.outline.iter().all(|n| n.text != "ACME Internal"));
    assert_eq!(outline.outline.len(), 4);
}

#[test]
fn test_title_never_repeated_in_outline() {
    let outline = extract_outline("guide.pdf", &travel_guide());
    assert!(outline.outline.iter().all(|n| n.text != outline.title));
    assert!(outline.outline.iter().all(|n| n.level != HeadingLevel::Title));
}

#[test]
fn test_headings_in_reading_order() {
    let outline = extract_outline("guide.pdf", &travel_guide());
    let pages: Vec<u32> = outline.outline.iter().map(|n| n.page).collect();
    let mut sorted = pages.clone();
    sorted.sort();
    assert_eq!(pages, sorted);
}

#[test]
fn test_plain_document_has_empty_outline() {
    let outline = extract_outline("notes.pdf", &body(1, 50.0, 10));
    assert!(outline.outline.is_empty());
    assert_eq!(outline.title, "Regular paragraph text 0 on page 1.");
}

#[test]
fn test_title_fallback_policies() {
    let runs = body(1, 50.0, 6);

    let by_name = LayoutOptions::new().with_title_fallback(TitleFallback::FileName);
    let outline = extract_outline_with_options("quarterly-notes.pdf", &runs, &by_name).unwrap();
    assert_eq!(outline.title, "quarterly-notes");

    let untitled = LayoutOptions::new().with_title_fallback(TitleFallback::Untitled);
    let outline = extract_outline_with_options("quarterly-notes.pdf", &runs, &untitled).unwrap();
    assert_eq!(outline.title, "");
}

#[test]
fn test_extraction_is_deterministic() {
    let extractor = OutlineExtractor::default();
    let first = extractor.extract("guide.pdf", &travel_guide());
    for _ in 0..5 {
        assert_eq!(extractor.extract("guide.pdf", &travel_guide()), first);
    }
}
