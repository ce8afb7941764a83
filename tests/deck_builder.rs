//! End-to-end deck generation, read back through the package reader.

use deckgen::{
    ArtifactStore, DeckOptions, DeckRequest, Error, FontScale, OoxmlContainer, Sections, Template,
};
use quick_xml::events::Event;
use std::fs;

/// Text of every paragraph in a slide, with the run size if one is set.
fn paragraphs(xml: &str) -> Vec<(String, Option<u32>)> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut out = Vec::new();
    let mut current: Option<(String, Option<u32>)> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.local_name().as_ref() == b"p" => current = Some((String::new(), None)),
            Event::End(e) if e.local_name().as_ref() == b"p" => out.extend(current.take()),
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) if e.local_name().as_ref() == b"t" => in_text = false,
            Event::Empty(e) | Event::Start(e)
                if matches!(e.local_name().as_ref(), b"rPr" | b"endParaRPr") =>
            {
                let sz = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"sz")
                    .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok());
                if let (Some(p), Some(sz)) = (current.as_mut(), sz) {
                    p.1 = Some(sz);
                }
            }
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.0.push_str(&t.unescape().unwrap());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

fn slide(package: &OoxmlContainer, n: usize) -> Vec<(String, Option<u32>)> {
    paragraphs(&package.read_xml(&format!("ppt/slides/slide{}.xml", n)).unwrap())
}

fn slide_count(package: &OoxmlContainer) -> usize {
    package
        .list_files()
        .iter()
        .filter(|f| f.starts_with("ppt/slides/slide") && f.ends_with(".xml"))
        .count()
}

fn build(request: DeckRequest) -> OoxmlContainer {
    let template = Template::builtin().unwrap();
    let bytes = deckgen::generate_bytes(request, &template, &DeckOptions::default()).unwrap();
    OoxmlContainer::from_bytes(bytes).unwrap()
}

#[test]
fn test_flat_bullets_deck() {
    let package = build(DeckRequest::with_bullets("Q1 Report", ["a", "b", "c"]));
    assert_eq!(slide_count(&package), 2);

    let cover = slide(&package, 1);
    assert_eq!(cover[0].0, "Q1 Report");

    let base = Some(FontScale::BASE.as_centipoints());
    assert_eq!(
        slide(&package, 2),
        vec![
            ("General".to_string(), None),
            ("a".to_string(), base),
            ("b".to_string(), base),
            ("c".to_string(), base),
        ]
    );
}

#[test]
fn test_paginated_section_deck() {
    let bullets: Vec<String> = (1..=7).map(|i| format!("r{i}")).collect();
    let sections: Sections = vec![("Risks", bullets)].into_iter().collect();
    let package = build(DeckRequest::with_sections("X", sections));
    assert_eq!(slide_count(&package), 3);

    let first = slide(&package, 2);
    assert_eq!(first[0].0, "Risks (1/2)");
    assert_eq!(first.len(), 6);
    assert!(first[1..].iter().all(|(_, sz)| *sz == Some(2000)));

    let second = slide(&package, 3);
    assert_eq!(second[0].0, "Risks (2/2)");
    assert_eq!(&second[1..], &[("r6".to_string(), Some(2400)), ("r7".to_string(), Some(2400))]);
}

#[test]
fn test_sections_keep_request_order() {
    let json = r#"{"title":"Plan","sections":{"Zeta":["z"],"Alpha":["a"],"Empty":[],"Mid":["m"]}}"#;
    let request: DeckRequest = serde_json::from_str(json).unwrap();
    let package = build(request);

    let titles: Vec<String> = (2..=slide_count(&package))
        .map(|n| slide(&package, n)[0].0.clone())
        .collect();
    assert_eq!(titles, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn test_special_characters_survive() {
    let package = build(DeckRequest::with_bullets(
        "R&D <2025>",
        ["quotes \"here\"", "control\u{7}char", "cafe\u{301}"],
    ));
    assert_eq!(slide(&package, 1)[0].0, "R&D <2025>");
    let body = slide(&package, 2);
    assert_eq!(body[1].0, "quotes \"here\"");
    assert_eq!(body[2].0, "controlchar");
    assert_eq!(body[3].0, "caf\u{e9}");
}

#[test]
fn test_invalid_requests_leave_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let template = Template::builtin().unwrap();
    let options = DeckOptions::default();

    let both = DeckRequest {
        title: "T".to_string(),
        sections: Some(Sections::new()),
        bullets: Some(vec!["a".to_string()]),
    };
    let neither = DeckRequest {
        title: "T".to_string(),
        ..Default::default()
    };
    for request in [both, neither, DeckRequest::with_bullets(" ", ["a"])] {
        let err = deckgen::generate(request, &template, &options, &store).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_layout_error_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let template = Template::builtin().unwrap();
    // "Title Only" has no body region
    let options = DeckOptions::default().with_content_layout(deckgen::LayoutChain::preferring(2));

    let err = deckgen::generate(DeckRequest::with_bullets("T", ["a"]), &template, &options, &store)
        .unwrap_err();
    assert!(matches!(err, Error::Layout(_)));
    assert_eq!(err.public_message(), "the slide template cannot hold this content");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_artifacts_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let template = Template::builtin().unwrap();
    let options = DeckOptions::default();

    let mut names = Vec::new();
    for _ in 0..5 {
        let artifact =
            deckgen::generate(DeckRequest::with_bullets("T", ["a"]), &template, &options, &store).unwrap();
        assert!(artifact.path.starts_with(dir.path()));
        names.push(artifact.file_name);
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 5);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 5);
}

#[test]
fn test_generated_deck_works_as_template() {
    let template = Template::builtin().unwrap();
    let first = deckgen::generate_bytes(
        DeckRequest::with_bullets("First", ["a"; 11]),
        &template,
        &DeckOptions::default(),
    )
    .unwrap();

    let reloaded = Template::from_bytes(first).unwrap();
    let names: Vec<&str> = reloaded.layouts().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Title Slide", "Title and Content", "Title Only"]);

    let second = deckgen::generate_bytes(
        DeckRequest::with_bullets("Second", ["b"]),
        &reloaded,
        &DeckOptions::default(),
    )
    .unwrap();
    let package = OoxmlContainer::from_bytes(second).unwrap();
    assert_eq!(slide_count(&package), 2);
    assert_eq!(slide(&package, 1)[0].0, "Second");
    assert!(package.read_xml("docProps/core.xml").unwrap().contains("<dc:title>Second</dc:title>"));
}

#[test]
fn test_template_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corporate.pptx");
    let template = Template::builtin().unwrap();
    let bytes = deckgen::generate_bytes(
        DeckRequest::with_bullets("Template", ["x"]),
        &template,
        &DeckOptions::default(),
    )
    .unwrap();
    fs::write(&path, bytes).unwrap();

    let loaded = Template::open(&path).unwrap();
    assert_eq!(loaded.layouts().len(), 3);
    assert_eq!(loaded.layout(1).unwrap().part_name, "ppt/slideLayouts/slideLayout2.xml");
}

#[test]
fn test_missing_template_file() {
    let err = Template::open("/nonexistent/template.pptx").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
