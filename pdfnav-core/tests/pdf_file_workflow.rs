//! Integration tests running whole workflows against PDF files on disk

use lopdf::{dictionary, Document, Object as LoObject, ObjectId as LoObjectId, Stream};
use pdfnav::annotations::{page_links, PageLinkOptions};
use pdfnav::links::{list_links, resolve_links, rewrite_links, RewriteOptions, TransformationMap};
use pdfnav::operations::{cut_page, remove_pages, split_pages, PageRanges};
use pdfnav::store::{DocumentStore, PdfFile, SaveOptions};
use pdfnav::toc::{export_toc, import_toc, parse_toc, ImportOptions};
use pdfnav::NavError;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A flat document of `count` pages, each page tagged with `/Marker n`
fn build_document(count: i64) -> (Document, Vec<LoObjectId>) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_ids: Vec<LoObjectId> = (1..=count)
        .map(|number| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Marker" => number,
            })
        })
        .collect();
    doc.objects.insert(
        pages_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<LoObject>>(),
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    (doc, page_ids)
}

fn write(dir: &TempDir, name: &str, doc: &mut Document) -> PathBuf {
    let path = dir.path().join(name);
    doc.save(&path).unwrap();
    path
}

fn markers(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"Marker")
                .unwrap()
                .as_i64()
                .unwrap()
        })
        .collect()
}

#[test]
fn test_toc_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let (mut doc, _) = build_document(5);
    let input = write(&dir, "input.pdf", &mut doc);
    let text = "Intro 1\n Background 2\n Methods 3\nResults 5\n";

    let mut file = PdfFile::open(&input).unwrap();
    let report = import_toc(&mut file, &parse_toc(text), &ImportOptions::default()).unwrap();
    assert_eq!(report.len(), 4);
    let output = dir.path().join("output.pdf");
    file.save(&output, &SaveOptions::default()).unwrap();

    let reopened = PdfFile::open(&output).unwrap();
    assert_eq!(export_toc(&reopened).unwrap(), text);
    assert_eq!(reopened.read_outline().unwrap()[0].children.len(), 2);
}

#[test]
fn test_rewrite_then_move_pages() {
    let dir = TempDir::new().unwrap();
    let (mut doc, ids) = build_document(6);
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let dests = dictionary! {
        "Names" => vec![
            LoObject::string_literal("Summary"),
            vec![ids[1].into(), "XYZ".into(), 0.into(), 700.into(), 1.into()].into(),
            LoObject::string_literal("Tables"),
            LoObject::Dictionary(dictionary! {
                "D" => vec![ids[3].into(), "Fit".into()],
            }),
        ],
    };
    doc.get_dictionary_mut(catalog_id)
        .unwrap()
        .set("Names", dictionary! { "Dests" => dests });
    let input = write(&dir, "input.pdf", &mut doc);

    let mut file = PdfFile::open(&input).unwrap();
    let map = TransformationMap::parse("Summary 5\n", None, None).unwrap();
    let options = RewriteOptions {
        coerce_to_fit: true,
        write_back: true,
        ..Default::default()
    };
    let report = rewrite_links(&mut file, &map, options).unwrap();
    assert_eq!(
        report.lines.lines(),
        [
            "Changing type of Summary link to 'Fit'",
            "Summary rewriting 5",
            "Tables 4"
        ]
    );

    // page 5 moves to the front; the destination follows the page
    cut_page(&mut file, 5, 1).unwrap();
    let output = dir.path().join("output.pdf");
    file.save(&output, &SaveOptions::default()).unwrap();
    assert_eq!(markers(&output), vec![5, 1, 2, 3, 4, 6]);

    let mut reopened = PdfFile::open(&output).unwrap();
    let pages = resolve_links(&reopened).unwrap();
    assert_eq!(pages.get("Summary"), Some(&1));
    assert_eq!(pages.get("Tables"), Some(&5));
    let listed = list_links(&mut reopened, true).unwrap();
    assert!(listed.lines.lines().contains(&"/Fit".to_string()));
}

#[test]
fn test_remove_ranges_from_file() {
    let dir = TempDir::new().unwrap();
    let (mut doc, _) = build_document(10);
    let input = write(&dir, "input.pdf", &mut doc);

    let mut file = PdfFile::open(&input).unwrap();
    remove_pages(&mut file, &PageRanges::parse("7,1,3-4").unwrap()).unwrap();
    let output = dir.path().join("output.pdf");
    file.save(&output, &SaveOptions::default()).unwrap();

    assert_eq!(markers(&output), vec![2, 5, 6, 8, 9, 10]);
}

#[test]
fn test_page_links_on_file() {
    let dir = TempDir::new().unwrap();
    let (mut doc, ids) = build_document(2);
    let link = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![72.into(), 700.into(), 200.into(), 720.into()],
        "A" => dictionary! {
            "S" => "GoTo",
            "D" => vec![ids[1].into(), "Fit".into()],
        },
    };
    let uri = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![72.into(), 600.into(), 200.into(), 620.into()],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => LoObject::string_literal("https://example.com"),
        },
    };
    let uri_id = doc.add_object(uri);
    doc.get_dictionary_mut(ids[0])
        .unwrap()
        .set("Annots", vec![LoObject::Dictionary(link), uri_id.into()]);
    let input = write(&dir, "input.pdf", &mut doc);

    let file = PdfFile::open(&input).unwrap();
    let options = PageLinkOptions {
        page: None,
        resolve: true,
    };
    let lines: Vec<String> = page_links(&file, &options)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1 72 700 200 720 internal ["));
    assert!(lines[0].ends_with("/Fit] 2"));
    assert_eq!(lines[1], "1 72 600 200 620 external https://example.com");
}

#[test]
fn test_out_of_range_target_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let (mut doc, _) = build_document(3);
    let input = write(&dir, "input.pdf", &mut doc);

    let mut file = PdfFile::open(&input).unwrap();
    let map = TransformationMap::parse("Summary 9\n", None, None).unwrap();
    let result = rewrite_links(&mut file, &map, RewriteOptions::default());

    assert!(matches!(result, Err(NavError::Configuration(_))));
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn test_split_part_keeps_only_its_own_content() {
    let dir = TempDir::new().unwrap();
    let (mut doc, ids) = build_document(3);
    let mut names = Vec::new();
    for (index, &page_id) in ids.iter().enumerate() {
        let marker = format!("MARKER_PAGE_{}", index + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, marker.into_bytes()));
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("Contents", content_id);
        names.push(LoObject::string_literal(format!("page{}", index + 1)));
        names.push(vec![page_id.into(), "Fit".into()].into());
    }
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_dictionary_mut(catalog_id)
        .unwrap()
        .set("Names", dictionary! { "Dests" => dictionary! { "Names" => names } });
    let input = write(&dir, "input.pdf", &mut doc);

    let file = PdfFile::open(&input).unwrap();
    let mut parts = split_pages(&file).unwrap();
    let output = dir.path().join("part-001.pdf");
    parts[0].save(&output, &SaveOptions::default()).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert!(contains(&bytes, b"MARKER_PAGE_1"));
    assert!(!contains(&bytes, b"MARKER_PAGE_2"));
    assert!(!contains(&bytes, b"MARKER_PAGE_3"));
    assert_eq!(markers(&output), vec![1]);
}
