use super::*;
use crate::objects::ObjectId;
use crate::structure::Destination;
use lopdf::dictionary;
use tempfile::TempDir;

/// Document whose pages sit under an intermediate `/Pages` node that
/// carries the `/MediaBox`.
fn nested_document(page_count: usize) -> (Document, Vec<LoObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let middle_id = doc.new_object_id();
    let page_ids: Vec<LoObjectId> = (0..page_count)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => middle_id,
            })
        })
        .collect();
    let kids: Vec<LoObject> = page_ids.iter().map(|&id| id.into()).collect();
    doc.objects.insert(
        middle_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => pages_id,
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    doc.objects.insert(
        pages_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![middle_id.into()],
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    (doc, page_ids)
}

fn set_catalog_entry(doc: &mut Document, key: &str, value: LoObject) {
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_dictionary_mut(catalog_id).unwrap().set(key, value);
}

fn page_ref(id: LoObjectId) -> Object {
    Object::Reference(id_from_lopdf(id))
}

fn save_and_reopen(file: &mut PdfFile) -> (TempDir, PdfFile) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.pdf");
    file.save(&path, &SaveOptions::default()).unwrap();
    let reopened = PdfFile::open(&path).unwrap();
    (dir, reopened)
}

#[test]
fn test_pages_follow_nested_tree_order() {
    let (doc, ids) = nested_document(3);
    let file = PdfFile::from_document(doc);
    assert_eq!(file.page_count(), 3);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(file.page(i + 1).unwrap().id(), id_from_lopdf(*id));
        assert_eq!(
            file.page_number(PageHandle::new(id_from_lopdf(*id))),
            Some(i + 1)
        );
    }
    assert!(file.page(4).is_err());
}

#[test]
fn test_swap_is_written_on_save_and_keeps_inherited_media_box() {
    let (doc, ids) = nested_document(3);
    let mut file = PdfFile::from_document(doc);
    let first = file.page(1).unwrap();
    let third = file.page(3).unwrap();
    file.set_page(1, third).unwrap();
    file.set_page(3, first).unwrap();

    let (_dir, reopened) = save_and_reopen(&mut file);
    let order: Vec<LoObjectId> = reopened.document().get_pages().into_values().collect();
    assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
    for id in order {
        let page = reopened.document().get_dictionary(id).unwrap();
        assert!(page.has(b"MediaBox"));
    }
}

#[test]
fn test_remove_page_shrinks_saved_document() {
    let (doc, ids) = nested_document(4);
    let mut file = PdfFile::from_document(doc);
    file.clear_page(2).unwrap();
    file.remove_page(2).unwrap();
    assert_eq!(file.page_count(), 3);

    let (_dir, reopened) = save_and_reopen(&mut file);
    let order: Vec<LoObjectId> = reopened.document().get_pages().into_values().collect();
    assert_eq!(order, vec![ids[0], ids[2], ids[3]]);
}

#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = PdfFile::open(dir.path().join("absent.pdf"));
    assert!(matches!(result, Err(NavError::Open(_))));
}

#[test]
fn test_outline_write_then_read() {
    let (doc, ids) = nested_document(2);
    let mut file = PdfFile::from_document(doc);
    let first = file.page(1).unwrap();
    let second = file.page(2).unwrap();

    let mut intro = OutlineItem::new("Intro").with_destination(Destination::fit(first));
    intro.add_child(OutlineItem::new("Détails").with_destination(Destination::fit(second)));
    let mut end = OutlineItem::new("End").closed();
    end.add_child(OutlineItem::new("Appendix"));
    let items = vec![intro, end];

    file.write_outline(&items).unwrap();
    assert_eq!(file.read_outline().unwrap(), items);

    let (_dir, reopened) = save_and_reopen(&mut file);
    let read = reopened.read_outline().unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[0].children[0].title, "Détails");
    assert_eq!(
        read[0].target,
        Some(Object::Array(vec![page_ref(ids[0]), Object::name("Fit")]))
    );
    assert!(!read[1].open);
}

#[test]
fn test_empty_outline_removes_entry() {
    let (doc, _) = nested_document(1);
    let mut file = PdfFile::from_document(doc);
    file.write_outline(&[OutlineItem::new("Only")]).unwrap();
    file.write_outline(&[]).unwrap();
    assert!(file.read_outline().unwrap().is_empty());
    assert!(!file.catalog().unwrap().has(b"Outlines"));
}

#[test]
fn test_outline_loop_is_cut() {
    let (mut doc, _) = nested_document(1);
    let item_id = doc.new_object_id();
    let outlines_id = doc.new_object_id();
    doc.objects.insert(
        item_id,
        LoObject::Dictionary(dictionary! {
            "Title" => LoObject::string_literal("Loop"),
            "Parent" => outlines_id,
            "Next" => item_id,
        }),
    );
    doc.objects.insert(
        outlines_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => item_id,
            "Last" => item_id,
            "Count" => 1,
        }),
    );
    set_catalog_entry(&mut doc, "Outlines", outlines_id.into());

    let file = PdfFile::from_document(doc);
    let items = file.read_outline().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Loop");
}

#[test]
fn test_outline_goto_action_is_read_as_target() {
    let (mut doc, ids) = nested_document(2);
    let item_id = doc.new_object_id();
    let outlines_id = doc.new_object_id();
    doc.objects.insert(
        item_id,
        LoObject::Dictionary(dictionary! {
            "Title" => LoObject::String(vec![0xFE, 0xFF, 0x00, 0x41], lopdf::StringFormat::Hexadecimal),
            "Parent" => outlines_id,
            "A" => dictionary! {
                "S" => "GoTo",
                "D" => vec![ids[1].into(), "Fit".into()],
            },
        }),
    );
    doc.objects.insert(
        outlines_id,
        LoObject::Dictionary(dictionary! {
            "First" => item_id,
            "Last" => item_id,
        }),
    );
    set_catalog_entry(&mut doc, "Outlines", outlines_id.into());

    let items = PdfFile::from_document(doc).read_outline().unwrap();
    assert_eq!(items[0].title, "A");
    assert_eq!(
        items[0].target,
        Some(Object::Array(vec![page_ref(ids[1]), Object::name("Fit")]))
    );
}

fn document_with_destinations() -> (Document, Vec<LoObjectId>, LoObjectId) {
    let (mut doc, ids) = nested_document(3);
    let indirect_id = doc.add_object(LoObject::Array(vec![ids[2].into(), "Fit".into()]));
    let leaf_id = doc.add_object(dictionary! {
        "Names" => vec![
            LoObject::string_literal("intro"),
            LoObject::Array(vec![ids[0].into(), "XYZ".into(), 0.into(), 792.into(), LoObject::Null]),
            LoObject::string_literal("indirect"),
            indirect_id.into(),
            LoObject::string_literal("wrapped"),
            LoObject::Dictionary(dictionary! {
                "D" => vec![ids[1].into(), "Fit".into()],
            }),
        ],
    });
    let dests_id = doc.add_object(dictionary! {
        "Kids" => vec![leaf_id.into()],
    });
    set_catalog_entry(
        &mut doc,
        "Names",
        LoObject::Dictionary(dictionary! { "Dests" => dests_id }),
    );
    (doc, ids, indirect_id)
}

#[test]
fn test_destination_groups_follow_name_tree() {
    let (doc, ids, _) = document_with_destinations();
    let file = PdfFile::from_document(doc);
    let groups = file.destination_groups().unwrap();
    assert_eq!(groups.len(), 1);

    let group = &groups[0];
    let names: Vec<&str> = group.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["intro", "indirect", "wrapped"]);
    assert_eq!(
        group.get("indirect"),
        Some(&Object::Array(vec![page_ref(ids[2]), Object::name("Fit")]))
    );
    let wrapped = group.get("wrapped").and_then(Object::as_dict).unwrap();
    assert!(wrapped.get("D").and_then(Object::as_array).is_some());
}

#[test]
fn test_write_destination_group_updates_direct_and_indirect_values() {
    let (doc, ids, indirect_id) = document_with_destinations();
    let mut file = PdfFile::from_document(doc);
    let mut group = file.destination_groups().unwrap().remove(0);

    let to_first = Object::Array(vec![page_ref(ids[0]), Object::name("Fit")]);
    let to_third = Object::Array(vec![page_ref(ids[2]), Object::name("Fit")]);
    for (name, value) in group.iter_mut() {
        match name {
            "intro" => *value = to_third.clone(),
            "indirect" => *value = to_first.clone(),
            _ => {}
        }
    }
    file.write_destination_group(&group).unwrap();

    let reread = file.destination_groups().unwrap().remove(0);
    assert_eq!(reread.get("intro"), Some(&to_third));
    assert_eq!(reread.get("indirect"), Some(&to_first));
    let stored = file.document().get_object(indirect_id).unwrap();
    assert_eq!(from_lopdf(stored), to_first);
}

#[test]
fn test_odd_leaf_does_not_hide_other_leaves() {
    let (mut doc, ids) = nested_document(2);
    let broken_leaf = doc.add_object(dictionary! {
        "Names" => vec![LoObject::string_literal("orphan")],
    });
    let good_leaf = doc.add_object(dictionary! {
        "Names" => vec![
            LoObject::string_literal("ok"),
            LoObject::Array(vec![ids[1].into(), "Fit".into()]),
        ],
    });
    let dests_id = doc.add_object(dictionary! {
        "Kids" => vec![broken_leaf.into(), good_leaf.into()],
    });
    set_catalog_entry(
        &mut doc,
        "Names",
        LoObject::Dictionary(dictionary! { "Dests" => dests_id }),
    );
    let file = PdfFile::from_document(doc);

    let groups = file.destination_groups().unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].is_empty());
    assert_eq!(groups[1].id(), GroupId(1));

    let pages = crate::links::resolve_links(&file).unwrap();
    assert_eq!(pages.get("ok"), Some(&2));
    assert_eq!(pages.get("orphan"), None);
}

#[test]
fn test_unknown_group_is_rejected() {
    let (doc, _) = nested_document(1);
    let mut file = PdfFile::from_document(doc);
    let group = DestinationGroup::new(GroupId(3), Vec::new());
    assert!(matches!(
        file.write_destination_group(&group),
        Err(NavError::InvalidStructure(_))
    ));
}

#[test]
fn test_annotations_resolve_action() {
    let (mut doc, ids) = nested_document(2);
    let action_id = doc.add_object(dictionary! {
        "S" => "GoTo",
        "D" => vec![ids[1].into(), "Fit".into()],
    });
    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
        "A" => action_id,
    });
    doc.get_dictionary_mut(ids[0])
        .unwrap()
        .set("Annots", vec![LoObject::from(annot_id)]);

    let file = PdfFile::from_document(doc);
    let annots = file.annotations(1).unwrap();
    assert_eq!(annots.len(), 1);
    assert_eq!(annots[0].get_name("Subtype"), Some("Link"));
    let action = annots[0].get_dict("A").unwrap();
    assert_eq!(action.get_name("S"), Some("GoTo"));
    assert_eq!(
        action.get("D"),
        Some(&Object::Array(vec![page_ref(ids[1]), Object::name("Fit")]))
    );
    assert!(file.annotations(2).unwrap().is_empty());
    assert_eq!(
        file.page(1).unwrap().id(),
        ObjectId::from(ids[0])
    );
}
