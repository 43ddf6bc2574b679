use std::fs;

use csvmap_model::{ColumnName, Mapping, SchemaField, SchemaRegistry, TypeTag};
use csvmap_store::TemplateRepository;
use tempfile::TempDir;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new(vec![
        SchemaField::new("user_id", TypeTag::String).required(true),
        SchemaField::new("email", TypeTag::String).required(true),
        SchemaField::new("age", TypeTag::Integer),
    ])
    .expect("registry")
}

fn sample_mapping(registry: &SchemaRegistry) -> Mapping {
    let mut mapping = Mapping::unmapped(registry);
    mapping.set("user_id", Some(ColumnName::new("id").expect("column")));
    mapping.set("email", Some(ColumnName::new("mail").expect("column")));
    mapping
}

#[test]
fn save_and_get_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let repo = TemplateRepository::new(dir.path().join("mappings")).expect("create repo");
    let registry = registry();

    let saved = repo
        .save("crm export", "weekly CRM dump", &sample_mapping(&registry))
        .expect("save template");
    assert_eq!(saved.id.len(), 12);
    assert!(saved.id.chars().all(|ch| ch.is_ascii_hexdigit()));
    assert_eq!(saved.created_at, saved.updated_at);
    assert!(repo.base_dir().join(format!("{}.json", saved.id)).exists());

    let loaded = repo
        .get(&saved.id)
        .expect("get template")
        .expect("template should exist");
    assert_eq!(loaded, saved);
    // Unmapped fields are not stored.
    assert_eq!(loaded.mapping.len(), 2);
    assert!(!loaded.mapping.contains_key("age"));

    let mapping = loaded.to_mapping(&registry).expect("to mapping");
    assert_eq!(mapping.len(), 3);
    assert!(mapping.get("age").is_none());
    assert_eq!(mapping.get("email").map(ColumnName::as_str), Some("mail"));
}

#[test]
fn ids_differ_for_same_name() {
    let dir = TempDir::new().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let mapping = sample_mapping(&registry());
    let first = repo.save("same", "", &mapping).expect("save");
    let second = repo.save("same", "", &mapping).expect("save");
    assert_ne!(first.id, second.id);
}

#[test]
fn list_is_newest_first_and_skips_junk() {
    let dir = TempDir::new().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let mapping = sample_mapping(&registry());
    let older = repo.save("older", "", &mapping).expect("save");
    std::thread::sleep(std::time::Duration::from_millis(5));
    let newer = repo.save("newer", "", &mapping).expect("save");
    fs::write(dir.path().join("broken.json"), "{not json").expect("write junk");
    fs::write(dir.path().join("notes.txt"), "ignore me").expect("write junk");

    let listed = repo.list().expect("list");
    let ids: Vec<&str> = listed.iter().map(|summary| summary.id.as_str()).collect();
    assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);
    assert_eq!(listed[0].field_count, 2);
}

#[test]
fn update_keeps_created_at() {
    let dir = TempDir::new().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let registry = registry();
    let saved = repo
        .save("v1", "first", &sample_mapping(&registry))
        .expect("save");

    let mut changed = sample_mapping(&registry);
    changed.set("age", Some(ColumnName::new("years").expect("column")));
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(repo.update(&saved.id, "v2", "second", &changed).expect("update"));

    let loaded = repo.get(&saved.id).expect("get").expect("exists");
    assert_eq!(loaded.name, "v2");
    assert_eq!(loaded.description, "second");
    assert_eq!(loaded.created_at, saved.created_at);
    assert!(loaded.updated_at > saved.updated_at);
    assert_eq!(loaded.mapping.get("age").map(String::as_str), Some("years"));

    assert!(!repo.update("abcdef012345", "x", "", &changed).expect("update"));
}

#[test]
fn delete_and_reject_bad_ids() {
    let dir = TempDir::new().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let saved = repo
        .save("gone", "", &sample_mapping(&registry()))
        .expect("save");

    assert!(repo.delete(&saved.id).expect("delete"));
    assert!(!repo.delete(&saved.id).expect("second delete"));
    assert!(repo.get(&saved.id).expect("get").is_none());

    assert!(repo.get("../secrets").is_err());
    assert!(repo.delete("").is_err());
}

#[test]
fn template_with_unknown_field_does_not_fit() {
    let dir = TempDir::new().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let mut mapping = sample_mapping(&registry());
    mapping.set("nickname", Some(ColumnName::new("nick").expect("column")));
    let saved = repo.save("extra", "", &mapping).expect("save");

    assert!(saved.to_mapping(&registry()).is_err());
}
