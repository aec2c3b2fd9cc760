use std::sync::Arc;

use contact_book::prelude::*;
use contact_book::store::memory::MemoryStore;

fn manager() -> ContactManager {
    ContactManager::new(Arc::new(MemoryStore::new()))
}

async fn seed(manager: &ContactManager, names: &[&str]) -> Result<(), AppError> {
    for name in names {
        manager
            .create_contact(&ContactForm::new(name, "someone@x.com", "555-0100", None))
            .await?;
    }
    Ok(())
}

fn names_of(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(|c| c.full_name.as_str()).collect()
}

#[tokio::test]
async fn prefix_search_matches_exactly_the_starting_names() -> Result<(), AppError> {
    let manager = manager();
    seed(&manager, &["Ana Li", "Anaïs", "Andrew", "Bob"]).await?;

    let matches = manager.search_contacts_by_prefix("Ana").await?;
    let names = names_of(&matches);

    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Ana Li"));
    assert!(names.contains(&"Anaïs"));
    Ok(())
}

#[tokio::test]
async fn prefix_search_is_case_sensitive() -> Result<(), AppError> {
    let manager = manager();
    seed(&manager, &["Ana Li", "ana li"]).await?;

    let matches = manager.search_contacts_by_prefix("Ana").await?;
    assert_eq!(names_of(&matches), vec!["Ana Li"]);

    let matches = manager.search_contacts_by_prefix("ana").await?;
    assert_eq!(names_of(&matches), vec!["ana li"]);
    Ok(())
}

#[tokio::test]
async fn empty_term_matches_everything() -> Result<(), AppError> {
    let manager = manager();
    seed(&manager, &["Ana Li", "Bob", "Carla"]).await?;

    let matches = manager.search_contacts_by_prefix("").await?;
    assert_eq!(matches.len(), 3);
    Ok(())
}

#[tokio::test]
async fn no_substring_or_fuzzy_matching() -> Result<(), AppError> {
    let manager = manager();
    seed(&manager, &["Ana Li"]).await?;

    assert!(manager.search_contacts_by_prefix("na Li").await?.is_empty());
    assert!(manager.search_contacts_by_prefix("Li").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn created_contact_reaches_feed_and_matching_search() -> Result<(), AppError> {
    let manager = manager();
    let mut feed = manager.list_contacts().await?;

    let id = manager
        .create_contact(&ContactForm::new("Ana Li", "ana@x.com", "555-0100", None))
        .await?;

    let live = feed.changed().await?;
    assert!(live.iter().any(|c| c.id == id));

    let hits = manager.search_contacts_by_prefix("Ana").await?;
    assert!(hits.iter().any(|c| c.id == id));

    assert!(manager.search_contacts_by_prefix("Bob").await?.is_empty());

    feed.close();
    Ok(())
}
