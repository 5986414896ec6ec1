//! Link command handlers

use std::sync::mpsc::Receiver;

use anyhow::{bail, Context, Result};

use sclicky_core::{KeyValueStore, LinkId, LinkRegistry, RegistryError, RegistryEvent};

use crate::output::Output;
use crate::prompt::confirm;

/// Save a new link, then switch to the list view
pub fn add<S: KeyValueStore>(
    registry: &mut LinkRegistry<S>,
    url: String,
    platform: Option<String>,
    output: &Output,
) -> Result<()> {
    let events = registry.subscribe();

    let link = registry.add_link_labeled(&url, platform.as_deref())?;
    output.success(&format!("Saved link: {}", link.id));

    if switched_to_list(&events) {
        output.print_links(registry.links());
    } else {
        output.print_link(&link);
    }

    Ok(())
}

/// List every saved link in insertion order
pub fn list<S: KeyValueStore>(registry: &LinkRegistry<S>, output: &Output) -> Result<()> {
    output.print_links(registry.links());
    Ok(())
}

/// Show a single link
pub fn show<S: KeyValueStore>(registry: &LinkRegistry<S>, id: String, output: &Output) -> Result<()> {
    let link = resolve_id(registry, &id)?
        .and_then(|id| registry.get(&id))
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))?;

    output.print_link(link);
    Ok(())
}

/// Record a click and open the link in the system browser
pub fn open<S: KeyValueStore>(
    registry: &mut LinkRegistry<S>,
    id: String,
    no_browser: bool,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(registry, &id)?.unwrap_or_else(|| LinkId::from(id.trim()));
    let link = registry.record_click(&id)?;

    if no_browser {
        println!("{}", link.url);
        return Ok(());
    }

    ::open::that(&link.url).with_context(|| format!("Failed to open {}", link.url))?;
    output.success(&format!(
        "Opened {} (total clicks: {})",
        link.url, link.clicks
    ));

    Ok(())
}

/// Copy a link's URL to the system clipboard
///
/// Copying is not a click. Without a usable clipboard the URL is printed
/// instead.
pub fn copy<S: KeyValueStore>(registry: &LinkRegistry<S>, id: String, output: &Output) -> Result<()> {
    let url = copy_target(registry, &id)?;

    if output.is_quiet() {
        println!("{}", url);
        return Ok(());
    }

    match write_clipboard(&url) {
        Ok(()) => output.success("Link copied to clipboard!"),
        Err(e) => {
            output.warning(&format!("Clipboard unavailable ({}); printing the link instead", e));
            println!("{}", url);
        }
    }

    Ok(())
}

/// Delete a link
///
/// Deleting an id that matches nothing is not an error.
pub fn delete<S: KeyValueStore>(
    registry: &mut LinkRegistry<S>,
    id: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let Some(link_id) = resolve_id(registry, &id)? else {
        registry.delete_link(&LinkId::from(id.as_str()))?;
        output.message(&format!("No link matching '{}', nothing deleted.", id));
        return Ok(());
    };

    if output.should_prompt() && !yes {
        if let Some(link) = registry.get(&link_id) {
            println!("Delete link: {} - {}", link.id, link.url);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    registry.delete_link(&link_id)?;
    output.success(&format!("Deleted link: {}", link_id));

    Ok(())
}

/// Search links by url or platform
pub fn search<S: KeyValueStore>(
    registry: &LinkRegistry<S>,
    query: String,
    output: &Output,
) -> Result<()> {
    output.print_links(&registry.search(&query));
    Ok(())
}

/// URL of the link `id` resolves to
fn copy_target<S: KeyValueStore>(registry: &LinkRegistry<S>, id: &str) -> Result<String> {
    let link_id = resolve_id(registry, id)?.unwrap_or_else(|| LinkId::from(id.trim()));
    match registry.get(&link_id) {
        Some(link) => Ok(link.url.clone()),
        None => Err(RegistryError::NotFound(link_id).into()),
    }
}

fn write_clipboard(url: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(url)
}

/// Whether an add event asked for the list view
fn switched_to_list(events: &Receiver<RegistryEvent>) -> bool {
    events
        .try_iter()
        .any(|event| matches!(event, RegistryEvent::LinkAdded(_)))
}

/// Resolve a link id from its full text or a unique prefix
///
/// Returns `None` when nothing matches. A blank id matches nothing.
fn resolve_id<S: KeyValueStore>(registry: &LinkRegistry<S>, id: &str) -> Result<Option<LinkId>> {
    let id = id.trim();
    if id.is_empty() {
        return Ok(None);
    }

    let exact = LinkId::from(id);
    if registry.get(&exact).is_some() {
        return Ok(Some(exact));
    }

    // Negative and fractional ids are only reachable through their text form
    if let Some(link) = registry.links().iter().find(|l| l.id.to_string() == id) {
        return Ok(Some(link.id.clone()));
    }

    let matches: Vec<_> = registry
        .links()
        .iter()
        .filter(|l| l.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].id.clone())),
        _ => {
            eprintln!("Multiple links match '{}':", id);
            for link in &matches {
                eprintln!("  {} - {}", link.id, link.url);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use sclicky_core::{MemoryStore, Platform, ValidationError};

    const KEY: &str = "sclicky_links";

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn registry() -> LinkRegistry<MemoryStore> {
        LinkRegistry::open(MemoryStore::new(), KEY)
    }

    #[test]
    fn test_add_with_platform_label() {
        let mut registry = registry();

        add(
            &mut registry,
            "https://twitter.com/alice".to_string(),
            Some("twitter".to_string()),
            &quiet(),
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.links()[0].platform, Platform::Twitter);
    }

    #[test]
    fn test_add_invalid_url_fails() {
        let mut registry = registry();

        let err = add(&mut registry, "not a url".to_string(), None, &quiet()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidUrlFormat(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_switched_to_list_after_add() {
        let mut registry = registry();
        let events = registry.subscribe();

        registry.add_link("https://example.com", None).unwrap();
        assert!(switched_to_list(&events));
        assert!(!switched_to_list(&events));
    }

    #[test]
    fn test_open_without_browser_counts_click() {
        let mut registry = registry();
        let link = registry.add_link("https://example.com", None).unwrap();

        open(&mut registry, link.id.to_string(), true, &quiet()).unwrap();
        open(&mut registry, link.id.to_string(), true, &quiet()).unwrap();

        assert_eq!(registry.get(&link.id).unwrap().clicks, 2);
    }

    #[test]
    fn test_open_unknown_id_fails() {
        let mut registry = registry();

        let err = open(&mut registry, "42".to_string(), true, &quiet()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RegistryError>(),
            Some(&RegistryError::NotFound(LinkId::Number(42)))
        );
    }

    #[test]
    fn test_delete_by_prefix() {
        let mut registry = registry();
        let link = registry.add_link("https://example.com", None).unwrap();
        let full = link.id.to_string();

        // Ids are millisecond timestamps, so a long prefix is unique here
        delete(&mut registry, full[..full.len() - 1].to_string(), true, &quiet()).unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_ok() {
        let mut registry = registry();
        registry.add_link("https://example.com", None).unwrap();

        delete(&mut registry, "zzz".to_string(), true, &quiet()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.store().write_count(), 1);
    }

    #[test]
    fn test_resolve_id_exact_and_missing() {
        let mut registry = registry();
        let link = registry.add_link("https://example.com", None).unwrap();

        assert_eq!(
            resolve_id(&registry, &link.id.to_string()).unwrap(),
            Some(link.id)
        );
        assert_eq!(resolve_id(&registry, "nope").unwrap(), None);
    }

    #[test]
    fn test_resolve_id_ambiguous() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY,
                r#"[{"id": 101, "url": "https://one.com"}, {"id": 102, "url": "https://two.com"}]"#,
            )
            .unwrap();
        let registry = LinkRegistry::open(store, KEY);

        assert!(resolve_id(&registry, "10").is_err());
        assert_eq!(
            resolve_id(&registry, "102").unwrap(),
            Some(LinkId::Number(102))
        );
    }

    #[test]
    fn test_blank_id_matches_nothing() {
        let mut registry = registry();
        registry.add_link("https://example.com", None).unwrap();

        assert_eq!(resolve_id(&registry, "").unwrap(), None);
        assert_eq!(resolve_id(&registry, "   ").unwrap(), None);
    }

    #[test]
    fn test_delete_blank_id_keeps_links() {
        let mut registry = registry();
        registry.add_link("https://example.com", None).unwrap();

        delete(&mut registry, "  ".to_string(), true, &quiet()).unwrap();
        delete(&mut registry, String::new(), true, &quiet()).unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_open_blank_id_fails() {
        let mut registry = registry();
        let link = registry.add_link("https://example.com", None).unwrap();

        let err = open(&mut registry, String::new(), true, &quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RegistryError>(),
            Some(RegistryError::NotFound(_))
        ));
        assert_eq!(registry.get(&link.id).unwrap().clicks, 0);
    }

    #[test]
    fn test_resolve_negative_id_by_text() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY,
                r#"[{"id": -1, "url": "https://one.com"}, {"id": -10, "url": "https://two.com"}]"#,
            )
            .unwrap();
        let mut registry = LinkRegistry::open(store, KEY);

        let id = resolve_id(&registry, "-1").unwrap().unwrap();
        assert_eq!(registry.get(&id).unwrap().url, "https://one.com");

        delete(&mut registry, "-10".to_string(), true, &quiet()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_copy_does_not_count_click() {
        let mut registry = registry();
        let link = registry.add_link("https://example.com/page", None).unwrap();

        assert_eq!(
            copy_target(&registry, &link.id.to_string()).unwrap(),
            "https://example.com/page"
        );
        copy(&registry, link.id.to_string(), &quiet()).unwrap();

        assert_eq!(registry.get(&link.id).unwrap().clicks, 0);
        assert_eq!(registry.store().write_count(), 1);
    }

    #[test]
    fn test_copy_unknown_id_fails() {
        let registry = registry();

        let err = copy(&registry, "42".to_string(), &quiet()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RegistryError>(),
            Some(&RegistryError::NotFound(LinkId::Number(42)))
        );
    }
}
