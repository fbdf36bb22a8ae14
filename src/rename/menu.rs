use indexmap::IndexSet;
use thiserror::Error;

use crate::avatar::MenuPages;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("menu page \"{page}\" opens itself through its own submenus")]
pub struct MenuCycle {
    pub page: String,
}

/// List every page reachable from `root` through submenu controls.
///
/// Depth-first, pre-order; the root itself is not included. A page reached
/// through two different controls appears twice. Submenu keys that name no
/// page are skipped. A control leading back to a page on the current path
/// is reported as [`MenuCycle`].
pub fn walk(pages: &MenuPages, root: &str) -> Result<Vec<String>, MenuCycle> {
    let mut out = Vec::new();
    let mut path = vec![root];
    walk_page(pages, root, &mut path, &mut out)?;
    Ok(out)
}

fn walk_page<'a>(
    pages: &'a MenuPages,
    key: &str,
    path: &mut Vec<&'a str>,
    out: &mut Vec<String>,
) -> Result<(), MenuCycle> {
    let Some(page) = pages.get(key) else {
        return Ok(());
    };
    for control in &page.controls {
        let Some(child) = control.child_page() else {
            continue;
        };
        if !pages.contains_key(child) {
            continue;
        }
        if path.contains(&child) {
            return Err(MenuCycle {
                page: child.to_string(),
            });
        }
        out.push(child.to_string());
        path.push(child);
        walk_page(pages, child, path, out)?;
        path.pop();
    }
    Ok(())
}

/// Root followed by everything [`walk`] finds.
pub fn all_pages(pages: &MenuPages, root: &str) -> Result<Vec<String>, MenuCycle> {
    let mut all = vec![root.to_string()];
    all.extend(walk(pages, root)?);
    Ok(all)
}

/// Pages (from `order`) with at least one control referencing `name`, each
/// once, in first-seen order.
pub fn find_references(pages: &MenuPages, order: &[String], name: &str) -> IndexSet<String> {
    let mut found = IndexSet::new();
    for key in order {
        let Some(page) = pages.get(key) else {
            continue;
        };
        if page.controls.iter().any(|c| c.references(name)) {
            found.insert(key.clone());
        }
    }
    found
}

/// Number of distinct controls referencing `name` across the distinct pages
/// in `order`. Reporting only.
pub fn count_controls_referencing(pages: &MenuPages, order: &[String], name: &str) -> usize {
    let distinct: IndexSet<&String> = order.iter().collect();
    distinct
        .into_iter()
        .filter_map(|key| pages.get(key))
        .flat_map(|page| &page.controls)
        .filter(|c| c.references(name))
        .count()
}
