use crate::models::{DirContents, Page};

/// Slices `labels` into page `page_index`. An index past the end is clamped
/// to the last page so a stale cursor still shows something.
#[must_use]
pub fn paginate<T: Clone>(labels: &[T], page_index: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page_count = labels.len().div_ceil(page_size).max(1);
    let page_index = page_index.min(page_count - 1);
    let start = page_index * page_size;
    let end = (start + page_size).min(labels.len());

    Page {
        labels: labels[start..end].to_vec(),
        page_index,
        has_prev: page_index > 0,
        has_next: end < labels.len(),
    }
}

/// `"{icon} {name}"` labels, folders first, each group in listing order.
#[must_use]
pub fn folder_labels(contents: &DirContents) -> Vec<String> {
    contents
        .folders
        .iter()
        .map(|folder| format!("{} {}", folder.icon, folder.name))
        .chain(
            contents
                .items
                .iter()
                .map(|item| format!("{} {}", item.icon, item.name)),
        )
        .collect()
}
