use rand::Rng;
use rand::seq::IndexedRandom;

use crate::index::IndexSnapshot;
use crate::models::Suggestion;
use crate::path::{join, normalize};

/// Picks one random entry to suggest from `path`.
///
/// A folder with a manual suggestion list draws from that list. Otherwise
/// every item below `path` and every unlocked subfolder is a candidate;
/// locked subfolders are skipped together with everything inside them.
pub fn suggest_from<R: Rng + ?Sized>(
    snapshot: &IndexSnapshot,
    path: &str,
    rng: &mut R,
) -> Option<Suggestion> {
    let key = normalize(path);

    if let Some(manual) = snapshot
        .folder_config(&key)
        .and_then(|config| config.manual_suggestions())
    {
        let name = manual.choose(rng)?;
        let is_folder = snapshot
            .entry(&key)
            .is_some_and(|contents| contents.folder(name).is_some());
        return Some(Suggestion {
            name: name.clone(),
            path: key,
            is_folder,
        });
    }

    let candidates = collect_candidates(snapshot, &key);
    candidates.choose(rng).cloned()
}

/// Walk order: items of a folder, then each unlocked subfolder followed by
/// its own candidates.
#[must_use]
pub fn collect_candidates(snapshot: &IndexSnapshot, root: &str) -> Vec<Suggestion> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_string()];
    while let Some(key) = stack.pop() {
        let Some(contents) = snapshot.entry(&key) else {
            continue;
        };
        out.extend(contents.items.iter().map(|item| Suggestion {
            name: item.name.clone(),
            path: key.clone(),
            is_folder: false,
        }));
        for folder in contents.folders.iter().rev() {
            if folder.lock_target.is_some() {
                continue;
            }
            out.push(Suggestion {
                name: folder.name.clone(),
                path: key.clone(),
                is_folder: true,
            });
            stack.push(join(&key, &folder.name));
        }
    }
    out
}
