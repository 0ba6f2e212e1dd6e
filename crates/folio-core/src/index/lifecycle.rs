use super::natural::natural_cmp;
use super::{IndexSnapshot, SearchRow};
use crate::models::{ItemKind, ItemSummary};

impl IndexSnapshot {
    /// Inserts or replaces one item summary without re-walking the folder.
    pub fn upsert_item(&mut self, dir: &str, name: &str, kind: ItemKind) {
        let summary = ItemSummary {
            name: name.to_string(),
            icon: kind.icon().to_string(),
            kind,
        };
        let items = &mut self.entries.entry(dir.to_string()).or_default().items;
        match items.binary_search_by(|probe| natural_cmp(&probe.name, name)) {
            Ok(idx) => items[idx] = summary,
            Err(idx) => items.insert(idx, summary),
        }

        if let Some(row) = self
            .rows
            .iter_mut()
            .find(|row| !row.is_folder && row.parent == dir && row.name == name)
        {
            row.kind = Some(kind);
        } else {
            self.rows.push(SearchRow {
                name: name.to_string(),
                parent: dir.to_string(),
                is_folder: false,
                kind: Some(kind),
            });
        }
    }

    /// Drops one item summary; returns whether it was listed.
    pub fn remove_item(&mut self, dir: &str, name: &str) -> bool {
        let mut removed = false;
        if let Some(contents) = self.entries.get_mut(dir) {
            let before = contents.items.len();
            contents.items.retain(|item| item.name != name);
            removed = contents.items.len() != before;
        }
        self.rows
            .retain(|row| row.is_folder || row.parent != dir || row.name != name);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_keeps_natural_order_and_replaces_existing() {
        let mut snapshot = IndexSnapshot::new();
        snapshot.upsert_item("Shows", "Episode 10", ItemKind::Copy);
        snapshot.upsert_item("Shows", "Episode 2", ItemKind::Copy);
        snapshot.upsert_item("Shows", "Episode 1", ItemKind::Copy);
        snapshot.upsert_item("Shows", "Episode 2", ItemKind::Url);

        let contents = snapshot.dir_contents("Shows");
        let names = contents
            .items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Episode 1", "Episode 2", "Episode 10"]);
        assert_eq!(contents.items[1].kind, ItemKind::Url);
        assert_eq!(snapshot.rows().len(), 3);
        assert!(
            snapshot
                .rows()
                .iter()
                .any(|row| row.name == "Episode 2" && row.kind == Some(ItemKind::Url))
        );
    }

    #[test]
    fn remove_item_drops_listing_and_search_row() {
        let mut snapshot = IndexSnapshot::new();
        snapshot.upsert_item("Shows", "Pilot", ItemKind::Copy);
        assert!(snapshot.remove_item("Shows", "Pilot"));
        assert!(!snapshot.remove_item("Shows", "Pilot"));
        assert!(snapshot.dir_contents("Shows").items.is_empty());
        assert!(snapshot.rows().is_empty());
    }
}
