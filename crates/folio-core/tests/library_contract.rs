use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_core::index::natural_cmp;
use folio_core::{
    AppConfig, Folio, Intent, ItemKind, ItemRecord, MemberStatus, SessionContext,
    StaticMembership,
};
use serde::Deserialize;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentTreeFixture {
    records: serde_json::Map<String, Value>,
    raw_files: serde_json::Map<String, Value>,
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("content_tree.json")
}

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("fixture parent")).expect("create fixture dir");
    fs::write(path, content).expect("write fixture file");
}

fn seeded_app() -> (TempDir, Folio) {
    let raw = fs::read_to_string(fixture_path()).expect("read content tree fixture");
    let fixture: ContentTreeFixture = serde_json::from_str(&raw).expect("parse fixture");

    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("content");
    for (relative, record) in &fixture.records {
        write_file(&root, relative, &record.to_string());
    }
    for (relative, content) in &fixture.raw_files {
        write_file(&root, relative, content.as_str().expect("raw file is a string"));
    }

    let provider = StaticMembership::new().with_status("@vault_members", 77, MemberStatus::Member);
    let app = Folio::with_membership(AppConfig::default().with_root(root), Arc::new(provider));
    app.initialize().expect("initialize");
    (temp, app)
}

#[test]
fn resolve_never_escapes_root_for_parent_segments() {
    let (temp, app) = seeded_app();
    let root = temp.path().join("content");
    let inputs = [
        "..",
        "../..",
        "../../../../etc/passwd",
        "Movies/../../..",
        "Movies/../../../outside",
        "..\\..\\windows",
        "./../Movies",
        "A/B/../../../../..",
        "/absolute/../../..",
        "Shows/Lost/../../../../Shows",
    ];
    for input in inputs {
        let resolved = app.resolve(input);
        assert!(resolved.starts_with(&root), "{input} escaped to {}", resolved.display());
    }
    for depth in 1..12 {
        let input = format!("{}x", "../".repeat(depth));
        assert!(app.resolve(&input).starts_with(&root));
    }
}

#[test]
fn listings_are_naturally_sorted_after_rebuild() {
    let (_temp, app) = seeded_app();
    app.rebuild(None).expect("rebuild");
    for path in ["", "Movies", "Library", "Shows/Lost", "Quiz"] {
        let contents = app.get_dir_contents(path).expect("contents");
        for pair in contents.folders.windows(2) {
            assert!(natural_cmp(&pair[0].name, &pair[1].name).is_le(), "{path} folders");
        }
        for pair in contents.items.windows(2) {
            assert!(natural_cmp(&pair[0].name, &pair[1].name).is_le(), "{path} items");
        }
    }
    let movies = app.get_dir_contents("Movies").expect("movies");
    let parts = movies
        .items
        .iter()
        .map(|item| item.name.as_str())
        .filter(|name| name.to_lowercase().starts_with("part"))
        .collect::<Vec<_>>();
    assert_eq!(parts, vec!["part 1", "Part 2", "Part 10"]);

    let seasons = app.get_dir_contents("Shows/Lost").expect("lost");
    let names = seasons
        .folders
        .iter()
        .map(|folder| folder.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["720p", "Season 2", "Season 10"]);
}

#[test]
fn search_ranks_exact_then_boundary_then_longer_matches() {
    let (_temp, app) = seeded_app();
    let hits = app.search("lost").expect("search");
    let movie_hits = hits
        .iter()
        .filter(|hit| hit.path == "Movies")
        .map(|hit| hit.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        movie_hits,
        vec!["Lost", "The Lost World", "Aquaman Lost City Adventures"]
    );
    assert!((hits[0].score - 100.0).abs() < f32::EPSILON);
}

#[test]
fn noise_names_never_surface() {
    let (_temp, app) = seeded_app();
    for query in ["720p", "720", "Season 2", "season", "Episode 4", "episode"] {
        let hits = app.search(query).expect("search");
        assert!(
            hits.iter().all(|hit| hit.name != "720p"
                && hit.name != "Season 2"
                && hit.name != "Season 10"
                && hit.name != "Episode 4"),
            "{query} surfaced a noise name: {hits:?}"
        );
    }
}

#[test]
fn exact_name_outranks_prefix_name() {
    let (_temp, app) = seeded_app();
    app.create_folder("", "Prefix").expect("mkdir");
    let record = ItemRecord::Url {
        url: "u".to_string(),
    };
    app.put_item("Prefix", "Lost World", &record).expect("put");
    app.put_item("Prefix", "Lost", &record).expect("put");

    let hits = app.search("Lost").expect("search");
    let prefix_hits = hits
        .iter()
        .filter(|hit| hit.path == "Prefix")
        .collect::<Vec<_>>();
    assert_eq!(prefix_hits[0].name, "Lost");
    assert!((prefix_hits[0].score - 100.0).abs() < f32::EPSILON);
    assert_eq!(prefix_hits[1].name, "Lost World");
    assert!(prefix_hits[1].score < 80.0 && prefix_hits[1].score > 70.0);
}

#[test]
fn locked_folder_is_searchable_but_never_suggested() {
    let (_temp, app) = seeded_app();
    let hits = app.search("vault").expect("search");
    assert!(hits.iter().any(|hit| hit.is_folder && hit.path == "Library/Vault"));

    for _ in 0..300 {
        let pick = app
            .suggest("Library")
            .expect("suggest")
            .expect("candidates exist");
        assert_ne!(pick.name, "Vault");
        assert_ne!(pick.name, "Gold");
        assert!(!pick.path.starts_with("Library/Vault"));
    }
}

#[tokio::test]
async fn locked_folder_gate_follows_membership() {
    let (_temp, app) = seeded_app();
    assert!(app.can_enter("Library/Vault", 77).await.expect("member"));
    assert!(!app.can_enter("Library/Vault", 78).await.expect("stranger"));
    assert!(app.can_enter("Library/Shelf 1", 78).await.expect("unlocked"));
}

#[test]
fn redirect_item_navigates_instead_of_delivering() {
    let (_temp, app) = seeded_app();
    let intent = app.open_item("Shortcuts", "Go Action").expect("open");
    assert_eq!(
        intent,
        Intent::Navigate {
            path: "A/B".to_string()
        }
    );
    let Intent::Navigate { path } = intent else {
        unreachable!();
    };
    let target = app.get_dir_contents(&path).expect("target listing");
    assert_eq!(target.items[0].name, "Ronin");

    let delivered = app.open_item("Quiz", "Capital").expect("open poll");
    assert!(matches!(
        delivered,
        Intent::Deliver {
            record: ItemRecord::Poll { correct_option_id: 1, .. }
        }
    ));
}

#[tokio::test]
async fn session_follows_redirect_into_listing() {
    let (_temp, app) = seeded_app();
    let mut session = SessionContext::at("Shortcuts");
    session.next_page();
    let intent = app
        .open_in_session(&mut session, "Go Action", 5)
        .await
        .expect("follow");
    assert!(matches!(intent, Intent::Navigate { .. }));
    assert_eq!(session.path, "A/B");
    assert_eq!(session.page, 0);
    assert_eq!(session.redirect_hops, 1);
}

#[test]
fn scoped_rebuild_leaves_unrelated_entries_identical() {
    let (temp, app) = seeded_app();
    let root = temp.path().join("content");
    let quiz_before = app.get_dir_contents("Quiz").expect("quiz before");
    let shows_before = app.get_dir_contents("Shows/Lost").expect("shows before");

    write_file(
        &root,
        "Movies/Zodiac.json",
        r#"{"type":"url","url":"https://example.org/zodiac"}"#,
    );
    // An out-of-band change elsewhere must stay invisible to a scoped rebuild.
    write_file(&root, "Quiz/Extra.json", r#"{"type":"qa","question":"q","answer":"a"}"#);

    let stats = app.rebuild(Some("Movies")).expect("scoped rebuild");
    assert_eq!(stats.scope, "Movies");

    assert_eq!(app.get_dir_contents("Quiz").expect("quiz after"), quiz_before);
    assert_eq!(
        app.get_dir_contents("Shows/Lost").expect("shows after"),
        shows_before
    );
    assert!(app.get_dir_contents("Movies").expect("movies").item("Zodiac").is_some());

    app.rebuild(None).expect("full rebuild");
    assert!(app.get_dir_contents("Quiz").expect("quiz").item("Extra").is_some());
}

#[test]
fn corrupt_record_is_listed_with_fallback_type() {
    let (_temp, app) = seeded_app();
    let stats = app.rebuild(None).expect("rebuild completes");
    assert_eq!(stats.unreadable_items, 1);

    let boxed = app.get_dir_contents("Box").expect("box");
    let broken = boxed.item("broken").expect("broken still listed");
    assert_eq!(broken.kind, ItemKind::Unknown);

    let top = app.get_dir_contents("").expect("root");
    assert_eq!(top.folder("Box").expect("box folder").icon, "📦");
    assert!(top.folder("_system").is_none());
}
