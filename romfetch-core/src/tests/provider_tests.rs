use super::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Reply {
    Found(&'static str),
    Miss,
    Fail,
}

struct Scripted {
    name: &'static str,
    reply: Reply,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(name: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MetadataProvider for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, _rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Found(title) => Ok(ProviderGame {
                source: self.name,
                title: title.to_string(),
                ..Default::default()
            }),
            Reply::Miss => Err(ProviderError::NotFound),
            Reply::Fail => Err(ProviderError::transient("boom")),
        }
    }
}

fn dyns(list: &[&Arc<Scripted>]) -> Vec<Arc<dyn MetadataProvider>> {
    list.iter()
        .map(|p| Arc::clone(*p) as Arc<dyn MetadataProvider>)
        .collect()
}

fn rom() -> RomIdentity {
    RomIdentity {
        path: PathBuf::from("/roms/snes/Some Game (USA).sfc"),
        file_name: "Some Game (USA).sfc".to_string(),
        stem: "Some Game (USA)".to_string(),
        extension: "sfc".to_string(),
        size: 1024,
        platform: None,
    }
}

#[tokio::test]
async fn first_match_wins_in_priority_order() {
    let miss = Scripted::new("miss", Reply::Miss);
    let first = Scripted::new("first", Reply::Found("First"));
    let second = Scripted::new("second", Reply::Found("Second"));
    let set = ProviderSet::new(dyns(&[&miss, &first, &second]), vec![]);

    let game = set
        .lookup(&rom(), false, LookupOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(game.title, "First");
    assert_eq!(miss.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn error_aborts_remaining_providers() {
    let failing = Scripted::new("failing", Reply::Fail);
    let after = Scripted::new("after", Reply::Found("After"));
    let set = ProviderSet::new(dyns(&[&failing, &after]), vec![]);

    let result = set.lookup(&rom(), false, LookupOptions::default()).await;

    assert!(matches!(result, Err(ProviderError::Transient(_))));
    assert_eq!(after.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn all_misses_is_none_without_placeholder() {
    let set = ProviderSet::new(dyns(&[&Scripted::new("miss", Reply::Miss)]), vec![]);
    let result = set
        .lookup(&rom(), false, LookupOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn all_misses_gives_placeholder_when_requested() {
    let set = ProviderSet::new(dyns(&[&Scripted::new("miss", Reply::Miss)]), vec![]);
    let game = set
        .lookup(&rom(), false, LookupOptions { add_not_found: true })
        .await
        .unwrap()
        .unwrap();
    assert!(game.not_found);
    assert_eq!(game.title, "Some Game (USA)");
}

#[tokio::test]
async fn arcade_context_uses_arcade_list() {
    let console = Scripted::new("console", Reply::Found("Console"));
    let arcade = Scripted::new("arcade", Reply::Found("Arcade"));
    let set = ProviderSet::new(dyns(&[&console]), dyns(&[&arcade]));

    let game = set
        .lookup(&rom(), true, LookupOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(game.title, "Arcade");
    assert_eq!(console.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_list_is_a_miss() {
    let set = ProviderSet::default();
    let result = set
        .lookup(&rom(), true, LookupOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());
}
