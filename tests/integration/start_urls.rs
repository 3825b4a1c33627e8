//! Loader behavior for `start_urls`, with a scripted browser standing in for
//! a real one.

use seedline::config::{ConfigLoader, RawConfig, SeedRecord};
use seedline::{
    Browser, BrowserError, BrowserResult, BrowserSession, ConfigError, ConfigShapeError,
    ExpansionError, NavigationEntry, SeedShapeError,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Counters shared between a scripted browser and its sessions
#[derive(Debug, Default)]
struct Activity {
    opened: u32,
    closed: u32,
    visited: Vec<String>,
    waited: Vec<Duration>,
}

/// Browser returning a fixed menu per URL
#[derive(Default)]
struct ScriptedBrowser {
    menus: HashMap<String, Vec<NavigationEntry>>,
    broken_urls: Vec<String>,
    fail_open: bool,
    activity: Rc<RefCell<Activity>>,
}

impl ScriptedBrowser {
    fn with_menu(mut self, url: &str, entries: Vec<NavigationEntry>) -> Self {
        self.menus.insert(url.to_string(), entries);
        self
    }

    fn with_broken(mut self, url: &str) -> Self {
        self.broken_urls.push(url.to_string());
        self
    }

    fn activity(&self) -> std::cell::Ref<'_, Activity> {
        self.activity.borrow()
    }
}

impl Browser for ScriptedBrowser {
    fn open(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        if self.fail_open {
            return Err(BrowserError::Launch("chrome not found".to_string()));
        }
        self.activity.borrow_mut().opened += 1;
        Ok(Box::new(ScriptedSession {
            menus: self.menus.clone(),
            broken_urls: self.broken_urls.clone(),
            current: None,
            activity: Rc::clone(&self.activity),
        }))
    }
}

struct ScriptedSession {
    menus: HashMap<String, Vec<NavigationEntry>>,
    broken_urls: Vec<String>,
    current: Option<String>,
    activity: Rc<RefCell<Activity>>,
}

impl BrowserSession for ScriptedSession {
    fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.activity.borrow_mut().visited.push(url.to_string());
        if self.broken_urls.iter().any(|u| u == url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        self.activity.borrow_mut().waited.push(duration);
    }

    fn read_navigation_structure(&mut self) -> BrowserResult<Vec<NavigationEntry>> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| BrowserError::Render("nothing rendered".to_string()))?;
        Ok(self.menus.get(current).cloned().unwrap_or_default())
    }

    fn close(&mut self) -> BrowserResult<()> {
        self.activity.borrow_mut().closed += 1;
        Ok(())
    }
}

fn nav(url: &str, tag: &str, key: &str) -> NavigationEntry {
    NavigationEntry {
        url: url.to_string(),
        tags: vec![tag.to_string()],
        selectors_key: Some(key.to_string()),
    }
}

fn raw(value: Value) -> RawConfig {
    RawConfig::from_value(value).unwrap()
}

fn load(value: Value) -> Result<ConfigLoader, ConfigError> {
    ConfigLoader::with_browser(raw(value), &ScriptedBrowser::default())
}

#[test]
fn test_mandatory_start_urls() {
    for config in [json!({ "start_urls": null }), json!({ "index_name": "docs" })] {
        assert!(matches!(
            load(config).unwrap_err(),
            ConfigError::Shape(ConfigShapeError::MissingField { .. })
        ));
    }
}

#[test]
fn test_start_urls_does_not_accept_single_value() {
    let err = load(json!({ "start_urls": "www.foo.bar" })).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Shape(ConfigShapeError::WrongType { .. })
    ));
    assert!(err.to_string().contains("start_urls should be list"));
}

#[test]
fn test_start_urls_should_have_at_least_one_element() {
    assert!(matches!(
        load(json!({ "start_urls": [] })).unwrap_err(),
        ConfigError::Shape(ConfigShapeError::EmptyCollection { .. })
    ));
}

#[test]
fn test_record_gets_default_page_rank_and_tags() {
    let loader = load(json!({ "start_urls": [{ "url": "http://www.foo.bar/" }] })).unwrap();

    assert_eq!(
        loader.start_urls()[0],
        SeedRecord {
            url: "http://www.foo.bar/".to_string(),
            tags: vec![],
            page_rank: 0,
            selectors_key: None,
        }
    );
}

#[test]
fn test_string_seed_becomes_record() {
    let loader = load(json!({ "start_urls": ["http://www.foo.bar/"] })).unwrap();
    assert_eq!(loader.start_urls()[0].url, "http://www.foo.bar/");
    assert_eq!(loader.start_urls()[0], SeedRecord::new("http://www.foo.bar/"));
}

#[test]
fn test_seed_missing_url_is_fatal() {
    let err = load(json!({
        "start_urls": ["https://ok.example.com/", { "tags": ["orphan"] }]
    }))
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Seed(SeedShapeError::MissingUrl { index: 1 })
    ));
}

#[test]
fn test_order_preserved_without_expansion() {
    let loader = load(json!({
        "start_urls": [
            "https://one.example.com/",
            { "url": "https://two.example.com/", "page_rank": 4 },
            "https://three.example.com/"
        ]
    }))
    .unwrap();

    let urls: Vec<&str> = loader.start_urls().iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://one.example.com/",
            "https://two.example.com/",
            "https://three.example.com/"
        ]
    );
    assert_eq!(loader.start_urls()[1].page_rank, 4);
}

#[test]
fn test_no_session_opened_without_tagging() {
    let browser = ScriptedBrowser::default();
    ConfigLoader::with_browser(
        raw(json!({ "start_urls": ["https://docs.example.net/"] })),
        &browser,
    )
    .unwrap();
    assert_eq!(browser.activity().opened, 0);
}

#[test]
fn test_automatic_tagging_generates_start_urls() {
    let browser = ScriptedBrowser::default()
        .with_menu(
            "http://docs.example.net/web-callplus",
            vec![
                nav("http://docs.example.net/web-callplus/intro", "intro", "web-intro"),
                nav("http://docs.example.net/web-callplus/api", "api", "web-api"),
                nav("http://docs.example.net/web-callplus/faq", "faq", "web-faq"),
            ],
        )
        .with_menu(
            "http://docs.example.net/ios-callkit",
            vec![nav("http://docs.example.net/ios-callkit/intro", "intro", "ios-intro")],
        );

    let loader = ConfigLoader::with_browser(
        raw(json!({
            "automatic_tagging": { "enabled": true, "settle_delay_ms": 250 },
            "start_urls": [
                {
                    "url": "http://docs.example.net/web-callplus",
                    "tags": ["rtc", "platform_web", "sdk_callplus"],
                    "selectors_key": "web-callplus"
                },
                {
                    "url": "http://docs.example.net/guides",
                    "tags": ["guides"],
                    "automatic_tagging": false
                },
                {
                    "url": "http://docs.example.net/ios-callkit",
                    "tags": ["rtc", "platform_ios", "callkit"],
                    "page_rank": 2
                }
            ]
        })),
        &browser,
    )
    .unwrap();

    let seeds = loader.start_urls();
    assert_eq!(seeds.len(), 5);

    assert_eq!(seeds[0].url, "http://docs.example.net/web-callplus/intro");
    assert_eq!(seeds[0].tags, vec!["rtc", "platform_web", "sdk_callplus", "intro"]);
    assert_eq!(seeds[0].selectors_key.as_deref(), Some("web-intro"));
    assert_eq!(seeds[2].tags.last().map(String::as_str), Some("faq"));

    assert_eq!(seeds[3], {
        let mut guides = SeedRecord::new("http://docs.example.net/guides");
        guides.tags = vec!["guides".to_string()];
        guides
    });

    assert_eq!(seeds[4].url, "http://docs.example.net/ios-callkit/intro");
    assert_eq!(seeds[4].page_rank, 2);
    assert_eq!(seeds[4].tags, vec!["rtc", "platform_ios", "callkit", "intro"]);

    // expanded seeds always carry a key; the untagged seed keeps none
    for index in [0, 1, 2, 4] {
        assert!(seeds[index].selectors_key.is_some(), "seed {index} has no key");
    }
    assert_eq!(seeds[3].selectors_key, None);

    let activity = browser.activity();
    assert_eq!(activity.opened, 1);
    assert_eq!(activity.closed, 1);
    assert_eq!(
        activity.visited,
        vec![
            "http://docs.example.net/web-callplus",
            "http://docs.example.net/ios-callkit"
        ]
    );
    assert_eq!(activity.waited, vec![Duration::from_millis(250); 2]);
}

#[test]
fn test_expanded_duplicates_pass_through() {
    let browser = ScriptedBrowser::default().with_menu(
        "https://docs.example.net/",
        vec![
            nav("https://docs.example.net/a", "x", "k"),
            nav("https://docs.example.net/a", "y", "k"),
        ],
    );

    let loader = ConfigLoader::with_browser(
        raw(json!({
            "automatic_tagging": { "enabled": true, "settle_delay_ms": 0 },
            "start_urls": ["https://docs.example.net/"]
        })),
        &browser,
    )
    .unwrap();
    assert_eq!(loader.start_urls().len(), 2);
}

#[test]
fn test_dedupe_at_loader_boundary() {
    let browser = ScriptedBrowser::default().with_menu(
        "https://docs.example.net/",
        vec![
            nav("https://docs.example.net/a", "x", "k"),
            nav("https://docs.example.net/b", "x", "k"),
            nav("https://docs.example.net/a", "y", "k"),
        ],
    );

    let loader = ConfigLoader::with_browser(
        raw(json!({
            "automatic_tagging": { "enabled": true, "settle_delay_ms": 0, "dedupe": true },
            "start_urls": ["https://docs.example.net/"]
        })),
        &browser,
    )
    .unwrap();

    let urls: Vec<&str> = loader.start_urls().iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["https://docs.example.net/a", "https://docs.example.net/b"]);
    assert_eq!(loader.start_urls()[0].tags, vec!["x"]);
}

#[test]
fn test_expansion_failure_is_fatal_and_closes_session() {
    let browser = ScriptedBrowser::default()
        .with_menu(
            "https://docs.example.net/ok",
            vec![nav("https://docs.example.net/ok/1", "ok", "k")],
        )
        .with_broken("https://docs.example.net/broken");

    let err = ConfigLoader::with_browser(
        raw(json!({
            "automatic_tagging": { "enabled": true, "settle_delay_ms": 0 },
            "start_urls": [
                "https://docs.example.net/ok",
                "https://docs.example.net/broken",
                "https://docs.example.net/never-reached"
            ]
        })),
        &browser,
    )
    .unwrap_err();

    match err {
        ConfigError::Expansion(ExpansionError::Browser { url, source }) => {
            assert_eq!(url, "https://docs.example.net/broken");
            assert!(matches!(source, BrowserError::Navigation { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    let activity = browser.activity();
    assert_eq!(activity.opened, 1);
    assert_eq!(activity.closed, 1);
    assert_eq!(activity.visited.len(), 2);
}

#[test]
fn test_skip_policy_drops_failing_seed() {
    let browser = ScriptedBrowser::default()
        .with_menu(
            "https://docs.example.net/ok",
            vec![nav("https://docs.example.net/ok/1", "ok", "k")],
        )
        .with_broken("https://docs.example.net/broken");

    let loader = ConfigLoader::with_browser(
        raw(json!({
            "automatic_tagging": { "enabled": true, "settle_delay_ms": 0, "on_error": "skip" },
            "start_urls": [
                "https://docs.example.net/broken",
                "https://docs.example.net/ok",
                { "url": "https://docs.example.net/plain", "automatic_tagging": false }
            ]
        })),
        &browser,
    )
    .unwrap();

    let urls: Vec<&str> = loader.start_urls().iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://docs.example.net/ok/1", "https://docs.example.net/plain"]
    );
    assert_eq!(browser.activity().closed, 1);
}

#[test]
fn test_skip_policy_cannot_empty_seed_list() {
    let browser = ScriptedBrowser::default().with_broken("https://docs.example.net/broken");

    let err = ConfigLoader::with_browser(
        raw(json!({
            "automatic_tagging": { "enabled": true, "settle_delay_ms": 0, "on_error": "skip" },
            "start_urls": ["https://docs.example.net/broken"]
        })),
        &browser,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Shape(ConfigShapeError::EmptyCollection { .. })
    ));
}

#[test]
fn test_empty_menu_is_an_expansion_error() {
    let err = load(json!({
        "automatic_tagging": { "enabled": true, "settle_delay_ms": 0 },
        "start_urls": ["https://docs.example.net/no-menu"]
    }))
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Expansion(ExpansionError::EmptyNavigation { .. })
    ));
}

#[test]
fn test_browser_launch_failure() {
    let browser = ScriptedBrowser {
        fail_open: true,
        ..ScriptedBrowser::default()
    };

    let err = ConfigLoader::with_browser(
        raw(json!({
            "start_urls": [{ "url": "https://docs.example.net/", "automatic_tagging": true }]
        })),
        &browser,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Expansion(ExpansionError::Browser {
            source: BrowserError::Launch(_),
            ..
        })
    ));
}

#[test]
fn test_settle_delay_falls_back_to_js_wait() {
    let browser = ScriptedBrowser::default().with_menu(
        "https://docs.example.net/",
        vec![nav("https://docs.example.net/a", "x", "k")],
    );

    ConfigLoader::with_browser(
        raw(json!({
            "js_wait": 0.5,
            "automatic_tagging": { "enabled": true },
            "start_urls": ["https://docs.example.net/"]
        })),
        &browser,
    )
    .unwrap();

    assert_eq!(browser.activity().waited, vec![Duration::from_millis(500)]);
}
