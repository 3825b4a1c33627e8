//! Browser capability used for automatic tagging
//!
//! Seed expansion only needs a handful of operations from a browser: open a
//! session, navigate, wait for client-side rendering, read the navigation
//! menu and close. Backends implement [`Browser`] and [`BrowserSession`];
//! the crate ships [`StaticHtmlBrowser`] for server-rendered menus, and tests
//! substitute scripted sessions.

mod html;

pub use html::{parse_navigation, StaticHtmlBrowser};

use crate::BrowserResult;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// One link read from a rendered navigation menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Absolute target URL
    pub url: String,

    /// Tag hints of the menu section the link belongs to
    pub tags: Vec<String>,

    /// Selectors key associated with the section, if the page declares one
    pub selectors_key: Option<String>,
}

/// Factory for browser sessions
pub trait Browser {
    /// Opens a new session
    ///
    /// # Returns
    ///
    /// * `Ok(Box<dyn BrowserSession>)` - A live session; the caller must close it
    /// * `Err(BrowserError)` - The browser could not be started
    fn open(&self) -> BrowserResult<Box<dyn BrowserSession>>;
}

/// A live browser session
pub trait BrowserSession {
    /// Loads `url` in the session
    fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Blocks for `duration` to let client-side rendering settle
    fn wait(&mut self, duration: Duration);

    /// Reads the navigation menu of the current page
    fn read_navigation_structure(&mut self) -> BrowserResult<Vec<NavigationEntry>>;

    /// Releases the session and any native resources behind it
    fn close(&mut self) -> BrowserResult<()>;
}

/// Session that is closed when it goes out of scope
///
/// Use [`ScopedSession::close`] to observe close errors; on drop they are
/// only logged.
pub struct ScopedSession {
    session: Box<dyn BrowserSession>,
    closed: bool,
}

impl ScopedSession {
    /// Opens a session from `browser`
    pub fn open(browser: &dyn Browser) -> BrowserResult<Self> {
        let session = browser.open()?;
        tracing::debug!("Browser session opened");
        Ok(Self {
            session,
            closed: false,
        })
    }

    /// Closes the session, reporting any error
    pub fn close(mut self) -> BrowserResult<()> {
        self.closed = true;
        tracing::debug!("Closing browser session");
        self.session.close()
    }
}

impl Deref for ScopedSession {
    type Target = dyn BrowserSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for ScopedSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.session.close() {
            tracing::warn!("Failed to close browser session: {}", e);
        }
    }
}
