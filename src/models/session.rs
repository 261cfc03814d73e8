use serde::{Deserialize, Serialize};

/// Navigation state for one browsing session.
///
/// The server never stores this. Every interaction response carries the
/// updated value and the client sends it back with its next action, so all
/// session state stays client-owned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseSession {
    /// Stack of visited titles, most recent last
    #[serde(default)]
    pub history: Vec<String>,
    /// Set while a poster click is being processed; further clicks are
    /// ignored until a `Settle` action clears it
    #[serde(default)]
    pub locked: bool,
    /// Title the current recommendations were computed for
    #[serde(default)]
    pub last_selected: Option<String>,
    /// Poster most recently opened, kept to debounce duplicate clicks
    #[serde(default)]
    pub last_opened: Option<String>,
}

/// One user interaction applied to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowseAction {
    /// Dropdown pick confirmed with the recommend button
    Select { title: String },
    /// Click on a recommended poster
    Open { title: String },
    /// Back button
    Back,
    /// The client finished rendering a click; release the lock
    Settle,
}
