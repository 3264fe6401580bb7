//! Page - A loaded document with its script realm

use std::sync::{Arc, Mutex, MutexGuard};

use emu_css::{DisplayStyle, default_display_style};
use emu_dom::NodeId;
use emu_js::{JsError, JsValue, Realm, ScriptContext};

use crate::{EngineError, PageQueue, TaskSender};

/// Script types executed on load
const SCRIPT_TYPES: [&str; 3] = ["", "text/javascript", "application/javascript"];

/// A loaded page
pub struct Page {
    url: String,
    realm: Arc<Mutex<Realm>>,
    script: Option<ScriptContext>,
    queue: PageQueue,
}

impl Page {
    pub(crate) fn new(url: &str, realm: Arc<Mutex<Realm>>, script: Option<ScriptContext>) -> Self {
        Self {
            url: url.to_string(),
            realm,
            script,
            queue: PageQueue::new(),
        }
    }

    /// Get page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether scripts can run on this page
    pub fn scripting_enabled(&self) -> bool {
        self.script.is_some()
    }

    /// Evaluate JavaScript in the page
    pub fn eval(&self, code: &str) -> Result<JsValue, EngineError> {
        let script = self.script.as_ref().ok_or(EngineError::ScriptingDisabled)?;
        Ok(script.eval(code)?)
    }

    /// Execute JavaScript (ignore result)
    pub fn exec(&self, code: &str) -> Result<(), EngineError> {
        self.eval(code).map(|_| ())
    }

    /// Free script objects that are no longer reachable
    pub fn collect_garbage(&self) {
        if let Some(script) = &self.script {
            script.collect_garbage();
        }
    }

    /// Run `f` with the realm locked
    pub fn with_realm<R>(&self, f: impl FnOnce(&mut Realm) -> R) -> Result<R, EngineError> {
        let mut realm = self.lock()?;
        Ok(f(&mut realm))
    }

    /// Handle for posting work to this page from other threads
    pub fn task_sender(&self) -> TaskSender {
        self.queue.sender()
    }

    /// Run queued tasks on the calling (owning) thread
    pub fn run_pending_tasks(&self) -> Result<usize, EngineError> {
        let mut realm = self.lock()?;
        Ok(self.queue.drain(&mut realm))
    }

    /// Default display style of `node` under the session profile
    pub fn display_style(&self, node: NodeId) -> Result<Option<DisplayStyle>, EngineError> {
        self.with_realm(|realm| default_display_style(realm.document().tree(), node, realm.profile()))
    }

    /// Notify the page that a node is gone for good
    ///
    /// Returns the number of destroyed nodes.
    pub fn destroy_node(&self, node: NodeId) -> Result<usize, EngineError> {
        self.with_realm(|realm| realm.destroy_node(node))
    }

    /// Run `<script>` elements present at load, in document order
    ///
    /// A failing script is logged and does not stop the others.
    pub(crate) fn run_inline_scripts(&self) -> Result<(), EngineError> {
        let Some(script) = &self.script else {
            return Ok(());
        };

        let sources = self.with_realm(|realm| {
            let document = realm.document();
            document
                .get_elements_by_tag_name("script")
                .into_iter()
                .filter(|&node| {
                    let kind = document
                        .tree
                        .get(node)
                        .and_then(|n| n.as_element())
                        .and_then(|e| e.get_attr("type"))
                        .unwrap_or("")
                        .trim()
                        .to_ascii_lowercase();
                    SCRIPT_TYPES.contains(&kind.as_str())
                })
                .map(|node| document.tree.text_content(node))
                .collect::<Vec<_>>()
        })?;

        for (index, source) in sources.iter().enumerate() {
            if let Err(e) = script.exec(source) {
                tracing::warn!("Inline script {} failed: {}", index, e);
            }
        }
        if !sources.is_empty() {
            tracing::debug!("Ran {} inline scripts for {}", sources.len(), self.url);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Realm>, EngineError> {
        self.realm
            .lock()
            .map_err(|_| EngineError::JavaScript(JsError::Runtime("Realm lock poisoned".to_string())))
    }
}
