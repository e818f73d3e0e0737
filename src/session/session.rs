//! [`Session`]: one client, one view tree, one bridge.
//!
//! Property changes never touch the page directly. Each accepted change marks
//! the view's update frame dirty (CSS only, or structure), and the frames of a
//! batch are turned into one script when the outermost batch ends:
//!
//! ```text
//! set(width) ─┐
//! set(color) ─┼─> UpdateScripts ──flush──> var element = ...; if (element) {
//! set(items) ─┘   (per html id)              element.style['width'] = '...';
//!                                            scanElementsSize();}
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::app::Downloads;
use crate::css::stylesheet::{animations_stylesheet, theme_stylesheet};
use crate::data::DataObject;
use crate::error::{self, Error};
use crate::pool::{alloc_string_builder, finish_string_builder};
use crate::property::{PropertyContainer, Value};
use crate::session::bridge::{BoxFuture, Bridge};
use crate::session::client::ClientInfo;
use crate::session::content::SessionContent;
use crate::session::update::{
    update_script_header, write_patch, UpdateScripts, UpdateState, ROOT_ELEMENT_ID,
    UPDATE_SCRIPT_FOOTER,
};
use crate::style::Animation;
use crate::theme::{default_theme, Constants, Theme, ThemeContext};
use crate::view::html::{content_html, render_state, subtree_html};
use crate::view::schema::{ANIMATION, CHECKED, CURRENT, SEMANTICS};
use crate::view::{js_string, CheckboxImages, HtmlContext, View, ViewId, ViewTree, Widget};

/// Loading state of an image requested with [`Session::load_image`].
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    Loading,
    Loaded { width: f64, height: f64 },
    Failed(String),
}

/// The server side of one client connection.
pub struct Session {
    id: u32,
    bridge: Arc<dyn Bridge>,
    client: ClientInfo,
    theme: ThemeContext,
    custom_theme: Option<Arc<Theme>>,
    tree: ViewTree,
    content: Option<Box<dyn SessionContent>>,
    updates: UpdateScripts,
    update_depth: usize,
    ignore_view_updates: bool,
    images: CheckboxImages,
    animations: Vec<Animation>,
    animations_changed: bool,
    image_states: HashMap<String, ImageState>,
    downloads: Arc<Downloads>,
    started: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("remote_addr", &self.bridge.remote_addr())
            .field("client", &self.client)
            .field("views", &self.tree.len())
            .field("started", &self.started)
            .finish()
    }
}

impl Session {
    pub fn new(id: u32, bridge: Arc<dyn Bridge>, client: ClientInfo) -> Self {
        let mut theme = ThemeContext::default();
        theme.dark = client.dark;
        theme.touch_screen = client.touch;
        Self {
            id,
            bridge,
            client,
            theme,
            custom_theme: None,
            tree: ViewTree::new(),
            content: None,
            updates: UpdateScripts::new(),
            update_depth: 0,
            ignore_view_updates: false,
            images: CheckboxImages::new(),
            animations: Vec::new(),
            animations_changed: false,
            image_states: HashMap::new(),
            downloads: Arc::new(Downloads::new()),
            started: false,
        }
    }

    /// Share the application's download registry.
    pub fn with_downloads(mut self, downloads: Arc<Downloads>) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    pub fn bridge(&self) -> &Arc<dyn Bridge> {
        &self.bridge
    }

    pub(crate) fn is_bridge(&self, bridge: &Arc<dyn Bridge>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.bridge) as *const (),
            Arc::as_ptr(bridge) as *const (),
        )
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// Constants resolved against the session's composed theme.
    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    pub fn root_view(&self) -> Option<ViewId> {
        self.tree.root()
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.tree.get(id)
    }

    /// The view whose `id` property is `id`, searched from the root.
    pub fn find_view(&self, id: &str) -> Option<ViewId> {
        self.tree.find(self.tree.root()?, id)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ── Properties ───────────────────────────────────────────────────

    /// Set a view property. A rejected value is reported and the view is unchanged.
    pub fn set_property(&mut self, id: ViewId, tag: &str, value: impl Into<Value>) -> bool {
        let accepted = match self.tree.get_mut(id) {
            Some(view) => view.set(tag, value),
            None => false,
        };
        if accepted {
            self.view_changed(id);
        }
        accepted
    }

    pub fn remove_property(&mut self, id: ViewId, tag: &str) {
        if let Some(view) = self.tree.get_mut(id) {
            view.remove(tag);
            self.view_changed(id);
        }
    }

    /// Mutate a view in place; its changes are applied afterwards.
    pub fn update<R>(&mut self, id: ViewId, f: impl FnOnce(&mut View) -> R) -> Option<R> {
        let result = f(self.tree.get_mut(id)?);
        self.view_changed(id);
        Some(result)
    }

    /// The value in effect for `tag`: the view's own, then the theme rules of
    /// its classes (last class first) for the client's screen size.
    pub fn get_property(&self, id: ViewId, tag: &str) -> Option<Value> {
        let view = self.tree.get(id)?;
        if let Some(value) = view.get(tag) {
            return Some(value);
        }
        let class_name = view.class_name(&self.theme);
        let theme = self.theme.theme();
        class_name.split_whitespace().rev().find_map(|class| {
            theme
                .effective_style(class, self.client.width, self.client.height)
                .and_then(|style| style.get(tag))
        })
    }

    fn view_changed(&mut self, id: ViewId) {
        let Some(view) = self.tree.get_mut(id) else {
            return;
        };
        let changes = view.take_changes();
        if changes.is_empty() {
            return;
        }

        for tag in &changes {
            let listeners = self
                .tree
                .get(id)
                .map(|view| view.change_listeners_for(tag))
                .unwrap_or_default();
            for listener in listeners {
                if let Some(view) = self.tree.get(id) {
                    listener(view, tag);
                }
            }
        }
        if changes.contains(&ANIMATION) {
            self.collect_animations(id);
        }

        if self.ignore_view_updates {
            return;
        }
        let Some(view) = self.tree.get(id) else {
            return;
        };
        if view.rendered.is_none() {
            return;
        }
        let widget = view.widget();
        let html_id = view.html_id().to_owned();

        if changes.contains(&SEMANTICS) {
            let parent = self
                .tree
                .parent(id)
                .and_then(|parent| self.tree.get(parent))
                .map(|parent| parent.html_id().to_owned());
            self.updates
                .mark_structure(parent.as_deref().unwrap_or(ROOT_ELEMENT_ID));
        } else if changes
            .iter()
            .any(|tag| widget.structural_tags().contains(tag))
        {
            self.updates.mark_structure(&html_id);
        } else {
            self.updates.mark_css(&html_id);
        }

        if self.update_depth == 0 {
            self.flush();
        }
    }

    // ── Batching ─────────────────────────────────────────────────────

    /// Run `f` as one batch: every update it causes reaches the bridge as a
    /// single script when the outermost batch ends.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R {
        self.update_depth += 1;
        let result = f(self);
        self.update_depth -= 1;
        if self.update_depth == 0 {
            self.flush();
        }
        result
    }

    /// Open the update frame of `html_id` and start a batch.
    pub fn start_update_script(&mut self, html_id: &str) {
        self.update_depth += 1;
        self.updates.touch(html_id);
    }

    /// Append a raw statement to the frame of `html_id`.
    pub fn add_to_update_script(&mut self, html_id: &str, statement: &str) {
        self.updates.add_statement(html_id, statement);
        if self.update_depth == 0 {
            self.flush();
        }
    }

    /// End the batch opened by [`start_update_script`](Self::start_update_script).
    pub fn finish_update_script(&mut self) {
        match self.update_depth {
            0 => log::warn!("finish_update_script without start_update_script"),
            1 => {
                self.update_depth = 0;
                self.flush();
            }
            _ => self.update_depth -= 1,
        }
    }

    /// While set, property changes are applied to views but not to the page.
    pub fn set_ignore_view_updates(&mut self, ignore: bool) {
        self.ignore_view_updates = ignore;
    }

    pub fn ignore_view_updates(&self) -> bool {
        self.ignore_view_updates
    }

    fn flush(&mut self) {
        let frames = self.updates.take();
        if frames.is_empty() && !self.animations_changed {
            return;
        }

        let mut script = alloc_string_builder();
        for (html_id, update) in frames {
            let mut body = String::new();
            if html_id == ROOT_ELEMENT_ID {
                if update.state == UpdateState::DirtyStructure {
                    let html = self.root_html();
                    let _ = writeln!(body, "element.innerHTML = '{}';", js_string(&html));
                }
            } else if let Some(id) = self.tree.by_html_id(&html_id) {
                match update.state {
                    UpdateState::Clean => {}
                    UpdateState::DirtyCss => self.write_view_patch(id, &mut body),
                    UpdateState::DirtyStructure => {
                        self.write_view_patch(id, &mut body);
                        let html = {
                            let mut context = HtmlContext {
                                constants: &self.theme,
                                images: &mut self.images,
                            };
                            content_html(&mut self.tree, id, &mut context)
                        };
                        let _ = writeln!(body, "element.innerHTML = '{}';", js_string(&html));
                    }
                }
            }
            body.push_str(&update.statements);
            if body.is_empty() {
                continue;
            }
            script.push_str(&update_script_header(&html_id));
            script.push_str(&body);
            script.push_str(UPDATE_SCRIPT_FOOTER);
        }

        if self.animations_changed {
            self.animations_changed = false;
            script.push_str(&self.animations_statement());
        }

        let script = finish_string_builder(script);
        if !script.is_empty() {
            self.write(&script);
        }
    }

    fn write_view_patch(&mut self, id: ViewId, out: &mut String) {
        let Some(new) = render_state(&self.tree, id, &self.theme) else {
            return;
        };
        let Some(view) = self.tree.get_mut(id) else {
            return;
        };
        let old = view.rendered.take().unwrap_or_default();
        write_patch(&old, &new, view.widget(), out);
        view.rendered = Some(new);
    }

    fn write(&self, script: &str) -> bool {
        let sent = self.bridge.write_message(script);
        if !sent {
            log::warn!("session {}: script dropped, bridge closed", self.id);
        }
        sent
    }

    /// Send `script` for execution as is.
    pub fn run_script(&mut self, script: &str) -> bool {
        self.write(script)
    }

    /// Send a getter script; the future resolves with the client's answer.
    pub fn run_getter_script(&self, script: &str) -> BoxFuture<'static, Option<DataObject>> {
        self.bridge.run_getter_script(script)
    }

    /// Route an `answer` message to its getter.
    pub fn handle_answer(&self, answer: &DataObject) -> bool {
        self.bridge.answer_received(answer)
    }

    // ── View tree ────────────────────────────────────────────────────

    /// Replace the whole tree by `view`.
    pub fn set_root_view(&mut self, view: View) -> ViewId {
        self.tree.clear();
        self.animations.clear();
        let id = self.tree.insert(view);
        self.collect_animations(id);
        if self.started && !self.ignore_view_updates {
            self.updates.mark_structure(ROOT_ELEMENT_ID);
            if self.update_depth == 0 {
                self.flush();
            }
        }
        id
    }

    /// Append `view` to `parent`; the parent's content is rebuilt.
    pub fn append_view(&mut self, parent: ViewId, view: View) -> Option<ViewId> {
        let id = self.tree.insert_child(parent, view)?;
        self.collect_animations(id);
        self.structure_changed(Some(parent));
        Some(id)
    }

    /// Remove `id` and its subtree.
    pub fn remove_view(&mut self, id: ViewId) -> Option<View> {
        let parent = self.tree.parent(id);
        let removed = self.tree.remove(id)?;
        if removed.rendered.is_some() {
            self.structure_changed(parent);
        }
        Some(removed)
    }

    fn structure_changed(&mut self, parent: Option<ViewId>) {
        if self.ignore_view_updates {
            return;
        }
        let html_id = match parent.and_then(|parent| self.tree.get(parent)) {
            Some(view) if view.rendered.is_some() => view.html_id().to_owned(),
            Some(_) => return,
            None if self.started => ROOT_ELEMENT_ID.to_owned(),
            None => return,
        };
        self.updates.mark_structure(&html_id);
        if self.update_depth == 0 {
            self.flush();
        }
    }

    /// Install `content`: the tree is rebuilt from its root view.
    pub fn set_content(&mut self, mut content: Box<dyn SessionContent>) {
        self.tree.clear();
        self.animations.clear();
        let ignore = std::mem::replace(&mut self.ignore_view_updates, true);
        let root = content.create_root_view(self);
        self.ignore_view_updates = ignore;
        if let Some(root) = root {
            self.tree.set_root(root);
        }
        self.content = Some(content);
        self.updates.take();

        if self.started {
            let html = self.root_html();
            let mut script = update_script_header(ROOT_ELEMENT_ID);
            let _ = writeln!(script, "element.innerHTML = '{}';", js_string(&html));
            script.push_str(&self.animations_statement());
            script.push_str(UPDATE_SCRIPT_FOOTER);
            self.write(&script);
        }
    }

    fn with_content(&mut self, f: impl FnOnce(&mut dyn SessionContent, &mut Session)) {
        if let Some(mut content) = self.content.take() {
            f(content.as_mut(), self);
            if self.content.is_none() {
                self.content = Some(content);
            }
        }
    }

    fn root_html(&mut self) -> String {
        let Some(root) = self.tree.root() else {
            return String::new();
        };
        let mut context = HtmlContext {
            constants: &self.theme,
            images: &mut self.images,
        };
        subtree_html(&mut self.tree, root, &mut context)
    }

    // ── Animations ───────────────────────────────────────────────────

    fn collect_animations(&mut self, start: ViewId) {
        for id in self.tree.walk_depth_first(start) {
            let Some(Value::Animations(list)) = self.tree.get(id).and_then(|v| v.get_raw(ANIMATION)) else {
                continue;
            };
            for animation in list {
                if animation.animated_properties().is_empty()
                    || self.animations.iter().any(|known| known.id() == animation.id())
                {
                    continue;
                }
                self.animations.push(animation.clone());
                self.animations_changed = true;
            }
        }
    }

    fn animations_statement(&self) -> String {
        let css = animations_stylesheet(&self.animations, &self.theme);
        format!(
            "document.getElementById('ruiAnimations').textContent = '{}';\n",
            js_string(&css)
        )
    }

    /// Keyframe animations in use by the views of this session.
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// The script that builds the whole page: theme CSS, root HTML, animations.
    pub fn init_script(&mut self) -> String {
        let mut script = alloc_string_builder();
        let css = theme_stylesheet(self.theme.theme(), &self.theme);
        let _ = writeln!(script, "updateCSS('{}');", js_string(&css));
        let html = self.root_html();
        let _ = writeln!(
            script,
            "document.getElementById('{ROOT_ELEMENT_ID}').innerHTML = '{}';",
            js_string(&html)
        );
        script.push_str(&self.animations_statement());
        self.animations_changed = false;
        script.push_str("scanElementsSize();\n");
        finish_string_builder(script)
    }

    /// Send `sessionID` and the first page.
    pub fn start(&mut self) {
        self.updates.take();
        let init = self.init_script();
        let script = format!("sessionID = {};\n{init}", self.id);
        self.started = true;
        log::debug!("session {} started ({})", self.id, self.bridge.remote_addr());
        self.write(&script);
        self.with_content(|content, session| content.on_start(session));
    }

    /// Attach a new bridge after a lost connection and resend the page.
    ///
    /// Getters still waiting on the old bridge resolve to `None`.
    pub fn reconnect(&mut self, bridge: Arc<dyn Bridge>, message: &DataObject) {
        self.bridge.discard_answers();
        self.bridge = bridge;
        if message.property_float("width").is_some() || message.property_float("height").is_some() {
            self.client.update_size(message);
        }
        self.updates.take();
        let init = self.init_script();
        let script = format!("sessionID = {};\n{init}", self.id);
        log::debug!("session {} reconnected ({})", self.id, self.bridge.remote_addr());
        self.write(&script);
        self.with_content(|content, session| content.on_reconnect(session));
    }

    pub(crate) fn disconnected(&mut self) {
        log::debug!("session {} disconnected", self.id);
        self.with_content(|content, session| content.on_disconnect(session));
    }

    pub(crate) fn finish(&mut self) {
        log::debug!("session {} finished", self.id);
        self.with_content(|content, session| content.on_finish(session));
        self.bridge.discard_answers();
    }

    fn resend(&mut self) {
        if self.started {
            self.updates.take();
            let script = self.init_script();
            self.write(&script);
        }
    }

    /// Overlay `theme` on the built-in one and restyle the page.
    pub fn set_custom_theme(&mut self, theme: Theme) {
        let mut composed = (*default_theme()).clone();
        composed.concat(&theme);
        self.theme.set_theme(Arc::new(composed));
        self.custom_theme = Some(Arc::new(theme));
        self.resend();
    }

    pub fn custom_theme(&self) -> Option<&Arc<Theme>> {
        self.custom_theme.as_ref()
    }

    pub fn set_dark_theme(&mut self, dark: bool) {
        if self.theme.dark != dark {
            self.theme.dark = dark;
            self.client.dark = dark;
            self.resend();
        }
    }

    pub fn set_touch_screen(&mut self, touch: bool) {
        if self.theme.touch_screen != touch {
            self.theme.touch_screen = touch;
            self.client.touch = touch;
            self.resend();
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.write(&format!("document.title = '{}';", js_string(title)));
    }

    // ── Downloads and images ─────────────────────────────────────────

    /// Register `data` under `id` and make the client download it as `filename`.
    pub fn start_download(&mut self, id: &str, filename: &str, data: Vec<u8>) -> bool {
        self.downloads.start_download(id, filename, data);
        self.write(&format!(
            "var link = document.getElementById('ruiDownloader'); if (link) {{ link.href = '/{}'; link.download = '{}'; link.click(); }}",
            js_string(id),
            js_string(filename)
        ))
    }

    /// Ask the client to preload `src`; the result arrives as `imageLoaded`/`imageError`.
    pub fn load_image(&mut self, src: &str) {
        if self.image_states.contains_key(src) {
            return;
        }
        self.image_states.insert(src.to_owned(), ImageState::Loading);
        self.write(&format!("loadImage('{}');", js_string(src)));
    }

    pub fn image_state(&self, src: &str) -> Option<&ImageState> {
        self.image_states.get(src)
    }

    fn image_path<'a>(message: &'a DataObject) -> Option<&'a str> {
        let path = message.property_value("path");
        if path.is_none() {
            error::report(Error::MissingKey {
                tag: message.tag().to_owned(),
                key: "path".to_owned(),
            });
        }
        path
    }

    pub fn image_loaded(&mut self, message: &DataObject) {
        let Some(path) = Self::image_path(message) else {
            return;
        };
        let state = ImageState::Loaded {
            width: message.property_float("width").unwrap_or(0.0),
            height: message.property_float("height").unwrap_or(0.0),
        };
        self.image_states.insert(path.to_owned(), state);
    }

    pub fn image_error(&mut self, message: &DataObject) {
        let Some(path) = Self::image_path(message) else {
            return;
        };
        let reason = message.property_value("message").unwrap_or_default().to_owned();
        log::warn!("session {}: image {path} failed: {reason}", self.id);
        self.image_states.insert(path.to_owned(), ImageState::Failed(reason));
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Handle one client message other than the connection-level ones.
    pub fn dispatch(&mut self, message: &DataObject) {
        match message.tag() {
            "answer" => {
                self.handle_answer(message);
            }
            "imageLoaded" => self.image_loaded(message),
            "imageError" => self.image_error(message),
            tag => self.handle_event(tag, message),
        }
    }

    /// Dispatch the event `tag` to the view named by the `id` key of `data`.
    ///
    /// The widget's own handling runs first, then the view's listeners, all in
    /// one batch.
    pub fn handle_event(&mut self, tag: &str, data: &DataObject) {
        match tag {
            "root-size" => {
                if self.client.update_size(data) {
                    log::debug!(
                        "session {}: root size {}x{}",
                        self.id,
                        self.client.width,
                        self.client.height
                    );
                }
                return;
            }
            "session-pause" => {
                self.with_content(|content, session| content.on_pause(session));
                return;
            }
            "session-resume" => {
                self.with_content(|content, session| content.on_resume(session));
                return;
            }
            _ => {}
        }

        let Some(html_id) = data.property_value("id") else {
            error::report(Error::MissingKey {
                tag: tag.to_owned(),
                key: "id".to_owned(),
            });
            return;
        };
        let Some(id) = self.tree.by_html_id(html_id) else {
            error::report(Error::ViewNotFound(html_id.to_owned()));
            return;
        };

        self.batch(|session| {
            session.widget_event(id, tag, data);
            let listeners = session
                .tree
                .get(id)
                .map(|view| view.event_listeners_for(tag))
                .unwrap_or_default();
            for listener in listeners {
                listener(session, id, data);
            }
        });
    }

    fn widget_event(&mut self, id: ViewId, tag: &str, data: &DataObject) {
        let Some(view) = self.tree.get(id) else {
            return;
        };
        if view.is_disabled(&self.theme) {
            return;
        }
        match (view.widget(), tag) {
            (Widget::Checkbox, "click") => {
                let checked = view.bool_value(CHECKED, &self.theme).unwrap_or(false);
                self.set_property(id, CHECKED, !checked);
            }
            (Widget::ListView, "itemClick") => {
                if let Some(number) = data.property_int("number") {
                    self.set_property(id, CURRENT, number);
                }
            }
            (Widget::DropDownList, "itemSelected") => {
                if let Some(number) = data.property_int("number") {
                    let ignore = std::mem::replace(&mut self.ignore_view_updates, true);
                    self.set_property(id, CURRENT, number);
                    self.ignore_view_updates = ignore;
                }
            }
            _ => {}
        }
    }
}

impl Constants for Session {
    fn constant(&self, name: &str) -> Option<String> {
        self.theme.constant(name)
    }

    fn color_text(&self, name: &str) -> Option<String> {
        self.theme.color_text(name)
    }

    fn image_text(&self, name: &str) -> Option<String> {
        self.theme.image_text(name)
    }
}
