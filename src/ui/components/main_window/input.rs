//! Keyboard, file picker and drag-and-drop input for MainWindow

use std::path::PathBuf;

use gpui::{AsyncApp, Context, KeyDownEvent, PathPromptOptions, WeakEntity, Window};

use crate::core::{AppConfig, OperationKind};

use super::{FieldId, Forms, MainWindow};

impl MainWindow {
    /// Apply a key press to the focused field
    ///
    /// Returns true if the view changed.
    pub fn handle_key(&mut self, key: &str, key_char: Option<&str>, shift: bool) -> bool {
        match key {
            "tab" => {
                self.focus_next(shift);
                return true;
            }
            "escape" => {
                let had_focus = self.focused_field.is_some();
                self.focused_field = None;
                return had_focus;
            }
            _ => {}
        }

        let Some(id) = self.focused_field else {
            return false;
        };
        let field = self.forms.field_mut(id);

        if key == "backspace" {
            return field.backspace();
        }

        match key_char {
            Some(typed) => field.insert(typed),
            None => false,
        }
    }

    /// Move focus through the active tab's fields, wrapping around
    pub fn focus_next(&mut self, backwards: bool) {
        let fields = Forms::tab_fields(self.active_tab);
        let current = self
            .focused_field
            .and_then(|id| fields.iter().position(|f| *f == id));

        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => fields.len() - 1,
            (Some(i), false) => (i + 1) % fields.len(),
            (Some(i), true) => (i + fields.len() - 1) % fields.len(),
        };
        self.focused_field = Some(fields[next]);
    }

    pub fn focus_field(&mut self, id: FieldId) {
        self.focused_field = Some(id);
    }

    pub(super) fn on_key_down(
        &mut self,
        event: &KeyDownEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let keystroke = &event.keystroke;

        // Shortcuts like cmd-q belong to the app
        if keystroke.modifiers.platform || keystroke.modifiers.control {
            return;
        }

        if keystroke.key == "enter" {
            let config = cx.global::<AppConfig>().clone();
            let kind = self.active_tab;
            if !self.is_busy(kind) {
                self.submit(kind, &config);
            }
            cx.notify();
            return;
        }

        if self.handle_key(
            &keystroke.key,
            keystroke.key_char.as_deref(),
            keystroke.modifiers.shift,
        ) {
            cx.notify();
        }
    }

    /// Fill the active tab's path from dropped files
    ///
    /// Only the first dropped path is used. Returns true if a path was set.
    pub fn handle_drop(&mut self, paths: &[PathBuf]) -> bool {
        let Some(path) = paths.first() else {
            return false;
        };
        if path.is_dir() {
            self.pending_error_message = Some((
                "Not a file".to_string(),
                format!("{} is a folder; drop a media file instead", path.display()),
            ));
            return false;
        }
        log::debug!("Dropped {} onto {}", path.display(), self.active_tab.label());
        self.forms.set_input(self.active_tab, path);
        true
    }

    /// Show the native file picker for a tab's path field
    pub fn browse(&mut self, kind: OperationKind, cx: &mut Context<Self>) {
        let options = PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: None,
        };
        let receiver = cx.prompt_for_paths(options);
        cx.spawn(move |this_handle: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                if let Ok(Ok(Some(paths))) = receiver.await {
                    if let Some(path) = paths.first() {
                        let path = path.clone();
                        let _ = this_handle.update(&mut async_cx, |this, cx| {
                            this.forms.set_input(kind, &path);
                            cx.notify();
                        });
                    }
                }
            }
        })
        .detach();
    }
}
