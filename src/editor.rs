#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditorMode {
    Closed,
    Creating,
    Editing(String),
}

/// What a successful save asks the backend to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Submission {
    Create { text: String },
    Update { id: String, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejected {
    /// Nothing is open.
    Closed,
    /// A save from this editor is still waiting on the backend.
    Busy,
    /// Trimmed text is empty.
    Empty,
}

pub(crate) const EMPTY_ERROR: &str = "Prompt text can't be empty";

/// The one inline add/edit surface.
///
/// Every open bumps `session`, so a backend reply for an editor that was
/// since replaced or cancelled can be told apart from one for the current.
#[derive(Debug)]
pub(crate) struct Editor {
    mode: EditorMode,
    draft: String,
    error: Option<String>,
    saving: bool,
    session: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            mode: EditorMode::Closed,
            draft: String::new(),
            error: None,
            saving: false,
            session: 0,
        }
    }
}

impl Editor {
    pub(crate) fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub(crate) fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    #[cfg(test)]
    pub(crate) fn is_editing(&self, id: &str) -> bool {
        matches!(&self.mode, EditorMode::Editing(current) if current == id)
    }

    #[cfg(test)]
    pub(crate) fn draft(&self) -> &str {
        &self.draft
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn is_saving(&self) -> bool {
        self.saving
    }

    pub(crate) fn session(&self) -> u64 {
        self.session
    }

    /// Open empty for a new prompt, discarding whatever was open.
    pub(crate) fn open_create(&mut self) -> u64 {
        self.open(EditorMode::Creating, String::new())
    }

    /// Open pre-filled with an existing prompt's text.
    pub(crate) fn open_edit(&mut self, id: &str, text: &str) -> u64 {
        self.open(EditorMode::Editing(id.to_string()), text.to_string())
    }

    fn open(&mut self, mode: EditorMode, draft: String) -> u64 {
        self.session = self.session.wrapping_add(1);
        self.mode = mode;
        self.draft = draft;
        self.error = None;
        self.saving = false;
        self.session
    }

    pub(crate) fn set_draft(&mut self, text: String) {
        if self.is_open() {
            self.draft = text;
            self.error = None;
        }
    }

    pub(crate) fn submit(&mut self) -> Result<Submission, Rejected> {
        if self.saving {
            return Err(Rejected::Busy);
        }
        let text = self.draft.trim();
        let submission = match &self.mode {
            EditorMode::Closed => return Err(Rejected::Closed),
            _ if text.is_empty() => {
                self.error = Some(EMPTY_ERROR.to_string());
                return Err(Rejected::Empty);
            }
            EditorMode::Creating => Submission::Create {
                text: text.to_string(),
            },
            EditorMode::Editing(id) => Submission::Update {
                id: id.clone(),
                text: text.to_string(),
            },
        };
        self.saving = true;
        self.error = None;
        Ok(submission)
    }

    /// Backend answered for `session`; close if it is still the open one.
    pub(crate) fn finish(&mut self, session: u64) -> bool {
        if self.session == session && self.is_open() {
            self.close();
            true
        } else {
            false
        }
    }

    /// Backend rejected the save: stay open with the message.
    pub(crate) fn fail(&mut self, session: u64, message: &str) {
        if self.session == session && self.is_open() {
            self.saving = false;
            self.error = Some(message.to_string());
        }
    }

    /// Discard input. Returns true if something was open.
    pub(crate) fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        self.close();
        was_open
    }

    fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.draft.clear();
        self.error = None;
        self.saving = false;
    }
}
