// src/chat_state.rs

use crate::api::FeedbackReply;
use crate::attachments::AttachmentStore;
use crate::constants::{ATTACHMENT_FILENAME, ATTACHMENT_LABEL};
use crate::errors::{ReviewBotError, ReviewBotResult};
use crate::message::{Message, MessageLog};

/// Identifies one dispatched request. Completions carrying any other id are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What the caller must send after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub request: RequestId,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Reply accepted, this many bot messages appended.
    Applied(usize),
    /// Request failed; nothing appended.
    Failed,
    /// Completion for a request that is no longer outstanding.
    Stale,
}

/// Everything that affects what the message pane shows. Auto-scroll fires
/// whenever this changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFingerprint {
    pub messages: usize,
    pub loading: bool,
}

/// One row of the message pane.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Message(&'a Message),
    /// Synthetic "bot is responding" row, never stored in the log.
    Loading,
}

#[derive(Debug, Clone)]
pub struct ScrollState {
    offset: u16,
    max_offset: u16,
    follow: bool,
    last_seen: Option<RenderFingerprint>,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            follow: true,
            last_seen: None,
        }
    }
}

impl ScrollState {
    /// Re-attaches to the bottom when the rendered content changed.
    /// Returns true when it did change.
    pub fn sync(&mut self, fingerprint: RenderFingerprint) -> bool {
        if self.last_seen == Some(fingerprint) {
            return false;
        }
        self.last_seen = Some(fingerprint);
        self.follow = true;
        true
    }

    /// Offset to draw with, given the content and viewport height.
    pub fn resolve(&mut self, total_lines: u16, height: u16) -> u16 {
        self.max_offset = total_lines.saturating_sub(height);
        if self.follow || self.offset > self.max_offset {
            self.offset = self.max_offset;
        }
        self.offset
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines);
        if self.offset >= self.max_offset {
            self.offset = self.max_offset;
            self.follow = true;
        }
    }

    pub fn follow_bottom(&mut self) {
        self.follow = true;
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }
}

/// State of the chat view: input text, message log and loading flag.
#[derive(Debug)]
pub struct ChatState {
    input: String,
    log: MessageLog,
    attachments: AttachmentStore,
    loading: bool,
    generation: u64,
    pending: Option<RequestId>,
    pub scroll: ScrollState,
}

impl ChatState {
    pub fn new(attachments: AttachmentStore) -> Self {
        Self {
            input: String::new(),
            log: MessageLog::new(),
            attachments,
            loading: false,
            generation: 0,
            pending: None,
            scroll: ScrollState::default(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input verbatim.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut AttachmentStore {
        &mut self.attachments
    }

    /// Accepts the current input as a repository URL.
    ///
    /// Returns `None` without touching any state when the trimmed input is
    /// empty or a request is already outstanding. Otherwise appends the user
    /// message (raw text), clears the input and raises the loading flag.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.input.trim().is_empty() {
            return None;
        }
        if self.loading {
            log::debug!("Submit ignored, request {:?} still pending", self.pending);
            return None;
        }

        let url = std::mem::take(&mut self.input);
        self.log.push_user(url.clone());

        self.generation += 1;
        let request = RequestId(self.generation);
        self.pending = Some(request);
        self.loading = true;

        Some(Submission { request, url })
    }

    /// Applies the outcome of `request`. The loading flag is lowered for the
    /// outstanding request whatever the outcome.
    pub fn settle(
        &mut self,
        request: RequestId,
        result: ReviewBotResult<FeedbackReply>,
    ) -> Settlement {
        if self.pending != Some(request) {
            log::warn!(
                "Discarding completion of request {}, outstanding: {:?}",
                request.get(),
                self.pending
            );
            return Settlement::Stale;
        }
        self.pending = None;
        self.loading = false;

        match result.and_then(|reply| self.append_reply(request, reply)) {
            Ok(appended) => Settlement::Applied(appended),
            Err(e) => {
                log::error!("Feedback request {} failed: {}", request.get(), e);
                Settlement::Failed
            }
        }
    }

    fn append_reply(&mut self, request: RequestId, reply: FeedbackReply) -> ReviewBotResult<usize> {
        match reply {
            FeedbackReply::File(bytes) => {
                let handle = self.attachments.stash(&bytes, ATTACHMENT_FILENAME)?;
                self.log
                    .push_attachment(handle, ATTACHMENT_FILENAME, ATTACHMENT_LABEL);
                Ok(1)
            }
            FeedbackReply::Entries(entries) => {
                let count = entries.len();
                self.log.extend_entries(request.get(), entries);
                Ok(count)
            }
        }
    }

    pub fn fingerprint(&self) -> RenderFingerprint {
        RenderFingerprint {
            messages: self.log.len(),
            loading: self.loading,
        }
    }

    /// Messages in insertion order, followed by the loading row if a request
    /// is outstanding.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.log
            .iter()
            .map(Entry::Message)
            .chain(self.loading.then_some(Entry::Loading))
    }

    pub fn save_latest_attachment(
        &mut self,
        dir: &std::path::Path,
    ) -> ReviewBotResult<std::path::PathBuf> {
        let handle = self
            .log
            .latest_attachment()
            .ok_or_else(|| ReviewBotError::attachment_error("No feedback file to save yet"))?;
        self.attachments.save(handle, dir)
    }

    pub fn open_latest_attachment(&self) -> ReviewBotResult<std::path::PathBuf> {
        let handle = self
            .log
            .latest_attachment()
            .ok_or_else(|| ReviewBotError::attachment_error("No feedback file to open yet"))?;
        self.attachments.open(handle)
    }

    /// Releases session resources. The log itself is dropped with the state.
    pub fn finish_session(&mut self) -> ReviewBotResult<()> {
        self.attachments.release_all()
    }
}
