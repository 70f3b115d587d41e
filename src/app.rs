use crate::api::{FeedbackClient, FeedbackReply};
use crate::attachments::AttachmentStore;
use crate::chat_state::{ChatState, RequestId, Settlement};
use crate::config::Config;
use crate::errors::ReviewBotResult;
use crate::status_indicator::StatusIndicator;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the UI loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Input(crossterm::event::Event),
    Tick,
    Reply(RequestId, ReviewBotResult<FeedbackReply>),
}

pub struct App {
    pub chat: ChatState,
    pub status_indicator: StatusIndicator,
    pub should_quit: bool,
    client: Arc<FeedbackClient>,
    download_dir: PathBuf,
    events: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events: mpsc::Sender<AppEvent>) -> ReviewBotResult<Self> {
        Ok(Self {
            chat: ChatState::new(AttachmentStore::new()?),
            status_indicator: StatusIndicator::new(),
            should_quit: false,
            client: Arc::new(FeedbackClient::new(config)?),
            download_dir: config.download_dir.clone(),
            events,
        })
    }

    pub fn client(&self) -> &FeedbackClient {
        &self.client
    }

    pub fn download_dir(&self) -> &std::path::Path {
        &self.download_dir
    }

    /// Submits the input and, when accepted, sends the request in the
    /// background. The reply comes back as [`AppEvent::Reply`].
    pub fn submit(&mut self) -> bool {
        let Some(submission) = self.chat.submit() else {
            return false;
        };

        log::info!(
            "Requesting feedback for {:?} (request {})",
            submission.url,
            submission.request.get()
        );
        self.status_indicator.start_waiting();

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.request_feedback(&submission.url).await;
            if events
                .send(AppEvent::Reply(submission.request, result))
                .await
                .is_err()
            {
                log::debug!("UI closed before request {} settled", submission.request.get());
            }
        });
        true
    }

    pub fn settle(
        &mut self,
        request: RequestId,
        result: ReviewBotResult<FeedbackReply>,
    ) -> Settlement {
        let outcome = self.chat.settle(request, result);
        if outcome != Settlement::Stale {
            self.status_indicator.stop_waiting();
        }
        outcome
    }

    pub fn tick(&mut self) {
        if self.chat.is_loading() {
            self.status_indicator.update_spinner();
        }
    }

    pub fn save_attachment(&mut self) {
        match self.chat.save_latest_attachment(&self.download_dir) {
            Ok(path) => self
                .status_indicator
                .set_outcome(format!("Saved {}", path.display())),
            Err(e) => {
                log::warn!("Save failed: {}", e);
                self.status_indicator.set_outcome(e.to_string());
            }
        }
    }

    pub fn open_attachment(&mut self) {
        match self.chat.open_latest_attachment() {
            Ok(path) => self
                .status_indicator
                .set_outcome(format!("Opened {}", path.display())),
            Err(e) => {
                log::warn!("Open failed: {}", e);
                self.status_indicator.set_outcome(e.to_string());
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Releases session resources. Called once the UI loop has ended.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.chat.finish_session() {
            log::error!("Failed to release attachments: {}", e);
        }
    }
}
