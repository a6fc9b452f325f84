use iced::task;
use iced::widget::{column, row, scrollable, text};
use iced::{Alignment, Element, Length, Task, Theme};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod ingest;
mod state;
mod ui;

use config::{AppConfig, ThemeChoice};
use ingest::data_url::DataUrl;
use ingest::queue::{UploadQueue, UploadTarget, UploadTicket};
use ingest::{FetchError, IngestError};
use state::{ImageSource, Store};
use ui::cache::ImageCache;

/// Main application state
struct ProfileGallery {
    /// Startup settings (title, theme)
    config: AppConfig,
    /// Profile picture, bio and gallery
    store: Store,
    /// Decoded images, kept in sync with the store
    images: ImageCache,
    /// Uploads still reading from disk
    uploads: UploadQueue,
    /// Abort handles for the tasks behind in-flight uploads
    aborts: HashMap<UploadTicket, task::Handle>,
    /// Last upload failure shown to the user
    status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Change photo"
    PickProfileImage,
    /// User clicked "Upload image"
    PickGalleryImage,
    /// File picker closed; `None` if the user cancelled
    FilePicked(UploadTarget, Option<PathBuf>),
    /// Background read finished
    UploadFinished(UploadTicket, Result<DataUrl, IngestError>),
    /// User cancelled every in-flight upload
    CancelUploads,
    /// Bio text edited (one message per keystroke)
    BioChanged(String),
    /// Delete control pressed on a gallery tile
    DeleteImage(String),
    /// Download of a remote gallery image finished
    SeedFetched(String, Result<Vec<u8>, FetchError>),
}

impl ProfileGallery {
    /// Create a new instance of the application
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let mut store = Store::new(config.default_bio.clone(), config.seed_gallery());
        let images = ImageCache::new(&mut store);

        info!(seeded = store.gallery().len(), "profile gallery initialized");

        // Remote seeds stay broken until (and unless) their bytes arrive
        let fetches: Vec<Task<Message>> = store
            .gallery()
            .iter()
            .filter_map(|image| match &image.source {
                ImageSource::Remote(url) => {
                    let id = image.id.clone();
                    Some(Task::perform(ingest::fetch_remote(url.clone()), move |result| {
                        Message::SeedFetched(id.clone(), result)
                    }))
                }
                ImageSource::Inline(_) => None,
            })
            .collect();

        (
            ProfileGallery {
                config,
                store,
                images,
                uploads: UploadQueue::new(),
                aborts: HashMap::new(),
                status: None,
            },
            Task::batch(fetches),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::PickProfileImage => Task::perform(
                ingest::pick_image_file("Choose a profile picture"),
                |path| Message::FilePicked(UploadTarget::Profile, path),
            ),
            Message::PickGalleryImage => Task::perform(
                ingest::pick_image_file("Add an image to the gallery"),
                |path| Message::FilePicked(UploadTarget::Gallery, path),
            ),
            Message::FilePicked(target, Some(path)) => self.start_upload(target, path),
            Message::FilePicked(target, None) => {
                debug!(?target, "file picker cancelled");
                Task::none()
            }
            Message::UploadFinished(ticket, result) => {
                self.finish_upload(ticket, result);
                Task::none()
            }
            Message::CancelUploads => {
                self.cancel_uploads();
                Task::none()
            }
            Message::BioChanged(text) => {
                self.store.set_bio_text(text);
                Task::none()
            }
            Message::DeleteImage(id) => {
                self.store.remove_gallery_image(&id);
                Task::none()
            }
            Message::SeedFetched(id, Ok(bytes)) => {
                self.images.insert_fetched(&self.store, &id, bytes);
                Task::none()
            }
            Message::SeedFetched(id, Err(e)) => {
                warn!(%id, "remote image unavailable: {}", e);
                Task::none()
            }
        };

        // Pick up whatever the store changed before the next view
        self.images.sync(&self.store);
        task
    }

    /// Kick off the background read for a picked file
    fn start_upload(&mut self, target: UploadTarget, path: PathBuf) -> Task<Message> {
        let ticket = self.uploads.begin(target);
        info!(?target, path = %path.display(), "upload started");

        let (task, handle) = Task::perform(ingest::read_data_url(path), move |result| {
            Message::UploadFinished(ticket, result)
        })
        .abortable();

        self.aborts.insert(ticket, handle);
        task
    }

    /// Commit a finished read, unless its upload was cancelled
    fn finish_upload(&mut self, ticket: UploadTicket, result: Result<DataUrl, IngestError>) {
        self.aborts.remove(&ticket);

        let Some(target) = self.uploads.finish(ticket) else {
            debug!(?ticket, "discarding result of cancelled upload");
            return;
        };

        let data_url = match result {
            Ok(data_url) => data_url,
            Err(e) => {
                warn!(?target, "upload failed: {}", e);
                self.status = Some(format!("Upload failed: {}", e));
                return;
            }
        };

        match target {
            UploadTarget::Profile => ingest::commit_profile_upload(&mut self.store, data_url),
            UploadTarget::Gallery => {
                if let Err(e) = ingest::commit_gallery_upload(&mut self.store, data_url) {
                    warn!("could not add upload to gallery: {}", e);
                    self.status = Some(format!("Upload failed: {}", e));
                    return;
                }
            }
        }
        self.status = None;
    }

    /// Abort every in-flight read; late completions are discarded
    fn cancel_uploads(&mut self) {
        let cancelled = self.uploads.cancel_all();
        for ticket in &cancelled {
            if let Some(handle) = self.aborts.remove(ticket) {
                handle.abort();
            }
        }
        info!(count = cancelled.len(), "uploads cancelled");
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let header = row![
            ui::profile::avatar(self.images.profile()),
            column![
                text(&self.config.title).size(32),
                ui::profile::bio(self.store.bio()),
            ]
            .spacing(12),
        ]
        .spacing(24)
        .align_y(Alignment::Center);

        let content = column![
            header,
            ui::upload_bar(self.uploads.in_flight(), self.status.as_deref()),
            text("Gallery").size(24),
            ui::gallery::view(self.store.gallery(), &self.images),
        ]
        .spacing(24)
        .padding(40);

        scrollable(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn title(&self) -> String {
        self.config.title.clone()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.config.theme {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }
}

fn main() -> iced::Result {
    // Filter with RUST_LOG; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("{}; using default settings", e);
        AppConfig::default()
    });

    iced::application(ProfileGallery::title, ProfileGallery::update, ProfileGallery::view)
        .theme(ProfileGallery::theme)
        .centered()
        .run_with(move || ProfileGallery::new(config))
}
