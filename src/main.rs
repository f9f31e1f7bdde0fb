use clap::Parser;
use iced::keyboard::{self, key::Named, Key, Modifiers};
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Subscription, Task, Theme};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

mod cli;
mod config;
mod error;
mod state;
mod thumbnail;

use config::Settings;
use state::buckets::{BucketKey, BucketMap, CopyResult};
use state::data::{ImageSet, SUPPORTED_EXTENSIONS};
use state::navigator::Navigator;
use state::scanner;
use thumbnail::Thumbnail;

/// Width of the thumbnail sidebar
const GRID_WIDTH: f32 = 280.0;

/// Main application state
struct ImageViewer {
    /// Loaded images and the one on screen
    navigator: Navigator,
    /// Digit key -> destination folder
    buckets: BucketMap,
    settings: Settings,
    /// Decoded thumbnails for the current set
    thumbnails: HashMap<PathBuf, image::Handle>,
    /// Images whose thumbnail could not be decoded
    broken_thumbnails: HashSet<PathBuf>,
    /// Bumped on every load so thumbnails for an older set are dropped
    generation: u64,
    /// Folder the current set was scanned from
    folder: Option<PathBuf>,
    /// Latest notification (errors, copy results)
    notice: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Open File"
    OpenFile,
    /// User clicked "Open Folder"
    OpenFolder,
    Next,
    Previous,
    /// A thumbnail in the grid was clicked
    ThumbnailClicked(PathBuf),
    /// A digit key was pressed
    Classify(BucketKey),
    BindBucket(BucketKey),
    ClearBucket(BucketKey),
    /// Background thumbnail finished (generation, path, result)
    ThumbnailLoaded(u64, PathBuf, Result<Thumbnail, String>),
}

impl ImageViewer {
    /// Create a new instance of the application
    fn new(args: cli::Args, settings: Settings) -> (Self, Task<Message>) {
        let mut viewer = ImageViewer {
            navigator: Navigator::new(),
            buckets: BucketMap::new(settings.bucket_slots),
            settings,
            thumbnails: HashMap::new(),
            broken_thumbnails: HashSet::new(),
            generation: 0,
            folder: None,
            notice: None,
        };

        log::info!(
            "Image viewer ready ({} bucket slots, {:?} on collision)",
            viewer.buckets.slots(),
            viewer.settings.collision_policy
        );

        let task = match args.start_path() {
            Some(path) if path.is_dir() => viewer.open_folder(path),
            Some(path) => viewer.open_file(path),
            None => Task::none(),
        };

        (viewer, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFile => {
                let file = FileDialog::new()
                    .set_title("Open Image")
                    .add_filter("Image Files", &SUPPORTED_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => self.open_file(path),
                    None => Task::none(),
                }
            }
            Message::OpenFolder => {
                let folder = FileDialog::new().set_title("Open Folder").pick_folder();

                match folder {
                    Some(path) => self.open_folder(path),
                    None => Task::none(),
                }
            }
            Message::Next => {
                if self.navigator.next().is_some() {
                    self.notice = None;
                }
                Task::none()
            }
            Message::Previous => {
                if self.navigator.previous().is_some() {
                    self.notice = None;
                }
                Task::none()
            }
            Message::ThumbnailClicked(path) => {
                match self.navigator.select(&path) {
                    Ok(_) => self.notice = None,
                    Err(err) => log::debug!("Ignoring stale selection: {}", err),
                }
                Task::none()
            }
            Message::Classify(key) => {
                self.classify(key);
                Task::none()
            }
            Message::BindBucket(key) => {
                let folder = FileDialog::new()
                    .set_title(format!("Select Folder for Bucket {}", key))
                    .pick_folder();

                if let Some(folder) = folder {
                    self.notice = Some(match self.buckets.bind(key, folder.clone()) {
                        Ok(()) => format!("Bucket {}: {}", key, folder.display()),
                        Err(err) => err.to_string(),
                    });
                }
                Task::none()
            }
            Message::ClearBucket(key) => {
                if let Some(folder) = self.buckets.unbind(key) {
                    log::info!("Bucket {} cleared (was {})", key, folder.display());
                }
                Task::none()
            }
            Message::ThumbnailLoaded(generation, path, result) => {
                if generation != self.generation {
                    log::debug!("Dropping thumbnail from an older folder: {}", path.display());
                    return Task::none();
                }

                match result {
                    Ok(thumb) => {
                        let handle = image::Handle::from_rgba(thumb.width, thumb.height, thumb.rgba);
                        self.thumbnails.insert(thumb.path, handle);
                    }
                    Err(err) => {
                        log::warn!("Thumbnail failed for {}: {}", path.display(), err);
                        self.broken_thumbnails.insert(path);
                    }
                }
                Task::none()
            }
        }
    }

    /// Scan `folder` and show its first image.
    ///
    /// On failure the current set stays on screen and the error is shown
    /// in the status bar.
    fn open_folder(&mut self, folder: PathBuf) -> Task<Message> {
        match scanner::scan(&folder) {
            Ok(images) => {
                // An empty folder is reported by the image pane
                self.notice = None;
                self.folder = Some(folder);
                self.show(images)
            }
            Err(err) => {
                log::warn!("Could not open folder: {}", err);
                self.notice = Some(err.to_string());
                Task::none()
            }
        }
    }

    /// Show `path` among the images of its folder.
    ///
    /// If the folder cannot be scanned or does not list the file, the set
    /// is just that one image.
    fn open_file(&mut self, path: PathBuf) -> Task<Message> {
        if !path.is_file() {
            let err = error::ViewerError::NotFound(path);
            log::warn!("Could not open file: {}", err);
            self.notice = Some(err.to_string());
            return Task::none();
        }

        let folder = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let images = match scanner::scan(&folder) {
            Ok(images) if images.position(&path).is_some() => images,
            Ok(_) => ImageSet::single(path.clone()),
            Err(err) => {
                log::warn!("Showing {} alone: {}", path.display(), err);
                ImageSet::single(path.clone())
            }
        };

        self.notice = None;
        self.folder = Some(folder);
        let task = self.show(images);

        if let Err(err) = self.navigator.select(&path) {
            log::warn!("Opened file is missing from its set: {}", err);
        }
        task
    }

    /// Replace the loaded set and start generating its thumbnails
    fn show(&mut self, images: ImageSet) -> Task<Message> {
        self.navigator.load(images);
        self.generation += 1;
        self.thumbnails.clear();
        self.broken_thumbnails.clear();

        let generation = self.generation;
        let size = self.settings.thumbnail_size;

        Task::batch(self.navigator.images().iter().map(|path| {
            let path = path.to_path_buf();
            Task::perform(thumbnail::load_thumbnail(path.clone(), size), move |result| {
                Message::ThumbnailLoaded(generation, path.clone(), result)
            })
        }))
    }

    /// Copy the image on screen into the bucket bound to `key`
    fn classify(&mut self, key: BucketKey) {
        let policy = self.settings.collision_policy;

        match self.navigator.classify(&self.buckets, key, policy) {
            Ok(CopyResult::Copied { destination }) => {
                self.notice = Some(format!("Copied to {}", destination.display()));
            }
            Ok(CopyResult::Skipped { destination }) => {
                self.notice = Some(format!("Skipped, {} already exists", destination.display()));
            }
            Ok(CopyResult::Unbound(_)) | Ok(CopyResult::NoImage) => {}
            Err(err) => {
                log::warn!("Copy to bucket {} failed: {}", key, err);
                self.notice = Some(format!("Copy failed: {}", err));
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let toolbar = row![
            button("Open File").on_press(Message::OpenFile).padding(8),
            button("Open Folder").on_press(Message::OpenFolder).padding(8),
        ]
        .spacing(10);

        let content = row![self.view_grid(), self.view_image()]
            .spacing(10)
            .height(Length::Fill);

        column![toolbar, self.view_buckets(), content, self.view_status()]
            .spacing(10)
            .padding(10)
            .into()
    }

    fn view_grid(&self) -> Element<Message> {
        let size = self.settings.thumbnail_size as f32;
        let current = self.navigator.current_index();

        let items: Vec<Element<Message>> = self
            .navigator
            .images()
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let preview: Element<Message> = match self.thumbnails.get(path) {
                    Some(handle) => image(handle.clone()).width(size).height(size).into(),
                    None => {
                        let label = if self.broken_thumbnails.contains(path) {
                            "no preview"
                        } else {
                            "..."
                        };
                        container(text(label).size(12))
                            .center_x(size)
                            .center_y(size)
                            .into()
                    }
                };

                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();

                let style: fn(&Theme, button::Status) -> button::Style = if Some(index) == current {
                    button::primary
                } else {
                    button::secondary
                };

                button(
                    column![preview, text(name).size(11)]
                        .spacing(4)
                        .width(size + 16.0)
                        .align_x(Alignment::Center),
                )
                .on_press(Message::ThumbnailClicked(path.to_path_buf()))
                .style(style)
                .padding(4)
                .into()
            })
            .collect();

        let grid = Wrap::with_elements(items).spacing(10.0).line_spacing(10.0);

        container(scrollable(grid))
            .width(Length::Fixed(GRID_WIDTH))
            .height(Length::Fill)
            .into()
    }

    fn view_image(&self) -> Element<Message> {
        let body: Element<Message> = match self.navigator.current_path() {
            Some(path) => image(image::Handle::from_path(path))
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None if self.folder.is_some() => {
                text("No images found in the selected folder").size(16).into()
            }
            None => text("Open a file or folder to begin").size(16).into(),
        };

        container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn view_buckets(&self) -> Element<Message> {
        let mut bar = row![text("Buckets").size(14)]
            .spacing(16)
            .align_y(Alignment::Center);

        for key in self.buckets.keys() {
            let folder = self.buckets.get(key);
            let label = match folder {
                Some(folder) => format!(
                    "{}: {}",
                    key,
                    folder
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| folder.display().to_string())
                ),
                None => format!("{}: (unbound)", key),
            };

            let mut slot = row![
                text(label).size(14),
                button(text("Bind").size(12))
                    .on_press(Message::BindBucket(key))
                    .padding(4),
            ]
            .spacing(4)
            .align_y(Alignment::Center);

            if folder.is_some() {
                slot = slot.push(
                    button(text("Clear").size(12))
                        .on_press(Message::ClearBucket(key))
                        .style(button::secondary)
                        .padding(4),
                );
            }

            bar = bar.push(slot);
        }

        bar.into()
    }

    fn view_status(&self) -> Element<Message> {
        row![
            text(self.navigator.status_line()).size(14).width(Length::Fill),
            text(self.notice.as_deref().unwrap_or_default()).size(14),
        ]
        .spacing(20)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(key_to_message)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Arrows navigate, digits classify
fn key_to_message(key: Key, modifiers: Modifiers) -> Option<Message> {
    if modifiers.command() || modifiers.alt() {
        return None;
    }

    match key {
        Key::Named(Named::ArrowRight | Named::ArrowDown) => Some(Message::Next),
        Key::Named(Named::ArrowLeft | Named::ArrowUp) => Some(Message::Previous),
        Key::Character(c) => {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(digit), None) => BucketKey::from_char(digit).map(Message::Classify),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Settings from `--config`, the default location, or built-in defaults
fn load_settings(args: &cli::Args) -> Settings {
    let Some(path) = args.config.clone().or_else(Settings::default_path) else {
        return Settings::default();
    };

    Settings::load_from(&path).unwrap_or_else(|err| {
        log::warn!("{}; using default settings", err);
        Settings::default()
    })
}

fn main() -> iced::Result {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let settings = load_settings(&args);
    let window_size = (settings.window_width, settings.window_height);

    iced::application("Image Viewer", ImageViewer::update, ImageViewer::view)
        .subscription(ImageViewer::subscription)
        .theme(ImageViewer::theme)
        .window_size(window_size)
        .centered()
        .run_with(move || ImageViewer::new(args, settings))
}
