use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Element, Length, Task, Theme};
use std::path::PathBuf;

mod github;
mod state;
mod ui;

use github::{GithubClient, GithubError, RepoRef};
use state::catalog::FileCatalog;
use state::clip::{Edge, Edges};
use state::data::FileEntry;
use state::library::Library;
use state::settings::Settings;
use ui::preview::Preview;

/// Main application state
struct TextureViewer {
    /// Persisted user settings
    settings: Settings,
    /// Where the settings are written (None keeps them in memory)
    settings_path: Option<PathBuf>,
    /// The stored file list, if the database could be opened
    library: Option<Library>,
    /// Filtered, paginated repository listing
    catalog: FileCatalog,
    /// Texture being inspected
    preview: Option<Preview>,
    /// A tree request is in flight
    loading: bool,
    /// Blocking notification (invalid input), cleared by the user
    alert: Option<String>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Repository URL field edited
    RepoUrlChanged(String),
    /// User clicked "Save"
    SaveSettings,
    /// User clicked "Read repository"
    ReadRepository,
    /// Background tree fetch completed
    TreeLoaded(RepoRef, Result<Vec<FileEntry>, GithubError>),
    /// Search box edited
    FilterChanged(String),
    /// Navigate to a page, absolute or relative to the current one
    GotoPage(i64, bool),
    /// Page size picked
    PerPageSelected(usize),
    /// A catalog entry was clicked
    OpenPreview(FileEntry),
    /// Background image download completed
    PreviewLoaded(FileEntry, Result<Vec<u8>, GithubError>),
    ClosePreview,
    /// Coordinate slider moved
    CoordChanged(Edge, f64),
    /// Pixel field edited
    PixelInput(Edge, String),
    /// Rectangle dragged on the overlay
    ClipDragged(Edges),
    /// Save the previewed texture to disk
    DownloadImage,
    /// Save finished (None when the dialog was cancelled)
    Downloaded(Result<Option<PathBuf>, String>),
    DismissAlert,
}

impl TextureViewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings_path = match Settings::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Settings will not be persisted: {}", e);
                None
            }
        };
        let settings = settings_path
            .as_deref()
            .map(Settings::load_or_default)
            .unwrap_or_default();

        // The viewer works without its database, it just can't warm-start
        let library = match Library::new() {
            Ok(library) => Some(library),
            Err(e) => {
                log::warn!("Library unavailable: {}", e);
                None
            }
        };

        (Self::with_parts(settings, settings_path, library), Task::none())
    }

    /// Assemble the application and warm-start the catalog from the library
    fn with_parts(settings: Settings, settings_path: Option<PathBuf>, library: Option<Library>) -> Self {
        let mut catalog = FileCatalog::new(settings.per_page);

        if let Some(library) = &library {
            match library.load_files() {
                Ok(files) => catalog.set_files(files),
                Err(e) => log::warn!("Ignoring stored file list: {}", e),
            }
        }

        let status = match library.as_ref().and_then(|l| l.last_refresh().ok().flatten()) {
            Some((repo, at)) => format!(
                "Ready. {} textures from {} (read {}).",
                catalog.files().len(),
                repo,
                at.format("%Y-%m-%d %H:%M")
            ),
            None => "Ready. Read a repository to list its textures.".to_string(),
        };
        log::info!("🎨 Texture Viewer initialized with {} textures", catalog.files().len());

        TextureViewer {
            settings,
            settings_path,
            library,
            catalog,
            preview: None,
            loading: false,
            alert: None,
            status,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RepoUrlChanged(url) => {
                self.settings.repo_url = url;
                Task::none()
            }
            Message::SaveSettings => {
                self.save_settings();
                Task::none()
            }
            Message::ReadRepository => {
                let Some((repo, client)) = self.connect() else {
                    return Task::none();
                };
                self.save_settings();

                self.loading = true;
                self.status = format!("Reading {}...", repo);

                Task::perform(
                    async move {
                        let result = client.fetch_tree(&repo).await;
                        (repo, result)
                    },
                    |(repo, result)| Message::TreeLoaded(repo, result),
                )
            }
            Message::TreeLoaded(repo, result) => {
                self.loading = false;
                match result {
                    Ok(files) => {
                        self.catalog.set_files(files);

                        if let Some(library) = &mut self.library {
                            if let Err(e) = library.save_files(&repo.to_string(), self.catalog.files()) {
                                log::warn!("Could not store file list: {}", e);
                            }
                        }

                        self.status = format!("✅ {} textures in {}.", self.catalog.files().len(), repo);
                    }
                    Err(e) => {
                        log::error!("Reading {} failed: {}", repo, e);
                        self.status = format!("❌ Reading {} failed: {}", repo, e);
                    }
                }
                Task::none()
            }
            Message::FilterChanged(query) => {
                self.catalog.set_filter(query);
                Task::none()
            }
            Message::GotoPage(target, relative) => {
                self.catalog.goto_page(target, relative);
                Task::none()
            }
            Message::PerPageSelected(per_page) => {
                self.settings.per_page = per_page;
                self.catalog.set_per_page(per_page);
                self.save_settings();
                Task::none()
            }
            Message::OpenPreview(entry) => {
                let Some((repo, client)) = self.connect() else {
                    return Task::none();
                };
                self.status = format!("Loading {}...", entry.display_path());

                Task::perform(
                    async move {
                        let result = client.fetch_raw(&repo, &entry.path).await;
                        (entry, result)
                    },
                    |(entry, result)| Message::PreviewLoaded(entry, result),
                )
            }
            Message::PreviewLoaded(entry, result) => {
                let loaded = result
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| Preview::load(entry.clone(), bytes).map_err(|e| e.to_string()));

                match loaded {
                    Ok(preview) => {
                        self.status = entry.display_path();
                        self.preview = Some(preview);
                    }
                    Err(e) => {
                        log::error!("Preview of {} failed: {}", entry.path, e);
                        self.status = format!("❌ Could not load {}: {}", entry.path, e);
                    }
                }
                Task::none()
            }
            Message::ClosePreview => {
                self.preview = None;
                Task::none()
            }
            Message::CoordChanged(edge, value) => {
                if let Some(preview) = &mut self.preview {
                    preview.edit_coord(edge, value);
                }
                Task::none()
            }
            Message::PixelInput(edge, text) => {
                if let Some(preview) = &mut self.preview {
                    preview.edit_pixel(edge, text);
                }
                Task::none()
            }
            Message::ClipDragged(coord) => {
                if let Some(preview) = &mut self.preview {
                    preview.set_coord(coord);
                    log::debug!("Clip dragged to {}", preview.clip);
                }
                Task::none()
            }
            Message::DownloadImage => {
                let Some(preview) = &self.preview else {
                    return Task::none();
                };

                Task::perform(
                    ui::preview::save_texture(
                        preview.entry.file_name().to_string(),
                        preview.bytes().to_vec(),
                    ),
                    Message::Downloaded,
                )
            }
            Message::Downloaded(result) => {
                match result {
                    Ok(Some(path)) => self.status = format!("💾 Saved {}", path.display()),
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Saving texture failed: {}", e);
                        self.status = format!("❌ Could not save {}", e);
                    }
                }
                Task::none()
            }
            Message::DismissAlert => {
                self.alert = None;
                Task::none()
            }
        }
    }

    /// Validate the repository URL and build a client for it.
    /// An invalid URL raises the alert and nothing is fetched.
    fn connect(&mut self) -> Option<(RepoRef, GithubClient)> {
        let repo = match RepoRef::parse(&self.settings.repo_url) {
            Ok(repo) => repo,
            Err(e) => {
                log::warn!("{}", e);
                self.alert = Some(e.to_string());
                return None;
            }
        };

        match GithubClient::new(self.settings.api_base.clone()) {
            Ok(client) => Some((repo, client)),
            Err(e) => {
                log::error!("Could not create HTTP client: {}", e);
                self.status = format!("❌ {}", e);
                None
            }
        }
    }

    /// Best-effort write of the settings file
    fn save_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            log::warn!("Could not save settings to {}: {}", path.display(), e);
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let read_label = if self.loading { "Reading..." } else { "Read repository" };

        let settings_bar = row![
            text_input("https://github.com/<owner>/<repo>/", &self.settings.repo_url)
                .on_input(Message::RepoUrlChanged)
                .on_submit(Message::ReadRepository)
                .padding(8),
            button("Save").style(button::secondary).on_press(Message::SaveSettings),
            button(read_label).on_press_maybe((!self.loading).then_some(Message::ReadRepository)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let mut content = column![settings_bar].spacing(16).padding(20);

        if let Some(alert) = &self.alert {
            content = content.push(
                container(
                    row![
                        text(alert).width(Length::Fill),
                        button("OK").on_press(Message::DismissAlert),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                )
                .padding(10)
                .width(Length::Fill)
                .style(container::rounded_box),
            );
        }

        content = content.push(text(&self.status).size(14));

        let mut body = row![ui::file_list::view(
            &self.catalog,
            self.preview.as_ref().map(|p| p.entry.path.as_str()),
        )]
        .spacing(20);

        if let Some(preview) = &self.preview {
            body = body.push(ui::clip_panel::view(preview));
        }

        content = content.push(body.height(Length::Fill));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(
        "Texture Viewer",
        TextureViewer::update,
        TextureViewer::view,
    )
    .theme(TextureViewer::theme)
    .centered()
    .run_with(TextureViewer::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(repo_url: &str) -> TextureViewer {
        let settings = Settings {
            repo_url: repo_url.to_string(),
            ..Settings::default()
        };
        TextureViewer::with_parts(settings, None, Some(Library::open_in_memory().unwrap()))
    }

    fn gethe() -> RepoRef {
        RepoRef::parse("https://github.com/Gethe/wow-ui-textures/").unwrap()
    }

    #[test]
    fn test_invalid_repo_url_raises_alert() {
        let mut app = viewer("not-a-url");
        let _ = app.update(Message::ReadRepository);

        assert!(app.alert.is_some());
        assert!(!app.loading);

        let _ = app.update(Message::DismissAlert);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_valid_repo_url_starts_loading() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let _ = app.update(Message::ReadRepository);

        assert!(app.alert.is_none());
        assert!(app.loading);
    }

    #[test]
    fn test_tree_loaded_fills_and_stores_catalog() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let files = vec![
            FileEntry::new(".gitignore"),
            FileEntry::new("Buttons/A.PNG"),
            FileEntry::new("Buttons/readme.txt"),
        ];

        let _ = app.update(Message::TreeLoaded(gethe(), Ok(files)));

        assert_eq!(app.catalog.files().len(), 1);
        let stored = app.library.as_ref().unwrap().load_files().unwrap();
        assert_eq!(stored, vec![FileEntry::new("Buttons/A.PNG")]);

        // A fresh viewer over the same library warm-starts from it
        let restarted = TextureViewer::with_parts(Settings::default(), None, app.library.take());
        assert_eq!(restarted.catalog.files().len(), 1);
    }

    #[test]
    fn test_tree_error_keeps_catalog() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let _ = app.update(Message::TreeLoaded(gethe(), Ok(vec![FileEntry::new("a.png")])));
        let _ = app.update(Message::TreeLoaded(gethe(), Err(GithubError::Status(404))));

        assert!(!app.loading);
        assert_eq!(app.catalog.files().len(), 1);
        assert!(app.status.contains("404"));
    }

    #[test]
    fn test_paging_messages() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let files = (0..45).map(|i| FileEntry::new(format!("{i}.png"))).collect();
        let _ = app.update(Message::TreeLoaded(gethe(), Ok(files)));

        let _ = app.update(Message::GotoPage(1, true));
        assert_eq!(app.catalog.pagination().current_page, 2);

        let _ = app.update(Message::PerPageSelected(50));
        assert_eq!(app.settings.per_page, 50);
        assert_eq!(app.catalog.pagination().total_pages, 1);
        assert_eq!(app.catalog.pagination().current_page, 1);
    }

    #[test]
    fn test_clip_messages_without_preview_are_ignored() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let _ = app.update(Message::CoordChanged(Edge::Top, 0.5));
        let _ = app.update(Message::PixelInput(Edge::Top, "3".into()));
        assert!(app.preview.is_none());
    }

    #[test]
    fn test_download_result_updates_status() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let before = app.status.clone();

        let _ = app.update(Message::Downloaded(Ok(None)));
        assert_eq!(app.status, before);

        let _ = app.update(Message::Downloaded(Err("/ro/a.png: denied".into())));
        assert!(app.status.contains("denied"));
    }

    #[test]
    fn test_failed_preview_download_reports_status() {
        let mut app = viewer("https://github.com/Gethe/wow-ui-textures/");
        let entry = FileEntry::new("a.png");
        let _ = app.update(Message::PreviewLoaded(entry, Err(GithubError::Transport("offline".into()))));

        assert!(app.preview.is_none());
        assert!(app.status.contains("offline"));
    }
}
