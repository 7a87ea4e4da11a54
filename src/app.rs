// app.rs
pub mod gui;
pub mod image_processing;
pub mod file_dialogs;
pub mod file_browser;
pub mod notifications;
pub mod thumbnails;

use crate::conversion::ConversionResult;
use crate::platform::{self, HostPlatform};
use crate::utils::{timestamped, Logger};
use eframe::egui;
use eframe::App as EframeApp;
use file_browser::FileBrowser;
use notifications::{NotificationKind, Notifications};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use thumbnails::ThumbnailGrid;

pub struct App {
    pub platform: Box<dyn HostPlatform>,
    pub browser: FileBrowser,
    pub thumbnails: ThumbnailGrid,
    pub notifications: Notifications,
    pub conversion_progress: Arc<Mutex<ConversionProgress>>,
    pub log_messages: Arc<Mutex<Vec<String>>>,
    pub logger: Logger,
    pub conversion_receiver: Option<Receiver<ConversionUpdate>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionUpdate {
    Progress(usize, usize),  // (completed, total)
    Converted(ConversionResult),
    Failed(String),
    Completed,
}

#[derive(Default)]
pub struct ConversionProgress {
    pub total: usize,
    pub completed: usize,
    pub status: String,
}

impl App {
    /// Asks for storage access, then opens the browser at the storage root.
    pub fn new(host: Box<dyn HostPlatform>) -> Self {
        let log_messages = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new(log_messages.clone());

        let requested = platform::ensure_storage_permissions(host.as_ref());
        for permission in &requested {
            log_messages
                .lock()
                .push(timestamped(&format!("Requested {}", permission.identifier())));
        }

        let start_dir = match host.storage_root() {
            Ok(root) => root,
            Err(error) => {
                log_messages.lock().push(timestamped(&format!("Storage error: {}", error)));
                PathBuf::from(".")
            }
        };
        let mut browser = FileBrowser::new(start_dir.clone());
        if let Err(error) = browser.open(start_dir) {
            log_messages.lock().push(timestamped(&format!("Browser error: {}", error)));
        }

        Self {
            platform: host,
            browser,
            thumbnails: ThumbnailGrid::default(),
            notifications: Notifications::default(),
            conversion_progress: Arc::new(Mutex::new(ConversionProgress::default())),
            log_messages,
            logger,
            conversion_receiver: None,
        }
    }

    pub fn is_converting(&self) -> bool {
        self.conversion_receiver.is_some()
    }

    /// Rebuilds the thumbnail column from the full current selection.
    pub fn selection_changed(&mut self) {
        let selection = self.browser.selection().to_vec();
        self.logger.log(format!("Selection changed: {} file(s)", selection.len()));
        for path in self.thumbnails.rebuild(&selection) {
            self.logger.log(format!("Preview failed for {}", path.display()));
        }
    }

    pub fn start_conversion(&mut self) {
        if self.is_converting() {
            return;
        }

        let output_directory = match platform::output_directory(self.platform.as_ref()) {
            Ok(dir) => dir,
            Err(error) => {
                self.report_failure(error.to_string());
                return;
            }
        };

        let input_files = self.browser.selection().to_vec();
        let conversion_progress = self.conversion_progress.clone();
        let logger = self.logger.clone();

        let (sender, receiver) = channel();
        self.conversion_receiver = Some(receiver);

        std::thread::spawn(move || {
            image_processing::convert_images(
                input_files,
                output_directory,
                conversion_progress,
                logger,
                sender,
            );
        });
    }

    pub fn handle_update(&mut self, update: ConversionUpdate) {
        match update {
            ConversionUpdate::Progress(completed, total) => {
                let mut progress = self.conversion_progress.lock();
                progress.completed = completed;
                progress.total = total;
            }
            ConversionUpdate::Converted(result) => {
                self.notifications.notify_result(&result);
            }
            ConversionUpdate::Failed(message) => self.report_failure(message),
            ConversionUpdate::Completed => {
                self.conversion_receiver = None;
            }
        }
    }

    fn report_failure(&mut self, message: String) {
        self.notifications
            .push("Conversion Failed", message, NotificationKind::Error);
    }

    /// Applies every pending worker message. A worker that hangs up without
    /// `Completed` ends the batch with a failure popup.
    fn drain_updates(&mut self) -> bool {
        let mut received = false;
        while let Some(receiver) = &self.conversion_receiver {
            match receiver.try_recv() {
                Ok(update) => {
                    received = true;
                    self.handle_update(update);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    received = true;
                    self.conversion_receiver = None;
                    self.logger.log("Conversion worker stopped before finishing");
                    self.report_failure("The conversion stopped unexpectedly".to_string());
                }
            }
        }
        received
    }
}

impl EframeApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let needs_redraw = self.drain_updates();

        gui::render(self, ctx);

        // Keep polling while the worker is busy.
        if needs_redraw || self.is_converting() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Permission, PlatformError};
    use std::path::Path;

    struct RootedPlatform(PathBuf);

    impl HostPlatform for RootedPlatform {
        fn check_permission(&self, _permission: Permission) -> bool {
            true
        }

        fn request_permissions(&self, _permissions: &[Permission]) {}

        fn storage_root(&self) -> Result<PathBuf, PlatformError> {
            Ok(self.0.clone())
        }
    }

    fn app_in(dir: &Path) -> App {
        App::new(Box::new(RootedPlatform(dir.to_path_buf())))
    }

    #[test]
    fn browser_starts_at_storage_root() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path());
        assert_eq!(app.browser.current_dir(), dir.path());
        assert!(!app.is_converting());
    }

    #[test]
    fn selection_change_rebuilds_thumbnails() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.browser.toggle(Path::new("/sdcard/pics/a.webp"));
        app.browser.toggle(Path::new("/sdcard/pics/notes.txt"));
        app.selection_changed();
        let shown: Vec<_> = app.thumbnails.entries().iter().map(|e| e.path.clone()).collect();
        assert_eq!(shown, vec![PathBuf::from("/sdcard/pics/a.webp")]);

        app.browser.replace_selection(Vec::new());
        app.selection_changed();
        assert!(app.thumbnails.entries().is_empty());
    }

    #[test]
    fn updates_drive_progress_and_popups() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let (_sender, receiver) = channel();
        app.conversion_receiver = Some(receiver);

        app.handle_update(ConversionUpdate::Progress(1, 2));
        app.handle_update(ConversionUpdate::Converted(ConversionResult {
            source: PathBuf::from("a.webp"),
            output: Some(PathBuf::from("out/a.gif")),
        }));
        app.handle_update(ConversionUpdate::Converted(ConversionResult {
            source: PathBuf::from("empty.webp"),
            output: None,
        }));
        app.handle_update(ConversionUpdate::Failed("disk full".to_string()));

        {
            let progress = app.conversion_progress.lock();
            assert_eq!((progress.completed, progress.total), (1, 2));
        }
        let kinds: Vec<_> = app.notifications.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Info, NotificationKind::Error]);

        assert!(app.is_converting());
        app.handle_update(ConversionUpdate::Completed);
        assert!(!app.is_converting());
    }

    #[test]
    fn worker_hang_up_ends_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let (sender, receiver) = channel();
        app.conversion_receiver = Some(receiver);

        sender.send(ConversionUpdate::Progress(0, 3)).unwrap();
        drop(sender);

        assert!(app.drain_updates());
        assert!(!app.is_converting());
        let popups: Vec<_> = app.notifications.iter().map(|n| (n.title.clone(), n.kind)).collect();
        assert_eq!(popups, vec![("Conversion Failed".to_string(), NotificationKind::Error)]);
        assert!(!app.drain_updates());
    }

    #[test]
    fn completed_batch_is_not_reported_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let (sender, receiver) = channel();
        app.conversion_receiver = Some(receiver);

        sender.send(ConversionUpdate::Completed).unwrap();
        drop(sender);

        app.drain_updates();
        assert!(!app.is_converting());
        assert_eq!(app.notifications.iter().count(), 0);
    }

    #[test]
    fn end_to_end_conversion_from_selection() {
        let dir = tempfile::tempdir().unwrap();
        let pics = dir.path().join("pics");
        std::fs::create_dir_all(&pics).unwrap();
        let a = pics.join("a.webp");
        let b = pics.join("b.png");
        crate::conversion::frame_extractor::tests::write_webp(
            &a,
            &crate::conversion::frame_extractor::tests::two_tone(),
        );
        std::fs::write(&b, b"png").unwrap();

        let mut app = app_in(dir.path());
        app.browser.replace_selection(vec![a, b]);
        app.start_conversion();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(30);
        while app.is_converting() && std::time::Instant::now() < deadline {
            app.drain_updates();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let out = dir.path().join("ConvertedImages");
        assert!(out.join("a.gif").exists());
        assert!(!out.join("b.gif").exists());
        let messages: Vec<_> = app.notifications.iter().map(|n| n.message.clone()).collect();
        assert_eq!(messages, vec![format!("Saved to {}", out.join("a.gif").display())]);
    }
}
