use crate::app::App;
use crate::app::file_dialogs;
use crate::app::notifications::{NotificationKind, POPUP_SIZE};
use crate::platform;
use egui::{Color32, Frame, ProgressBar, Rounding, Stroke, RichText};
use std::path::PathBuf;

const ACCENT: Color32 = Color32::from_rgb(100, 200, 250);

enum BrowserAction {
    Open(PathBuf),
    Up,
    Toggle(PathBuf),
    Replace(Vec<PathBuf>),
}

pub fn render(app: &mut App, ctx: &egui::Context) {
    let frame = Frame {
        fill: Color32::from_rgb(30, 30, 40),
        rounding: Rounding::same(10.0),
        stroke: Stroke::new(1.0, ACCENT),
        inner_margin: egui::style::Margin::same(20.0),
        ..Default::default()
    };

    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        ui.heading(RichText::new("Image Converter").size(28.0).color(ACCENT));
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            let action = ui.vertical(|ui| render_browser(app, ui)).inner;
            if let Some(action) = action {
                apply_browser_action(app, action);
            }

            ui.add_space(10.0);

            ui.vertical(|ui| render_thumbnails(app, ui));
        });

        ui.add_space(20.0);

        // Activity log with progress bar
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Activity Log").size(16.0).color(ACCENT));

            let progress = app.conversion_progress.lock();
            if progress.total > 0 {
                let progress_ratio = progress.completed as f32 / progress.total as f32;
                ui.add(ProgressBar::new(progress_ratio).text(format!("{:.0}%", progress_ratio * 100.0)));
            }
            if !progress.status.is_empty() {
                ui.label(&progress.status);
            }
            drop(progress);

            egui::ScrollArea::vertical()
                .id_source("activity_log")
                .max_height(150.0)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let logs = app.log_messages.lock();
                    for log in logs.iter() {
                        let lower = log.to_lowercase();
                        if lower.contains("error") || lower.contains("failed") {
                            ui.label(RichText::new(log).color(Color32::RED));
                        } else {
                            ui.label(log);
                        }
                    }
                });
        });
    });

    render_notifications(app, ctx);
}

fn render_browser(app: &mut App, ui: &mut egui::Ui) -> Option<BrowserAction> {
    let panel_width = 420.0;
    let mut action = None;

    ui.group(|ui| {
        ui.set_width(panel_width);
        ui.label(RichText::new("Files").size(16.0).color(ACCENT));
        ui.label(app.browser.current_dir().to_string_lossy());

        ui.horizontal(|ui| {
            if ui.button("Up").clicked() {
                action = Some(BrowserAction::Up);
            }
            if ui.button("Open Folder...").clicked() {
                if let Some(dir) = file_dialogs::select_directory(app.browser.current_dir()) {
                    action = Some(BrowserAction::Open(dir));
                }
            }
            if ui.button("Pick Images...").clicked() {
                if let Some(files) = file_dialogs::select_images(app.browser.current_dir()) {
                    action = Some(BrowserAction::Replace(files));
                }
            }
            if ui.button("Clear").clicked() {
                action = Some(BrowserAction::Replace(Vec::new()));
            }
        });

        egui::ScrollArea::vertical()
            .id_source("browser_entries")
            .max_height(300.0)
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for entry in app.browser.entries() {
                    if entry.is_dir {
                        if ui.selectable_label(false, format!("{}/", entry.name)).clicked() {
                            action = Some(BrowserAction::Open(entry.path.clone()));
                        }
                    } else {
                        let mut selected = app.browser.is_selected(&entry.path);
                        if ui.checkbox(&mut selected, &entry.name).changed() {
                            action = Some(BrowserAction::Toggle(entry.path.clone()));
                        }
                    }
                }
            });

        ui.label(format!("{} selected", app.browser.selection().len()));
    });

    ui.add_space(10.0);

    let output = platform::output_directory(app.platform.as_ref())
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|error| error.to_string());
    ui.label(RichText::new(format!("Output: {}", output)).color(Color32::from_rgb(200, 200, 200)));

    let button = egui::Button::new("Convert Images");
    if ui.add_enabled(!app.is_converting(), button).clicked() {
        app.logger.log("Convert requested");
        app.start_conversion();
    }

    action
}

fn apply_browser_action(app: &mut App, action: BrowserAction) {
    let selection_changed = match action {
        BrowserAction::Open(dir) => {
            if let Err(error) = app.browser.open(dir) {
                app.logger.log(format!("Browser error: {}", error));
            }
            false
        }
        BrowserAction::Up => {
            if let Err(error) = app.browser.go_up() {
                app.logger.log(format!("Browser error: {}", error));
            }
            false
        }
        BrowserAction::Toggle(path) => {
            app.browser.toggle(&path);
            true
        }
        BrowserAction::Replace(paths) => {
            app.browser.replace_selection(paths);
            true
        }
    };

    if selection_changed {
        app.selection_changed();
    }
}

fn render_thumbnails(app: &App, ui: &mut egui::Ui) {
    ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new("Thumbnails").size(16.0).color(ACCENT));

        egui::ScrollArea::vertical()
            .id_source("thumbnails")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for entry in app.thumbnails.entries() {
                    let name = entry
                        .path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| entry.path.to_string_lossy().into_owned());

                    match &entry.preview {
                        Some(image) => {
                            image.show_size(ui, entry.size);
                        }
                        None => {
                            ui.add_sized(entry.size, egui::Label::new(RichText::new("preview unavailable").color(Color32::GRAY)));
                        }
                    }
                    ui.label(RichText::new(name).color(Color32::from_rgb(200, 200, 200)));
                    ui.add_space(5.0);
                }
            });
    });
}

fn render_notifications(app: &mut App, ctx: &egui::Context) {
    let mut dismissed = Vec::new();

    for notification in app.notifications.iter() {
        let color = match notification.kind {
            NotificationKind::Info => Color32::WHITE,
            NotificationKind::Error => Color32::RED,
        };

        egui::Window::new(notification.title.as_str())
            .id(egui::Id::new(("notification", notification.id)))
            .collapsible(false)
            .resizable(false)
            .fixed_size(POPUP_SIZE)
            .show(ctx, |ui| {
                ui.label(RichText::new(&notification.message).color(color));
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    dismissed.push(notification.id);
                }
            });
    }

    for id in dismissed {
        app.notifications.dismiss(id);
    }
}
