use std::sync::mpsc::channel;
use crate::app::App;
use crate::app::ConversionUpdate;
use crate::app::MISSING_PATHS_MESSAGE;
use crate::app::file_dialogs;
use crate::app::image_processing::{self, ConversionRequest};
use crate::utils::{measure_time, used_memory_kb, describe_memory_delta, Logger};
use std::error::Error;
use egui::{Color32, RichText};

const FIELD_WIDTH: f32 = 350.0;
const BROWSE_WIDTH: f32 = 80.0;
const ROW_HEIGHT: f32 = 25.0;

pub fn render(app: &mut App, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.label("Input Image (JPG/PNG):");
        ui.horizontal(|ui| {
            ui.add_sized([FIELD_WIDTH, ROW_HEIGHT], egui::TextEdit::singleline(&mut app.input_path));
            if ui.add_sized([BROWSE_WIDTH, ROW_HEIGHT], egui::Button::new("Browse...")).clicked() {
                on_browse_input(app);
            }
        });

        ui.add_space(8.0);

        ui.label("Output WebP Path:");
        ui.horizontal(|ui| {
            ui.add_sized([FIELD_WIDTH, ROW_HEIGHT], egui::TextEdit::singleline(&mut app.output_path));
            if ui.add_sized([BROWSE_WIDTH, ROW_HEIGHT], egui::Button::new("Browse...")).clicked() {
                on_browse_output(app);
            }
        });

        ui.add_space(10.0);

        let label = if app.is_converting() { "Converting..." } else { "Convert to WebP" };
        let button = ui.add_enabled_ui(!app.is_converting(), |ui| {
            ui.add_sized([FIELD_WIDTH + BROWSE_WIDTH + 10.0, 35.0], egui::Button::new(label))
        });
        if button.inner.clicked() {
            on_export(app);
        }

        ui.add_space(10.0);

        egui::CollapsingHeader::new("Log").show(ui, |ui| {
            egui::ScrollArea::vertical()
                .max_height(80.0)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let logs = app.log_messages.lock();
                    for log in logs.iter() {
                        if log.contains("failed") || log.contains("Failed") {
                            ui.label(RichText::new(log).color(Color32::RED));
                        } else {
                            ui.label(log);
                        }
                    }
                });
        });

        ui.add_space(10.0);
        ui.label(RichText::new(format!("WebP Box {}", env!("CARGO_PKG_VERSION"))).weak());
    });
}

fn on_browse_input(app: &mut App) {
    if let Some(path) = file_dialogs::select_input_image() {
        app.output_path = file_dialogs::suggest_output_path(&path).display().to_string();
        app.input_path = path.display().to_string();
        app.logger.log(format!("Input selected: {}", app.input_path));
    }
}

fn on_browse_output(app: &mut App) {
    if let Some(path) = file_dialogs::select_output_path(&app.output_path) {
        app.output_path = path.display().to_string();
        app.logger.log(format!("Output selected: {}", app.output_path));
    }
}

fn on_export(app: &mut App) {
    match app.build_request() {
        Some(request) => start_conversion(app, request),
        None => {
            app.logger.log(MISSING_PATHS_MESSAGE);
            file_dialogs::show_error(MISSING_PATHS_MESSAGE);
        }
    }
}

fn start_conversion(app: &mut App, request: ConversionRequest) {
    let (sender, receiver) = channel();
    app.conversion_receiver = Some(receiver);
    let logger = app.logger.clone();

    std::thread::spawn(move || {
        let result = run_conversion(&logger, &request);
        sender.send(ConversionUpdate::Finished(result)).unwrap_or_default();
    });
}

fn run_conversion(
    logger: &Logger,
    request: &ConversionRequest,
) -> Result<image_processing::ConversionOutcome, image_processing::ConversionError> {
    logger.log(format!(
        "Converting {} -> {} (quality {})",
        request.input.display(),
        request.output.display(),
        request.quality
    ));
    let memory_before = used_memory_kb();

    let (result, duration) = measure_time(|| image_processing::convert(request));
    match &result {
        Ok(outcome) => logger.log(format!(
            "Wrote {} bytes ({}x{}) in {:?}",
            outcome.bytes_written, outcome.width, outcome.height, duration
        )),
        Err(e) => logger.log(format!("Conversion failed after {:?}: {}", duration, describe_error(e))),
    }
    logger.log(describe_memory_delta(memory_before, used_memory_kb()));
    result
}

// Top-level message followed by its underlying cause, if any.
fn describe_error(e: &image_processing::ConversionError) -> String {
    match e.source() {
        Some(cause) => format!("{} ({})", e, cause),
        None => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::LogBuffer;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn failed_run_is_logged_and_returned() {
        let buffer: LogBuffer = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new(buffer.clone());
        let dir = std::env::temp_dir().join(format!("webp_box_gui_{}", std::process::id()));
        let request = ConversionRequest::new(dir.join("absent.png"), dir.join("absent.webp"));

        let result = run_conversion(&logger, &request);
        assert!(matches!(result, Err(image_processing::ConversionError::Decode(_))));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !buffer.lock().iter().any(|l| l.contains("Conversion failed")) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(buffer.lock().iter().any(|l| l.contains("Conversion failed")));
    }

    #[test]
    fn error_description_includes_cause() {
        let e = image_processing::ConversionError::Encode(image_processing::EncoderFailure(
            "VP8_ENC_ERROR_BAD_DIMENSION".into(),
        ));
        assert_eq!(
            describe_error(&e),
            "Failed to encode WebP image. (VP8_ENC_ERROR_BAD_DIMENSION)"
        );
    }
}
