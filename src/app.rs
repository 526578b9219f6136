// app.rs
pub mod gui;
pub mod image_processing;
pub mod file_dialogs;

use eframe::egui;
use eframe::App as EframeApp;
use std::sync::Arc;
use parking_lot::Mutex;
use std::sync::mpsc::Receiver;

use crate::utils::{LogBuffer, Logger};
use image_processing::{ConversionError, ConversionOutcome, ConversionRequest, DEFAULT_QUALITY};

pub const MISSING_PATHS_MESSAGE: &str = "Please specify both input and output paths.";
pub const WORKER_LOST_MESSAGE: &str = "Conversion worker exited without reporting a result.";

pub struct App {
    pub input_path: String,
    pub output_path: String,
    pub quality: f32,
    pub log_messages: LogBuffer,
    pub logger: Logger,
    pub conversion_receiver: Option<Receiver<ConversionUpdate>>,
}

pub enum ConversionUpdate {
    Finished(Result<ConversionOutcome, ConversionError>),
}

impl Default for App {
    fn default() -> Self {
        let log_messages: LogBuffer = Arc::new(Mutex::new(Vec::new()));
        Self {
            input_path: String::new(),
            output_path: String::new(),
            quality: DEFAULT_QUALITY,
            logger: Logger::new(log_messages.clone()),
            log_messages,
            conversion_receiver: None,
        }
    }
}

impl App {
    pub fn is_converting(&self) -> bool {
        self.conversion_receiver.is_some()
    }

    /// Builds a request from the text fields, or `None` if either is blank.
    pub fn build_request(&self) -> Option<ConversionRequest> {
        let input = self.input_path.trim();
        let output = self.output_path.trim();
        if input.is_empty() || output.is_empty() {
            return None;
        }
        Some(ConversionRequest::new(input, output).with_quality(self.quality))
    }

    /// Drains worker messages. Returns the finished result, if any arrived.
    /// A worker that vanished without a result counts as a failure.
    pub fn poll_conversion(&mut self) -> Option<Result<ConversionOutcome, String>> {
        let receiver = self.conversion_receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(ConversionUpdate::Finished(result)) => {
                self.conversion_receiver = None;
                Some(result.map_err(|e: ConversionError| e.to_string()))
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => None,
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.logger.log(WORKER_LOST_MESSAGE);
                self.conversion_receiver = None;
                Some(Err(WORKER_LOST_MESSAGE.to_string()))
            }
        }
    }
}

impl EframeApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(result) = self.poll_conversion() {
            match result {
                Ok(_) => file_dialogs::show_info("Success", "Conversion successful!"),
                Err(e) => file_dialogs::show_error(&format!("Conversion failed!\n{}", e)),
            }
        }

        gui::render(self, ctx);

        // Keep polling while the worker runs
        if self.is_converting() {
            ctx.request_repaint();
        }
    }
}
