use std::time::{Instant, Duration};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use parking_lot::Mutex;

pub type LogBuffer = Arc<Mutex<Vec<String>>>;

/// Appends timestamped lines to the shared log shown in the window.
#[derive(Clone)]
pub struct Logger {
    sender: mpsc::Sender<String>,
}

impl Logger {
    pub fn new(log_messages: LogBuffer) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            for message in receiver {
                log_messages.lock().push(message);
            }
        });

        Logger { sender }
    }

    pub fn log(&self, message: impl AsRef<str>) {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.sender.send(stamp(&timestamp.to_string(), message.as_ref())).unwrap_or_default();
    }
}

fn stamp(timestamp: &str, message: &str) -> String {
    format!("[{}] {}", timestamp, message)
}

pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();
    (result, duration)
}

/// System memory in use, in KB.
pub fn used_memory_kb() -> Option<u64> {
    sys_info::mem_info()
        .ok()
        .map(|mem_info| mem_info.total.saturating_sub(mem_info.free))
}

/// How much system memory moved across one conversion.
pub fn describe_memory_delta(before: Option<u64>, after: Option<u64>) -> String {
    match (before, after) {
        (Some(before), Some(after)) => format!(
            "Memory: Used: {} MB ({:+} KB during conversion)",
            after / 1024,
            after as i64 - before as i64
        ),
        _ => "Unable to get memory info".to_string(),
    }
}
