use std::path::Path;
use std::sync::Mutex;

/// 运行进度输出
pub trait ProgressReporter: Send + Sync {
    fn section_started(&self, section_id: &str);

    fn report_written(&self, path: &Path);
}

pub fn section_line(section_id: &str) -> String {
    format!("Generating section: {} ...", section_id)
}

pub fn completion_line(path: &Path) -> String {
    format!("AoA report generated at {}", path.display())
}

/// 打印到标准输出
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrinter;

impl ProgressReporter for ConsolePrinter {
    fn section_started(&self, section_id: &str) {
        println!("{}", section_line(section_id));
    }

    fn report_written(&self, path: &Path) {
        println!("{}", completion_line(path));
    }
}

/// 记录进度行，供测试或嵌入方检查
#[derive(Debug, Default)]
pub struct RecordingProgress {
    lines: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
    }
}

impl ProgressReporter for RecordingProgress {
    fn section_started(&self, section_id: &str) {
        self.push(section_line(section_id));
    }

    fn report_written(&self, path: &Path) {
        self.push(completion_line(path));
    }
}
