use std::cell::RefCell;
use std::sync::Once;

use fbgpu::core::{Font, MemoryDevice};
use fbgpu::FbGpu;
use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static WARNINGS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Collects warnings per thread so parallel tests do not see each other
struct WarningCollector;

impl Log for WarningCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static COLLECTOR: WarningCollector = WarningCollector;
static INIT: Once = Once::new();

fn take_warnings() -> Vec<String> {
    INIT.call_once(|| {
        log::set_logger(&COLLECTOR).expect("no other logger installed");
        log::set_max_level(LevelFilter::Warn);
    });
    WARNINGS.with(|w| w.borrow_mut().drain(..).collect())
}

#[cfg(test)]
mod line_length_tests {
    use super::*;

    #[test]
    fn test_healthy_32bpp_start_logs_no_warning() {
        take_warnings();
        let mut device = MemoryDevice::new(64, 32);
        FbGpu::start(&mut device, Font::empty()).unwrap();

        assert_eq!(take_warnings(), Vec::<String>::new());
    }

    #[test]
    fn test_healthy_16bpp_fallback_logs_only_rejection() {
        take_warnings();
        let mut device = MemoryDevice::new(64, 32).accepting(&[16]);
        FbGpu::start(&mut device, Font::empty()).unwrap();

        let warnings = take_warnings();
        assert_eq!(warnings.len(), 1, "{:?}", warnings);
        assert!(warnings[0].contains("32 bpp mode rejected"));
    }
}
