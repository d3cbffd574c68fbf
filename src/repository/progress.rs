//! Progress reporting
//!
//! Engines only see the two traits below; drawing on the terminal is left
//! to indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// One running progress display
pub trait ProgressHandle {
    fn inc(&self, n: u64);
    fn finish(&self);
}

/// Starts progress displays. `total` is `None` when the amount of work is
/// not known up front.
pub trait ProgressReporter {
    fn start(&self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle>;
}

pub fn reporter(enabled: bool) -> Box<dyn ProgressReporter> {
    if enabled {
        Box::new(IndicatifProgress)
    } else {
        Box::new(NoopProgress)
    }
}

/// Bars and spinners on stderr
pub struct IndicatifProgress;

fn style_for(label: &str, bounded: bool) -> ProgressStyle {
    let (base, template) = if bounded {
        (
            ProgressStyle::default_bar(),
            format!("{{spinner:.green}} {label}: [{{bar:40.cyan/blue}}] {{pos}}/{{len}}"),
        )
    } else {
        (
            ProgressStyle::default_spinner(),
            format!("{{spinner:.green}} {label}: {{human_pos}} ({{per_sec}})"),
        )
    };
    base.clone()
        .template(&template)
        .unwrap_or(base)
        .progress_chars("=>-")
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle> {
        let bar = match total {
            Some(len) => ProgressBar::new(len),
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.enable_steady_tick(Duration::from_millis(120));
                spinner
            }
        };
        bar.set_style(style_for(label, total.is_some()));
        Box::new(bar)
    }
}

impl ProgressHandle for ProgressBar {
    fn inc(&self, n: u64) {
        ProgressBar::inc(self, n);
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}

/// Reports nothing
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _label: &str, _total: Option<u64>) -> Box<dyn ProgressHandle> {
        Box::new(())
    }
}

impl ProgressHandle for () {
    fn inc(&self, _n: u64) {}
    fn finish(&self) {}
}
