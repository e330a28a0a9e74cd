//! indicatif progress styles for stream downloads and the merge step

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

use super::Palette;

/// Add a transient download bar for one stream to `multi`
///
/// A known `total` gives a bar with percentage and ETA, otherwise a spinner
/// with the byte count is shown.
pub fn download_bar(multi: &MultiProgress, palette: &Palette, name: &str, total: Option<u64>) -> ProgressBar {
    let accent = palette.accent.as_str();
    let bar = match total {
        Some(len) => {
            let template = format!(
                "{{msg:.{accent}}} {{spinner}} [{{bar:20}}] {{percent:>3}}% • {{bytes}}/{{total_bytes}} • {{eta}}"
            );
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::with_template(&template)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("━╸ "),
            );
            bar
        }
        None => {
            let template = format!("{{msg:.{accent}}} {{spinner}} {{bytes}} • {{elapsed}}");
            let bar = ProgressBar::no_length();
            bar.set_style(
                ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };

    let bar = multi.add(bar);
    bar.set_message(name.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Spinner with elapsed time shown while the encoder runs
pub fn merge_spinner(palette: &Palette, message: &str) -> ProgressBar {
    let accent = palette.accent.as_str();
    let template = format!("{{msg:.{accent}}} • {{spinner}} • {{elapsed_precise}}");
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
