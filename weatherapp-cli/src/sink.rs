use weatherapp_core::{FetchError, PresentationSink, WeatherObservation, WeatherView};

/// Prints the weather panel and messages to the terminal.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    fn print_view(view: &WeatherView) {
        for line in view.lines() {
            println!("  {line}");
        }
    }
}

impl PresentationSink for TerminalSink {
    fn loading_started(&self) {
        Self::print_view(&WeatherView::loading());
    }

    fn show_observation(&self, observation: &WeatherObservation) {
        println!();
        Self::print_view(&WeatherView::from(observation));
        println!("Weather updated for {}", observation.name);
    }

    fn show_failure(&self, _error: &FetchError, message: &str) {
        eprintln!("Error: {message}");
    }

    fn show_notice(&self, message: &str) {
        eprintln!("{message}");
    }
}
