//! Terminal presentation of the file panel

use anyhow::Result;
use app_core::{
    ActionSet, AppConfig, AppError, BrowserLauncher, Description, Dialogs, Effect, FileVariant,
    MetadataReport, Outcome,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Reads answers from `input` and writes the panel to `output`
pub struct Terminal<R, W> {
    input: R,
    output: W,
    destination_title: String,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W, destination_title: impl Into<String>) -> Self {
        Self {
            input,
            output,
            destination_title: destination_title.into(),
        }
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt where an empty answer or a read failure counts as cancel
    fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.prompt(prompt) {
            Ok(Some(answer)) if !answer.is_empty() => Some(answer),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }

    fn render(&mut self, description: &Description, actions: &ActionSet) -> std::io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Name: {}", description.basename)?;
        writeln!(self.output, "Path: {}", description.path)?;
        if let Some(size) = &description.size {
            writeln!(self.output, "Size: {}", size)?;
        }
        writeln!(self.output)?;
        for (i, action) in actions.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, action.label)?;
        }
        Ok(())
    }

    fn show_outcome(&mut self, outcome: &Outcome) -> std::io::Result<()> {
        match outcome {
            Outcome::Opened => writeln!(self.output, "Opened with the default application"),
            Outcome::Renamed(path) => writeln!(self.output, "Renamed to {}", path.display()),
            Outcome::Moved(path) => writeln!(self.output, "Moved to {}", path.display()),
            Outcome::Copied(path) => writeln!(self.output, "Copied to {}", path.display()),
            Outcome::Unpacked { destination, format } => writeln!(
                self.output,
                "Done: unpacked {:?} archive into {}",
                format,
                destination.display()
            ),
            Outcome::Cancelled => writeln!(self.output, "Cancelled"),
            Outcome::Metadata(_) | Outcome::Quit => Ok(()),
        }
    }

    fn show_metadata(
        &mut self,
        file: &FileVariant,
        report: &MetadataReport,
        browser: &dyn BrowserLauncher,
    ) -> std::io::Result<()> {
        writeln!(self.output, "Metadata")?;
        for entry in &report.entries {
            match &entry.value {
                Ok(value) => writeln!(self.output, "  {}: {}", entry.key, value)?,
                Err(e) => writeln!(
                    self.output,
                    "  {}: <{}>",
                    entry.key,
                    AppError::from(e.clone()).user_message()
                )?,
            }
        }

        if let Some(link) = &report.location {
            let question = format!("{}? [y/N] ", link.label);
            if let Some(answer) = self.prompt(&question)? {
                if answer.eq_ignore_ascii_case("y") {
                    file.open_location(browser);
                }
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Dialogs for Terminal<R, W> {
    fn pick_directory(&mut self, effect: Effect) -> Option<PathBuf> {
        let prompt = format!(
            "{} for \"{}\" (empty to cancel): ",
            self.destination_title,
            effect.label()
        );
        self.ask(&prompt).map(PathBuf::from)
    }

    fn ask_new_name(&mut self, current: &str) -> Option<String> {
        let prompt = format!("New name for {} (empty to cancel): ", current);
        self.ask(&prompt)
    }
}

/// Opens links with the system's default browser
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open_url(&self, url: &str) {
        if let Err(e) = open::that_detached(url) {
            tracing::error!("Failed to open browser for {}: {}", url, e);
        }
    }
}

/// Drive the panel until the user quits or input ends
pub fn run_panel<R: BufRead, W: Write>(
    file: &mut FileVariant,
    terminal: &mut Terminal<R, W>,
    browser: &dyn BrowserLauncher,
) -> Result<()> {
    loop {
        // Rebuilt every round; the path may have changed
        let actions = file.list_actions();
        terminal.render(&file.describe(), &actions)?;

        let Some(choice) = terminal.prompt("> ")? else {
            tracing::info!("Input closed, quitting");
            return Ok(());
        };

        let Some(action) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| actions.get(i))
            .copied()
        else {
            writeln!(terminal.output, "Unknown choice: {}", choice)?;
            continue;
        };

        match file.perform(action.effect, terminal) {
            Ok(Outcome::Quit) => return Ok(()),
            Ok(Outcome::Metadata(report)) => terminal.show_metadata(file, &report, browser)?,
            Ok(outcome) => terminal.show_outcome(&outcome)?,
            Err(e) => {
                tracing::error!("{} failed: {}", action.effect, e);
                writeln!(terminal.output, "Error: {}", e.user_message())?;
                if e.is_fatal() {
                    return Err(e.into());
                }
            }
        }
    }
}

/// Run the panel on stdin/stdout
pub fn run(path: &Path, config: &AppConfig) -> Result<()> {
    let mut file = FileVariant::open(path, config);
    let stdin = std::io::stdin();
    let mut terminal = Terminal::new(
        stdin.lock(),
        std::io::stdout(),
        config.dialogs.destination_title.clone(),
    );
    run_panel(&mut file, &mut terminal, &SystemBrowser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{FileInspector, ImageFile, ImageMetadata, TagValue};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingBrowser {
        opened: RefCell<Vec<String>>,
    }

    impl BrowserLauncher for RecordingBrowser {
        fn open_url(&self, url: &str) {
            self.opened.borrow_mut().push(url.to_string());
        }
    }

    fn drive(file: &mut FileVariant, script: &str) -> String {
        let mut terminal = Terminal::new(Cursor::new(script.to_string()), Vec::new(), "Destination");
        run_panel(file, &mut terminal, &RecordingBrowser::default()).unwrap();
        String::from_utf8(terminal.output).unwrap()
    }

    #[test]
    fn test_rename_then_quit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"a").unwrap();
        let mut file = FileVariant::open(&path, &AppConfig::default());

        let output = drive(&mut file, "2\nb.txt\n5\n");

        assert!(output.contains("Name: a.txt"));
        assert!(output.contains("Renamed to"));
        assert!(output.contains("Name: b.txt"));
        assert!(dir.path().join("b.txt").exists());
    }

    #[test]
    fn test_errors_are_shown_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"a").unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        let mut file = FileVariant::open(&path, &AppConfig::default());

        let output = drive(&mut file, "2\nb.txt\n9\n5\n");

        assert!(output.contains("Error: A file named"));
        assert!(output.contains("Unknown choice: 9"));
        assert!(path.exists());
    }

    #[test]
    fn test_cancelled_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"a").unwrap();
        let mut file = FileVariant::open(&path, &AppConfig::default());

        let output = drive(&mut file, "3\n\n");

        assert!(output.contains("Cancelled"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_metadata_view_and_location() {
        let mut record = app_core::metadata::GpsRecord::default();
        record.insert(2, app_core::metadata::GpsField::Numbers(vec![40.0, 26.0, 46.0]));
        record.insert(4, app_core::metadata::GpsField::Numbers(vec![-79.0, 58.0, 56.0]));
        let mut tags = BTreeMap::new();
        tags.insert("GPSInfo".to_string(), TagValue::Gps(record));
        tags.insert("ExifImageWidth".to_string(), TagValue::Integer(1920));
        tags.insert("ExifImageHeight".to_string(), TagValue::Integer(1080));
        tags.insert("MakerNote".to_string(), TagValue::Bytes(vec![0xFF, 0xFE]));

        let mut file = FileVariant::Image(ImageFile::with_metadata(
            FileInspector::new("/tmp/x/trip.jpg"),
            ImageMetadata::from_tags(tags),
            "https://maps.example/place/",
        ));

        let browser = RecordingBrowser::default();
        let mut terminal =
            Terminal::new(Cursor::new("5\ny\n6\n".to_string()), Vec::new(), "Destination");
        run_panel(&mut file, &mut terminal, &browser).unwrap();
        let output = String::from_utf8(terminal.output).unwrap();

        assert!(output.contains("Size: 1920x1080"));
        assert!(output.contains("5) Show metadata"));
        assert!(output.contains("ExifImageWidth: 1920"));
        assert!(output.contains("MakerNote: <Cannot display MakerNote: not valid text>"));
        assert!(!output.contains("GPSInfo"));
        assert_eq!(browser.opened.borrow().len(), 1);
        assert!(browser.opened.borrow()[0].starts_with("https://maps.example/place/40.44"));
    }
}
