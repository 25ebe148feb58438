use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eventhub_core::config::{parse_duration, parse_timezone};
use eventhub_core::{
    DateRange, EventHubConfig, EventHubResult, ExportFormat, ExportOptions, export,
    filter_events,
};
use owo_colors::OwoColorize;
use tokio::io::AsyncWriteExt;

use crate::source::Source;

pub struct ExportArgs {
    pub format: String,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub duration: Option<String>,
    pub timezone: Option<String>,
}

/// Where the exported document goes.
#[derive(Debug, PartialEq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

pub async fn run(args: ExportArgs) -> Result<()> {
    let format: ExportFormat = args.format.parse()?;
    let config = EventHubConfig::load()?;
    let options = resolve_options(&config, args.duration.as_deref(), args.timezone.as_deref())?;
    let range = DateRange::from_args(args.from.as_deref(), args.to.as_deref())?;

    let source = Source::from_arg(args.input.as_deref());
    let mut events = source.read_events(&options).await?;
    if !range.is_unbounded() {
        events = filter_events(&events, &range, &options)?;
    }

    let document = export(&events, format, &options)?;

    match resolve_destination(args.output, &config.output_path(), format) {
        Destination::Stdout => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(document.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Could not create {}", parent.display()))?;
            }
            tokio::fs::write(&path, &document)
                .await
                .with_context(|| format!("Could not write {}", path.display()))?;

            eprintln!(
                "{} Exported {} {} to {} {}",
                "✓".green(),
                events.len(),
                if events.len() == 1 { "event" } else { "events" },
                path.display(),
                format!("({})", format.mime_type()).dimmed()
            );
        }
    }

    Ok(())
}

/// Config-file options with CLI overrides applied.
fn resolve_options(
    config: &EventHubConfig,
    duration: Option<&str>,
    timezone: Option<&str>,
) -> EventHubResult<ExportOptions> {
    let mut options = config.export_options()?;

    if let Some(duration) = duration {
        options.default_duration = parse_duration(duration)?;
    }
    if let Some(timezone) = timezone {
        options.timezone = parse_timezone(timezone)?;
    }

    Ok(options)
}

/// `-` means stdout; no output means `<output_dir>/events.<ext>`.
fn resolve_destination(output: Option<PathBuf>, output_dir: &Path, format: ExportFormat) -> Destination {
    match output {
        Some(path) if path == Path::new("-") => Destination::Stdout,
        Some(path) => Destination::File(path),
        None => Destination::File(output_dir.join(format.default_file_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_resolve_destination() {
        let dir = Path::new("/tmp/exports");

        assert_eq!(
            resolve_destination(None, dir, ExportFormat::Ics),
            Destination::File(PathBuf::from("/tmp/exports/events.ics"))
        );
        assert_eq!(
            resolve_destination(Some(PathBuf::from("-")), dir, ExportFormat::Csv),
            Destination::Stdout
        );
        assert_eq!(
            resolve_destination(Some(PathBuf::from("out/my.csv")), dir, ExportFormat::Csv),
            Destination::File(PathBuf::from("out/my.csv"))
        );
    }

    #[test]
    fn test_resolve_options_applies_overrides() {
        let config = EventHubConfig::default();

        let options = resolve_options(&config, None, None).unwrap();
        assert_eq!(options.default_duration, Duration::hours(2));

        let options = resolve_options(&config, Some("45m"), Some("Asia/Tokyo")).unwrap();
        assert_eq!(options.default_duration, Duration::minutes(45));
        assert_eq!(options.timezone.name(), "Asia/Tokyo");

        assert!(resolve_options(&config, Some("forever"), None).is_err());
        assert!(resolve_options(&config, None, Some("Nowhere/Special")).is_err());
    }
}
