//! Console dialogue: mode selection, source folder loop, and the removable drive offer.
//!
//! The session is generic over its input and output streams so it can be driven
//! by a terminal or by scripted input.

use crate::device::RemovableDriveLocator;
use crate::models::{RunMode, SourceFolder};
use crate::services::{
    export_to_drive, organize_files, ExportOutcome, OrganizerConfig, TransferReport,
};
use crate::utils::{comparable_path, normalize_folder_path};
use crate::AppConfig;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

const END_COMMAND: &str = "end";

/// What happened during one session
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub mode: Option<RunMode>,
    pub organize_reports: Vec<TransferReport>,
    pub exports: Vec<ExportOutcome>,
}

impl SessionSummary {
    pub fn files_copied(&self) -> usize {
        self.organize_reports
            .iter()
            .chain(self.exports.iter().map(|export| &export.report))
            .map(TransferReport::successful_copies)
            .sum()
    }

    pub fn files_planned(&self) -> usize {
        self.organize_reports
            .iter()
            .chain(self.exports.iter().map(|export| &export.report))
            .map(TransferReport::planned_copies)
            .sum()
    }
}

pub struct Session<'a, R, W> {
    input: R,
    output: W,
    config: &'a AppConfig,
    locator: &'a dyn RemovableDriveLocator,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        config: &'a AppConfig,
        locator: &'a dyn RemovableDriveLocator,
    ) -> Self {
        Self {
            input,
            output,
            config,
            locator,
        }
    }

    /// Run the whole dialogue until the user types `end` or input runs out
    pub fn run(&mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        let mode = match self.config.mode {
            Some(mode) => {
                writeln!(self.output, "{} selected on the command line.", mode_label(mode))?;
                Some(mode)
            }
            None => self.select_mode()?,
        };

        if let Some(mode) = mode {
            info!("Run mode: {}", mode);
            summary.mode = Some(mode);
            self.folder_loop(mode, &mut summary)?;
        }

        writeln!(self.output, "We are done.")?;
        self.output.flush()?;
        Ok(summary)
    }

    /// Prompt until the user picks 1 (active) or 2 (dry). `None` on end of input.
    pub fn select_mode(&mut self) -> Result<Option<RunMode>> {
        writeln!(self.output, "This tool can run in dry or active mode.")?;
        writeln!(self.output, "If you wish to run it in active mode enter 1.")?;
        writeln!(self.output, "If you wish to run it in dry mode enter 2.")?;

        loop {
            writeln!(self.output, "Enter number:")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };

            match line.trim().parse::<i64>() {
                Ok(choice) => match RunMode::from_choice(choice) {
                    Some(mode) => {
                        writeln!(self.output, "{} selected..", mode_label(mode))?;
                        return Ok(Some(mode));
                    }
                    None => writeln!(self.output, "Wrong numerical input, try again..")?,
                },
                Err(_) => writeln!(self.output, "You didn't even enter a number.. try again")?,
            }
        }
    }

    fn folder_loop(&mut self, mode: RunMode, summary: &mut SessionSummary) -> Result<()> {
        let mut folder = SourceFolder::new("");

        loop {
            writeln!(
                self.output,
                "Please enter the directory you wish to use. \
                 If you wish to close the software, type \"{}\".",
                END_COMMAND
            )?;
            let Some(line) = self.read_line()? else {
                break;
            };
            let input = line.trim();

            if input == END_COMMAND {
                break;
            }
            if input.is_empty() {
                writeln!(self.output, "You didn't write anything.")?;
                continue;
            }
            if self.is_reserved(input) {
                writeln!(self.output, "Folder reserved for organizing files, don't touch!")?;
                continue;
            }
            if !folder.revalidate(input) {
                let reason = folder
                    .rejection()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                warn!("Rejected source folder {:?}: {}", input, reason);
                writeln!(
                    self.output,
                    "The source directory you entered is invalid ({}), please try again...",
                    reason
                )?;
                continue;
            }

            writeln!(
                self.output,
                "The folder you entered is a valid folder. The folder you will be using is:"
            )?;
            writeln!(self.output, "{}", folder.path().display())?;
            writeln!(
                self.output,
                "Type \"yes\" if you wish to continue. \
                 Type \"no\" if you wish to enter a different source directory."
            )?;

            let Some(answer) = self.read_line()? else {
                break;
            };
            match answer.trim() {
                "yes" => self.organize(folder.path(), mode, summary)?,
                "no" => writeln!(self.output, "Process aborted.")?,
                _ => writeln!(self.output, "Invalid input, process aborted.")?,
            }
        }

        Ok(())
    }

    /// The destination root and anything inside it cannot be used as a source
    fn is_reserved(&self, input: &str) -> bool {
        let destination_root = comparable_path(&self.config.target_dir);
        comparable_path(&normalize_folder_path(input)).starts_with(destination_root)
    }

    fn organize(
        &mut self,
        source: &Path,
        mode: RunMode,
        summary: &mut SessionSummary,
    ) -> Result<()> {
        writeln!(self.output, "We can start the process in {} mode.", mode)?;

        let organizer = OrganizerConfig::new(self.config.target_dir.clone(), mode);
        let report = organize_files(source, &organizer);
        report.log_summary("ORGANIZE");
        writeln!(
            self.output,
            "Copied {} file(s), {} dry run, {} error(s).",
            report.successful_copies(),
            report.planned_copies(),
            report.errors.len()
        )?;
        summary.organize_reports.push(report);

        self.offer_export(mode, summary)
    }

    fn offer_export(&mut self, mode: RunMode, summary: &mut SessionSummary) -> Result<()> {
        let Some(drive) = self.locator.find_removable() else {
            debug!("No removable drive detected");
            return Ok(());
        };

        writeln!(self.output, "USB device detected: {}", drive.display())?;
        writeln!(
            self.output,
            "Do you wish to copy the generated folder to the USB too? [ \"yes\" / \"no\" ]"
        )?;

        let answer = self.read_line()?;
        if answer.as_deref().map(str::trim) != Some("yes") {
            writeln!(self.output, "Operation cancelled")?;
            return Ok(());
        }

        writeln!(self.output, "Beginning process...")?;
        let pending = summary
            .organize_reports
            .last()
            .map(|report| report.planned_files.as_slice())
            .unwrap_or_default();
        let exported = export_to_drive(
            &self.config.target_dir,
            &drive,
            &self.config.export,
            mode,
            pending,
        );
        match exported {
            Ok(outcome) => {
                outcome.report.log_summary("EXPORT");
                writeln!(self.output, "Exported to {}", outcome.destination.display())?;
                summary.exports.push(outcome);
            }
            Err(e) => {
                error!("Export failed: {:#}", e);
                writeln!(self.output, "Export failed: {}", e)?;
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from the console")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn mode_label(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Active => "Active mode",
        RunMode::Dry => "Dry mode",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::NoDriveLocator;
    use std::io::Cursor;

    fn run_select_mode(script: &str) -> (Option<RunMode>, String) {
        let config = AppConfig::default();
        let mut output = Vec::new();
        let mode = Session::new(Cursor::new(script), &mut output, &config, &NoDriveLocator)
            .select_mode()
            .unwrap();
        (mode, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_select_mode_reprompts_until_valid() {
        let (mode, output) = run_select_mode("abc\n7\n2\n");
        assert_eq!(mode, Some(RunMode::Dry));
        assert!(output.contains("You didn't even enter a number"));
        assert!(output.contains("Wrong numerical input"));
        assert_eq!(output.matches("Enter number:").count(), 3);
    }

    #[test]
    fn test_select_mode_active() {
        let (mode, _) = run_select_mode(" 1 \r\n");
        assert_eq!(mode, Some(RunMode::Active));
    }

    #[test]
    fn test_select_mode_end_of_input() {
        let (mode, _) = run_select_mode("x\n");
        assert_eq!(mode, None);
    }

    #[test]
    fn test_summary_totals() {
        let summary = SessionSummary::default();
        assert_eq!(summary.files_copied(), 0);
        assert_eq!(summary.files_planned(), 0);
    }
}
