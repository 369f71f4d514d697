//! Terminal app shell: owns the session, turns user commands and backend
//! events into session transitions, and prints the result.

use std::{
    io::{self, BufRead, Write},
    mem,
    path::PathBuf,
    thread,
};

use chrono::Local;
use client_core::{
    candidate_from_path, transform_text_to_html, transform_text_to_plain, ClientSettings,
    RequestKind, Session, SessionEvent,
};
use crossbeam_channel::{bounded, never, select, Receiver, Sender};
use shared::{
    error::ErrorCode,
    protocol::{BackendResponse, FailureReply},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::{command_for_effect, dispatch_backend_command},
};
use crate::ui::{
    command::{parse_command, UserCommand, HELP_TEXT},
    output, view,
};

const NO_DRAFT_MESSAGE: &str = "No draft yet; add files and 'submit' first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct TerminalApp<W: Write> {
    session: Session,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    out: W,
    shown_notices: String,
    clipboard: output::DraftClipboard,
}

impl<W: Write> TerminalApp<W> {
    pub fn new(
        settings: &ClientSettings,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        out: W,
    ) -> Self {
        Self {
            session: Session::new(settings.adjustment_failure_policy),
            cmd_tx,
            ui_rx,
            out,
            shown_notices: String::new(),
            clipboard: output::DraftClipboard::default(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Prints the banner, then offers any files named on the command line.
    pub fn start(&mut self, settings: &ClientSettings, files: &[PathBuf]) -> io::Result<()> {
        writeln!(
            self.out,
            "Draft generation client (backend: {}, on failed adjustment: {}). Type 'help' for commands.",
            settings.api_base_url,
            self.session.policy()
        )?;
        if files.is_empty() {
            self.print_screen()
        } else {
            self.add_paths(files)
        }
    }

    /// Runs until `quit`, end of input, or the backend worker going away.
    /// At end of input a request still in flight is waited for.
    pub fn run(&mut self, lines: Receiver<String>) -> io::Result<()> {
        let ui_rx = self.ui_rx.clone();
        let closed = never::<String>();
        let mut input_closed = false;
        self.prompt()?;
        loop {
            let input = if input_closed { &closed } else { &lines };
            select! {
                recv(input) -> line => match line {
                    Ok(line) => {
                        if self.handle_line(&line)? == Flow::Quit {
                            return Ok(());
                        }
                        self.prompt()?;
                    }
                    Err(_) => {
                        if !self.session.is_busy() {
                            return Ok(());
                        }
                        tracing::debug!("input closed; waiting for the request in flight");
                        input_closed = true;
                    }
                },
                recv(ui_rx) -> event => match event {
                    Ok(event) => {
                        self.handle_ui_event(event)?;
                        if input_closed && !self.session.is_busy() {
                            return Ok(());
                        }
                        self.prompt()?;
                    }
                    Err(_) => {
                        writeln!(self.out, "Backend worker stopped; exiting.")?;
                        return Ok(());
                    }
                },
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let cmd = match parse_command(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(Flow::Continue),
            Err(usage) => {
                self.report(UiError::from_message(UiErrorContext::Command, usage))?;
                return Ok(Flow::Continue);
            }
        };

        match cmd {
            UserCommand::Add(paths) => self.add_paths(&paths)?,
            UserCommand::Remove(id) => self.apply(SessionEvent::FileRemoved(id), true)?,
            UserCommand::RemoveNamed(name) => {
                self.apply(SessionEvent::FilesRemovedByName(name), true)?
            }
            UserCommand::List => {
                self.print_screen()?;
                self.print_notices(true)?;
            }
            UserCommand::Submit => self.apply(SessionEvent::SubmitRequested, false)?,
            UserCommand::Adjust(instructions) => {
                self.apply(SessionEvent::AdjustmentRequested(instructions), false)?
            }
            UserCommand::Show => {
                if let Some(draft) = self.current_draft()? {
                    writeln!(self.out, "{}", transform_text_to_plain(&draft))?;
                }
            }
            UserCommand::Html(None) => {
                if let Some(draft) = self.current_draft()? {
                    writeln!(self.out, "{}", transform_text_to_html(&draft))?;
                }
            }
            UserCommand::Html(Some(path)) => {
                if let Some(draft) = self.current_draft()? {
                    self.write_export(output::export_html(&draft, &path), path)?;
                }
            }
            UserCommand::Export(path) => {
                if let Some(draft) = self.current_draft()? {
                    let path =
                        path.unwrap_or_else(|| output::default_export_path(Local::now(), "txt"));
                    self.write_export(output::export_plain(&draft, &path), path)?;
                }
            }
            UserCommand::Copy => {
                if let Some(draft) = self.current_draft()? {
                    match self.clipboard.copy(&draft) {
                        Ok(()) => writeln!(self.out, "Draft copied to the clipboard.")?,
                        Err(err) => {
                            self.report(UiError::from_message(UiErrorContext::Clipboard, err))?
                        }
                    }
                }
            }
            UserCommand::New => self.apply(SessionEvent::NewAnalysisRequested, true)?,
            UserCommand::Status => {
                if let Err(message) =
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckStatus)
                {
                    self.report(UiError::from_message(UiErrorContext::Status, message))?;
                } else {
                    writeln!(self.out, "Checking backend status...")?;
                }
            }
            UserCommand::Help => writeln!(self.out, "{HELP_TEXT}")?,
            UserCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) -> io::Result<()> {
        match event {
            UiEvent::Responded { kind, response } => {
                self.apply(SessionEvent::BackendResponded { kind, response }, false)
            }
            UiEvent::Info(message) => writeln!(self.out, "{message}"),
            UiEvent::Error(err) => self.report(err),
        }
    }

    fn add_paths(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        let mut candidates = Vec::with_capacity(paths.len());
        for path in paths {
            match candidate_from_path(path) {
                Ok(candidate) => candidates.push(candidate),
                Err(err) => {
                    self.report(UiError::from_message(UiErrorContext::Intake, err.to_string()))?
                }
            }
        }
        if candidates.is_empty() {
            return Ok(());
        }
        self.apply(SessionEvent::FilesOffered(candidates), true)
    }

    /// Runs one session transition and carries out its effects. `refresh`
    /// reprints the screen even when the transition did not ask for it.
    fn apply(&mut self, event: SessionEvent, refresh: bool) -> io::Result<()> {
        let transition = mem::take(&mut self.session).apply(event);
        self.session = transition.session;

        let mut scroll_to_top = false;
        let mut requests = Vec::new();
        for effect in transition.effects {
            match command_for_effect(effect) {
                Some(request) => requests.push(request),
                None => scroll_to_top = true,
            }
        }

        if scroll_to_top || refresh {
            self.print_screen()?;
        }
        self.print_notices(scroll_to_top || refresh)?;

        for (kind, cmd) in requests {
            if let Err(message) = dispatch_backend_command(&self.cmd_tx, cmd) {
                let response =
                    BackendResponse::Failure(FailureReply::new(ErrorCode::Transport, message));
                return self.apply(SessionEvent::BackendResponded { kind, response }, false);
            }
            let progress = match kind {
                RequestKind::Upload => "Analyzing files, this can take a while...",
                RequestKind::Adjustment => "Requesting the adjusted draft...",
            };
            writeln!(self.out, "{progress}")?;
        }
        Ok(())
    }

    fn current_draft(&mut self) -> io::Result<Option<String>> {
        let draft = self.session.draft().map(str::to_string);
        if draft.is_none() {
            writeln!(self.out, "{NO_DRAFT_MESSAGE}")?;
        }
        Ok(draft)
    }

    fn write_export(&mut self, result: Result<(), String>, path: PathBuf) -> io::Result<()> {
        match result {
            Ok(()) => writeln!(self.out, "Draft saved to {}", path.display()),
            Err(err) => self.report(UiError::from_message(UiErrorContext::Export, err)),
        }
    }

    fn report(&mut self, err: UiError) -> io::Result<()> {
        tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        writeln!(self.out, "{err}")
    }

    fn print_screen(&mut self) -> io::Result<()> {
        write!(self.out, "{}", view::render_screen(&self.session))
    }

    /// Prints error and warnings when they changed since last shown, or
    /// unconditionally with `force`.
    fn print_notices(&mut self, force: bool) -> io::Result<()> {
        let notices = view::render_notices(&self.session);
        if force || notices != self.shown_notices {
            write!(self.out, "{notices}")?;
        }
        self.shown_notices = notices;
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}

/// Forwards stdin lines to the app loop; the channel closes at end of input.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (line_tx, line_rx) = bounded::<String>(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!("failed to read stdin: {err}");
                    break;
                }
            }
        }
    });
    line_rx
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
