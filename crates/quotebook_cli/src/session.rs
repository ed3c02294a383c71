//! Interactive session loop.
//!
//! One task owns the `QuoteBook`. Input lines, sync ticks and fetch results
//! are multiplexed with `tokio::select!`; fetches run in spawned tasks and
//! report back over a channel, so edits keep flowing while a request is out.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use quotebook_core::{
    NoticeLevel, PreferenceRepository, Quote, QuoteBook, RemoteSource, ResolveOutcome,
    SyncSettings, TransportError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::command::{Command, HELP_TEXT};

type FetchResult = Result<Vec<Quote>, TransportError>;

pub struct Session<P: PreferenceRepository> {
    book: QuoteBook<P>,
    remote: Option<Arc<dyn RemoteSource>>,
    settings: SyncSettings,
    export_dir: PathBuf,
    fetch_tx: mpsc::Sender<FetchResult>,
    fetch_rx: mpsc::Receiver<FetchResult>,
}

impl<P: PreferenceRepository> Session<P> {
    pub fn new(
        book: QuoteBook<P>,
        remote: Option<Arc<dyn RemoteSource>>,
        settings: SyncSettings,
        export_dir: PathBuf,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(4);
        Self {
            book,
            remote,
            settings,
            export_dir,
            fetch_tx,
            fetch_rx,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("{}", HELP_TEXT);
        if let Some(view) = self.book.current_view() {
            println!("{view}");
        }
        self.flush_notices();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let sync_enabled = self.remote.is_some();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match Command::parse(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => self.handle(command),
                        Ok(None) => {}
                        Err(message) => eprintln!("{message}"),
                    }
                }
                _ = ticker.tick(), if sync_enabled => {
                    self.start_fetch();
                }
                Some(fetched) = self.fetch_rx.recv() => self.finish_fetch(fetched),
            }
            self.flush_notices();
        }

        info!("event=session_end module=cli status=ok size={}", self.book.store().len());
        Ok(())
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Show => println!("{}", self.book.show_random_quote()),
            Command::Add { text, category } => match self.book.add_quote(&text, &category) {
                Ok(quote) => {
                    if let Some(view) = self.book.current_view() {
                        println!("{view}");
                    }
                    self.post_quote(quote);
                }
                Err(err) => alert(&err),
            },
            Command::Categories => self.print_categories(),
            Command::Filter(category) => match self.book.filter_quotes(&category) {
                Ok(view) => println!("{view}"),
                Err(err) => alert(&err),
            },
            Command::Export(dir) => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                match self.book.export_to(&dir) {
                    Ok(path) => println!("exported {} quotes to {}", self.book.store().len(), path.display()),
                    Err(err) => alert(&err),
                }
            }
            Command::Import(path) => match self.book.import_file(&path) {
                Ok(report) => println!(
                    "imported {} (skipped {} malformed, {} duplicate)",
                    report.imported, report.skipped_malformed, report.skipped_duplicates
                ),
                Err(err) => alert(&err),
            },
            Command::Sync => {
                if self.remote.is_none() {
                    eprintln!("sync is disabled");
                } else if !self.start_fetch() {
                    println!("{}", sync_skip_reason(self.book.pending_conflicts().len()));
                }
            }
            Command::Conflicts => self.print_conflicts(),
            Command::Resolve {
                position,
                resolution,
            } => match self.book.resolve_conflict_at(position, resolution) {
                Ok(ResolveOutcome::Applied { settled: false, .. }) => self.print_conflicts(),
                Ok(_) => {}
                Err(err) => alert(&err),
            },
            Command::Status => {
                let status = self.book.sync_status();
                println!(
                    "sync phase={} cycles={} skipped={} pending_conflicts={} last_synced_at_ms={} last_error={}",
                    status.phase,
                    status.cycles_started,
                    status.cycles_skipped,
                    status.pending_conflicts,
                    status.last_synced_at_ms.map_or("never".to_string(), |ms| ms.to_string()),
                    status.last_error.as_deref().unwrap_or("none")
                );
            }
            Command::Help => println!("{HELP_TEXT}"),
            Command::Quit => {}
        }
    }

    /// Starts a background fetch; `false` when sync is off or the slot is taken.
    fn start_fetch(&mut self) -> bool {
        let Some(remote) = self.remote.clone() else {
            return false;
        };
        if !self.book.begin_sync() {
            return false;
        }
        let tx = self.fetch_tx.clone();
        let batch_size = self.settings.batch_size;
        tokio::spawn(async move {
            let fetched = remote.fetch_candidates(batch_size).await;
            if tx.send(fetched).await.is_err() {
                warn!(
                    "event=sync_fetch module=cli status=error source={} error_code=session_closed",
                    remote.source_id()
                );
            }
        });
        true
    }

    fn finish_fetch(&mut self, fetched: FetchResult) {
        match self.book.complete_sync(fetched) {
            Ok(Some(report)) if report.conflicts > 0 => self.print_conflicts(),
            Ok(_) => {}
            Err(err) => alert(&err),
        }
    }

    fn post_quote(&self, quote: Quote) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(err) = remote.post_quote(&quote).await {
                warn!(
                    "event=remote_post module=cli status=error source={} error={err}",
                    remote.source_id()
                );
            }
        });
    }

    fn print_categories(&self) {
        let selected = self.book.selected_category().as_str();
        for option in self.book.categories() {
            let marker = if option == selected { "*" } else { " " };
            println!("{marker} {option}");
        }
    }

    fn print_conflicts(&self) {
        let conflicts = self.book.pending_conflicts();
        if conflicts.is_empty() {
            println!("no pending conflicts");
            return;
        }
        println!("conflicts with server data:");
        for (idx, conflict) in conflicts.iter().enumerate() {
            println!(
                "  #{} \"{}\" local={} remote={}  (resolve {} local|remote)",
                idx + 1,
                conflict.text,
                conflict.local_category,
                conflict.remote_category,
                idx + 1
            );
        }
    }

    fn flush_notices(&mut self) {
        for notice in self.book.drain_notices() {
            match notice.level {
                NoticeLevel::Info => println!("· {}", notice.message),
                NoticeLevel::Success => println!("✓ {}", notice.message),
                NoticeLevel::Warning => println!("~ {}", notice.message),
            }
        }
    }
}

fn alert(err: &dyn std::error::Error) {
    eprintln!("alert: {err}");
}

/// Explains a manual `sync` that could not claim the cycle slot.
fn sync_skip_reason(pending_conflicts: usize) -> &'static str {
    if pending_conflicts == 0 {
        "sync already in progress"
    } else {
        "resolve pending conflicts first (see `conflicts`)"
    }
}
