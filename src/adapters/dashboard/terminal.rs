//! Live terminal dashboard
//!
//! Redraws the whole screen on every stats update and countdown tick:
//! header with last scan time, the most recent matches (newest first) and a
//! running stats footer.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::domain::{ScanStats, Score, Token};
use crate::ports::{ReportError, ScanEvent, ScanReporter};

const SEPARATOR_WIDTH: usize = 60;

/// Dashboard settings
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Number of most recent matches kept on screen
    pub max_matches: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { max_matches: 10 }
    }
}

/// A reported token and the score it passed with
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedToken {
    pub token: Token,
    pub score: Score,
}

/// Full-screen redraw reporter
pub struct TerminalDashboard<W: Write = Stdout> {
    out: W,
    config: DashboardConfig,
    matches: VecDeque<MatchedToken>,
    total_scanned: u64,
    total_matches: u64,
    total_duplicates: u64,
    last_scan: DateTime<Local>,
    clear_screen: bool,
}

impl TerminalDashboard<Stdout> {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_writer(io::stdout(), config)
    }
}

impl<W: Write> TerminalDashboard<W> {
    /// Dashboard drawing into an arbitrary writer, without terminal control
    /// sequences
    pub fn with_writer(out: W, config: DashboardConfig) -> Self {
        Self {
            out,
            config,
            matches: VecDeque::new(),
            total_scanned: 0,
            total_matches: 0,
            total_duplicates: 0,
            last_scan: Local::now(),
            clear_screen: false,
        }
    }

    /// Builder method to clear the terminal before each redraw
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn matches(&self) -> impl Iterator<Item = &MatchedToken> {
        self.matches.iter()
    }

    pub fn total_scanned(&self) -> u64 {
        self.total_scanned
    }

    pub fn total_matches(&self) -> u64 {
        self.total_matches
    }

    pub fn total_duplicates(&self) -> u64 {
        self.total_duplicates
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Newest first, capped at `max_matches`
    pub fn add_match(&mut self, token: Token, score: Score) {
        self.matches.push_front(MatchedToken { token, score });
        self.matches.truncate(self.config.max_matches);
        self.total_matches += 1;
    }

    pub fn update_stats(&mut self, scanned: usize, duplicates: usize) {
        self.total_scanned += scanned as u64;
        self.total_duplicates += duplicates as u64;
        self.last_scan = Local::now();
    }

    /// Render the full screen as text
    pub fn render(&self, next_scan_in: u64) -> String {
        let now = Utc::now();
        let mut screen = String::new();

        screen.push_str(&format!(
            "{}\n",
            "🔍 Solana Token Scout - Live Feed".cyan().bold()
        ));
        screen.push_str(&format!(
            "{} | {} | {}\n\n",
            format!("Last scan: {}", self.last_scan.format("%Y-%m-%d %H:%M:%S")).dimmed(),
            format!("Next: {}s", next_scan_in).dimmed(),
            format!("Matches: {}", self.total_matches).green().bold()
        ));

        if self.matches.is_empty() {
            screen.push_str(&format!("{}\n", "Waiting for matches...".dimmed().italic()));
        }

        for matched in &self.matches {
            screen.push_str(&render_match(matched, now));
            screen.push_str(&format!("{}\n", "─".repeat(SEPARATOR_WIDTH).dimmed()));
        }

        screen.push('\n');
        screen.push_str(&format!(
            "{}\n",
            format!(
                "Stats: {} tokens scanned | {} matches shown | {} duplicates filtered",
                self.total_scanned,
                self.matches.len(),
                self.total_duplicates
            )
            .dimmed()
        ));
        screen.push_str(&format!("{}\n", "Press Ctrl+C to exit".dimmed().italic()));
        screen
    }

    fn draw(&mut self, next_scan_in: u64) -> Result<(), ReportError> {
        let screen = self.render(next_scan_in);
        if self.clear_screen {
            execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        self.out.write_all(screen.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ScanReporter for TerminalDashboard<W> {
    fn report(&mut self, event: &ScanEvent) -> Result<(), ReportError> {
        match event {
            ScanEvent::Match { token, score } => {
                self.add_match(token.clone(), *score);
                Ok(())
            }
            ScanEvent::Stats { scanned, duplicates } => {
                self.update_stats(*scanned, *duplicates);
                self.draw(0)
            }
            ScanEvent::Countdown { remaining_secs } => self.draw(*remaining_secs),
        }
    }

    fn finish(&mut self, stats: &ScanStats) -> Result<(), ReportError> {
        let summary = format!(
            "\n{}\n  Tokens scanned:      {}\n  Matches found:       {}\n  Duplicates filtered: {}\n  Cycles completed:    {}\n  Cycles failed:       {}\n",
            "Session summary".cyan().bold(),
            stats.total_scanned,
            stats.total_matches,
            stats.total_duplicates,
            stats.cycles_completed,
            stats.cycles_failed
        );
        self.out.write_all(summary.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

fn render_match(matched: &MatchedToken, now: DateTime<Utc>) -> String {
    let token = &matched.token;
    let score = &matched.score;

    let mut block = String::new();
    block.push_str(&format!(
        "{}{} {}\n",
        "✨ NEW MATCH - ".yellow().bold(),
        format!("Score: {}", score.total).bold(),
        format!(
            "(age {} / volume {} / momentum {})",
            score.age_score, score.volume_score, score.momentum_score
        )
        .dimmed()
    ));
    block.push_str(&format!(
        "{}\n",
        format!("Token: {} ({}) {}", token.symbol, token.name, token.address).cyan()
    ));
    block.push_str(&format!(
        "Age: {} | Liquidity: {} | Volume: {}\n",
        format_age(token.created_at, now),
        format_currency(token.liquidity_usd),
        format_currency(token.volume_24h)
    ));
    block.push_str(&format!(
        "{}\n",
        format!(
            "Traders: {} | Price: ${:.6} (↑ 5m: {}, 1h: {})",
            token.trader_count,
            token.price_usd,
            format_change(token.price_change_5m),
            format_change(token.price_change_1h)
        )
        .green()
    ));
    block
}

/// "25 minutes" under an hour, "1.5 hours" beyond
pub fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    let minutes = seconds / 60;

    if minutes < 60 {
        format!("{} minutes", minutes)
    } else {
        format!("{:.1} hours", seconds as f64 / 3600.0)
    }
}

/// Dollar amount with K/M suffixes
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Signed percentage, or N/A when the source omitted it
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(pct) => format!("{:+.1}%", pct),
        None => "N/A".to_string(),
    }
}
