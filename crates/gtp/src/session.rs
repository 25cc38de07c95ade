//! One driven game: an engine subprocess plus the session state around it.

use std::path::{Path, PathBuf};

use autoplay_core::{Color, Engine, Version};
use tokio::fs;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{GtpError, Result};
use crate::process::EngineProcess;
use crate::record;
use crate::state::GameState;

/// Sent right after the handshake: no time limits on engine thinking.
const DEFAULT_TIME_SETTINGS: &str = "time_settings 0 1 0";

/// Setup commands that place handicap stones; they must run before any
/// other setup command and flip the starting side to white.
const HANDICAP_COMMANDS: &[&str] = &["fixed_handicap", "place_free_handicap", "set_free_handicap"];

/// SGF property marking a stored handicap position.
const HANDICAP_MARKER: &str = "HA[";

/// Options controlling session start.
#[derive(Debug, Clone)]
pub struct StartOptions {
    /// Oldest engine build accepted by the version handshake.
    pub min_version: Version,
    /// Scratch basename of a stored game to resume, if any.
    pub resume: Option<String>,
    /// Move count to resume at; zero means the whole file is loaded with
    /// no explicit move index.
    pub resume_moves: u32,
    /// Directory of training data to preload into the engine.
    pub preload_dir: Option<PathBuf>,
    /// Directory scratch files are created in.
    pub work_dir: PathBuf,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            min_version: Version::default(),
            resume: None,
            resume_moves: 0,
            preload_dir: None,
            work_dir: PathBuf::from("."),
        }
    }
}

/// The protocol driver: owns exactly one engine subprocess for its whole
/// lifetime and drives a single game over the line protocol.
pub struct GameSession {
    process: EngineProcess,
    engine: Engine,
    id: String,
    work_dir: PathBuf,
    state: GameState,
    last_move: String,
    pending: Option<String>,
    winner: Option<Color>,
    result_text: String,
}

impl GameSession {
    /// Launch the engine, run the version handshake, load any resumed
    /// position and replay setup commands. On failure the subprocess is
    /// torn down before the error is returned.
    pub async fn start(engine: Engine, opts: StartOptions) -> Result<Self> {
        let process = EngineProcess::spawn(&engine.command_line())?;
        let mut session = Self {
            process,
            engine,
            id: Uuid::new_v4().simple().to_string(),
            work_dir: opts.work_dir.clone(),
            state: GameState::new(),
            last_move: String::new(),
            pending: None,
            winner: None,
            result_text: String::new(),
        };

        if let Err(err) = session.initialize(&opts).await {
            session.process.kill().await;
            return Err(err);
        }

        info!(id = %session.id, engine = %session.engine.command_line(), "engine has started");
        Ok(session)
    }

    async fn initialize(&mut self, opts: &StartOptions) -> Result<()> {
        self.check_version(&opts.min_version).await?;
        self.send_command(DEFAULT_TIME_SETTINGS).await?;

        match &opts.resume {
            Some(resume) => self.load_resumed_game(resume, opts.resume_moves).await?,
            None => self.replay_handicap_commands().await?,
        }
        self.replay_setup_commands().await?;

        if let Some(dir) = &opts.preload_dir {
            self.preload_training_data(dir.clone()).await?;
        }

        Ok(())
    }

    /// Version handshake: tolerate and echo comment lines, parse the
    /// dotted version, reject builds older than `min`.
    async fn check_version(&mut self, min: &Version) -> Result<()> {
        self.process.write_line("version").await?;

        let mut line = self.process.read_line().await?;
        // Tuning builds emit comment lines before the real answer.
        while line.starts_with('#') {
            info!(comment = %line, "engine");
            line = self.process.read_line().await?;
        }

        if !line.starts_with('=') || line.len() < 3 {
            error!(reply = %line, "unexpected version reply");
            return Err(GtpError::WrongProtocolReply(line));
        }

        let raw = line[1..].trim().to_string();
        let version: Version = raw
            .parse()
            .map_err(|_| GtpError::UnparseableVersion(raw.clone()))?;
        if version.delta(min) < 0 {
            error!(%version, required = %min, "engine build is too old");
            return Err(GtpError::VersionTooOld {
                found: version,
                required: *min,
            });
        }

        self.eat_blank_line().await?;
        debug!(%version, "version handshake ok");
        Ok(())
    }

    async fn load_resumed_game(&mut self, name: &str, moves: u32) -> Result<()> {
        let path = self.work_dir.join(format!("{name}.sgf"));
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(GtpError::MissingResumeFile(path));
        }

        let content = fs::read_to_string(&path).await?;
        let handicap = content.contains(HANDICAP_MARKER);
        self.state.set_handicap(handicap);

        let command = if moves > 0 {
            format!("loadsgf {} {}", path.display(), moves)
        } else {
            format!("loadsgf {}", path.display())
        };
        self.send_command(&command).await?;
        self.state.set_move_count(moves);

        info!(file = %path.display(), moves, handicap, "resumed stored game");
        Ok(())
    }

    /// Handicap commands run before every other setup command so the rest
    /// can assume a finished initial position.
    async fn replay_handicap_commands(&mut self) -> Result<()> {
        let commands: Vec<String> = self
            .engine
            .commands
            .iter()
            .filter(|c| is_handicap_command(c))
            .cloned()
            .collect();
        if commands.is_empty() {
            return Ok(());
        }

        for command in &commands {
            self.setup_command(command).await?;
        }
        self.state.set_handicap(true);
        Ok(())
    }

    async fn replay_setup_commands(&mut self) -> Result<()> {
        let commands: Vec<String> = self
            .engine
            .commands
            .iter()
            .filter(|c| !is_handicap_command(c))
            .cloned()
            .collect();
        for command in &commands {
            self.setup_command(command).await?;
        }
        Ok(())
    }

    async fn setup_command(&mut self, command: &str) -> Result<()> {
        match self.send_command(command).await {
            Ok(_) => Ok(()),
            Err(GtpError::WrongProtocolReply(_)) => {
                Err(GtpError::SetupCommandFailed(command.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    async fn preload_training_data(&mut self, dir: PathBuf) -> Result<()> {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "training data directory not readable");
                return Ok(());
            }
        };

        let mut files = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                files.push(entry.path());
            }
        }
        files.sort();

        for file in files {
            debug!(file = %file.display(), "load_training");
            self.send_command(&format!("load_training {}", file.display()))
                .await?;
        }
        Ok(())
    }

    /// One protocol round-trip: command out, `=`-prefixed reply in, blank
    /// continuation line consumed. Returns the reply payload.
    pub async fn send_command(&mut self, command: &str) -> Result<String> {
        debug!(command = %command, "gtp send");
        self.process.write_line(command).await?;

        let line = self.process.read_line().await?;
        if !line.starts_with('=') {
            error!(command = %command, reply = %line, "unexpected reply");
            return Err(GtpError::WrongProtocolReply(line));
        }
        self.eat_blank_line().await?;
        Ok(line[1..].trim().to_string())
    }

    /// Consume the blank continuation line the protocol sends after every
    /// response.
    async fn eat_blank_line(&mut self) -> Result<()> {
        self.process.read_line().await.map(|_| ())
    }

    /// Ask the engine for the current side's move. The reply is read
    /// separately by [`GameSession::wait_for_move`] and
    /// [`GameSession::read_move`].
    pub async fn request_move(&mut self) -> Result<()> {
        let command = format!("genmove {}", self.state.to_move().gtp());
        self.state.begin_move();
        self.process.write_line(&command).await
    }

    /// Block until the engine answers the pending generate-move request.
    pub async fn wait_for_move(&mut self) -> Result<()> {
        let line = self.process.read_line().await?;
        self.pending = Some(line);
        Ok(())
    }

    /// Parse the reply read by [`GameSession::wait_for_move`]. A malformed
    /// reply terminates the engine process.
    pub async fn read_move(&mut self) -> Result<()> {
        let line = self.pending.take().ok_or(GtpError::ProcessDied)?;
        if !line.starts_with('=') || line.len() < 3 {
            error!(reply = %line, "malformed move reply");
            self.process.kill().await;
            return Err(GtpError::WrongProtocolReply(line));
        }

        let text = line[1..].trim().to_string();
        self.state.record_reply(&text);
        self.eat_blank_line().await?;

        debug!(
            move_num = self.state.move_count(),
            side = %self.state.to_move(),
            text = %text,
            "move"
        );
        self.last_move = text;
        Ok(())
    }

    /// Advance to the next move; false once the game is over.
    pub fn next_move(&mut self) -> bool {
        self.state.advance()
    }

    /// Forward the opposing engine's move into this session so both sides
    /// keep a consistent board.
    pub async fn forward_move(&mut self, side: Color, text: &str) -> Result<()> {
        let command = format!("play {} {}", side.as_str(), text);
        self.send_command(&command).await?;
        self.state.record_forwarded(side, text);
        Ok(())
    }

    /// Resolve the winner: synthesized on resignation, otherwise via a
    /// final-score query.
    pub async fn query_result(&mut self) -> Result<()> {
        if let Some(loser) = self.state.resigned_side() {
            let winner = loser.opponent();
            self.winner = Some(winner);
            self.result_text = format!("{}+Resign", winner.sgf());
        } else {
            let body = self.send_command("final_score").await?;
            self.winner = match body.chars().next() {
                Some('B') => Some(Color::Black),
                Some('W') => Some(Color::White),
                _ => None,
            };
            self.result_text = body;
            if self.winner.is_none() {
                warn!(score = %self.result_text, "no winner found");
                return Err(GtpError::NoWinnerFound);
            }
        }

        info!(score = %self.result_text, winner = ?self.winner, "game scored");
        Ok(())
    }

    /// Write the game record to the session's scratch SGF file.
    pub async fn write_record(&mut self) -> Result<()> {
        let path = self.scratch_path("sgf");
        self.send_command(&format!("printsgf {}", path.display()))
            .await
            .map(|_| ())
    }

    /// Persist resumable training state to the scratch `.train` file.
    pub async fn save_training_data(&mut self) -> Result<()> {
        let path = self.scratch_path("train");
        info!(file = %path.display(), "saving training state");
        self.send_command(&format!("save_training {}", path.display()))
            .await
            .map(|_| ())
    }

    /// Reload training state stored under another session's basename.
    pub async fn load_training_data(&mut self, name: &str) -> Result<()> {
        let path = self.work_dir.join(format!("{name}.train"));
        info!(file = %path.display(), "loading training state");
        self.send_command(&format!("load_training {}", path.display()))
            .await
            .map(|_| ())
    }

    /// Dump training features for the finished game. Requires a resolved
    /// winner.
    pub async fn dump_training_features(&mut self) -> Result<()> {
        let winner = self.winner.ok_or(GtpError::NoWinnerFound)?;
        let path = self.scratch_path("txt");
        self.send_command(&format!("dump_training {} {}", winner.as_str(), path.display()))
            .await
            .map(|_| ())
    }

    /// Dump the engine's diagnostic log for the finished game.
    pub async fn dump_debug_log(&mut self) -> Result<()> {
        let path = self.scratch_path("debug.txt");
        self.send_command(&format!("dump_debug {}", path.display()))
            .await
            .map(|_| ())
    }

    /// Convert a supervised game record into training features.
    pub async fn dump_supervised(&mut self, src: &Path, dst: &Path) -> Result<()> {
        self.send_command(&format!("dump_supervised {} {}", src.display(), dst.display()))
            .await
            .map(|_| ())
    }

    /// Rewrite the on-disk game record in place: opponent player name,
    /// reproduction command lines, resignation normalization.
    pub async fn post_process_record(
        &self,
        opponent: &Engine,
        resigned: bool,
        self_play: bool,
    ) -> Result<()> {
        let path = self.scratch_path("sgf");
        let data = fs::read_to_string(&path).await?;
        let fixed = record::rewrite(&data, &self.engine, opponent, resigned, self_play);
        fs::write(&path, fixed).await?;
        Ok(())
    }

    /// Tell the engine to exit and wait for the process to finish. Safe to
    /// call at any point, including after a protocol failure.
    pub async fn quit(&mut self) {
        let _ = self.process.write_line("quit").await;
        self.process.wait().await;
    }

    fn scratch_path(&self, ext: &str) -> PathBuf {
        self.work_dir.join(format!("{}.{}", self.id, ext))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn to_move(&self) -> Color {
        self.state.to_move()
    }

    pub fn move_count(&self) -> u32 {
        self.state.move_count()
    }

    pub fn last_move(&self) -> &str {
        &self.last_move
    }

    pub fn is_handicap_game(&self) -> bool {
        self.state.is_handicap_game()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn winner_name(&self) -> Option<&'static str> {
        self.winner.map(|c| c.as_str())
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }
}

fn is_handicap_command(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .map(|name| HANDICAP_COMMANDS.contains(&name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handicap_command_detection() {
        assert!(is_handicap_command("fixed_handicap 9"));
        assert!(is_handicap_command("place_free_handicap 4"));
        assert!(!is_handicap_command("time_settings 0 1 0"));
        assert!(!is_handicap_command(""));
    }

    #[test]
    fn test_default_start_options() {
        let opts = StartOptions::default();
        assert!(opts.resume.is_none());
        assert_eq!(opts.resume_moves, 0);
        assert_eq!(opts.work_dir, PathBuf::from("."));
    }
}
