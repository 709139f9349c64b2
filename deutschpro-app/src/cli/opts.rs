use clap::{Args, Parser, Subcommand, ValueEnum};
use deutschpro_core::{Level, LexiconTab, WordType};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Json,
    Memory,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "deutschpro", version, about = "German vocabulary trainer backed by Gemini")]
pub struct Cli {
    /// Storage backend (memory forgets everything on exit)
    #[arg(long, value_enum, default_value_t = StoreKind::Json)]
    pub store: StoreKind,

    /// Directory holding lexicon.json and its backups (defaults to app data dir)
    #[arg(long, env = "DEUTSCHPRO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to config.toml in the app config dir)
    #[arg(long, env = "DEUTSCHPRO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Mastery per level
    Levels,
    /// Generate a fresh batch for a level and classify each word
    Quiz(QuizCmd),
    /// Browse and edit the lexicon
    #[command(subcommand)]
    Lexicon(LexiconCmd),
    /// Talk to the tutor using the words you have mastered
    Chat,
    /// Pronounce arbitrary German text into a WAV file
    Speak(SpeakCmd),
    /// Export data
    #[command(subcommand)]
    Export(ExportCmd),
    /// Import data
    #[command(subcommand)]
    Import(ImportCmd),
}

#[derive(Debug, Args, Clone)]
pub struct QuizCmd {
    /// A1, A2, B1, B2, C1 or C2
    pub level: Level,
    /// Number of words (at most 100; defaults to the configured quiz size)
    #[arg(long)]
    pub size: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TabArg {
    Mastered,
    Learning,
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Noun,
    Verb,
    Preposition,
    Adjective,
    Adverb,
    Phrase,
}

impl From<TypeArg> for WordType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Noun => WordType::Noun,
            TypeArg::Verb => WordType::Verb,
            TypeArg::Preposition => WordType::Preposition,
            TypeArg::Adjective => WordType::Adjective,
            TypeArg::Adverb => WordType::Adverb,
            TypeArg::Phrase => WordType::Phrase,
        }
    }
}

impl From<TabArg> for LexiconTab {
    fn from(t: TabArg) -> Self {
        match t {
            TabArg::Mastered => LexiconTab::Mastered,
            TabArg::Learning => LexiconTab::Learning,
            TabArg::All => LexiconTab::All,
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum LexiconCmd {
    List {
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        tab: TabArg,
        #[arg(long)]
        search: Option<String>,
        /// Only this part of speech
        #[arg(long = "type", value_enum)]
        word_type: Option<TypeArg>,
    },
    /// Look a word up and add it as mastered
    Add { word: String },
    /// Delete an entry (id, id prefix or word)
    Rm { item: String },
    /// Move an entry between mastered and learning
    Toggle { item: String },
    /// Flashcard review of a tab
    Review {
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        tab: TabArg,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 50)]
        max: usize,
    },
    /// Pronounce an entry into a WAV file
    Speak {
        item: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args, Clone)]
pub struct SpeakCmd {
    pub text: String,
    #[arg(long, default_value = "speech.wav")]
    pub out: PathBuf,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ExportCmd {
    /// Progress and chat history as a versioned snapshot
    Json { path: PathBuf },
    /// Lexicon entries as CSV
    Csv {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        tab: TabArg,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ImportCmd {
    /// Replace progress and chat history with a snapshot
    Json { path: PathBuf },
}
