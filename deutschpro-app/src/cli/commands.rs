use crate::cli::opts::*;
use crate::config::{api_key_from_env, Config};
use crate::speech::Speaker;

use anyhow::{anyhow, bail, Result};
use deutschpro_core::repo::memory::MemoryStore;
use deutschpro_core::tutor::TutorSession;
use deutschpro_core::{
    fetch_quiz_batch, filter_by_type, level_summaries, lexicon_totals, lexicon_view, lookup_word, CoreError,
    GenerativeBackend, ProgressAction, ProgressStore, QuizSession, Role, Snapshot, UserProgress,
    Verdict, VocabItem, WordType, MAX_BATCH,
};
use deutschpro_gemini::GeminiClient;
use deutschpro_json::JsonStore;
use log::{info, warn};
use rand::seq::SliceRandom;
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const EMPTY_BATCH: &str = "Philologist returned empty word set. Please try again.";
const NO_CONNECTION: &str = "Could not connect to Philologist. Please try again.";

pub async fn run_cli(args: Cli) -> Result<()> {
    let cfg = Config::load(args.config.as_deref())?;
    let store = open_store(&args.store, args.data_dir.clone()).await?;
    match args.cmd {
        Command::Levels => levels_cmd(store).await,
        Command::Quiz(cmd) => quiz_cmd(store, &cfg, cmd).await,
        Command::Lexicon(cmd) => lexicon_cmd(store, &cfg, cmd).await,
        Command::Chat => chat_cmd(store, &cfg).await,
        Command::Speak(cmd) => {
            let backend = open_backend(&cfg)?;
            speak(&*backend, &cmd.text, &cmd.out).await
        }
        Command::Export(cmd) => export_cmd(store, cmd).await,
        Command::Import(cmd) => import_cmd(store, cmd).await,
    }
}

pub async fn open_store(store: &StoreKind, data_dir: Option<PathBuf>) -> Result<Arc<dyn ProgressStore>> {
    match store {
        StoreKind::Json => {
            let s = match data_dir {
                Some(dir) => JsonStore::open_in(&dir).await?,
                None => JsonStore::open_default().await?,
            };
            info!("using store {}", s.path().display());
            Ok(Arc::new(s))
        }
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

fn open_backend(cfg: &Config) -> Result<Arc<dyn GenerativeBackend>> {
    let key = api_key_from_env().ok_or_else(|| anyhow!("set GEMINI_API_KEY (or API_KEY) to reach the language service"))?;
    let client = GeminiClient::new(cfg.gemini(key))?;
    Ok(Arc::new(client))
}

async fn levels_cmd(store: Arc<dyn ProgressStore>) -> Result<()> {
    let progress = store.load_progress().await?;
    for s in level_summaries(&progress) {
        println!(
            "{}\t{}\t{:>5}/{:<5}\t{:>5.1}%",
            s.level,
            bar(s.percent()),
            s.mastered,
            s.target,
            s.percent()
        );
    }
    Ok(())
}

async fn quiz_cmd(store: Arc<dyn ProgressStore>, cfg: &Config, cmd: QuizCmd) -> Result<()> {
    let backend = open_backend(cfg)?;
    let progress = store.load_progress().await?;
    let size = cmd.size.unwrap_or(cfg.quiz_size).clamp(1, MAX_BATCH);
    let exclude = progress.known_words();

    println!("fetching {size} new {} words...", cmd.level);
    let outcome = match fetch_quiz_batch(&*backend, cmd.level, size, &exclude, &cfg.batch_policy()).await {
        Ok(o) => o,
        Err(e) => {
            warn!("quiz batch failed: {e}");
            bail!(EMPTY_BATCH);
        }
    };
    if outcome.items.is_empty() {
        bail!(EMPTY_BATCH);
    }
    if outcome.items.len() < size {
        println!("only found {} fresh words this time", outcome.items.len());
    }

    let total = outcome.items.len();
    let mut session = QuizSession::new(cmd.level, outcome.items);
    while let Some(item) = session.current().cloned() {
        println!("\n[{}/{}] {}  ({})", session.answered() + 1, total, item.display_word(), item.word_type);
        prompt_enter("[enter=show]")?;
        print_card_back(&item);
        println!("[y=mastered, n=still learning, q=quit]");
        let verdict = loop {
            let line = read_line("> ")?;
            match line.as_deref().map(|l| l.trim().to_lowercase()).as_deref() {
                Some("y") | Some("yes") | Some("m") => break Verdict::Mastered,
                Some("n") | Some("no") | Some("l") => break Verdict::StillLearning,
                Some("q") | Some("quit") | None => {
                    println!("quiz abandoned, nothing saved");
                    return Ok(());
                }
                _ => println!("enter y, n, or q"),
            }
        };
        session.answer(verdict);
    }

    let results = session.into_results();
    let (m, l) = (results.mastered.len(), results.to_study.len());
    let progress = store
        .dispatch(ProgressAction::CompleteQuiz {
            mastered: results.mastered,
            to_study: results.to_study,
        })
        .await?;
    println!(
        "\n{m} mastered, {l} to study. {} now at {}/{}",
        cmd.level,
        progress.mastered_count(cmd.level),
        cmd.level.target()
    );
    Ok(())
}

async fn lexicon_cmd(store: Arc<dyn ProgressStore>, cfg: &Config, cmd: LexiconCmd) -> Result<()> {
    match cmd {
        LexiconCmd::List { tab, search, word_type } => {
            let progress = store.load_progress().await?;
            let mut items = lexicon_view(&progress, tab.into(), search.as_deref().unwrap_or(""));
            if let Some(t) = word_type {
                items = filter_by_type(&items, t.into());
            }
            for i in &items {
                let status = if progress.is_mastered(&i.id) { "mastered" } else { "learning" };
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    short_id(&i.id),
                    i.display_word(),
                    i.translation,
                    i.word_type,
                    i.level,
                    status
                );
            }
            let totals = lexicon_totals(&progress);
            let by_type: Vec<String> = totals.by_type.iter().map(|(t, n)| format!("{t}={n}")).collect();
            println!(
                "-- {} shown; {} mastered, {} learning [{}]",
                items.len(),
                totals.mastered,
                totals.learning,
                by_type.join(" ")
            );
        }
        LexiconCmd::Add { word } => {
            let backend = open_backend(cfg)?;
            let item = match lookup_word(&*backend, &word).await {
                Ok(i) => i,
                Err(CoreError::NoSuchWord(_)) => bail!("No such word exists in German"),
                Err(CoreError::Invalid(m)) => bail!("{m}"),
                Err(e) => {
                    warn!("lookup of {word:?} failed: {e}");
                    bail!(NO_CONNECTION);
                }
            };
            let label = item.display_word();
            let (translation, level) = (item.translation.clone(), item.level);
            match store.dispatch(ProgressAction::AddWord { item }).await {
                Ok(_) => println!("added {label} ({translation}) as mastered at {level}"),
                Err(CoreError::Conflict(msg)) => bail!("{msg}"),
                Err(e) => return Err(e.into()),
            }
        }
        LexiconCmd::Rm { item } => {
            let progress = store.load_progress().await?;
            let it = resolve_item(&progress, &item)?;
            store.dispatch(ProgressAction::Delete { id: it.id.clone() }).await?;
            println!("removed {}", it.display_word());
        }
        LexiconCmd::Toggle { item } => {
            let progress = store.load_progress().await?;
            let it = resolve_item(&progress, &item)?;
            let next = store.dispatch(ProgressAction::ToggleMastery { id: it.id.clone() }).await?;
            let now = if next.is_mastered(&it.id) { "mastered" } else { "learning" };
            println!("{} is now {now}", it.display_word());
        }
        LexiconCmd::Review { tab, search, max } => review_cmd(store, tab, search, max).await?,
        LexiconCmd::Speak { item, out } => {
            let progress = store.load_progress().await?;
            let it = resolve_item(&progress, &item)?;
            let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.wav", it.word.to_lowercase())));
            let backend = open_backend(cfg)?;
            speak(&*backend, &it.word, &out).await?;
        }
    }
    Ok(())
}

async fn review_cmd(store: Arc<dyn ProgressStore>, tab: TabArg, search: Option<String>, max: usize) -> Result<()> {
    let progress = store.load_progress().await?;
    let mut pool = lexicon_view(&progress, tab.into(), search.as_deref().unwrap_or(""));
    if pool.is_empty() {
        println!("nothing to review");
        return Ok(());
    }
    pool.shuffle(&mut rand::thread_rng());
    pool.truncate(max.max(1));

    let total = pool.len();
    let (mut right, mut count) = (0usize, 0usize);
    for item in pool {
        count += 1;
        println!("\n[{}/{}] {}", count, total, item.translation);
        prompt_enter("[enter=show]")?;
        println!("{}  ({}, {})", item.display_word(), item.word_type, item.level);
        if !item.example.is_empty() {
            println!("  {}", item.example);
        }
        println!("[y=knew it, n=didn't, s=skip, q=quit]");
        let correct = loop {
            let line = read_line("> ")?;
            match line.as_deref().map(|l| l.trim().to_lowercase()).as_deref() {
                Some("y") | Some("yes") => break Some(true),
                Some("n") | Some("no") => break Some(false),
                Some("s") | Some("skip") => break None,
                Some("q") | Some("quit") | None => {
                    println!("\nreviewed {}, {} correct", count - 1, right);
                    return Ok(());
                }
                _ => println!("enter y, n, s, or q"),
            }
        };
        if let Some(correct) = correct {
            if correct {
                right += 1;
            }
            store.dispatch(ProgressAction::Review { item, correct }).await?;
        }
    }

    println!("\nreviewed {count}, {right} correct");
    Ok(())
}

async fn chat_cmd(store: Arc<dyn ProgressStore>, cfg: &Config) -> Result<()> {
    let backend = open_backend(cfg)?;
    let progress = store.load_progress().await?;
    let history = store.load_chat().await?;
    let mut session = TutorSession::new(&progress.mastered_words(), history);
    let speaker = Speaker::new();

    for m in session.history().iter().rev().take(6).rev() {
        print_message(m.role, &m.text);
    }
    println!("(/reset starts over, /speak reads the last reply aloud, /quit leaves)");

    while let Some(line) = read_line("du> ")? {
        let text = line.trim();
        match text {
            "" => continue,
            "/quit" | "/q" => break,
            "/reset" => {
                session.reset();
                store.save_chat(session.history()).await?;
                for m in session.history() {
                    print_message(m.role, &m.text);
                }
            }
            "/speak" => {
                let last = session.history().iter().rev().find(|m| m.role == Role::Model).map(|m| m.text.clone());
                match last {
                    Some(t) => {
                        if let Err(e) = speak_with(&speaker, &*backend, &t, Path::new("tutor.wav")).await {
                            println!("could not render speech: {e}");
                        }
                    }
                    None => println!("nothing to read yet"),
                }
            }
            _ => {
                match session.send(&*backend, text).await {
                    Ok(reply) => print_message(reply.role, &reply.text),
                    Err(_) => println!("Could not reach the tutor. Please try again."),
                }
                store.save_chat(session.history()).await?;
            }
        }
    }
    Ok(())
}

async fn speak(backend: &dyn GenerativeBackend, text: &str, out: &Path) -> Result<()> {
    speak_with(&Speaker::new(), backend, text, out).await
}

async fn speak_with(speaker: &Speaker, backend: &dyn GenerativeBackend, text: &str, out: &Path) -> Result<()> {
    match speaker.speak_to_file(backend, text, out).await? {
        Some(clip) => println!("wrote {} ({:.1}s)", out.display(), clip.duration_secs()),
        None => println!("no audio produced"),
    }
    Ok(())
}

async fn export_cmd(store: Arc<dyn ProgressStore>, cmd: ExportCmd) -> Result<()> {
    match cmd {
        ExportCmd::Json { path } => {
            let snap = Snapshot::new(store.load_progress().await?, store.load_chat().await?);
            std::fs::write(&path, snap.to_json()?)?;
            println!("wrote {}", path.display());
        }
        ExportCmd::Csv { path, tab } => {
            let progress = store.load_progress().await?;
            let items = lexicon_view(&progress, tab.into(), "");
            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record([
                "id",
                "word",
                "translation",
                "type",
                "level",
                "status",
                "gender",
                "plural",
                "example",
                "example_translation",
            ])?;
            for i in items {
                let status = if progress.is_mastered(&i.id) { "mastered" } else { "learning" };
                let gender = i.gender.and_then(|g| g.article()).unwrap_or_default();
                wtr.write_record([
                    i.id.as_str(),
                    i.word.as_str(),
                    i.translation.as_str(),
                    i.word_type.as_str(),
                    i.level.as_str(),
                    status,
                    gender,
                    i.plural.as_deref().unwrap_or_default(),
                    i.example.as_str(),
                    i.example_translation.as_str(),
                ])?;
            }
            wtr.flush()?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

async fn import_cmd(store: Arc<dyn ProgressStore>, cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Json { path } => {
            let data = std::fs::read_to_string(&path)?;
            let snap = Snapshot::from_json(&data)?;
            let (m, l) = (snap.progress.mastered_items.len(), snap.progress.learning_items.len());
            store.replace_progress(snap.progress).await?;
            store.save_chat(&snap.chat).await?;
            println!("imported {m} mastered, {l} learning");
        }
    }
    Ok(())
}

// ===== Helpers =====

/// Finds an entry by full id, unique id prefix, or word (case-insensitive).
fn resolve_item(progress: &UserProgress, sel: &str) -> Result<VocabItem> {
    let sel = sel.trim();
    if let Some(i) = progress.find(sel) {
        return Ok(i.clone());
    }
    let all = || progress.mastered_items.iter().chain(progress.learning_items.iter());
    let by_prefix: Vec<&VocabItem> = all().filter(|i| !sel.is_empty() && i.id.starts_with(sel)).collect();
    if by_prefix.len() == 1 {
        return Ok(by_prefix[0].clone());
    }
    let by_word: Vec<&VocabItem> = all().filter(|i| i.word.to_lowercase() == sel.to_lowercase()).collect();
    match by_word.as_slice() {
        [one] => Ok((*one).clone()),
        [] if by_prefix.len() > 1 => bail!("ambiguous id prefix: {sel}"),
        [] => bail!("not in your lexicon: {sel}"),
        many => {
            let ids: Vec<String> = many.iter().map(|i| format!("{} ({})", short_id(&i.id), i.word_type)).collect();
            bail!("{sel} matches several entries: {}", ids.join(", "))
        }
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_card_back(item: &VocabItem) {
    println!("= {}", item.translation);
    if let Some(p) = &item.plural {
        println!("  plural: {p}");
    }
    if item.word_type == WordType::Verb {
        if let Some(c) = &item.conjugation {
            println!("  {} / {} / {}", c.present3rd, c.past, c.past_participle);
        }
    }
    if let Some(cases) = item.cases.as_ref().filter(|c| !c.is_empty()) {
        println!("  + {}", cases.join(", "));
    }
    if !item.example.is_empty() {
        println!("  {}", item.example);
        println!("  {}", item.example_translation);
    }
}

fn print_message(role: Role, text: &str) {
    match role {
        Role::Model => println!("coach> {text}"),
        Role::User => println!("du> {text}"),
    }
}

fn bar(percent: f32) -> String {
    let filled = ((percent / 5.0).round() as usize).min(20);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}

fn prompt_enter(label: &str) -> Result<()> { print!("{label}"); stdout().flush().ok(); let mut s = String::new(); stdin().read_line(&mut s)?; Ok(()) }

/// `None` on end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    if stdin().read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s))
}
