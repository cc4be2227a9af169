use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use futures_util::lock::Mutex;
use gymminder_domain::{
    DeleteError, Entropy, ExportDialog, ExportError, HistoryEntry, Property, ReadError, Routine,
    RoutineID, RoutineRequest, Service,
};
use gymminder_storage::{Storage, model};
use log::LevelFilter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::{
    command,
    settings::{Settings, SettingsRepository, parse_assignment},
};

#[derive(Debug, Parser)]
#[command(name = "gymminder", version, about = "Workout routine generator")]
pub struct Cli {
    /// Directory holding the settings, history and saved routines
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log debug messages
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a routine for a split type (fullbody, upperlower, pushpulllegs, bro)
    Generate {
        split_type: String,

        /// Muscle groups trained yesterday
        #[arg(long, value_delimiter = ',')]
        yesterday: Vec<String>,

        /// Sore muscle groups
        #[arg(long, value_delimiter = ',')]
        sore: Vec<String>,

        /// Save the routine to the history
        #[arg(long)]
        save: bool,

        /// Export the routine to a file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print the routine as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved routines, newest first
    History {
        /// Only show routines whose date or split type contains this term
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a saved routine
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Export a saved routine to a file
    Export {
        id: String,

        /// Destination path, asks on standard input if omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete a saved routine and its file
    Delete { id: String },
    /// Delete routine files that are not referenced by the history
    Prune,
    /// Run a JSON command and print the JSON response
    Invoke {
        #[arg(value_parser = clap::builder::PossibleValuesParser::new(command::COMMANDS))]
        command: String,

        /// JSON payload
        payload: Option<String>,
    },
    /// Show or change settings
    Settings {
        /// Change a setting, e.g. auto_save=true
        #[arg(long, value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

pub async fn run(args: Cli) -> Result<()> {
    let storage = Storage::new(data_dir(args.data_dir));
    let settings = storage
        .read_settings()
        .await
        .map_err(|err| anyhow!("설정을 읽는 중 오류가 발생했습니다: {err}"))?;
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        settings.log_level
    };
    crate::log::init(storage.clone(), level).context("로그를 초기화할 수 없습니다")?;

    let service = Service::new(storage.clone(), settings.options());

    match args.command {
        Command::Generate {
            split_type,
            yesterday,
            sore,
            save,
            export,
            json,
        } => {
            let request = RoutineRequest::parse(&split_type, &yesterday, &sore)?;
            let routine = service.generate_routine(&request, &mut Entropy);
            if json {
                println!("{}", to_json(&model::Routine::from(&routine))?);
            } else {
                print!("{}", format_routine(&routine));
            }
            if save || settings.auto_save {
                let entry = service
                    .save_routine(&routine)
                    .await
                    .map_err(|err| anyhow!("저장 중 오류가 발생했습니다: {err}"))?;
                eprintln!("{} ({})", command::SAVED, entry.id);
            }
            if let Some(path) = export {
                export_routine(&service, &routine, &Destination(path)).await?;
            }
        }
        Command::History { search } => {
            service
                .load_history()
                .await
                .map_err(|err| anyhow!("히스토리 로드 중 오류가 발생했습니다: {err}"))?;
            for entry in service.search_history(search.as_deref().unwrap_or_default()) {
                println!("{}", format_entry(&entry));
            }
        }
        Command::Show { id, json } => {
            let routine = view_routine(&service, &id).await?;
            if json {
                println!("{}", to_json(&model::Routine::from(&routine))?);
            } else {
                print!("{}", format_routine(&routine));
            }
        }
        Command::Export { id, output } => {
            let routine = view_routine(&service, &id).await?;
            match output {
                Some(path) => export_routine(&service, &routine, &Destination(path)).await?,
                None => export_routine(&service, &routine, &Prompt::stdin()).await?,
            }
        }
        Command::Delete { id } => {
            let entry = service
                .delete_routine(&RoutineID::from(id))
                .await
                .map_err(|err| match err {
                    DeleteError::NotFound => anyhow!(command::NOT_FOUND),
                    err => anyhow!("삭제 중 오류가 발생했습니다: {err}"),
                })?;
            eprintln!("{} ({})", command::DELETED, entry.id);
        }
        Command::Prune => {
            let removed = service
                .prune_orphans()
                .await
                .map_err(|err| anyhow!("정리 중 오류가 발생했습니다: {err}"))?;
            for file_name in &removed {
                println!("{file_name}");
            }
            eprintln!("참조되지 않은 루틴 파일 {}개를 삭제했습니다.", removed.len());
        }
        Command::Invoke { command, payload } => {
            let payload = match payload {
                Some(payload) => serde_json::from_str(&payload).context("잘못된 JSON 요청입니다")?,
                None => serde_json::Value::Null,
            };
            let response =
                command::invoke(&service, &Prompt::stdin(), &mut Entropy, &command, payload)
                    .await;
            println!("{}", to_json(&response)?);
        }
        Command::Settings { set } => {
            let settings = if set.is_empty() {
                settings
            } else {
                update_settings(&storage, settings, &set).await?
            };
            println!("{}", to_json(&settings)?);
        }
    }

    Ok(())
}

fn data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        dirs::data_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join("gymminder"))
    })
}

async fn view_routine(service: &Service<Storage>, id: &str) -> Result<Routine> {
    service
        .view_routine(&RoutineID::from(id))
        .await
        .map_err(|err| match err {
            ReadError::NotFound => anyhow!("{} ({id})", command::NOT_FOUND),
            err => anyhow!("루틴을 읽는 중 오류가 발생했습니다: {err}"),
        })
}

async fn export_routine(
    service: &Service<Storage>,
    routine: &Routine,
    dialog: &impl ExportDialog,
) -> Result<()> {
    match service.export_routine(routine, dialog).await {
        Ok(path) => eprintln!("{} ({})", command::EXPORTED, path.display()),
        Err(ExportError::Cancelled) => eprintln!("{}", command::EXPORT_CANCELLED),
        Err(err) => return Err(anyhow!("내보내기 중 오류가 발생했습니다: {err}")),
    }
    Ok(())
}

async fn update_settings(
    storage: &Storage,
    mut settings: Settings,
    assignments: &[String],
) -> Result<Settings> {
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        settings.set(key, value)?;
    }
    storage
        .write_settings(&settings)
        .await
        .map_err(|err| anyhow!("설정을 저장하는 중 오류가 발생했습니다: {err}"))?;
    Ok(settings)
}

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("출력을 만드는 중 오류가 발생했습니다")
}

fn format_routine(routine: &Routine) -> String {
    let mut output = format!(
        "{} · {} · 예상 {}분\n",
        routine.date,
        routine.split_type.name(),
        routine.estimated_minutes
    );
    for (i, exercise) in routine.exercises.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. {} ({}) {}세트 x {} [{}]\n",
            i + 1,
            exercise.name,
            exercise.muscle_name(),
            exercise.sets,
            exercise.reps,
            exercise.difficulty_name()
        ));
    }
    output.push_str(&format!("id: {}\n", routine.id));
    output
}

fn format_entry(entry: &HistoryEntry) -> String {
    format!(
        "{}  {}  {}  운동 {}개  {}분",
        entry.id,
        entry.date,
        entry.split_type.name(),
        entry.exercise_count,
        entry.estimated_minutes
    )
}

/// Writes to a path given on the command line. Directories receive the default file name.
struct Destination(PathBuf);

impl ExportDialog for Destination {
    async fn choose_destination(&self, default_file_name: &str) -> Option<PathBuf> {
        Some(destination(&self.0, default_file_name))
    }
}

fn destination(path: &Path, default_file_name: &str) -> PathBuf {
    if path.is_dir() {
        path.join(default_file_name)
    } else {
        path.to_path_buf()
    }
}

/// Asks for the destination on an input stream. An empty answer or the end of input cancels.
struct Prompt<I> {
    input: Mutex<I>,
}

impl Prompt<BufReader<Stdin>> {
    fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<I: AsyncBufRead + Unpin> Prompt<I> {
    fn new(input: I) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl<I: AsyncBufRead + Unpin> ExportDialog for Prompt<I> {
    async fn choose_destination(&self, default_file_name: &str) -> Option<PathBuf> {
        eprint!("저장할 파일 경로 (예: {default_file_name}, 비워 두면 취소): ");
        if let Err(err) = std::io::stderr().flush() {
            log::debug!("failed to flush prompt: {err}");
        }
        let mut answer = String::new();
        match self.input.lock().await.read_line(&mut answer).await {
            Ok(0) => None,
            Ok(_) => {
                let answer = answer.trim();
                (!answer.is_empty()).then(|| destination(Path::new(answer), default_file_name))
            }
            Err(err) => {
                log::error!("failed to read destination: {err}");
                None
            }
        }
    }
}
