//! Terminal front-end for taking the Python quizzes.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use pylearn_backend::client::run_code_client::RunCodeClient;
use pylearn_backend::config::{DEFAULT_API_BASE_URL, DEFAULT_DATABASE_URL};
use pylearn_backend::database::pool::create_pool;
use pylearn_backend::models::answer::AnswerValue;
use pylearn_backend::models::question::QuestionKind;
use pylearn_backend::models::quiz_result::QuizResult;
use pylearn_backend::services::catalog_service::QuizCatalog;
use pylearn_backend::services::quiz_session::{LoadOutcome, QuizSession, SessionState};
use pylearn_backend::services::result_store::{ResultRepository, SqliteResultStore};
use pylearn_backend::services::timer_service::{spawn_countdown, TimerEvent};
use pylearn_backend::utils::time::{format_clock, format_duration};

#[derive(Parser)]
#[command(name = "pylearn", version, about = "Python quizzes in the terminal")]
struct Cli {
    /// SQLite database holding quiz results
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Quiz catalog JSON (built-in catalog when omitted)
    #[arg(long, env = "QUIZ_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Backend serving POST /run-code
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available quizzes
    List,

    /// Take a quiz
    Take { quiz_id: String },

    /// Show the stored result of a quiz
    Result { quiz_id: String },

    /// Run a Python file through the backend
    Run { file: PathBuf },
}

enum Flow {
    Continue,
    Edit,
    Submitted(QuizResult),
    Quit,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let catalog = QuizCatalog::load(cli.catalog.as_deref()).await?;
    let client = RunCodeClient::new(&cli.api_base_url);

    match cli.command {
        Commands::List => {
            print_catalog(&catalog);
            Ok(())
        }
        Commands::Take { quiz_id } => {
            let repo = open_results(&cli.database_url).await?;
            take_quiz(&catalog, &repo, &client, &quiz_id).await
        }
        Commands::Result { quiz_id } => {
            let repo = open_results(&cli.database_url).await?;
            match repo.load(&quiz_id).await? {
                Some(result) => print_result(&catalog, &result),
                None => {
                    println!("No result stored for '{}'.", quiz_id);
                    print_catalog(&catalog);
                }
            }
            Ok(())
        }
        Commands::Run { file } => {
            let code = tokio::fs::read_to_string(&file).await?;
            run_code(&client, &code).await;
            Ok(())
        }
    }
}

async fn open_results(database_url: &str) -> anyhow::Result<ResultRepository> {
    let pool = create_pool(database_url, 1).await?;
    Ok(ResultRepository::new(Arc::new(SqliteResultStore::new(pool))))
}

fn print_catalog(catalog: &QuizCatalog) {
    println!("Available quizzes:");
    for quiz in catalog.list() {
        println!(
            "  {:<20} {} ({} minutes, {} MCQs, {} coding)",
            quiz.id,
            quiz.title,
            quiz.time_limit,
            quiz.mcq_count(),
            quiz.coding_count()
        );
        println!("  {:<20} {}", "", quiz.description);
    }
}

async fn take_quiz(
    catalog: &QuizCatalog,
    repo: &ResultRepository,
    client: &RunCodeClient,
    quiz_id: &str,
) -> anyhow::Result<()> {
    let mut session = match QuizSession::load(catalog, quiz_id) {
        LoadOutcome::Started(session) => session,
        LoadOutcome::RedirectToCatalog => {
            println!("Quiz '{}' does not exist.", quiz_id);
            print_catalog(catalog);
            return Ok(());
        }
    };

    let (tx, mut timer_events) = mpsc::unbounded_channel();
    let timer = spawn_countdown(session.remaining_seconds(), move |event| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(event);
        }
    });

    println!("{} ({})", session.quiz().title, format_clock(session.remaining_seconds()));
    print_help();
    print_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut editor: Option<Vec<String>> = None;

    let outcome = loop {
        tokio::select! {
            Some(event) = timer_events.recv() => {
                if let Some(result) = session.on_timer(event) {
                    println!("\nTime is up! Your answers were submitted.");
                    break Some(result);
                }
                if let TimerEvent::Tick { remaining } = event {
                    if remaining == 60 || remaining == 10 {
                        println!("[{} left]", format_clock(remaining));
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break None;
                };
                if let Some(buffer) = editor.as_mut() {
                    if line.trim() == "." {
                        let code = buffer.join("\n");
                        editor = None;
                        answer_current(&mut session, AnswerValue::Code(code));
                    } else {
                        buffer.push(line);
                    }
                    continue;
                }
                match handle_command(&mut session, client, line.trim()).await {
                    Flow::Continue => {}
                    Flow::Edit => {
                        println!("Type your code, finish with a line containing only '.'");
                        editor = Some(Vec::new());
                    }
                    Flow::Submitted(result) => break Some(result),
                    Flow::Quit => break None,
                }
            }
        }
    };
    timer.cancel();

    match outcome {
        Some(result) => {
            repo.save(&result).await?;
            print_result(catalog, &result);
        }
        None => println!("Quiz abandoned, nothing was saved."),
    }
    Ok(())
}

async fn handle_command(session: &mut QuizSession, client: &RunCodeClient, cmd: &str) -> Flow {
    let outcome = match (session.state(), cmd) {
        (_, "q" | "quit") => return Flow::Quit,
        (_, "h" | "help") => {
            print_help();
            Ok(())
        }
        (_, "t" | "time") => {
            println!("{} remaining", format_clock(session.remaining_seconds()));
            Ok(())
        }
        (SessionState::ConfirmingSubmit, "y" | "yes") => {
            return match session.confirm_submit() {
                Ok(result) => Flow::Submitted(result),
                Err(e) => {
                    println!("{}", e);
                    Flow::Continue
                }
            };
        }
        (SessionState::ConfirmingSubmit, "c" | "continue") => session.cancel_submit(),
        (_, "n" | "next") => session.next().map(|_| ()),
        (_, "p" | "prev") => session.previous().map(|_| ()),
        (_, "s" | "show") => Ok(()),
        (SessionState::InProgress, "code") => return Flow::Edit,
        (SessionState::InProgress, "run") => {
            run_current(session, client).await;
            return Flow::Continue;
        }
        (SessionState::InProgress, choice) if choice.parse::<usize>().is_ok() => {
            let picked = choice.parse::<usize>().unwrap_or(0);
            if picked == 0 {
                println!("Options are numbered from 1");
                return Flow::Continue;
            }
            answer_current(session, AnswerValue::Choice(picked - 1));
            return Flow::Continue;
        }
        (_, "") => return Flow::Continue,
        (_, other) => {
            println!("Unknown command '{}', type 'help'", other);
            return Flow::Continue;
        }
    };

    if let Err(e) = outcome {
        println!("{}", e);
    }
    print_question(session);
    Flow::Continue
}

fn answer_current(session: &mut QuizSession, value: AnswerValue) {
    let Some(question_id) = session.current_question().map(|q| q.id.clone()) else {
        return;
    };
    match session.answer(&question_id, value) {
        Ok(()) => println!("Answer saved."),
        Err(e) => println!("{}", e),
    }
}

async fn run_current(session: &QuizSession, client: &RunCodeClient) {
    let Some(question) = session.current_question() else {
        return;
    };
    let QuestionKind::Coding { initial_code, .. } = &question.kind else {
        println!("Only coding questions can be run");
        return;
    };
    let code = session
        .answers()
        .get_answer(&question.id)
        .and_then(AnswerValue::as_code)
        .unwrap_or(initial_code)
        .to_string();
    run_code(client, &code).await;
}

async fn run_code(client: &RunCodeClient, code: &str) {
    println!("Running...");
    match client.run(code).await {
        Ok(resp) => {
            if !resp.output.is_empty() {
                println!("{}", resp.output.trim_end());
            }
            if let Some(err) = resp.error {
                println!("{}", err.trim_end());
            }
        }
        Err(e) => {
            let notice = e.notice();
            println!("{}: {}", notice.title, notice.details);
        }
    }
}

fn print_help() {
    println!(
        "Commands: <number> pick option, code write answer, run execute code, \
         n next, p previous, t time left, s show, q quit"
    );
}

fn print_question(session: &QuizSession) {
    if session.state() == SessionState::ConfirmingSubmit {
        println!(
            "\nComplete quiz? You have {} remaining. [y] complete, [c] continue",
            format_clock(session.remaining_seconds())
        );
        return;
    }
    let Some(question) = session.current_question() else {
        return;
    };
    let total = session.quiz().questions.len();
    println!(
        "\nQuestion {} of {} ({} points)",
        session.current_index() + 1,
        total,
        question.points
    );
    println!("{}", question.prompt);

    let current = session.answers().get_answer(&question.id);
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => {
            let selected = current.and_then(AnswerValue::as_choice);
            for (idx, option) in options.iter().enumerate() {
                let marker = if selected == Some(idx) { '*' } else { ' ' };
                println!(" {} {}. {}", marker, idx + 1, option);
            }
        }
        QuestionKind::Coding {
            initial_code,
            test_cases,
        } => {
            let code = current.and_then(AnswerValue::as_code).unwrap_or(initial_code);
            println!("---\n{}\n---", code);
            for (idx, case) in test_cases.iter().enumerate() {
                println!(
                    "Test case {}: input {} expected {}",
                    idx + 1,
                    case.input,
                    case.expected_output
                );
            }
        }
    }
}

fn print_result(catalog: &QuizCatalog, result: &QuizResult) {
    let quiz = catalog.find(&result.quiz_id);
    println!(
        "\nResults: {}",
        quiz.map(|q| q.title.as_str()).unwrap_or(&result.quiz_id)
    );
    println!(
        "Score: {} / {} points ({:.1}%)",
        result.score,
        result.total_points,
        result.percentage()
    );
    println!(
        "Correct: {} of {} questions",
        result.correct_count(),
        result.answers.len()
    );
    println!("Time taken: {}", format_duration(result.elapsed_seconds));
    println!(
        "Completed: {}",
        result
            .completed_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    );

    for (idx, outcome) in result.answers.iter().enumerate() {
        let Some(question) = quiz.and_then(|q| q.question(&outcome.question_id)) else {
            continue;
        };
        println!(
            "  Question {} [{}] {} {}/{}",
            idx + 1,
            if question.is_coding() { "Coding" } else { "MCQ" },
            if outcome.is_correct { "Correct" } else { "Incorrect" },
            outcome.points,
            question.points
        );
    }
}
