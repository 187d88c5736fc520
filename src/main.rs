use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use program_impact_panel::filter::{self, FilterCriteria};
use program_impact_panel::store::{self, EntityStore, ImportKind};
use program_impact_panel::validation::{FormData, Schema};
use program_impact_panel::wizard::WizardController;
use program_impact_panel::{forms, metrics, report, submit};

#[derive(Parser)]
#[command(name = "impact-panel")]
#[command(about = "Impact dashboard for an educational program: classes, students, instructors and prospects", long_about = None)]
struct Cli {
    /// JSON snapshot the program data is loaded from and saved to
    #[arg(long, env = "IMPACT_DATA", default_value = "impact-data.json", global = true)]
    data: PathBuf,
    /// Date used as "today" for monthly counts and ages
    #[arg(long, env = "IMPACT_TODAY", global = true)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Only classes following a curriculum of this course
    #[arg(long)]
    course: Option<String>,
    /// Only classes starting on or after this date
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Only classes starting on or before this date
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            course_id: args.course,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportArg {
    Students,
    Prospects,
}

impl From<ImportArg> for ImportKind {
    fn from(arg: ImportArg) -> Self {
        match arg {
            ImportArg::Students => ImportKind::Students,
            ImportArg::Prospects => ImportKind::Prospects,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load realistic demo data
    Seed,
    /// Import students or prospects from a CSV file
    Import {
        #[arg(long, value_enum)]
        kind: ImportArg,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print headline metrics
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print every metric as JSON instead of the headline lines
        #[arg(long)]
        json: bool,
    },
    /// Rank active instructors by attendance and diaries filed
    Ranking {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Enroll a student through the enrollment wizard
    Enroll {
        /// JSON object with the form answers
        #[arg(long)]
        answers: PathBuf,
        #[arg(long, default_value_t = 800)]
        delay_ms: u64,
    },
    /// Register an instructor through the registration wizard
    RegisterInstructor {
        /// JSON object with the form answers
        #[arg(long)]
        answers: PathBuf,
        #[arg(long, default_value_t = 800)]
        delay_ms: u64,
    },
}

fn read_answers(path: &Path) -> anyhow::Result<FormData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON object of strings", path.display()))
}

/// Walks every step with the given answers. Returns the form data once the
/// wizard is submitted, or prints the blocking errors and returns `None`.
fn complete_wizard<S: Schema>(wizard: &mut WizardController<S>, answers: FormData) -> Option<FormData> {
    wizard.set_fields(answers);
    while !wizard.is_last_step() {
        if !wizard.next() {
            break;
        }
    }
    let submitted = if wizard.is_last_step() {
        wizard.submit(|form| form.clone())
    } else {
        None
    };

    if submitted.is_none() {
        let step = wizard.current_step();
        let title = wizard
            .definition()
            .step(step)
            .map(|s| s.title)
            .unwrap_or("?");
        println!("Step {step} ({title}) is incomplete:");
        for message in wizard.errors().messages() {
            println!("- {message}");
        }
    }
    submitted
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());
    let mut store = EntityStore::load(&cli.data)?;
    info!(
        path = %cli.data.display(),
        classes = store.class_sessions().len(),
        students = store.students().len(),
        "program data loaded"
    );

    match cli.command {
        Commands::Seed => {
            store::seed(&mut store)?;
            store.save(&cli.data)?;
            println!("Seed data written to {}.", cli.data.display());
        }
        Commands::Import { kind, csv } => {
            let inserted = store::import_csv(&mut store, kind.into(), &csv)?;
            store.save(&cli.data)?;
            println!("Inserted {inserted} records from {}.", csv.display());
        }
        Commands::Summary {
            filter: scope,
            json,
        } => {
            let criteria = FilterCriteria::from(scope);
            let view = filter::apply(&store, &criteria);
            let summary = metrics::summarize(&store, &view, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("Impact summary for {}:", criteria.describe());
            println!(
                "- {} students, {} classes, {} instructors, {} prospects",
                summary.total_students,
                summary.total_classes,
                summary.total_instructors,
                summary.total_prospects
            );
            println!("- completion {}%", summary.completion_rate);
            println!("- dropout {}%", summary.dropout_rate);
            println!("- attendance {}%", summary.attendance_rate);
            println!("- seat occupancy {}%", summary.seat_occupancy_rate);
        }
        Commands::Ranking {
            filter: scope,
            limit,
        } => {
            let criteria = FilterCriteria::from(scope);
            let view = filter::apply(&store, &criteria);
            let ranking = metrics::rank_instructors(metrics::instructor_performance(
                view.instructors.iter().copied(),
                &view.classes,
                store.diaries(),
                today,
            ));

            if ranking.is_empty() {
                println!("No active instructors for this scope.");
                return Ok(());
            }

            println!("Top instructors for {}:", criteria.describe());
            for record in ranking.iter().take(limit) {
                println!(
                    "- {} score {:.1} (attendance {}%, {} diaries, {} this month)",
                    record.name,
                    record.score(),
                    record.average_attendance_rate,
                    record.diaries_logged,
                    record.diaries_this_month
                );
            }
        }
        Commands::Report { filter: scope, out } => {
            let criteria = FilterCriteria::from(scope);
            let view = filter::apply(&store, &criteria);
            let summary = metrics::summarize(&store, &view, today);
            let report = report::build_report(&criteria.describe(), today, &summary);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Enroll { answers, delay_ms } => {
            let mut wizard = forms::student_enrollment();
            let Some(form) = complete_wizard(&mut wizard, read_answers(&answers)?) else {
                return Ok(());
            };
            let student = forms::student_from_form(&form)?;
            let added = submit::simulate_submission(
                "student enrollment",
                Duration::from_millis(delay_ms),
                || store.add_student(student).map(|s| s.id.clone()),
            )
            .await;
            match added {
                Some(id) => {
                    store.save(&cli.data)?;
                    println!("Student enrolled with id {id}.");
                }
                None => warn!("enrollment was not saved"),
            }
        }
        Commands::RegisterInstructor { answers, delay_ms } => {
            let mut wizard = forms::instructor_registration();
            let Some(form) = complete_wizard(&mut wizard, read_answers(&answers)?) else {
                return Ok(());
            };
            let instructor = forms::instructor_from_form(&form)?;
            let added = submit::simulate_submission(
                "instructor registration",
                Duration::from_millis(delay_ms),
                || store.add_instructor(instructor).map(|i| i.id.clone()),
            )
            .await;
            match added {
                Some(id) => {
                    store.save(&cli.data)?;
                    println!("Instructor registered with id {id}.");
                }
                None => warn!("registration was not saved"),
            }
        }
    }

    Ok(())
}
