use anyhow::Result;
use app_utils::{credential_store_from_env, init_from_env, init_tracing, load_dotenv};
use canvas_api::creds::Creds;
use chrono::Utc;
use clap::Parser;
use due_report::args::{Cli, Command, ListArgs};
use due_report::explain;
use due_report::report::{self, Summary, Table};
use lib_due::board::Board;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    load_dotenv();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    match cli.command {
        Command::List(args) => list(args).await.map_err(explain),
        Command::Login { token, base_url } => {
            let creds = match base_url {
                Some(base_url) => Creds::new(token, base_url),
                None => Creds::with_default_base_url(token),
            };
            let user = app_utils::login(&credential_store_from_env(), creds)
                .await
                .map_err(explain)?;
            println!("Logged in as {}", user.name());
            Ok(())
        }
        Command::Logout => {
            app_utils::logout(&credential_store_from_env())?;
            println!("Logged out");
            Ok(())
        }
    }
}

async fn list(args: ListArgs) -> Result<()> {
    let canvas = init_from_env().await?;

    let now = Utc::now();
    let mut board = Board::new();
    board.refresh_at(&canvas, now).await?;
    for failure in board.failures() {
        warn!(course = failure.course_name(), err = %failure.error(), "skipped course");
    }

    board.set_criteria(args.criteria(board.courses())?);
    board.set_sort(args.sort_state());
    let visible = board.visible();

    if args.csv {
        report::write_csv(visible, std::io::stdout().lock())?;
    } else {
        print!("{}", Table::new(&visible, now));
        println!();
        println!("{}", Summary::from(&board.overdue_and_upcoming()));
    }
    Ok(())
}
