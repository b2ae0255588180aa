// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use clap::{Parser, Subcommand};
use noticrawl::application::use_cases::crawl_use_case::CrawlUseCase;
use noticrawl::config::settings::Settings;
use noticrawl::engines::chromium_driver::ChromiumDriver;
use noticrawl::infrastructure::crawlers::AdapterRegistry;
use noticrawl::infrastructure::database::{connection, seed};
use noticrawl::infrastructure::metrics::init_metrics;
use noticrawl::infrastructure::repositories::board_repo_impl::BoardRepositoryImpl;
use noticrawl::infrastructure::repositories::notice_repo_impl::NoticeRepositoryImpl;
use noticrawl::utils::telemetry;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "noticrawl")]
#[command(about = "Incremental crawler for university notice boards")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl one board by id, or all active boards (optionally filtered by slug)
    Crawl {
        /// Only crawl boards with these slugs
        #[arg(long = "board", value_name = "SLUG")]
        boards: Vec<String>,

        /// Crawl a single board by id
        #[arg(long, conflicts_with = "boards")]
        id: Option<String>,
    },

    /// List active boards
    Boards {
        /// Group boards by category
        #[arg(long)]
        grouped: bool,
    },

    /// Show last crawl time and notice count per board
    Status,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 主函数
///
/// 加载配置、准备数据库和初始公告板，然后执行子命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry(cli.json_logs);

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    info!("Configuration loaded");
    init_metrics(&settings.metrics);

    // 3. Connect to database and run migrations
    let db = connection::connect_and_migrate(&settings.database)
        .await
        .context("failed to prepare database")?;
    let db = Arc::new(db);

    // 4. Seed boards
    let board_repo = Arc::new(BoardRepositoryImpl::new(db.clone()));
    let notice_repo = Arc::new(NoticeRepositoryImpl::new(db.clone()));
    let seeded = seed::seed_boards(board_repo.as_ref()).await?;
    if seeded > 0 {
        info!("Seeded {} boards", seeded);
    }

    let use_case = CrawlUseCase::new(
        board_repo,
        notice_repo,
        AdapterRegistry::with_defaults(),
        Arc::new(ChromiumDriver::new(settings.browser.clone())),
        settings.crawl.clone(),
    );

    // 5. Run command
    match cli.command {
        Commands::Crawl { boards, id } => match id {
            Some(id) => print_json(&use_case.crawl_one(&id).await)?,
            None => print_json(&use_case.crawl_many(Some(boards.as_slice())).await?)?,
        },
        Commands::Boards { grouped } => {
            if grouped {
                print_json(&use_case.get_boards_by_group().await?)?
            } else {
                print_json(&use_case.get_boards().await?)?
            }
        }
        Commands::Status => print_json(&use_case.get_crawl_status().await?)?,
    }

    Ok(())
}
