use anyhow::{Context, Result};
use clap::Parser;

use exchange_store::domains::exchange::models::AuctionId;
use exchange_store::shared::config::DbConfig;
use exchange_store::shared::database::{ConnectTarget, Database, MemoryStore, MySqlConnector};
use exchange_store::shared::utils::init_logging;

/// 거래소 DB 스키마/테이블 셋업
/// Provision the exchange schemas and tables
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 실제 DB 대신 메모리 저장소에 셋업하고 실행된 DDL 출력
    #[arg(long)]
    dry_run: bool,

    /// 경매 테이블도 셋업 (32바이트 경매 ID, hex)
    #[arg(long, value_name = "HEX")]
    auction: Option<String>,

    /// 피어 테이블도 셋업
    #[arg(long)]
    peers: bool,

    /// 거래쌍 목록을 JSON으로 출력
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    // 설정 로드 (환경 변수)
    let config = DbConfig::from_env();
    let coins = config.coins();

    let auction_id = args
        .auction
        .as_deref()
        .map(AuctionId::from_hex)
        .transpose()
        .context("Invalid auction ID, expected 64 hex characters")?;

    let target = ConnectTarget::resolve(&config.username, &config.password, &config.host, config.port)
        .await
        .context("Failed to create database connection")?;

    // dry-run이면 메모리 저장소, 아니면 MySQL
    let memory = args.dry_run.then(MemoryStore::new);
    let db = match &memory {
        Some(store) => Database::new(target, store.connector()),
        None => Database::new(target, MySqlConnector),
    };
    let mut db = db.with_schemas(config.schemas.clone());

    db.setup_client(coins)
        .await
        .context("Failed to set up exchange database")?;

    if args.peers {
        let schemas = db.schemas().clone();
        db.setup_peer_tables(&schemas.peer, &schemas.peer_table)
            .await
            .context("Failed to set up peer tables")?;
    }

    if let Some(auction_id) = auction_id {
        db.setup_auction_tables(auction_id)
            .await
            .context("Failed to set up auction tables")?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(db.get_pairs())?);
    } else {
        println!("Database: {} ({} coins)", db.addr(), db.coins().len());
        for pair in db.get_pairs() {
            println!("Pair: {}", pair);
        }
    }

    if let Some(store) = memory {
        for stmt in store.log() {
            println!("{}", stmt);
        }
    }

    db.close().await;
    Ok(())
}
