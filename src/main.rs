//! Tidbyt 비트코인 가격 트래커 CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bitcoin_tracker::{Tracker, TrackerConfig};

#[derive(Parser)]
#[command(name = "bitcoin-tracker")]
#[command(about = "Tidbyt Bitcoin Price Tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, default_value = "tidbyt_config.json")]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 한 번 업데이트 후 종료
    Push,

    /// 데몬 모드: 주기적으로 가격 업데이트 실행
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("bitcoin_tracker={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Tidbyt Bitcoin Tracker 시작");

    // 설정 로드 (credential 누락 시 여기서 종료)
    let config = TrackerConfig::from_file(&cli.config)?;
    tracing::debug!(
        device_id = %config.device_id,
        cache_ttl_secs = config.cache_ttl_secs,
        update_interval_secs = config.update_interval_secs,
        "설정 로드 완료"
    );

    let mut tracker = Tracker::new(&config);

    match cli.command {
        Commands::Push => {
            let outcome = tracker.update_once().await?;
            tracing::info!(price = outcome.price, "단일 업데이트 완료");
            tracker.stats().log_summary("단일 업데이트");
        }
        Commands::Daemon => {
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}초) ===",
                config.update_interval_secs
            );

            let mut interval = tokio::time::interval(config.update_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        match tracker.update_once().await {
                            Ok(outcome) => {
                                tracing::info!(
                                    price = outcome.price,
                                    cache_hit = outcome.cache_hit,
                                    "업데이트 완료, 다음 실행: {}초 후",
                                    config.update_interval_secs
                                );
                            }
                            Err(e) => {
                                // 반복 단위 에러는 치명적이지 않음, 다음 주기에 재시도
                                tracing::error!("업데이트 실패: {}", e);
                            }
                        }
                    }
                }
            }

            tracker.stats().log_summary("데몬 실행");
        }
    }

    tracing::info!("Tidbyt Bitcoin Tracker 종료");

    Ok(())
}
