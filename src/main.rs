use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use fit_coach::config::EngineConfig;
use fit_coach::engine::OnboardingEngine;
use fit_coach::intent::RuleBasedExtractor;
use fit_coach::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = EngineConfig::default();
    if let Ok(weight) = std::env::var("FIT_COACH_WEIGHT_KG") {
        config.avg_weight_kg = weight.parse().unwrap_or(config.avg_weight_kg);
    }
    if let Ok(tdee) = std::env::var("FIT_COACH_BASE_TDEE") {
        config.base_tdee_kcal = tdee.parse().unwrap_or(config.base_tdee_kcal);
    }
    let user_id = std::env::var("FIT_COACH_USER").unwrap_or_else(|_| "local-user".to_string());

    let engine = OnboardingEngine::new(
        config,
        Arc::new(RuleBasedExtractor::new()),
        Arc::new(MemoryStore::new()),
    )?;

    eprintln!("🏋️  fit-coach v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Let's build your training and nutrition profile.");
    eprintln!("   Commands: /progress, /quit\n");
    eprintln!("First: how experienced are you with training, and what's your goal?\n");

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    loop {
        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }
        if line == "/quit" {
            break;
        }
        if line == "/progress" {
            match engine.get_progress(&user_id).await {
                Ok(progress) => println!(
                    "\nStage {}/{} — {:.0}% complete\n",
                    progress.current_stage_index + 1,
                    progress.total_stages,
                    progress.completion_percentage
                ),
                Err(e) => println!("\n{e}\n"),
            }
            eprint!("> ");
            continue;
        }

        match engine.handle_utterance(&user_id, &line).await {
            Ok(reply) => {
                println!("\n{}\n", reply.message);
                if reply.onboarding_complete
                    && let Some(profile) = reply.profile
                {
                    println!("{}\n", serde_json::to_string_pretty(&profile)?);
                    break;
                }
            }
            Err(e) => println!("\n{e}\n"),
        }
        eprint!("> ");
    }

    Ok(())
}
