use crate::models::Trend;
use crate::services::PredictionService;

pub async fn run(public_url: &str) {
    let result = async {
        let service = PredictionService::new(public_url)?;
        let trend = service.market_trend().await?;
        let stats = service.prediction_stats().await?;
        Ok::<_, crate::error::AppError>((trend, stats))
    }
    .await;

    let (trend, stats) = match result {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let icon = match trend.trend {
        Trend::Bullish => "📈",
        Trend::Bearish => "📉",
        Trend::Neutral => "➖",
    };

    println!("{} Market trend: {}", icon, trend.trend);
    println!("   Up:   {} / {} ({}%)", trend.up, trend.total, trend.up_percent);
    println!("   Down: {}", trend.down);
    println!("   Average confidence: {}%", stats.average_confidence);
    println!("   Last updated:       {}", stats.last_updated);
}
